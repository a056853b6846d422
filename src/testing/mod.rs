//! Testing utilities for the Gather SDK.
//!
//! Provides a scripted transport for testing applications that use the SDK
//! without a live Gather tenant.

mod mock;

pub use mock::{MockCall, MockResponse, MockTransport};
