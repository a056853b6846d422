//! Resource clients for the Gather SDK.
//!
//! Each client is a set of fixed method + path templates over
//! [`ApiTransport::send`](crate::transport::ApiTransport::send).

pub mod guests;
pub mod invitations;
pub mod spaces;
pub mod webhooks;

// Re-exports
pub use guests::{BatchConfig, BatchFailure, BatchReport, GuestsClient};
pub use invitations::InvitationsClient;
pub use spaces::SpacesClient;
pub use webhooks::WebhooksClient;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Deserialize a response body, unwrapping a `{"data": ...}` envelope if
/// the API used one.
pub(crate) fn decode<T: DeserializeOwned>(mut response: Value) -> Result<T> {
    if let Some(data) = response.get_mut("data") {
        let data = data.take();
        return serde_json::from_value(data).map_err(Error::from);
    }
    serde_json::from_value(response).map_err(Error::from)
}

/// Deserialize a list response that is either a bare array or an object
/// holding the array under `key`.
pub(crate) fn decode_list<T: DeserializeOwned>(response: Value, key: &str) -> Result<Vec<T>> {
    let mut response = match response {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    if let Some(items) = response.get_mut(key) {
        let items = items.take();
        return serde_json::from_value(items).map_err(Error::from);
    }

    match response {
        Value::Array(_) => serde_json::from_value(response).map_err(Error::from),
        other => Err(Error::InvalidResponse(format!(
            "Expected a list or an object with '{key}', got: {other}"
        ))),
    }
}

/// Percent-encode one path segment.
pub(crate) fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}
