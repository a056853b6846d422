//! Client-side rate ledger.
//!
//! Tracks request instants per tier in a sliding window. The ledger is
//! advisory: nothing consults it unless the caller calls
//! [`RateLedger::check`] or wraps a transport in [`RateLimitedTransport`].

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::{Error, Result};
use crate::request::ApiRequest;
use crate::transport::ApiTransport;

/// Name of the tier used when none is configured.
pub const STANDARD_TIER: &str = "standard";

/// Name of the higher-volume tier.
pub const PREMIUM_TIER: &str = "premium";

/// Quota for one tier: at most `max_requests` per rolling `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateTier {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Window length
    pub window: Duration,
}

impl RateTier {
    pub const fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }
}

impl Default for RateTier {
    fn default() -> Self {
        Self::new(60, Duration::from_secs(60))
    }
}

/// Default quotas for the known tiers.
pub fn default_tiers() -> HashMap<String, RateTier> {
    let mut tiers = HashMap::new();
    tiers.insert(STANDARD_TIER.to_string(), RateTier::default());
    tiers.insert(
        PREMIUM_TIER.to_string(),
        RateTier::new(300, Duration::from_secs(60)),
    );
    tiers
}

/// Snapshot of a tier's usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Maximum requests allowed in the window
    pub limit: u32,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Time until the oldest in-window entry expires, if any are recorded
    pub reset_after: Option<Duration>,
}

/// Sliding-window request ledger shared across concurrent callers.
///
/// The prune-and-record step runs under a single mutex so concurrent
/// checks can never push usage past the quota.
#[derive(Debug)]
pub struct RateLedger {
    tiers: HashMap<String, RateTier>,
    entries: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl Default for RateLedger {
    fn default() -> Self {
        Self::new(default_tiers())
    }
}

impl RateLedger {
    /// Create a ledger with the given tier quotas.
    pub fn new(tiers: HashMap<String, RateTier>) -> Self {
        Self {
            tiers,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Get the quota for a tier, if configured.
    #[must_use]
    pub fn tier(&self, name: &str) -> Option<&RateTier> {
        self.tiers.get(name)
    }

    /// Set or update the quota for a tier.
    pub fn set_tier(&mut self, name: impl Into<String>, tier: RateTier) {
        self.tiers.insert(name.into(), tier);
    }

    fn quota(&self, name: &str) -> RateTier {
        self.tiers.get(name).copied().unwrap_or_default()
    }

    /// Check the tier's budget and record a request if there is room.
    ///
    /// Unknown tiers fall back to [`RateTier::default`].
    ///
    /// # Errors
    ///
    /// Returns `Error::RateLimitExceeded` with the time until the oldest
    /// in-window entry expires when the tier is at quota.
    pub async fn check(&self, tier: &str) -> Result<()> {
        let quota = self.quota(tier);
        let now = Instant::now();

        let mut entries = self.entries.lock().await;
        let log = entries.entry(tier.to_string()).or_default();
        prune(log, now, quota.window);

        if log.len() >= quota.max_requests as usize {
            let retry_after = log
                .front()
                .map_or(quota.window, |oldest| {
                    (*oldest + quota.window).saturating_duration_since(now)
                });

            tracing::warn!(
                tier,
                limit = quota.max_requests,
                retry_after_ms = %retry_after.as_millis(),
                "Client-side rate limit reached"
            );

            return Err(Error::RateLimitExceeded {
                tier: tier.to_string(),
                retry_after,
            });
        }

        log.push_back(now);
        Ok(())
    }

    /// Report usage without consuming quota.
    pub async fn status(&self, tier: &str) -> RateLimitStatus {
        let quota = self.quota(tier);
        let now = Instant::now();

        let mut entries = self.entries.lock().await;
        let (used, reset_after) = match entries.get_mut(tier) {
            Some(log) => {
                prune(log, now, quota.window);
                let reset = log
                    .front()
                    .map(|oldest| (*oldest + quota.window).saturating_duration_since(now));
                (log.len(), reset)
            }
            None => (0, None),
        };

        let used = u32::try_from(used).unwrap_or(u32::MAX);
        RateLimitStatus {
            limit: quota.max_requests,
            remaining: quota.max_requests.saturating_sub(used),
            reset_after,
        }
    }

    /// Forget all recorded requests.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}

/// Drop entries that have aged out of the window.
fn prune(log: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = log.front() {
        if *oldest + window <= now {
            log.pop_front();
        } else {
            break;
        }
    }
}

/// Transport decorator that consults a [`RateLedger`] before each send.
///
/// The ledger is checked once per logical request; retries performed by the
/// inner transport do not consume extra quota.
pub struct RateLimitedTransport<T> {
    inner: T,
    ledger: Arc<RateLedger>,
    tier: String,
}

impl<T> RateLimitedTransport<T> {
    /// Wrap `inner` so every request is charged to `tier`.
    pub fn new(inner: T, ledger: Arc<RateLedger>, tier: impl Into<String>) -> Self {
        Self {
            inner,
            ledger,
            tier: tier.into(),
        }
    }

    /// Tier this transport charges.
    #[must_use]
    pub fn tier(&self) -> &str {
        &self.tier
    }

    /// Shared ledger.
    #[must_use]
    pub fn ledger(&self) -> &Arc<RateLedger> {
        &self.ledger
    }
}

#[async_trait]
impl<T: ApiTransport> ApiTransport for RateLimitedTransport<T> {
    async fn send(&self, request: &ApiRequest) -> Result<Value> {
        self.ledger.check(&self.tier).await?;
        self.inner.send(request).await
    }
}
