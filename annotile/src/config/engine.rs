//! Engine configuration.

use std::time::Duration;

use crate::fetch::FetchConfig;
use crate::zoom::{CapPolicy, ZoomSettings};

/// Identifying user-agent sent with every tile request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible)";

/// All tunables the capture engine takes, by value.
///
/// The engine never reads a config file itself; see
/// [`Settings`](super::Settings) for the file-backed overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Zoom selection bounds and tile-count cap.
    pub zoom: ZoomSettings,
    /// Fetch pool tunables.
    pub fetch: FetchConfig,
    /// User-agent header for tile requests.
    pub user_agent: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            zoom: ZoomSettings::default(),
            fetch: FetchConfig::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl EngineConfig {
    /// Set the tile-count cap.
    pub fn with_tile_cap(mut self, cap: u64) -> Self {
        self.zoom.tile_cap = cap;
        self
    }

    /// Set the zoom scan range.
    pub fn with_zoom_range(mut self, preferred: u8, minimum: u8) -> Self {
        self.zoom.preferred = preferred;
        self.zoom.minimum = minimum;
        self
    }

    /// Set the cap-exceeded policy.
    pub fn with_cap_policy(mut self, policy: CapPolicy) -> Self {
        self.zoom.cap_policy = policy;
        self
    }

    /// Set the total attempts per tile.
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.fetch.attempts = attempts;
        self
    }

    /// Set the delay between attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.fetch.retry_delay = delay;
        self
    }

    /// Set the per-attempt timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.fetch.request_timeout = timeout;
        self
    }

    /// Set the concurrent worker bound.
    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.fetch.max_workers = workers;
        self
    }

    /// Set the user-agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
