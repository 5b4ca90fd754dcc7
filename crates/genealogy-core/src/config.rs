//! Runtime configuration: search endpoint, pacing, and timeouts.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_SEARCH_URL: &str = "https://theses.fr/api/v1/theses/recherche/";
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Number of hits the search service returns when no `nombre` is given.
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Top-level configuration shared by the fetcher and the traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenealogyConfig {
    /// Thesis search endpoint, queried with `?q=directeursPpn:(<id>)`.
    pub search_url: String,
    /// Pause inserted before each recursive descent.
    pub request_delay: Duration,
    /// Per-request timeout for the HTTP client.
    pub request_timeout: Duration,
    /// Hit count above which the first page is known to be truncated.
    pub page_size: u64,
    pub max_depth: u32,
}

impl Default for GenealogyConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.into(),
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl GenealogyConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("GENEALOGY_SEARCH_URL").filter(|u| !u.trim().is_empty()) {
            config.search_url = url.trim().to_string();
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "GENEALOGY_REQUEST_DELAY_MS") {
            config.request_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "GENEALOGY_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs);
        }

        config
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring invalid {}={:?}, using default", key, raw);
            None
        }
    }
}
