use serde::{Deserialize, Serialize};

/// Tunables for the dashboard core. The defaults mirror the deployed
/// configuration; embedders can override any of them at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the market-data API
    pub api_base_url: String,

    /// Quote currency for catalog listings and the live chart (e.g., "usd")
    pub vs_currency: String,

    /// Capacity of the pinned-coin report set
    pub max_reports: usize,

    /// Poll cadence for the live chart, in milliseconds
    pub poll_interval_ms: u64,

    /// Rolling window size: how many samples each chart series keeps
    pub history_window: usize,

    /// How many catalog entries the grid shows at most
    pub catalog_page_size: usize,

    /// Per-request HTTP timeout, in seconds. Bounds the effect of a hung
    /// request on the poll cadence.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.coingecko.com/api/v3".to_string(),
            vs_currency: "usd".to_string(),
            max_reports: 5,
            poll_interval_ms: 5000,
            history_window: 10,
            catalog_page_size: 50,
            request_timeout_secs: 10,
        }
    }
}
