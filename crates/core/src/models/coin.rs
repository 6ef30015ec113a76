use serde::{Deserialize, Serialize};

/// One entry of the market catalog listing.
///
/// Sourced verbatim from the market-data API and read-only to the rest of
/// the system — the core never mutates a `Coin`, it only copies prices out
/// of fresh ones into the rolling chart history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    /// API identifier, lowercase (e.g., "bitcoin", "ethereum")
    pub id: String,

    /// Human-readable name (e.g., "Bitcoin")
    pub name: String,

    /// Ticker symbol as delivered by the API, lowercase (e.g., "btc")
    pub symbol: String,

    /// Icon URL for grid/strip rendering
    pub image: String,

    /// Latest price in the configured quote currency
    pub current_price: f64,
}

impl Coin {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        symbol: impl Into<String>,
        image: impl Into<String>,
        current_price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            image: image.into(),
            current_price,
        }
    }
}

/// Detail view of a single coin, as shown in the "More Info" modal.
///
/// Prices are per-currency and each may be absent — the API omits quotes
/// for delisted or illiquid coins, and the view renders "N/A" in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDetail {
    pub id: String,
    pub name: String,
    pub symbol: String,

    /// Large icon variant for the modal header
    pub image: String,

    pub price_usd: Option<f64>,
    pub price_eur: Option<f64>,
    pub price_ils: Option<f64>,
}
