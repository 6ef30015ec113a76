use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::traits::MarketDataProvider;
use crate::errors::CoreError;
use crate::models::coin::{Coin, CoinDetail};

const BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko API provider for cryptocurrency market data.
///
/// - **Free**: no API key required for the public endpoints used here.
/// - **Endpoints**: `/coins/markets?vs_currency={cur}[&ids={csv}]`,
///   `/coins/{id}`
///
/// Note: CoinGecko uses lowercase ids like "bitcoin", "ethereum". The
/// `ids` query parameter takes a comma-joined list and the response
/// preserves the requested order.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Provider against the public CoinGecko API with the given request
    /// timeout. The timeout bounds how long a hung request can stall a
    /// poll tick.
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url(BASE_URL, timeout)
    }

    /// Provider against a custom base URL (proxies, test servers).
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        let builder = Client::builder().timeout(timeout);
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into(),
        }
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

// ── CoinGecko API response types ────────────────────────────────────

#[derive(Deserialize)]
struct MarketEntry {
    id: String,
    symbol: String,
    name: String,
    #[serde(default)]
    image: Option<String>,
    // Null for delisted/illiquid coins
    #[serde(default)]
    current_price: Option<f64>,
}

impl From<MarketEntry> for Coin {
    fn from(entry: MarketEntry) -> Self {
        Coin {
            id: entry.id,
            name: entry.name,
            symbol: entry.symbol,
            image: entry.image.unwrap_or_default(),
            current_price: entry.current_price.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct DetailResponse {
    id: String,
    symbol: String,
    name: String,
    #[serde(default)]
    image: DetailImage,
    #[serde(default)]
    market_data: Option<MarketData>,
}

#[derive(Deserialize, Default)]
struct DetailImage {
    #[serde(default)]
    large: Option<String>,
}

#[derive(Deserialize)]
struct MarketData {
    #[serde(default)]
    current_price: HashMap<String, f64>,
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        "CoinGecko"
    }

    async fn fetch_markets(&self, vs_currency: &str) -> Result<Vec<Coin>, CoreError> {
        let url = format!(
            "{}/coins/markets?vs_currency={vs_currency}",
            self.base_url
        );

        let entries: Vec<MarketEntry> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "CoinGecko".into(),
                message: format!("Failed to parse markets listing: {e}"),
            })?;

        Ok(entries.into_iter().map(Coin::from).collect())
    }

    async fn fetch_quotes(
        &self,
        vs_currency: &str,
        ids: &[String],
    ) -> Result<Vec<Coin>, CoreError> {
        let csv = ids.join(",");
        let url = format!(
            "{}/coins/markets?vs_currency={vs_currency}&ids={csv}",
            self.base_url
        );

        let entries: Vec<MarketEntry> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "CoinGecko".into(),
                message: format!("Failed to parse quotes for {csv}: {e}"),
            })?;

        Ok(entries.into_iter().map(Coin::from).collect())
    }

    async fn fetch_detail(&self, id: &str) -> Result<CoinDetail, CoreError> {
        let url = format!("{}/coins/{id}", self.base_url);

        let resp: DetailResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "CoinGecko".into(),
                message: format!("Failed to parse detail for {id}: {e}"),
            })?;

        let prices = resp
            .market_data
            .map(|m| m.current_price)
            .unwrap_or_default();

        Ok(CoinDetail {
            id: resp.id,
            name: resp.name,
            symbol: resp.symbol,
            image: resp.image.large.unwrap_or_default(),
            price_usd: prices.get("usd").copied(),
            price_eur: prices.get("eur").copied(),
            price_ils: prices.get("ils").copied(),
        })
    }
}
