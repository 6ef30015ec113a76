use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::coin::{Coin, CoinDetail};

/// Trait abstraction for the market-data source.
///
/// The catalog and the poll loop only ever talk to this trait. If the API
/// stops working or changes shape, we replace one implementation — the rest
/// of the codebase (and every test, via mocks) is untouched.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the full market catalog listing, priced in `vs_currency`.
    async fn fetch_markets(&self, vs_currency: &str) -> Result<Vec<Coin>, CoreError>;

    /// Fetch quotes for exactly the given ids, in one batch request.
    ///
    /// The response is expected to come back in requested id order —
    /// positional alignment downstream depends on it. This is an upstream
    /// API contract the core cannot verify from prices alone.
    async fn fetch_quotes(
        &self,
        vs_currency: &str,
        ids: &[String],
    ) -> Result<Vec<Coin>, CoreError>;

    /// Fetch the detail view of a single coin, including multi-currency
    /// current prices (USD, EUR, ILS).
    async fn fetch_detail(&self, id: &str) -> Result<CoinDetail, CoreError>;
}
