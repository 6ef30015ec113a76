use std::collections::HashMap;

use tracing::warn;

use crate::models::coin::Coin;
use crate::providers::traits::MarketDataProvider;

/// Holds the last fetched catalog of available coins.
///
/// Populated by one network call, read-only to the rest of the system.
/// Lookups go through an id index rather than scanning the full list —
/// the selected-coin strip resolves every pinned id on each render.
#[derive(Default)]
pub struct CoinCatalog {
    coins: Vec<Coin>,
    /// id → position in `coins`
    index: HashMap<String, usize>,
    /// In-flight guard: overlapping refresh requests coalesce into a skip
    /// instead of issuing parallel redundant requests.
    fetching: bool,
}

impl CoinCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh the catalog from the provider.
    ///
    /// Returns `true` if a fetch was actually performed, `false` when a
    /// refresh was already in flight and this call coalesced into a skip.
    ///
    /// A failed fetch is logged and degrades to an empty catalog; it never
    /// propagates to the caller. The worst case is an empty grid.
    pub async fn refresh(
        &mut self,
        provider: &dyn MarketDataProvider,
        vs_currency: &str,
    ) -> bool {
        if self.fetching {
            return false;
        }
        self.fetching = true;

        let result = provider.fetch_markets(vs_currency).await;
        self.fetching = false;

        match result {
            Ok(coins) => self.replace(coins),
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "catalog fetch failed");
                self.replace(Vec::new());
            }
        }
        true
    }

    /// Replace the catalog contents and rebuild the id index.
    pub fn replace(&mut self, coins: Vec<Coin>) {
        self.index = coins
            .iter()
            .enumerate()
            .map(|(pos, coin)| (coin.id.clone(), pos))
            .collect();
        self.coins = coins;
    }

    #[must_use]
    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// First `limit` entries, for the catalog grid.
    #[must_use]
    pub fn page(&self, limit: usize) -> &[Coin] {
        &self.coins[..self.coins.len().min(limit)]
    }

    /// Look up a coin by id through the index.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Coin> {
        self.index.get(id).map(|&pos| &self.coins[pos])
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Case-insensitive substring search over coin name and symbol.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Coin> {
        let term = term.to_lowercase();
        let term = term.trim();
        self.coins
            .iter()
            .filter(|coin| {
                coin.name.to_lowercase().contains(term)
                    || coin.symbol.to_lowercase().contains(term)
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.coins.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.fetching
    }
}
