//! Run-scoped lookup memo

use super::{MarketDataProvider, MarketSnapshot};
use crate::error::Result;
use crate::symbols::Symbol;
use async_trait::async_trait;
use cached::{Cached, UnboundCache};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Looks each symbol up at most once
///
/// Create one per run and drop it with the run. Misses (`Ok(None)`) are
/// remembered, failed lookups are not.
pub struct SnapshotMemo {
    provider: Arc<dyn MarketDataProvider>,
    cache: Mutex<UnboundCache<Symbol, Option<MarketSnapshot>>>,
}

impl SnapshotMemo {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            cache: Mutex::new(UnboundCache::new()),
        }
    }

    /// Number of symbols resolved so far
    pub async fn len(&self) -> usize {
        self.cache.lock().await.cache_size()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl MarketDataProvider for SnapshotMemo {
    async fn lookup(&self, symbol: &Symbol) -> Result<Option<MarketSnapshot>> {
        if let Some(hit) = self.cache.lock().await.cache_get(symbol) {
            debug!(%symbol, "Snapshot memo hit");
            return Ok(hit.clone());
        }

        let fetched = self.provider.lookup(symbol).await?;
        self.cache
            .lock()
            .await
            .cache_set(symbol.clone(), fetched.clone());
        Ok(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoutError;
    use crate::market::MockMarketDataProvider;

    fn sym(s: &str) -> Symbol {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_each_symbol_looked_up_once() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_lookup()
            .withf(|symbol| symbol.as_str() == "XYZ")
            .times(1)
            .returning(|_| Ok(Some(MarketSnapshot::default().with_price(1.5))));
        provider
            .expect_lookup()
            .withf(|symbol| symbol.as_str() == "NOPE")
            .times(1)
            .returning(|_| Ok(None));

        let memo = SnapshotMemo::new(Arc::new(provider));

        for _ in 0..3 {
            let snapshot = memo.lookup(&sym("XYZ")).await.unwrap();
            assert_eq!(snapshot.and_then(|s| s.price), Some(1.5));
            assert!(memo.lookup(&sym("NOPE")).await.unwrap().is_none());
        }
        assert_eq!(memo.len().await, 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_memoized() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_lookup()
            .times(2)
            .returning(|_| Err(ScoutError::YahooFinanceError("upstream down".to_string())));

        let memo = SnapshotMemo::new(Arc::new(provider));
        assert!(memo.lookup(&sym("XYZ")).await.is_err());
        assert!(memo.lookup(&sym("XYZ")).await.is_err());
        assert!(memo.is_empty().await);
    }
}
