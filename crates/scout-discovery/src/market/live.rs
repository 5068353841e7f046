//! Live market data: Yahoo prices plus Alpha Vantage fundamentals

use super::{
    AlphaVantageClient, MarketDataProvider, MarketSnapshot, VolumeHistory, VolumeObservation,
    YahooFinanceClient,
};
use crate::error::{Result, ScoutError};
use crate::ingest::Throttle;
use crate::symbols::Symbol;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Combined provider used for real scans
///
/// Without an Alpha Vantage key snapshots carry only a price, so profiles
/// with a market cap floor reject every candidate.
pub struct LiveMarketData {
    yahoo: YahooFinanceClient,
    fundamentals: Option<AlphaVantageClient>,
    throttle: Throttle,
    timeout: Duration,
}

impl LiveMarketData {
    pub fn new(
        yahoo: YahooFinanceClient,
        fundamentals: Option<AlphaVantageClient>,
        throttle: Throttle,
        timeout: Duration,
    ) -> Self {
        Self {
            yahoo,
            fundamentals,
            throttle,
            timeout,
        }
    }

    pub fn has_fundamentals(&self) -> bool {
        self.fundamentals.is_some()
    }
}

/// Run `fut` within `limit`, turning expiry into [`ScoutError::Timeout`]
pub(crate) async fn bounded<T>(
    limit: Duration,
    operation: &str,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| ScoutError::Timeout {
            operation: operation.to_string(),
            millis: limit.as_millis(),
        })?
}

#[async_trait]
impl MarketDataProvider for LiveMarketData {
    async fn lookup(&self, symbol: &Symbol) -> Result<Option<MarketSnapshot>> {
        self.throttle.until_ready().await;

        let price = bounded(
            self.timeout,
            "price lookup",
            self.yahoo.latest_price(symbol.as_str()),
        )
        .await?;

        let Some(price) = price else {
            debug!(%symbol, "No price available");
            return Ok(None);
        };
        let mut snapshot = MarketSnapshot::default().with_price(price);

        if let Some(fundamentals) = &self.fundamentals {
            // the per-minute allowance can outlast the request timeout
            fundamentals.ready().await;
            let overview = bounded(
                self.timeout,
                "company overview",
                fundamentals.fetch_company_overview(symbol.as_str()),
            )
            .await;

            match overview {
                Ok(Some(overview)) => overview.apply_to(&mut snapshot),
                Ok(None) => debug!(%symbol, "No company overview"),
                // a partial snapshot is still useful to price-only profiles
                Err(e) => warn!(%symbol, error = %e, "Company overview failed"),
            }
        }

        Ok(Some(snapshot))
    }
}

#[async_trait]
impl VolumeHistory for LiveMarketData {
    async fn trailing_window(&self, symbol: &Symbol, len: usize) -> Result<Vec<VolumeObservation>> {
        self.throttle.until_ready().await;
        bounded(
            self.timeout,
            "volume history",
            self.yahoo.trailing_window(symbol, len),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out() {
        let err = bounded(Duration::from_millis(100), "price lookup", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(1)
        })
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "price lookup timed out after 100ms");
    }

    #[tokio::test]
    async fn test_bounded_passes_result_through() {
        let value = bounded(Duration::from_secs(1), "noop", async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);

        let err = bounded::<()>(Duration::from_secs(1), "noop", async {
            Err(ScoutError::ApiError("boom".to_string()))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, ScoutError::ApiError(_)));
    }

    #[test]
    fn test_without_fundamentals() {
        let live = LiveMarketData::new(
            YahooFinanceClient::new(),
            None,
            Throttle::unlimited(),
            Duration::from_secs(10),
        );
        assert!(!live.has_fundamentals());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_lookup() {
        let live = LiveMarketData::new(
            YahooFinanceClient::new(),
            None,
            Throttle::unlimited(),
            Duration::from_secs(10),
        );
        let snapshot = live.lookup(&"AAPL".parse().unwrap()).await.unwrap().unwrap();
        assert!(snapshot.price.is_some());
        assert!(snapshot.market_cap.is_none());
    }
}
