//! Yahoo Finance prices and daily volume

use super::{VolumeHistory, VolumeObservation};
use crate::error::{Result, ScoutError};
use crate::symbols::Symbol;
use async_trait::async_trait;
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

/// Yahoo Finance API client
#[derive(Debug, Clone, Default)]
pub struct YahooFinanceClient {}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self {}
    }

    fn connector() -> Result<yahoo::YahooConnector> {
        yahoo::YahooConnector::new().map_err(|e| ScoutError::YahooFinanceError(e.to_string()))
    }

    /// Latest close, `None` when Yahoo has no quotes for the symbol
    pub async fn latest_price(&self, symbol: &str) -> Result<Option<f64>> {
        let response = Self::connector()?
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| ScoutError::YahooFinanceError(e.to_string()))?;

        Ok(response
            .last_quote()
            .ok()
            .map(|quote| quote.close)
            .filter(|close| close.is_finite() && *close > 0.0))
    }

    /// Daily `(volume, close)` bars, oldest first, at most `len` of them
    pub async fn daily_bars(&self, symbol: &str, len: usize) -> Result<Vec<VolumeObservation>> {
        // weekends and holidays: ask for roughly twice the trading days needed
        let calendar_days = i64::try_from(len.saturating_mul(2).saturating_add(7))
            .unwrap_or(i64::MAX)
            .min(3650);
        let end = OffsetDateTime::now_utc();
        let start = end - time::Duration::days(calendar_days);

        let response = Self::connector()?
            .get_quote_history(symbol, start, end)
            .await
            .map_err(|e| ScoutError::YahooFinanceError(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| ScoutError::YahooFinanceError(e.to_string()))?;

        let bars: Vec<VolumeObservation> = quotes
            .iter()
            .filter(|q| q.close.is_finite())
            .map(|q| VolumeObservation::new(q.volume, q.close))
            .collect();

        let skip = bars.len().saturating_sub(len);
        Ok(bars.into_iter().skip(skip).collect())
    }
}

#[async_trait]
impl VolumeHistory for YahooFinanceClient {
    async fn trailing_window(&self, symbol: &Symbol, len: usize) -> Result<Vec<VolumeObservation>> {
        self.daily_bars(symbol.as_str(), len).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_latest_price() {
        let client = YahooFinanceClient::new();
        let price = client.latest_price("AAPL").await.unwrap();
        assert!(price.is_some_and(|p| p > 0.0));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_trailing_window() {
        let client = YahooFinanceClient::new();
        let symbol: Symbol = "AAPL".parse().unwrap();
        let window = client.trailing_window(&symbol, 5).await.unwrap();
        assert!(window.len() <= 5);
        assert!(!window.is_empty());
    }
}
