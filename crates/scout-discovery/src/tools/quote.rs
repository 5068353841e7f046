//! Tool for a single-ticker market snapshot

use super::parse_params;
use crate::config::ScoutConfig;
use crate::error::Result;
use crate::market::MarketDataProvider;
use crate::pipeline::{http_client, live_market_data};
use crate::report::QuoteReport;
use crate::symbols::Symbol;
use async_trait::async_trait;
use scout_tools::{Tool, ToolError};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Tool that reports price, sector and growth fields for one ticker
pub struct QuoteTool {
    provider: Arc<dyn MarketDataProvider>,
}

#[derive(Debug, Deserialize)]
struct QuoteParams {
    symbol: String,
}

impl QuoteTool {
    /// Quote from live Yahoo prices and Alpha Vantage fundamentals
    pub fn new(config: &ScoutConfig) -> Result<Self> {
        let client = http_client(config)?;
        Ok(Self::with_provider(Arc::new(live_market_data(config, &client))))
    }

    pub fn with_provider(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Tool for QuoteTool {
    async fn execute(&self, params: Value) -> scout_tools::Result<Value> {
        let params: QuoteParams = parse_params(params)?;
        let symbol = Symbol::new(params.symbol.trim().to_ascii_uppercase())
            .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;

        let snapshot = self.provider.lookup(&symbol).await?;
        let quote = QuoteReport::new(symbol, snapshot);

        Ok(json!({
            "symbol": quote.symbol,
            "found": quote.snapshot.is_some(),
            "snapshot": quote.snapshot,
            "growth_score": quote.growth_score,
            "report": quote.render(),
        }))
    }

    fn name(&self) -> &str {
        "quote_ticker"
    }

    fn description(&self) -> &str {
        "Look up one ticker's current price, market cap, sector, revenue and earnings growth \
         and PEG ratio."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "description": "Ticker symbol, e.g. AAPL"
                }
            },
            "required": ["symbol"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoutError;
    use crate::market::{MarketSnapshot, MockMarketDataProvider};

    fn tool() -> QuoteTool {
        let mut provider = MockMarketDataProvider::new();
        provider.expect_lookup().returning(|symbol| match symbol.as_str() {
            "XYZ" => Ok(Some(
                MarketSnapshot::default()
                    .with_price(1.25)
                    .with_market_cap(40_000_000.0)
                    .with_sector("Healthcare")
                    .with_growth(0.3, 0.2, 1.1),
            )),
            "GONE" => Ok(None),
            _ => Err(ScoutError::YahooFinanceError("connection reset".to_string())),
        });
        QuoteTool::with_provider(Arc::new(provider))
    }

    #[tokio::test]
    async fn test_quote_found() {
        let output = tool().execute(json!({"symbol": " xyz "})).await.unwrap();

        assert_eq!(output["symbol"], "XYZ");
        assert_eq!(output["found"], true);
        assert_eq!(output["snapshot"]["sector"], "Healthcare");
        assert_eq!(output["growth_score"], 5);

        let report = output["report"].as_str().unwrap();
        assert!(report.contains("Price: $1.25"));
        assert!(report.contains("Sector: Healthcare"));
        assert!(report.contains("Revenue Growth: 30.00%"));
    }

    #[tokio::test]
    async fn test_quote_unknown_symbol() {
        let output = tool().execute(json!({"symbol": "GONE"})).await.unwrap();

        assert_eq!(output["found"], false);
        assert!(output["snapshot"].is_null());
        assert!(output["report"].as_str().unwrap().starts_with("Could not fetch price for GONE"));
    }

    #[tokio::test]
    async fn test_quote_errors() {
        let err = tool().execute(json!({"symbol": "TOOLONG"})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameters(_)));

        let err = tool().execute(json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameters(_)));

        let err = tool().execute(json!({"symbol": "FAIL"})).await.unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed(msg) if msg.contains("connection reset")));
    }
}
