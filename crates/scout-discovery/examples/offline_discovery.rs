//! Run a discovery scan over canned headlines and a fixed price table
//!
//! ```bash
//! cargo run -p scout-discovery --example offline_discovery
//! ```

use async_trait::async_trait;
use scout_discovery::{
    DiscoveryMode, DiscoveryPipeline, MarketDataProvider, MarketSnapshot, ScanProfile,
    SourceKind, StaticSource, Symbol, TextSource,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Market data from an in-memory table
struct PriceTable(HashMap<&'static str, MarketSnapshot>);

#[async_trait]
impl MarketDataProvider for PriceTable {
    async fn lookup(&self, symbol: &Symbol) -> scout_discovery::Result<Option<MarketSnapshot>> {
        Ok(self.0.get(symbol.as_str()).cloned())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    scout_utils::init_tracing();

    let sources: Vec<Arc<dyn TextSource>> = vec![
        Arc::new(StaticSource::new(
            "Reuters Business",
            SourceKind::News,
            [
                "XYZ surges after earnings beat",
                "QRS announces partnership with major retailer",
                "BIGCO shares fall on weak guidance",
            ],
        )),
        Arc::new(StaticSource::new(
            "CNBC",
            SourceKind::News,
            ["XYZ wins new contract", "LMNO faces SEC investigation"],
        )),
        Arc::new(StaticSource::new(
            "twitter:penny stocks",
            SourceKind::Social,
            ["$XYZ is trending, rocket time", "$QRS volume picking up"],
        )),
    ];

    let table = HashMap::from([
        (
            "XYZ",
            MarketSnapshot::default()
                .with_price(1.85)
                .with_market_cap(42_000_000.0)
                .with_growth(0.25, 0.12, 0.9),
        ),
        (
            "QRS",
            MarketSnapshot::default()
                .with_price(3.10)
                .with_market_cap(7_500_000.0),
        ),
        (
            "BIGCO",
            MarketSnapshot::default()
                .with_price(120.0)
                .with_market_cap(9_000_000_000.0),
        ),
        (
            "LMNO",
            MarketSnapshot::default()
                .with_price(0.40)
                .with_market_cap(2_000_000.0),
        ),
    ]);

    let pipeline = DiscoveryPipeline::new(sources, Arc::new(PriceTable(table)), ScanProfile::penny_news())
        .with_mode(DiscoveryMode::Combined);

    let report = pipeline.run().await;
    println!("{}", report.render());
    println!("{}", serde_json::to_string_pretty(&report.diagnostics)?);

    Ok(())
}
