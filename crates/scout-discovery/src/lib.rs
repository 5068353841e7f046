//! Ticker discovery from news and social chatter
//!
//! This crate finds small, low-priced stocks that are being talked about and
//! checks them against market data. It includes:
//!
//! - News feed (RSS/Atom) and social search ingestion, concurrently and with
//!   per-provider rate limiting
//! - Keyword lexicon sentiment scoring
//! - Ticker extraction from free text (bare tickers and `$CASHTAGS`)
//! - Per-symbol evidence aggregation across sources
//! - Market enrichment (Yahoo Finance prices, Alpha Vantage fundamentals)
//!   gated by named scan profiles
//! - Ranking and text/JSON reports with diagnostics
//! - Volume-spike detection over a watchlist and single-ticker quotes
//! - Tool adapters for agent orchestrators
//!
//! # Architecture
//!
//! A [`DiscoveryPipeline`] runs one scan end to end:
//! - [`Ingestor`]: fetches every [`TextSource`] into [`TextUnit`]s
//! - [`EvidenceAggregator`]: folds units into per-symbol [`Evidence`]
//! - [`EnrichmentGate`]: applies a [`ScanProfile`] using a [`MarketDataProvider`]
//! - [`rank`]: orders accepted candidates
//! - [`DiscoveryReport`]: the result, renderable as text or serialized as JSON
//!
//! # Example
//!
//! ```rust,ignore
//! use scout_discovery::{DiscoveryMode, DiscoveryPipeline, ScoutConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ScoutConfig::default().with_env_keys();
//!     let pipeline = DiscoveryPipeline::from_config(&config, DiscoveryMode::News, None)?;
//!
//!     let report = pipeline.run().await;
//!     println!("{}", report.render());
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod evidence;
pub mod gate;
pub mod ingest;
pub mod market;
pub mod pipeline;
pub mod rank;
pub mod report;
pub mod sentiment;
pub mod symbols;
pub mod tools;
pub mod volume;

// Re-export main types for convenience
pub use config::{GrowthScoring, ScanProfile, ScoutConfig, ScoutConfigBuilder, VolumeSpikeSettings};
pub use error::{Result, ScoutError};
pub use evidence::{Evidence, EvidenceAggregator, EvidenceMap};
pub use gate::{Candidate, EnrichmentGate, GateDecision, GateOutcome, RejectReason, Rejection};
pub use ingest::{
    IngestReport, Ingestor, SkipReason, SourceKind, SourceOutcome, StaticSource, TextSource,
    TextUnit,
};
pub use market::{MarketDataProvider, MarketSnapshot, VolumeHistory, VolumeObservation};
pub use pipeline::{DiscoveryMode, DiscoveryPipeline};
pub use rank::rank;
pub use report::{Diagnostics, DiscoveryReport, QuoteReport, VolumeSpikeReport};
pub use sentiment::{SentimentLabel, SentimentLexicon};
pub use symbols::{Symbol, SymbolExtractor};
pub use volume::{VolumeScan, VolumeSpike, VolumeSpikeDetector};

// Re-export commonly used tools
pub use tools::{DiscoveryTool, HeadlineSentimentTool, QuoteTool, VolumeSpikeTool, register_all};
