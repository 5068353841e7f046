//! Tool for running a ticker discovery scan

use super::parse_params;
use crate::config::ScoutConfig;
use crate::error::Result;
use crate::ingest::TextSource;
use crate::market::MarketDataProvider;
use crate::pipeline::{DiscoveryMode, DiscoveryPipeline};
use async_trait::async_trait;
use scout_tools::{Tool, ToolError};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

enum Backend {
    /// Sources and market data built from the configuration on every call
    Live,
    /// Fixed sources and provider, filtered by mode
    Fixed {
        sources: Vec<Arc<dyn TextSource>>,
        provider: Arc<dyn MarketDataProvider>,
    },
}

/// Tool that discovers tickers from news and social chatter
pub struct DiscoveryTool {
    config: Arc<ScoutConfig>,
    backend: Backend,
}

#[derive(Debug, Deserialize)]
struct DiscoveryParams {
    #[serde(default)]
    mode: DiscoveryMode,
    profile: Option<String>,
    /// Overrides the profile's sector filter
    sector: Option<String>,
}

impl DiscoveryTool {
    pub fn new(config: Arc<ScoutConfig>) -> Self {
        Self {
            config,
            backend: Backend::Live,
        }
    }

    /// Scan the given sources instead of live feeds
    pub fn with_sources(
        config: Arc<ScoutConfig>,
        sources: Vec<Arc<dyn TextSource>>,
        provider: Arc<dyn MarketDataProvider>,
    ) -> Self {
        Self {
            config,
            backend: Backend::Fixed { sources, provider },
        }
    }

    fn pipeline(&self, params: &DiscoveryParams) -> Result<DiscoveryPipeline> {
        let profile_name = params.profile.as_deref();

        let pipeline = match &self.backend {
            Backend::Live => {
                DiscoveryPipeline::from_config(&self.config, params.mode, profile_name)?
            }
            Backend::Fixed { sources, provider } => {
                let profile = self
                    .config
                    .profile(profile_name.unwrap_or(params.mode.default_profile()))?
                    .clone();
                let sources = sources
                    .iter()
                    .filter(|s| params.mode.includes(s.kind()))
                    .cloned()
                    .collect();

                DiscoveryPipeline::new(sources, Arc::clone(provider), profile)
                    .with_mode(params.mode)
                    .with_source_timeout(self.config.source_timeout())
            }
        };

        Ok(match &params.sector {
            Some(sector) => pipeline.with_sector(sector.trim()),
            None => pipeline,
        })
    }
}

#[async_trait]
impl Tool for DiscoveryTool {
    async fn execute(&self, params: Value) -> scout_tools::Result<Value> {
        let params: DiscoveryParams = parse_params(params)?;
        if params.sector.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(ToolError::InvalidParameters("sector must not be blank".to_string()));
        }
        let pipeline = self.pipeline(&params)?;

        let report = pipeline.run().await;

        Ok(json!({
            "run_id": report.run_id,
            "mode": report.mode,
            "profile": report.profile,
            "report": report.render(),
            "candidates": report.candidates,
            "diagnostics": report.diagnostics,
        }))
    }

    fn name(&self) -> &str {
        "discover_tickers"
    }

    fn description(&self) -> &str {
        "Discover low-priced tickers mentioned in financial news headlines and social posts. \
         Symbols are scored by keyword sentiment, checked against a scan profile's price and \
         market cap limits, and ranked by sentiment then mention count."
    }

    fn input_schema(&self) -> Value {
        let profiles: Vec<&str> = self.config.profiles.iter().map(|p| p.name.as_str()).collect();

        json!({
            "type": "object",
            "properties": {
                "mode": {
                    "type": "string",
                    "enum": ["news", "social", "combined"],
                    "description": "Which sources to scan",
                    "default": "combined"
                },
                "profile": {
                    "type": "string",
                    "enum": profiles,
                    "description": "Scan profile; defaults to penny_social for social scans and penny_news otherwise"
                },
                "sector": {
                    "type": "string",
                    "description": "Only accept candidates in this sector, e.g. Technology or Healthcare (overrides the profile's sector)"
                }
            }
        })
    }
}
