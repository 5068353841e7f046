//! Tool for scanning a watchlist for unusual trading volume

use super::parse_params;
use crate::config::{ScoutConfig, VolumeSpikeSettings};
use crate::error::Result;
use crate::market::VolumeHistory;
use crate::pipeline::{http_client, live_market_data};
use crate::report::VolumeSpikeReport;
use crate::symbols::Symbol;
use crate::volume::VolumeSpikeDetector;
use async_trait::async_trait;
use scout_tools::{Tool, ToolError};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Tool that flags watchlist symbols trading far above their recent volume
pub struct VolumeSpikeTool {
    history: Arc<dyn VolumeHistory>,
    defaults: VolumeSpikeSettings,
}

#[derive(Debug, Deserialize)]
struct VolumeParams {
    watchlist: Option<Vec<Symbol>>,
    threshold: Option<f64>,
    top_n: Option<usize>,
}

impl VolumeSpikeTool {
    /// Live daily history with the configured volume settings
    pub fn new(config: Arc<ScoutConfig>) -> Result<Self> {
        let client = http_client(&config)?;
        let history = live_market_data(&config, &client);
        Ok(Self::with_history(Arc::new(history), config.volume.clone()))
    }

    pub fn with_history(history: Arc<dyn VolumeHistory>, defaults: VolumeSpikeSettings) -> Self {
        Self { history, defaults }
    }

    fn settings(&self, params: VolumeParams) -> Result<VolumeSpikeSettings> {
        let mut settings = self.defaults.clone();
        if let Some(watchlist) = params.watchlist {
            settings.watchlist = watchlist;
        }
        if let Some(threshold) = params.threshold {
            settings.ratio_threshold = threshold;
        }
        if let Some(top_n) = params.top_n {
            settings.top_n = top_n;
        }
        settings.validate()?;
        Ok(settings)
    }
}

#[async_trait]
impl Tool for VolumeSpikeTool {
    async fn execute(&self, params: Value) -> scout_tools::Result<Value> {
        let params: VolumeParams = parse_params(params)?;
        let settings = self
            .settings(params)
            .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;
        let threshold = settings.ratio_threshold;

        let detector = VolumeSpikeDetector::new(Arc::clone(&self.history), settings);
        let report = VolumeSpikeReport::new(detector.scan().await, threshold);

        Ok(json!({
            "run_id": report.run_id,
            "report": report.render(),
            "spikes": report.scan.spikes,
            "skipped": report.scan.skipped,
            "scanned": report.scan.scanned,
        }))
    }

    fn name(&self) -> &str {
        "volume_spikes"
    }

    fn description(&self) -> &str {
        "Scan a watchlist for stocks whose latest daily volume is well above the average of \
         the preceding days. Returns flagged symbols with price, volume ratio and price change."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "watchlist": {
                    "type": "array",
                    "items": { "type": "string", "pattern": "^[A-Z]{1,5}$" },
                    "description": "Ticker symbols to scan (defaults to the configured watchlist)"
                },
                "threshold": {
                    "type": "number",
                    "description": "Flag when volume exceeds this multiple of the prior average",
                    "default": self.defaults.ratio_threshold
                },
                "top_n": {
                    "type": "integer",
                    "description": "Maximum number of spikes to return",
                    "default": self.defaults.top_n
                }
            }
        })
    }
}
