//! Scanners exposed through the tool contract

pub mod discovery;
pub mod quote;
pub mod sentiment;
pub mod volume;

pub use discovery::DiscoveryTool;
pub use quote::QuoteTool;
pub use sentiment::HeadlineSentimentTool;
pub use volume::VolumeSpikeTool;

use crate::config::ScoutConfig;
use crate::error::Result;
use scout_tools::{ToolError, ToolRegistry};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Register the live discovery, quote, volume and sentiment tools
pub fn register_all(registry: &ToolRegistry, config: Arc<ScoutConfig>) -> Result<()> {
    registry.register(Arc::new(DiscoveryTool::new(Arc::clone(&config))));
    registry.register(Arc::new(QuoteTool::new(&config)?));
    registry.register(Arc::new(VolumeSpikeTool::new(config)?));
    registry.register(Arc::new(HeadlineSentimentTool::new()));
    Ok(())
}

fn parse_params<T: DeserializeOwned>(params: Value) -> scout_tools::Result<T> {
    serde_json::from_value(params).map_err(|e| ToolError::InvalidParameters(e.to_string()))
}
