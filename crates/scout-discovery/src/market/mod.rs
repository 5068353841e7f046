//! Market data provider boundary
//!
//! Lookups return point-in-time snapshots. Every field is optional: a value
//! the provider does not report is absent, never zero.

pub mod alpha_vantage;
pub mod live;
pub mod memo;
pub mod yahoo;

pub use alpha_vantage::{AlphaVantageClient, CompanyOverview};
pub use live::LiveMarketData;
pub use memo::SnapshotMemo;
pub use yahoo::YahooFinanceClient;

use crate::error::Result;
use crate::symbols::Symbol;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

/// Market data for one symbol at lookup time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub price: Option<f64>,
    pub market_cap: Option<f64>,
    pub sector: Option<String>,
    /// Year over year, as a fraction (0.12 is 12%)
    pub revenue_growth: Option<f64>,
    /// Year over year, as a fraction
    pub earnings_growth: Option<f64>,
    pub peg_ratio: Option<f64>,
}

impl MarketSnapshot {
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_market_cap(mut self, market_cap: f64) -> Self {
        self.market_cap = Some(market_cap);
        self
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_growth(mut self, revenue: f64, earnings: f64, peg_ratio: f64) -> Self {
        self.revenue_growth = Some(revenue);
        self.earnings_growth = Some(earnings);
        self.peg_ratio = Some(peg_ratio);
        self
    }
}

/// One daily bar reduced to what the spike detector needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeObservation {
    pub volume: u64,
    pub close: f64,
}

impl VolumeObservation {
    pub fn new(volume: u64, close: f64) -> Self {
        Self { volume, close }
    }
}

/// Resolves a symbol to a market snapshot
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// `Ok(None)` when the provider does not know the symbol
    async fn lookup(&self, symbol: &Symbol) -> Result<Option<MarketSnapshot>>;
}

/// Trailing daily volume history
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VolumeHistory: Send + Sync {
    /// Up to `len` most recent observations, oldest first
    async fn trailing_window(&self, symbol: &Symbol, len: usize) -> Result<Vec<VolumeObservation>>;
}

/// Parse a provider number that may be a placeholder like `None` or `-`
pub(crate) fn parse_optional_number(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() || matches!(raw, "None" | "-" | "N/A" | "null") {
        return None;
    }
    raw.trim_end_matches('%').parse::<f64>().ok().filter(|v| v.is_finite())
}
