//! Alpha Vantage company fundamentals

use super::{MarketSnapshot, parse_optional_number};
use crate::error::{Result, ScoutError};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Free tier allowance
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 5;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
    rate_limiter: SharedRateLimiter,
}

/// Company overview fields used for enrichment
///
/// The API reports every number as a string and uses `None` or `-` for
/// missing values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CompanyOverview {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    #[serde(rename = "MarketCapitalization")]
    pub market_cap: Option<String>,
    #[serde(rename = "PEGRatio")]
    pub peg_ratio: Option<String>,
    #[serde(rename = "QuarterlyRevenueGrowthYOY")]
    pub revenue_growth: Option<String>,
    #[serde(rename = "QuarterlyEarningsGrowthYOY")]
    pub earnings_growth: Option<String>,
}

impl CompanyOverview {
    /// Copy the fundamentals into `snapshot`, leaving unknown fields absent
    pub fn apply_to(&self, snapshot: &mut MarketSnapshot) {
        snapshot.market_cap = parse_optional_number(self.market_cap.as_deref());
        snapshot.revenue_growth = parse_optional_number(self.revenue_growth.as_deref());
        snapshot.earnings_growth = parse_optional_number(self.earnings_growth.as_deref());
        snapshot.peg_ratio = parse_optional_number(self.peg_ratio.as_deref());
        snapshot.sector = self
            .sector
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !matches!(*s, "None" | "-"))
            .map(str::to_string);
    }
}

impl AlphaVantageClient {
    /// Create a client limited to `rate_limit` requests per minute
    pub fn new(client: Client, api_key: impl Into<String>, rate_limit: u32) -> Self {
        let per_minute = NonZeroU32::new(rate_limit)
            .or(NonZeroU32::new(DEFAULT_REQUESTS_PER_MINUTE))
            .unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));

        Self {
            client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            rate_limiter,
        }
    }

    /// Send requests to `base_url` instead of the public endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Wait until the per-minute allowance permits another request
    pub async fn ready(&self) {
        self.rate_limiter.until_ready().await;
    }

    /// Company overview, `None` when the symbol is unknown
    ///
    /// Waits on the rate limiter first. Callers that bound the request
    /// with a timeout should await [`ready`](Self::ready) themselves and
    /// call [`fetch_company_overview`](Self::fetch_company_overview).
    pub async fn get_company_overview(&self, symbol: &str) -> Result<Option<CompanyOverview>> {
        self.ready().await;
        self.fetch_company_overview(symbol).await
    }

    /// Company overview without waiting on the rate limiter
    pub async fn fetch_company_overview(&self, symbol: &str) -> Result<Option<CompanyOverview>> {
        let params = [
            ("function", "OVERVIEW"),
            ("symbol", symbol),
            ("apikey", self.api_key.as_str()),
        ];
        let response = self.client.get(&self.base_url).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(ScoutError::AlphaVantageError(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let data: serde_json::Value = response.json().await?;
        let overview = parse_overview(data)?;
        debug!(symbol, found = overview.is_some(), "Fetched company overview");
        Ok(overview)
    }
}

fn parse_overview(data: serde_json::Value) -> Result<Option<CompanyOverview>> {
    if let Some(error) = data.get("Error Message") {
        return Err(ScoutError::AlphaVantageError(error.to_string()));
    }

    // throttled responses come back as a lone informational message
    if data.get("Note").is_some() || data.get("Information").is_some() {
        return Err(ScoutError::RateLimitExceeded {
            provider: "Alpha Vantage".to_string(),
        });
    }

    // unknown symbols return an empty object
    if data.as_object().is_none_or(serde_json::Map::is_empty) {
        return Ok(None);
    }

    Ok(Some(serde_json::from_value(data)?))
}
