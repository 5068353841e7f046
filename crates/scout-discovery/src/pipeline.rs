//! Discovery pipeline: ingest, fold, gate, rank, report
//!
//! Construction is the only step that can fail. Once built, a pipeline always
//! produces a report; everything that goes wrong during a run ends up in the
//! report's diagnostics.

use crate::config::{ScanProfile, ScoutConfig};
use crate::error::{Result, ScoutError};
use crate::evidence::{EvidenceAggregator, EvidenceMap};
use crate::gate::EnrichmentGate;
use crate::ingest::{
    IngestReport, Ingestor, NewsFeedSource, SocialKeywordSource, SocialSearch, SourceKind,
    TextSource, Throttle, TwitterSearchClient,
};
use crate::market::{
    AlphaVantageClient, LiveMarketData, MarketDataProvider, SnapshotMemo, YahooFinanceClient,
};
use crate::rank::rank;
use crate::report::{Diagnostics, DiscoveryReport};
use crate::volume::VolumeSpikeDetector;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

/// Per-source timeout for pipelines built with [`DiscoveryPipeline::new`]
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(30);

/// Which sources a scan reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryMode {
    News,
    Social,
    /// News and social folded into one evidence map
    #[default]
    Combined,
}

impl DiscoveryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoveryMode::News => "news",
            DiscoveryMode::Social => "social",
            DiscoveryMode::Combined => "combined",
        }
    }

    /// Profile used when none is named
    pub fn default_profile(&self) -> &'static str {
        match self {
            DiscoveryMode::News | DiscoveryMode::Combined => "penny_news",
            DiscoveryMode::Social => "penny_social",
        }
    }

    pub fn includes(&self, kind: SourceKind) -> bool {
        match self {
            DiscoveryMode::News => kind == SourceKind::News,
            DiscoveryMode::Social => kind == SourceKind::Social,
            DiscoveryMode::Combined => true,
        }
    }
}

impl fmt::Display for DiscoveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscoveryMode {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "news" => Ok(DiscoveryMode::News),
            "social" => Ok(DiscoveryMode::Social),
            "combined" | "all" => Ok(DiscoveryMode::Combined),
            other => Err(ScoutError::ConfigError(format!(
                "unknown discovery mode {other:?} (expected news, social or combined)"
            ))),
        }
    }
}

/// A configured discovery scan
pub struct DiscoveryPipeline {
    ingestor: Ingestor,
    aggregator: EvidenceAggregator,
    provider: Arc<dyn MarketDataProvider>,
    profile: ScanProfile,
    mode: DiscoveryMode,
}

impl DiscoveryPipeline {
    pub fn new(
        sources: Vec<Arc<dyn TextSource>>,
        provider: Arc<dyn MarketDataProvider>,
        profile: ScanProfile,
    ) -> Self {
        Self {
            ingestor: Ingestor::new(DEFAULT_SOURCE_TIMEOUT).with_sources(sources),
            aggregator: EvidenceAggregator::default(),
            provider,
            profile,
            mode: DiscoveryMode::Combined,
        }
    }

    /// Build the live sources and market data described by `config`
    ///
    /// `profile_name` falls back to the mode's default profile. Social
    /// sources are still built without a bearer token; they report
    /// themselves as disabled when run.
    pub fn from_config(
        config: &ScoutConfig,
        mode: DiscoveryMode,
        profile_name: Option<&str>,
    ) -> Result<Self> {
        config.validate()?;
        let profile = config
            .profile(profile_name.unwrap_or(mode.default_profile()))?
            .clone();
        profile.validate()?;

        let client = http_client(config)?;
        let mut sources: Vec<Arc<dyn TextSource>> = Vec::new();

        if mode.includes(SourceKind::News) {
            let throttle = Throttle::every(config.feed_interval());
            for feed in &config.feeds {
                sources.push(Arc::new(NewsFeedSource::new(
                    feed.clone(),
                    client.clone(),
                    throttle.clone(),
                    config.max_items_per_feed,
                )));
            }
        }

        if mode.includes(SourceKind::Social) {
            let search = config.twitter_bearer_token.as_ref().map(|token| {
                Arc::new(TwitterSearchClient::new(client.clone(), token.clone()))
                    as Arc<dyn SocialSearch>
            });
            if search.is_none() {
                warn!("No Twitter bearer token configured, social sources are disabled");
            }

            let throttle = Throttle::every(config.social_interval());
            for keyword in &config.social_keywords {
                sources.push(Arc::new(SocialKeywordSource::new(
                    keyword.clone(),
                    search.clone(),
                    throttle.clone(),
                    config.social_max_results,
                    config.social_recency_window(),
                )));
            }
        }

        let provider = live_market_data(config, &client);
        if !provider.has_fundamentals() {
            warn!("No Alpha Vantage key configured, snapshots will carry prices only");
        }

        Ok(Self {
            ingestor: Ingestor::new(config.source_timeout()).with_sources(sources),
            aggregator: EvidenceAggregator::default(),
            provider: Arc::new(provider),
            profile,
            mode,
        })
    }

    /// Label reports with `mode`
    pub fn with_mode(mut self, mode: DiscoveryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_aggregator(mut self, aggregator: EvidenceAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.ingestor = self.ingestor.with_timeout(timeout);
        self
    }

    /// Only accept candidates in `sector`
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.profile.sector = Some(sector.into());
        self
    }

    pub fn profile(&self) -> &ScanProfile {
        &self.profile
    }

    pub fn mode(&self) -> DiscoveryMode {
        self.mode
    }

    pub fn source_count(&self) -> usize {
        self.ingestor.len()
    }

    /// Run one scan with the pipeline's profile
    pub async fn run(&self) -> DiscoveryReport {
        let run_id = Uuid::new_v4();
        let span = info_span!("discovery", %run_id, mode = %self.mode, profile = %self.profile.name);

        async {
            let ingest = self.ingestor.run().await;
            let evidence = self.aggregator.fold(&ingest.units);
            let memo: Arc<dyn MarketDataProvider> =
                Arc::new(SnapshotMemo::new(Arc::clone(&self.provider)));

            self.conclude(run_id, &ingest, &evidence, &self.profile, memo)
                .await
        }
        .instrument(span)
        .await
    }

    /// Gate one ingestion against several profiles
    ///
    /// Sources are fetched once and each symbol is looked up at most once
    /// across all profiles. Reports share a run id.
    pub async fn run_profiles(&self, profiles: &[ScanProfile]) -> Vec<DiscoveryReport> {
        let run_id = Uuid::new_v4();
        let span = info_span!("discovery", %run_id, mode = %self.mode, profiles = profiles.len());

        async {
            let ingest = self.ingestor.run().await;
            let evidence = self.aggregator.fold(&ingest.units);
            let memo: Arc<dyn MarketDataProvider> =
                Arc::new(SnapshotMemo::new(Arc::clone(&self.provider)));

            let mut reports = Vec::with_capacity(profiles.len());
            for profile in profiles {
                reports.push(
                    self.conclude(run_id, &ingest, &evidence, profile, Arc::clone(&memo))
                        .await,
                );
            }
            reports
        }
        .instrument(span)
        .await
    }

    async fn conclude(
        &self,
        run_id: Uuid,
        ingest: &IngestReport,
        evidence: &EvidenceMap,
        profile: &ScanProfile,
        provider: Arc<dyn MarketDataProvider>,
    ) -> DiscoveryReport {
        let gate = EnrichmentGate::new(profile.clone(), provider);
        let outcome = gate.gate_all(evidence).await;
        let diagnostics = Diagnostics::collect(ingest, evidence, &outcome, profile);
        let candidates = rank(outcome.accepted, profile.top_n);

        info!(
            profile = %profile.name,
            sources_succeeded = diagnostics.sources_succeeded,
            sources_failed = diagnostics.sources_failed,
            symbols = diagnostics.symbols_seen,
            rejected = diagnostics.total_rejected(),
            candidates = candidates.len(),
            "Discovery finished"
        );

        DiscoveryReport {
            run_id,
            mode: self.mode,
            profile: profile.name.clone(),
            candidates,
            diagnostics,
        }
    }
}

/// HTTP client shared by every source and provider of one configuration
pub fn http_client(config: &ScoutConfig) -> Result<Client> {
    Client::builder()
        .user_agent(concat!("signal-scout/", env!("CARGO_PKG_VERSION")))
        .timeout(config.request_timeout())
        .build()
        .map_err(|e| ScoutError::ConfigError(format!("failed to build HTTP client: {e}")))
}

/// Yahoo prices plus Alpha Vantage fundamentals when a key is configured
pub fn live_market_data(config: &ScoutConfig, client: &Client) -> LiveMarketData {
    let fundamentals = config.alpha_vantage_api_key.as_ref().map(|key| {
        AlphaVantageClient::new(client.clone(), key.clone(), config.alpha_vantage_per_minute)
    });

    LiveMarketData::new(
        YahooFinanceClient::new(),
        fundamentals,
        Throttle::every(config.lookup_interval()),
        config.request_timeout(),
    )
}

/// Volume-spike detector over live daily history
pub fn volume_detector(config: &ScoutConfig) -> Result<VolumeSpikeDetector> {
    config.validate()?;
    let client = http_client(config)?;
    let history = live_market_data(config, &client);
    Ok(VolumeSpikeDetector::new(
        Arc::new(history),
        config.volume.clone(),
    ))
}
