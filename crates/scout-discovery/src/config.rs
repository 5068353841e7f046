//! Configuration for discovery scans
//!
//! A single [`ScoutConfig`] value carries every threshold, interval and
//! credential. It is built once, validated, and handed to each component at
//! construction; nothing reads process state after that.

use crate::error::{Result, ScoutError};
use crate::ingest::news::{FeedSource, default_feeds};
use crate::ingest::social::default_keywords;
use crate::symbols::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Sector scanned by `sector_growth` unless told otherwise
pub const DEFAULT_GROWTH_SECTOR: &str = "Technology";

/// Social-only evidence needs at least this many posts by default
pub const DEFAULT_MIN_SOCIAL_MENTIONS: usize = 2;

fn default_min_social_mentions() -> usize {
    DEFAULT_MIN_SOCIAL_MENTIONS
}

/// How growth fields turn into points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthScoring {
    /// Revenue and earnings growth over 10% earn 2 each, a PEG ratio
    /// between 0 and 1.5 earns 1
    #[default]
    Standard,
    /// Revenue and earnings growth over 15% earn 3 each, a PEG ratio
    /// between 0 and 1.2 earns 2
    Sector,
}

impl GrowthScoring {
    /// Highest score a snapshot can earn
    pub fn max_score(&self) -> u8 {
        match self {
            GrowthScoring::Standard => 5,
            GrowthScoring::Sector => 8,
        }
    }
}

/// Named eligibility thresholds for one kind of scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanProfile {
    pub name: String,
    /// Inclusive upper bound on price
    pub price_ceiling: f64,
    /// Inclusive lower bound on market cap
    pub market_cap_floor: f64,
    /// Mentions needed when any of them came from news
    pub min_mentions: usize,
    /// Mentions needed when every one came from social posts
    #[serde(default = "default_min_social_mentions")]
    pub min_social_mentions: usize,
    /// Average sentiment must be strictly above this
    pub sentiment_floor: f64,
    pub top_n: usize,
    #[serde(default)]
    pub min_growth_score: Option<u8>,
    #[serde(default)]
    pub growth_scoring: GrowthScoring,
    /// Only accept candidates in this sector (case-insensitive)
    #[serde(default)]
    pub sector: Option<String>,
}

impl ScanProfile {
    /// Profile with the common defaults: 1 mention (2 for social-only
    /// evidence), floor -0.2, top 10
    pub fn new(name: impl Into<String>, price_ceiling: f64, market_cap_floor: f64) -> Self {
        Self {
            name: name.into(),
            price_ceiling,
            market_cap_floor,
            min_mentions: 1,
            min_social_mentions: DEFAULT_MIN_SOCIAL_MENTIONS,
            sentiment_floor: -0.2,
            top_n: 10,
            min_growth_score: None,
            growth_scoring: GrowthScoring::Standard,
            sector: None,
        }
    }

    pub fn with_min_mentions(mut self, min_mentions: usize) -> Self {
        self.min_mentions = min_mentions;
        self
    }

    pub fn with_min_social_mentions(mut self, min_mentions: usize) -> Self {
        self.min_social_mentions = min_mentions;
        self
    }

    pub fn with_sentiment_floor(mut self, floor: f64) -> Self {
        self.sentiment_floor = floor;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_min_growth_score(mut self, score: u8) -> Self {
        self.min_growth_score = Some(score);
        self
    }

    pub fn with_growth_scoring(mut self, scoring: GrowthScoring) -> Self {
        self.growth_scoring = scoring;
        self
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Penny stocks named in news headlines
    pub fn penny_news() -> Self {
        Self::new("penny_news", 5.0, 500_000.0)
    }

    /// Penny stocks from social posts; one post is weak evidence
    pub fn penny_social() -> Self {
        Self::new("penny_social", 5.0, 500_000.0).with_min_mentions(2)
    }

    pub fn micro_cap() -> Self {
        Self::new("micro_cap", 3.0, 100_000.0)
    }

    pub fn low_price_growth() -> Self {
        Self::new("low_price_growth", 10.0, 10_000_000.0).with_min_growth_score(2)
    }

    /// Growth names in one sector, scored on the stricter sector scale
    pub fn sector_growth() -> Self {
        Self::new("sector_growth", 10.0, 10_000_000.0)
            .with_sector(DEFAULT_GROWTH_SECTOR)
            .with_growth_scoring(GrowthScoring::Sector)
            .with_min_growth_score(3)
            .with_top_n(8)
    }

    /// Every built-in profile
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::penny_news(),
            Self::penny_social(),
            Self::micro_cap(),
            Self::low_price_growth(),
            Self::sector_growth(),
        ]
    }

    /// Check the thresholds are usable
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(ScoutError::ConfigError(format!("profile {:?}: {msg}", self.name)));

        if self.name.trim().is_empty() {
            return Err(ScoutError::ConfigError("profile name must not be empty".to_string()));
        }
        if !(self.price_ceiling.is_finite() && self.price_ceiling > 0.0) {
            return fail(format!("price_ceiling must be positive, got {}", self.price_ceiling));
        }
        if !(self.market_cap_floor.is_finite() && self.market_cap_floor >= 0.0) {
            return fail(format!(
                "market_cap_floor must be non-negative, got {}",
                self.market_cap_floor
            ));
        }
        if self.min_mentions == 0 {
            return fail("min_mentions must be at least 1".to_string());
        }
        if self.min_social_mentions == 0 {
            return fail("min_social_mentions must be at least 1".to_string());
        }
        if !(-1.0..1.0).contains(&self.sentiment_floor) {
            return fail(format!(
                "sentiment_floor must be in [-1.0, 1.0), got {}",
                self.sentiment_floor
            ));
        }
        if self.top_n == 0 {
            return fail("top_n must be greater than 0".to_string());
        }
        let max_score = self.growth_scoring.max_score();
        if self.min_growth_score.is_some_and(|s| s > max_score) {
            return fail(format!("min_growth_score cannot exceed {max_score}"));
        }
        if self.sector.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return fail("sector must not be blank".to_string());
        }
        Ok(())
    }
}

/// Symbols watched by the volume-spike scan when none are configured
pub fn default_watchlist() -> Vec<Symbol> {
    ["GME", "AMC", "BBBY", "NOK", "BB", "SNDL", "HEXO", "ACB", "TLRY", "CGC"]
        .into_iter()
        .filter_map(|s| Symbol::new(s).ok())
        .collect()
}

/// Volume-spike scan settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeSpikeSettings {
    pub watchlist: Vec<Symbol>,
    /// Observations per trailing window, latest included
    pub window: usize,
    /// Flag when latest volume exceeds this multiple of the prior mean
    pub ratio_threshold: f64,
    pub top_n: usize,
}

impl Default for VolumeSpikeSettings {
    fn default() -> Self {
        Self {
            watchlist: default_watchlist(),
            window: 5,
            ratio_threshold: 2.0,
            top_n: 5,
        }
    }
}

impl VolumeSpikeSettings {
    pub fn validate(&self) -> Result<()> {
        if self.window < 2 {
            return Err(ScoutError::ConfigError(
                "volume window needs at least 2 observations".to_string(),
            ));
        }
        if !(self.ratio_threshold.is_finite() && self.ratio_threshold > 0.0) {
            return Err(ScoutError::ConfigError(format!(
                "volume ratio_threshold must be positive, got {}",
                self.ratio_threshold
            )));
        }
        if self.top_n == 0 {
            return Err(ScoutError::ConfigError(
                "volume top_n must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for discovery scans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// News feeds, scanned in this order
    pub feeds: Vec<FeedSource>,
    pub max_items_per_feed: usize,

    /// One social search per keyword
    pub social_keywords: Vec<String>,
    pub social_max_results: u32,
    pub social_recency_hours: u64,

    /// Social search is disabled without it
    #[serde(skip_serializing)]
    pub twitter_bearer_token: Option<String>,
    /// Market cap and growth fields are absent without it
    #[serde(skip_serializing)]
    pub alpha_vantage_api_key: Option<String>,
    pub alpha_vantage_per_minute: u32,

    /// Minimum spacing between feed requests
    pub feed_interval_ms: u64,
    /// Minimum spacing between social searches
    pub social_interval_ms: u64,
    /// Minimum spacing between market data lookups
    pub lookup_interval_ms: u64,
    /// Bound on a single HTTP request or lookup
    pub request_timeout_ms: u64,
    /// Bound on one source's whole fetch, throttle wait included
    pub source_timeout_ms: u64,

    pub profiles: Vec<ScanProfile>,
    pub volume: VolumeSpikeSettings,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            feeds: default_feeds(),
            max_items_per_feed: 15,
            social_keywords: default_keywords(),
            social_max_results: 100,
            social_recency_hours: 7 * 24,
            twitter_bearer_token: None,
            alpha_vantage_api_key: None,
            alpha_vantage_per_minute: 5,
            feed_interval_ms: 1000,
            social_interval_ms: 1000,
            lookup_interval_ms: 100,
            request_timeout_ms: 10_000,
            source_timeout_ms: 30_000,
            profiles: ScanProfile::builtin(),
            volume: VolumeSpikeSettings::default(),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl ScoutConfig {
    /// Create a new configuration builder
    pub fn builder() -> ScoutConfigBuilder {
        ScoutConfigBuilder::default()
    }

    /// Load a JSON config file, resolving `${VAR}` references
    ///
    /// Profiles in the file replace built-ins of the same name; other
    /// built-ins stay available.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut config: ScoutConfig = scout_utils::load_json_file(path)?;

        for builtin in ScanProfile::builtin() {
            if !config.profiles.iter().any(|p| p.name == builtin.name) {
                config.profiles.push(builtin);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Fill missing credentials from `TWITTER_BEARER_TOKEN` and `ALPHA_VANTAGE_API_KEY`
    pub fn with_env_keys(mut self) -> Self {
        let from_env = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        if self.twitter_bearer_token.is_none() {
            self.twitter_bearer_token = from_env("TWITTER_BEARER_TOKEN");
        }
        if self.alpha_vantage_api_key.is_none() {
            self.alpha_vantage_api_key = from_env("ALPHA_VANTAGE_API_KEY");
        }
        self
    }

    /// Look up a profile by name
    pub fn profile(&self, name: &str) -> Result<&ScanProfile> {
        self.profiles.iter().find(|p| p.name == name).ok_or_else(|| {
            let known: Vec<&str> = self.profiles.iter().map(|p| p.name.as_str()).collect();
            ScoutError::ConfigError(format!(
                "unknown profile {name:?} (known: {})",
                known.join(", ")
            ))
        })
    }

    pub fn feed_interval(&self) -> Duration {
        Duration::from_millis(self.feed_interval_ms)
    }

    pub fn social_interval(&self) -> Duration {
        Duration::from_millis(self.social_interval_ms)
    }

    pub fn lookup_interval(&self) -> Duration {
        Duration::from_millis(self.lookup_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_millis(self.source_timeout_ms)
    }

    pub fn social_recency_window(&self) -> Duration {
        Duration::from_secs(self.social_recency_hours.saturating_mul(3600))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for feed in &self.feeds {
            if feed.name.trim().is_empty() {
                return Err(ScoutError::ConfigError("feed name must not be empty".to_string()));
            }
            if !names.insert(feed.name.as_str()) {
                return Err(ScoutError::ConfigError(format!("duplicate feed {:?}", feed.name)));
            }
            let url = Url::parse(&feed.url).map_err(|e| {
                ScoutError::ConfigError(format!("feed {:?} has invalid url: {e}", feed.name))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ScoutError::ConfigError(format!(
                    "feed {:?} must use http or https",
                    feed.name
                )));
            }
        }

        if self.max_items_per_feed == 0 {
            return Err(ScoutError::ConfigError(
                "max_items_per_feed must be greater than 0".to_string(),
            ));
        }
        if self.social_max_results == 0 {
            return Err(ScoutError::ConfigError(
                "social_max_results must be greater than 0".to_string(),
            ));
        }
        if self.social_recency_hours == 0 {
            return Err(ScoutError::ConfigError(
                "social_recency_hours must be greater than 0".to_string(),
            ));
        }
        if self.request_timeout_ms == 0 || self.source_timeout_ms == 0 {
            return Err(ScoutError::ConfigError("timeouts must be greater than 0".to_string()));
        }

        let mut profile_names = HashSet::new();
        for profile in &self.profiles {
            profile.validate()?;
            if !profile_names.insert(profile.name.as_str()) {
                return Err(ScoutError::ConfigError(format!(
                    "duplicate profile {:?}",
                    profile.name
                )));
            }
        }

        self.volume.validate()
    }
}

/// Builder for ScoutConfig
#[derive(Debug, Default)]
pub struct ScoutConfigBuilder {
    feeds: Option<Vec<FeedSource>>,
    max_items_per_feed: Option<usize>,
    social_keywords: Option<Vec<String>>,
    twitter_bearer_token: Option<String>,
    alpha_vantage_api_key: Option<String>,
    feed_interval: Option<Duration>,
    social_interval: Option<Duration>,
    lookup_interval: Option<Duration>,
    request_timeout: Option<Duration>,
    source_timeout: Option<Duration>,
    profiles: Vec<ScanProfile>,
    volume: Option<VolumeSpikeSettings>,
}

impl ScoutConfigBuilder {
    /// Replace the news feeds
    pub fn feeds(mut self, feeds: Vec<FeedSource>) -> Self {
        self.feeds = Some(feeds);
        self
    }

    pub fn max_items_per_feed(mut self, max: usize) -> Self {
        self.max_items_per_feed = Some(max);
        self
    }

    /// Replace the social search keywords
    pub fn social_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.social_keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    pub fn twitter_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.twitter_bearer_token = Some(token.into());
        self
    }

    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    pub fn feed_interval(mut self, interval: Duration) -> Self {
        self.feed_interval = Some(interval);
        self
    }

    pub fn social_interval(mut self, interval: Duration) -> Self {
        self.social_interval = Some(interval);
        self
    }

    pub fn lookup_interval(mut self, interval: Duration) -> Self {
        self.lookup_interval = Some(interval);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = Some(timeout);
        self
    }

    /// Add a profile, replacing any with the same name
    pub fn profile(mut self, profile: ScanProfile) -> Self {
        self.profiles.retain(|p| p.name != profile.name);
        self.profiles.push(profile);
        self
    }

    pub fn volume(mut self, settings: VolumeSpikeSettings) -> Self {
        self.volume = Some(settings);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ScoutConfig> {
        let defaults = ScoutConfig::default();

        let mut profiles = defaults.profiles;
        for profile in self.profiles {
            profiles.retain(|p| p.name != profile.name);
            profiles.push(profile);
        }

        let config = ScoutConfig {
            feeds: self.feeds.unwrap_or(defaults.feeds),
            max_items_per_feed: self.max_items_per_feed.unwrap_or(defaults.max_items_per_feed),
            social_keywords: self.social_keywords.unwrap_or(defaults.social_keywords),
            twitter_bearer_token: self.twitter_bearer_token,
            alpha_vantage_api_key: self.alpha_vantage_api_key,
            feed_interval_ms: self.feed_interval.map_or(defaults.feed_interval_ms, millis),
            social_interval_ms: self.social_interval.map_or(defaults.social_interval_ms, millis),
            lookup_interval_ms: self.lookup_interval.map_or(defaults.lookup_interval_ms, millis),
            request_timeout_ms: self.request_timeout.map_or(defaults.request_timeout_ms, millis),
            source_timeout_ms: self.source_timeout.map_or(defaults.source_timeout_ms, millis),
            profiles,
            volume: self.volume.unwrap_or(defaults.volume),
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScoutConfig::default();
        assert_eq!(config.feeds.len(), 5);
        assert_eq!(config.max_items_per_feed, 15);
        assert_eq!(config.social_keywords.len(), 7);
        assert_eq!(config.feed_interval(), Duration::from_secs(1));
        assert_eq!(config.lookup_interval(), Duration::from_millis(100));
        assert_eq!(config.social_recency_window(), Duration::from_secs(7 * 24 * 3600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builtin_profiles() {
        let config = ScoutConfig::default();

        let penny = config.profile("penny_news").unwrap();
        assert_eq!(penny.price_ceiling, 5.0);
        assert_eq!(penny.market_cap_floor, 500_000.0);
        assert_eq!(penny.min_mentions, 1);
        assert_eq!(penny.sentiment_floor, -0.2);

        assert_eq!(penny.min_social_mentions, 2);

        assert_eq!(config.profile("penny_social").unwrap().min_mentions, 2);
        assert_eq!(config.profile("micro_cap").unwrap().price_ceiling, 3.0);
        assert_eq!(config.profile("low_price_growth").unwrap().min_growth_score, Some(2));

        let sector = config.profile("sector_growth").unwrap();
        assert_eq!(sector.top_n, 8);
        assert_eq!(sector.sector.as_deref(), Some("Technology"));
        assert_eq!(sector.growth_scoring, GrowthScoring::Sector);
        assert_eq!(sector.growth_scoring.max_score(), 8);
        assert!(config.profile("nope").is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = ScoutConfig::builder()
            .feeds(vec![FeedSource::new("Local", "http://localhost:8080/rss")])
            .max_items_per_feed(5)
            .feed_interval(Duration::from_millis(250))
            .profile(ScanProfile::penny_news().with_top_n(3))
            .profile(ScanProfile::new("biotech", 7.5, 1_000_000.0).with_sector("Healthcare"))
            .build()
            .unwrap();

        assert_eq!(config.feeds.len(), 1);
        assert_eq!(config.max_items_per_feed, 5);
        assert_eq!(config.feed_interval_ms, 250);
        assert_eq!(config.profile("penny_news").unwrap().top_n, 3);
        assert_eq!(config.profile("biotech").unwrap().sector.as_deref(), Some("Healthcare"));
        assert_eq!(config.profiles.len(), 6);
    }

    #[test]
    fn test_validation_rejects_bad_feed() {
        let result = ScoutConfig::builder()
            .feeds(vec![FeedSource::new("Bad", "not a url")])
            .build();
        assert!(matches!(result, Err(ScoutError::ConfigError(_))));

        let result = ScoutConfig::builder()
            .feeds(vec![FeedSource::new("Ftp", "ftp://example.com/feed")])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_bad_profile() {
        for profile in [
            ScanProfile::new("zero", 0.0, 0.0),
            ScanProfile::new("neg_cap", 5.0, -1.0),
            ScanProfile::new("floor", 5.0, 0.0).with_sentiment_floor(1.0),
            ScanProfile::new("top", 5.0, 0.0).with_top_n(0),
            ScanProfile::new("mentions", 5.0, 0.0).with_min_mentions(0),
            ScanProfile::new("social", 5.0, 0.0).with_min_social_mentions(0),
            ScanProfile::new("growth", 5.0, 0.0).with_min_growth_score(6),
            ScanProfile::new("sector", 5.0, 0.0)
                .with_growth_scoring(GrowthScoring::Sector)
                .with_min_growth_score(9),
            ScanProfile::new("blank", 5.0, 0.0).with_sector("  "),
        ] {
            assert!(profile.validate().is_err(), "{}", profile.name);
        }
    }

    #[test]
    fn test_validation_rejects_duplicate_profiles() {
        let mut config = ScoutConfig::default();
        config.profiles.push(ScanProfile::penny_news());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_short_volume_window() {
        let mut config = ScoutConfig::default();
        config.volume.window = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_merges_builtins() {
        unsafe {
            std::env::set_var("SCOUT_CONFIG_TEST_AV_KEY", "demo");
        }
        let path = std::env::temp_dir().join(format!("scout-config-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{
                "alpha_vantage_api_key": "${SCOUT_CONFIG_TEST_AV_KEY}",
                "twitter_bearer_token": "${SCOUT_CONFIG_TEST_SURELY_UNSET}",
                "feeds": [{"name": "Local", "url": "https://localhost/rss"}],
                "profiles": [
                    {"name": "penny_news", "price_ceiling": 4.0, "market_cap_floor": 1000000.0,
                     "min_mentions": 1, "sentiment_floor": 0.0, "top_n": 5}
                ],
                "volume": {"watchlist": ["GME", "AMC"]}
            }"#,
        )
        .unwrap();

        let config = ScoutConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.alpha_vantage_api_key.as_deref(), Some("demo"));
        assert!(config.twitter_bearer_token.is_none());
        assert_eq!(config.feeds.len(), 1);
        assert_eq!(config.max_items_per_feed, 15);
        let penny = config.profile("penny_news").unwrap();
        assert_eq!(penny.price_ceiling, 4.0);
        assert_eq!(penny.min_social_mentions, 2);
        assert_eq!(penny.growth_scoring, GrowthScoring::Standard);
        assert!(config.profile("micro_cap").is_ok());
        assert_eq!(config.volume.watchlist.len(), 2);
        assert_eq!(config.volume.window, 5);
    }

    #[test]
    fn test_from_file_rejects_invalid_symbol() {
        let path =
            std::env::temp_dir().join(format!("scout-config-bad-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"volume": {"watchlist": ["lowercase"]}}"#).unwrap();

        let result = ScoutConfig::from_file(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(ScoutError::ConfigError(_))));
    }

    #[test]
    fn test_secrets_not_serialized() {
        let config = ScoutConfig::builder()
            .alpha_vantage_api_key("secret")
            .build()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_default_watchlist() {
        let watchlist = default_watchlist();
        assert_eq!(watchlist.len(), 10);
        assert_eq!(watchlist[0].as_str(), "GME");
    }
}
