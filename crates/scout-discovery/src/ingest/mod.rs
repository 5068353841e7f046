//! Source ingestion
//!
//! Every configured source is an independent failure domain. The [`Ingestor`]
//! fetches all of them concurrently, bounds each with a timeout and records
//! one [`SourceOutcome`] per source. A failed, empty, timed out or disabled
//! source contributes no units; it never aborts the run.

pub mod news;
pub mod social;
pub mod throttle;

pub use news::{FeedSource, NewsFeedSource, parse_feed_titles};
pub use social::{SocialKeywordSource, SocialPost, SocialSearch, TwitterSearchClient};
pub use throttle::Throttle;

use crate::error::Result;
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Which kind of provider a text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    News,
    Social,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::News => f.write_str("news"),
            SourceKind::Social => f.write_str("social"),
        }
    }
}

/// Canonical ingestion position: configured source order, then item order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UnitSeq {
    pub source_index: usize,
    pub item_index: usize,
}

/// One headline or post, ready for extraction and scoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextUnit {
    pub text: String,
    pub source_id: String,
    pub kind: SourceKind,
    pub seq: UnitSeq,
}

/// A provider of raw texts
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Stable identifier used in source tags and diagnostics
    fn id(&self) -> &str;

    fn kind(&self) -> SourceKind;

    /// Why this source cannot run with the current configuration
    fn disabled_reason(&self) -> Option<String> {
        None
    }

    /// Fetch the current texts, most recent first
    async fn fetch(&self) -> Result<Vec<String>>;
}

/// Why a source contributed nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    Failed(String),
    TimedOut(Duration),
    Disabled(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Failed(msg) => write!(f, "failed: {msg}"),
            SkipReason::TimedOut(after) => write!(f, "timed out after {}ms", after.as_millis()),
            SkipReason::Disabled(msg) => write!(f, "disabled: {msg}"),
        }
    }
}

/// Result of fetching one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome {
    Fetched { source_id: String, items: usize },
    Empty { source_id: String },
    Skipped { source_id: String, reason: SkipReason },
}

impl SourceOutcome {
    pub fn source_id(&self) -> &str {
        match self {
            SourceOutcome::Fetched { source_id, .. }
            | SourceOutcome::Empty { source_id }
            | SourceOutcome::Skipped { source_id, .. } => source_id,
        }
    }
}

/// Everything one ingestion pass produced
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// One outcome per source, in configured order
    pub outcomes: Vec<SourceOutcome>,
    /// Units from every fetched source, in canonical order
    pub units: Vec<TextUnit>,
}

impl IngestReport {
    /// Sources that returned at least one item
    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, SourceOutcome::Fetched { .. }))
    }

    pub fn empty(&self) -> usize {
        self.count(|o| matches!(o, SourceOutcome::Empty { .. }))
    }

    /// Sources that errored or timed out
    pub fn failed(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                SourceOutcome::Skipped {
                    reason: SkipReason::Failed(_) | SkipReason::TimedOut(_),
                    ..
                }
            )
        })
    }

    pub fn disabled(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                SourceOutcome::Skipped {
                    reason: SkipReason::Disabled(_),
                    ..
                }
            )
        })
    }

    /// Skipped sources with their reasons
    pub fn skipped(&self) -> impl Iterator<Item = (&str, &SkipReason)> {
        self.outcomes.iter().filter_map(|o| match o {
            SourceOutcome::Skipped { source_id, reason } => Some((source_id.as_str(), reason)),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&SourceOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// Fetches a set of sources concurrently
pub struct Ingestor {
    sources: Vec<Arc<dyn TextSource>>,
    timeout: Duration,
}

impl Ingestor {
    /// Create an ingestor whose sources each get `timeout` to finish
    pub fn new(timeout: Duration) -> Self {
        Self {
            sources: Vec::new(),
            timeout,
        }
    }

    pub fn with_source(mut self, source: Arc<dyn TextSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_sources(mut self, sources: impl IntoIterator<Item = Arc<dyn TextSource>>) -> Self {
        self.sources.extend(sources);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Fetch every source and collect units and outcomes
    pub async fn run(&self) -> IngestReport {
        let fetches = self
            .sources
            .iter()
            .enumerate()
            .map(|(index, source)| fetch_source(index, source.as_ref(), self.timeout));

        let mut report = IngestReport::default();
        for (outcome, units) in join_all(fetches).await {
            report.outcomes.push(outcome);
            report.units.extend(units);
        }

        debug!(
            sources = report.outcomes.len(),
            units = report.units.len(),
            succeeded = report.succeeded(),
            "Ingestion finished"
        );
        report
    }
}

async fn fetch_source(
    source_index: usize,
    source: &dyn TextSource,
    limit: Duration,
) -> (SourceOutcome, Vec<TextUnit>) {
    let source_id = source.id().to_string();

    if let Some(reason) = source.disabled_reason() {
        debug!(source = %source_id, %reason, "Source disabled");
        let reason = SkipReason::Disabled(reason);
        return (SourceOutcome::Skipped { source_id, reason }, Vec::new());
    }

    let items = match tokio::time::timeout(limit, source.fetch()).await {
        Ok(Ok(items)) => items,
        Ok(Err(e)) => {
            warn!(source = %source_id, error = %e, "Source failed, skipping");
            let reason = SkipReason::Failed(e.to_string());
            return (SourceOutcome::Skipped { source_id, reason }, Vec::new());
        }
        Err(_) => {
            warn!(source = %source_id, timeout_ms = limit.as_millis(), "Source timed out, skipping");
            let reason = SkipReason::TimedOut(limit);
            return (SourceOutcome::Skipped { source_id, reason }, Vec::new());
        }
    };

    let kind = source.kind();
    let units: Vec<TextUnit> = items
        .into_iter()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .enumerate()
        .map(|(item_index, text)| TextUnit {
            text,
            source_id: source_id.clone(),
            kind,
            seq: UnitSeq {
                source_index,
                item_index,
            },
        })
        .collect();

    if units.is_empty() {
        debug!(source = %source_id, "Source returned no items");
        (SourceOutcome::Empty { source_id }, units)
    } else {
        let outcome = SourceOutcome::Fetched {
            source_id,
            items: units.len(),
        };
        (outcome, units)
    }
}

/// A source backed by a fixed list of texts
#[derive(Debug, Clone)]
pub struct StaticSource {
    id: String,
    kind: SourceKind,
    texts: Vec<String>,
}

impl StaticSource {
    pub fn new<I, S>(id: impl Into<String>, kind: SourceKind, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            kind,
            texts: texts.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl TextSource for StaticSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch(&self) -> Result<Vec<String>> {
        Ok(self.texts.clone())
    }
}
