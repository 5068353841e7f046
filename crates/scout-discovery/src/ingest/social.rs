//! Keyword search over recent social posts

use super::{SourceKind, TextSource, Throttle};
use crate::error::{Result, ScoutError};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

const RECENT_SEARCH_URL: &str = "https://api.twitter.com/2/tweets/search/recent";

/// Recent search only reaches back this far
const MAX_RECENCY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Search phrases used when none are configured
pub fn default_keywords() -> Vec<String> {
    [
        "penny stocks",
        "penny stock",
        "pennystocks",
        "small cap stocks",
        "under $5",
        "cheap stocks",
        "low price stocks",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// A post returned by a social search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPost {
    pub text: String,
}

/// Keyword search over recent posts
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SocialSearch: Send + Sync {
    async fn search(
        &self,
        keyword: &str,
        max_results: u32,
        recency_window: Duration,
    ) -> Result<Vec<SocialPost>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SocialPost>,
}

/// Twitter API v2 recent search
#[derive(Debug, Clone)]
pub struct TwitterSearchClient {
    client: Client,
    bearer_token: String,
}

impl TwitterSearchClient {
    pub fn new(client: Client, bearer_token: impl Into<String>) -> Self {
        Self {
            client,
            bearer_token: bearer_token.into(),
        }
    }
}

#[async_trait]
impl SocialSearch for TwitterSearchClient {
    async fn search(
        &self,
        keyword: &str,
        max_results: u32,
        recency_window: Duration,
    ) -> Result<Vec<SocialPost>> {
        let mut params = vec![
            ("query", keyword.to_string()),
            ("max_results", max_results.clamp(10, 100).to_string()),
            ("tweet.fields", "created_at,lang".to_string()),
        ];

        // the endpoint defaults to its full seven days when start_time is omitted
        if recency_window < MAX_RECENCY {
            let window = chrono::Duration::from_std(recency_window)
                .map_err(|e| ScoutError::ConfigError(format!("Invalid recency window: {e}")))?;
            let start = (Utc::now() - window).to_rfc3339_opts(SecondsFormat::Secs, true);
            params.push(("start_time", start));
        }

        let response = self
            .client
            .get(RECENT_SEARCH_URL)
            .bearer_auth(&self.bearer_token)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ScoutError::RateLimitExceeded {
                provider: "Twitter".to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScoutError::SocialSearchError(format!("HTTP {status}: {body}")));
        }

        let parsed: SearchResponse = response.json().await?;
        Ok(parsed.data)
    }
}

/// Posts matching one search keyword
///
/// Without a search backend the source is disabled rather than failing.
pub struct SocialKeywordSource {
    id: String,
    keyword: String,
    search: Option<Arc<dyn SocialSearch>>,
    throttle: Throttle,
    max_results: u32,
    recency_window: Duration,
}

impl SocialKeywordSource {
    pub fn new(
        keyword: impl Into<String>,
        search: Option<Arc<dyn SocialSearch>>,
        throttle: Throttle,
        max_results: u32,
        recency_window: Duration,
    ) -> Self {
        let keyword = keyword.into();
        Self {
            id: format!("twitter:{keyword}"),
            keyword,
            search,
            throttle,
            max_results,
            recency_window,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}

#[async_trait]
impl TextSource for SocialKeywordSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Social
    }

    fn disabled_reason(&self) -> Option<String> {
        self.search
            .is_none()
            .then(|| "no social search credentials configured".to_string())
    }

    async fn fetch(&self) -> Result<Vec<String>> {
        let Some(search) = &self.search else {
            return Err(ScoutError::ConfigError(
                "no social search credentials configured".to_string(),
            ));
        };

        self.throttle.until_ready().await;
        let posts = search
            .search(&self.keyword, self.max_results, self.recency_window)
            .await?;

        debug!(keyword = %self.keyword, posts = posts.len(), "Social search finished");
        Ok(posts.into_iter().map(|post| post.text).collect())
    }
}
