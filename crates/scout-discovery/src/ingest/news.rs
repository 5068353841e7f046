//! RSS and Atom headline feeds

use super::{SourceKind, TextSource, Throttle};
use crate::error::{Result, ScoutError};
use async_trait::async_trait;
use regex::{Captures, Regex};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

static FEED_ROOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(rss|feed|rdf:RDF)\b").expect("feed root pattern is valid")
});

static ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(?:item|entry)\b[^>]*>(.*?)</(?:item|entry)>").expect("entry pattern is valid")
});

static TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<title\b[^>]*>(.*?)</title>").expect("title pattern is valid")
});

static CDATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").expect("cdata pattern is valid"));

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("entity pattern is valid")
});

/// A named feed endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
}

impl FeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Market headline feeds scanned when none are configured
pub fn default_feeds() -> Vec<FeedSource> {
    vec![
        FeedSource::new("Yahoo Finance", "https://feeds.finance.yahoo.com/rss/2.0/headline"),
        FeedSource::new("MarketWatch", "https://feeds.marketwatch.com/marketwatch/topstories/"),
        FeedSource::new("Reuters Business", "http://feeds.reuters.com/reuters/businessNews"),
        FeedSource::new("Bloomberg", "https://feeds.bloomberg.com/markets/news.rss"),
        FeedSource::new("CNBC", "https://www.cnbc.com/id/100003114/device/rss/rss.html"),
    ]
}

/// Extract item and entry titles from an RSS 2.0, RSS 1.0 or Atom document
///
/// Titles come back in document order with CDATA unwrapped, markup removed,
/// entities decoded and whitespace collapsed. Entries without a title are
/// skipped. A document without a feed root element is an error.
pub fn parse_feed_titles(xml: &str) -> Result<Vec<String>> {
    if !FEED_ROOT.is_match(xml) {
        return Err(ScoutError::FeedParseError(
            "document is not an RSS or Atom feed".to_string(),
        ));
    }

    let titles = ENTRY
        .captures_iter(xml)
        .filter_map(|entry| {
            let body = entry.get(1)?.as_str();
            let raw = TITLE.captures(body)?.get(1)?.as_str();
            let title = clean_title(raw);
            (!title.is_empty()).then_some(title)
        })
        .collect();

    Ok(titles)
}

fn clean_title(raw: &str) -> String {
    let unwrapped = CDATA.replace_all(raw, "$1");
    let decoded = decode_entities(&unwrapped);
    // html-typed Atom titles arrive escaped, so strip tags after decoding
    let text = TAG.replace_all(&decoded, " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures<'_>| {
            let name = &caps[1];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => name
                    .strip_prefix("#x")
                    .or_else(|| name.strip_prefix("#X"))
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .or_else(|| name.strip_prefix('#').map(str::parse::<u32>))
                    .and_then(std::result::Result::ok)
                    .and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// Headlines from one feed endpoint
pub struct NewsFeedSource {
    feed: FeedSource,
    client: Client,
    throttle: Throttle,
    max_items: usize,
}

impl NewsFeedSource {
    /// Create a feed source; `throttle` should be shared by all feeds
    pub fn new(feed: FeedSource, client: Client, throttle: Throttle, max_items: usize) -> Self {
        Self {
            feed,
            client,
            throttle,
            max_items,
        }
    }

    pub fn feed(&self) -> &FeedSource {
        &self.feed
    }
}

#[async_trait]
impl TextSource for NewsFeedSource {
    fn id(&self) -> &str {
        &self.feed.name
    }

    fn kind(&self) -> SourceKind {
        SourceKind::News
    }

    async fn fetch(&self) -> Result<Vec<String>> {
        self.throttle.until_ready().await;

        debug!(feed = %self.feed.name, url = %self.feed.url, "Fetching feed");
        let response = self.client.get(&self.feed.url).send().await?;

        if !response.status().is_success() {
            return Err(ScoutError::ApiError(format!(
                "{} returned HTTP {}",
                self.feed.name,
                response.status()
            )));
        }

        let body = response.text().await?;
        let mut titles = parse_feed_titles(&body)?;
        titles.truncate(self.max_items);

        debug!(feed = %self.feed.name, titles = titles.len(), "Parsed feed");
        Ok(titles)
    }
}
