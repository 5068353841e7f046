//! Keyword lexicon sentiment scoring for headlines and posts
//!
//! The lexicon is tuned for low-priced stocks: bare activity words ("announces",
//! "trading", "volume") are read as a weakly favourable signal.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Bias added when a text carries activity words
pub const ACTIVITY_BIAS: f64 = 0.1;

const POSITIVE_WORDS: &[&str] = &[
    "surge", "jump", "rise", "gain", "up", "higher", "beat", "exceed", "positive", "bullish",
    "growth", "profit", "earnings beat", "approval", "launch", "partnership", "deal",
    "acquisition", "merger", "expansion", "new", "breakthrough", "innovation", "success", "win",
    "award", "contract", "revenue", "sales", "demand", "popular", "trending", "hot", "moon",
    "rocket",
];

const NEGATIVE_WORDS: &[&str] = &[
    "drop", "fall", "decline", "down", "lower", "miss", "loss", "negative", "bearish", "crash",
    "plunge", "earnings miss", "rejection", "failure", "bankruptcy", "delisting", "fraud",
    "investigation", "lawsuit", "recall", "disappointment",
];

const ACTIVITY_WORDS: &[&str] = &[
    "announce", "report", "release", "update", "news", "trading", "volume", "movement",
    "activity",
];

static DEFAULT_LEXICON: LazyLock<SentimentLexicon> = LazyLock::new(SentimentLexicon::default);

/// Score text with the default lexicon
pub fn score(text: &str) -> f64 {
    DEFAULT_LEXICON.score(text)
}

/// A keyword, possibly spanning several words
#[derive(Debug, Clone, PartialEq, Eq)]
struct Keyword {
    words: Vec<String>,
}

impl Keyword {
    fn parse(raw: &str) -> Option<Self> {
        let words = tokenize(raw);
        (!words.is_empty()).then_some(Self { words })
    }
}

/// Three keyword sets: positive, negative and activity
#[derive(Debug, Clone)]
pub struct SentimentLexicon {
    positive: Vec<Keyword>,
    negative: Vec<Keyword>,
    activity: Vec<Keyword>,
    /// Every single-word keyword; such tokens never match by inflection
    exact_words: HashSet<String>,
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        Self::empty()
            .with_positive(POSITIVE_WORDS.iter().copied())
            .with_negative(NEGATIVE_WORDS.iter().copied())
            .with_activity(ACTIVITY_WORDS.iter().copied())
    }
}

/// Keyword hit counts for one text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeywordCounts {
    pub positive: usize,
    pub negative: usize,
    pub activity: usize,
}

impl SentimentLexicon {
    /// Lexicon with no keywords at all
    pub fn empty() -> Self {
        Self {
            positive: Vec::new(),
            negative: Vec::new(),
            activity: Vec::new(),
            exact_words: HashSet::new(),
        }
    }

    /// Add positive keywords
    pub fn with_positive<'a>(mut self, words: impl IntoIterator<Item = &'a str>) -> Self {
        let parsed = self.register(words);
        self.positive.extend(parsed);
        self
    }

    /// Add negative keywords
    pub fn with_negative<'a>(mut self, words: impl IntoIterator<Item = &'a str>) -> Self {
        let parsed = self.register(words);
        self.negative.extend(parsed);
        self
    }

    /// Add activity keywords
    pub fn with_activity<'a>(mut self, words: impl IntoIterator<Item = &'a str>) -> Self {
        let parsed = self.register(words);
        self.activity.extend(parsed);
        self
    }

    fn register<'a>(&mut self, words: impl IntoIterator<Item = &'a str>) -> Vec<Keyword> {
        let parsed: Vec<Keyword> = words.into_iter().filter_map(Keyword::parse).collect();
        for keyword in &parsed {
            if let [single] = keyword.words.as_slice() {
                self.exact_words.insert(single.clone());
            }
        }
        parsed
    }

    /// Count how many keywords of each set occur in `text`
    ///
    /// Each keyword counts once no matter how often it appears.
    pub fn counts(&self, text: &str) -> KeywordCounts {
        let tokens = tokenize(text);
        let hits = |set: &[Keyword]| set.iter().filter(|k| self.contains(&tokens, k)).count();

        KeywordCounts {
            positive: hits(&self.positive),
            negative: hits(&self.negative),
            activity: hits(&self.activity),
        }
    }

    /// Score text into `[-1.0, 1.0]`
    ///
    /// No keywords at all scores exactly `0.0`. Activity words alone score
    /// [`ACTIVITY_BIAS`]. Otherwise the score is the positive/negative
    /// balance plus the activity bias, clamped.
    pub fn score(&self, text: &str) -> f64 {
        let counts = self.counts(text);

        if counts.positive == 0 && counts.negative == 0 {
            return if counts.activity > 0 { ACTIVITY_BIAS } else { 0.0 };
        }

        let polar = (counts.positive + counts.negative) as f64;
        let mut sentiment = (counts.positive as f64 - counts.negative as f64) / polar;

        if counts.activity > 0 {
            sentiment += ACTIVITY_BIAS;
        }

        sentiment.clamp(-1.0, 1.0)
    }

    fn contains(&self, tokens: &[String], keyword: &Keyword) -> bool {
        let width = keyword.words.len();
        tokens.windows(width).any(|window| {
            window
                .iter()
                .zip(&keyword.words)
                .all(|(token, word)| self.word_matches(token, word))
        })
    }

    fn word_matches(&self, token: &str, word: &str) -> bool {
        if token == word {
            return true;
        }
        // "news" is its own keyword and must not also count as "new"
        if self.exact_words.contains(token) {
            return false;
        }
        is_inflection_of(token, word)
    }
}

/// Regular English inflections: surge -> surges/surged/surging, drop -> dropped
fn is_inflection_of(token: &str, word: &str) -> bool {
    let Some(rest) = token.strip_prefix(word) else {
        return word
            .strip_suffix('e')
            .and_then(|stem| token.strip_prefix(stem))
            .is_some_and(|suffix| matches!(suffix, "ing" | "ed"));
    };

    if matches!(rest, "s" | "es" | "d" | "ed" | "ing") {
        return true;
    }

    // doubled final consonant
    let Some(last) = word.chars().last() else {
        return false;
    };
    rest.strip_prefix(last)
        .is_some_and(|suffix| matches!(suffix, "ed" | "ing"))
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Coarse label for a sentiment score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    VeryPositive,
    Positive,
    Neutral,
    Negative,
    VeryNegative,
}

impl SentimentLabel {
    /// Create from numeric score
    pub fn from_score(score: f64) -> Self {
        if score >= 0.6 {
            SentimentLabel::VeryPositive
        } else if score >= 0.2 {
            SentimentLabel::Positive
        } else if score >= -0.2 {
            SentimentLabel::Neutral
        } else if score >= -0.6 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::VeryNegative
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            SentimentLabel::VeryPositive => "Very Positive",
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::VeryNegative => "Very Negative",
        }
    }
}
