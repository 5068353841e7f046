//! Ticker symbol type and extraction from free text

use crate::error::{Result, ScoutError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static TICKER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\$)?([A-Z]{1,5})$").expect("ticker pattern is valid"));

/// Upper-case words that look like tickers but almost never are
pub const DEFAULT_STOPWORDS: &[&str] = &[
    // articles, pronouns, short function words
    "A", "AN", "THE", "I", "ME", "MY", "WE", "US", "OUR", "YOU", "YOUR", "HE", "SHE", "IT", "ITS",
    "THEY", "AND", "OR", "NOT", "NO", "FOR", "ARE", "IS", "AM", "BE", "WAS", "ALL", "NEW", "TOP",
    "OF", "TO", "IN", "ON", "AT", "BY", "AS", "SO", "UP", "IF", "DO", "GO", "BUT", "WITH", "FROM",
    "THIS", "THAT", "WHAT", "WHY", "HOW", "WHO", "NOW", "JUST", "BIG", "HOT", "BUY", "SELL",
    // corporate titles
    "CEO", "CFO", "CTO", "COO", "CMO", "VP", "SVP", "EVP",
    // exchanges, regulators, institutions
    "NYSE", "OTC", "AMEX", "SEC", "FDA", "FTC", "DOJ", "FED", "FOMC", "IRS", "EU", "UN",
    // finance and news shorthand
    "IPO", "ETF", "EPS", "PE", "GDP", "CPI", "PPI", "YOY", "QOQ", "ATH", "USD", "EUR", "GBP",
    "USA", "UK", "AI", "EV", "TV", "PM", "EST", "ET", "PT", "LLC", "INC", "LTD", "PLC",
    "CORP", "NEWS", "UPDATE", "DD", "IMO", "YOLO", "FOMO", "LOL", "OMG", "WSB",
];

/// A tradable ticker: 1-5 upper-case ASCII letters
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Validate and wrap a ticker
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let valid = (1..=5).contains(&raw.len()) && raw.bytes().all(|b| b.is_ascii_uppercase());
        if valid {
            Ok(Self(raw))
        } else {
            Err(ScoutError::InvalidSymbol(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ScoutError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Pulls candidate tickers out of headlines and posts
///
/// Two token shapes are recognised: an explicit cashtag (`$XYZ`) and a bare
/// upper-case word of 1-5 letters that is not a stopword. Stopwords are not
/// applied to cashtags since the author tagged them on purpose.
#[derive(Debug, Clone)]
pub struct SymbolExtractor {
    stopwords: HashSet<String>,
    cashtags_only: bool,
}

impl Default for SymbolExtractor {
    fn default() -> Self {
        Self {
            stopwords: DEFAULT_STOPWORDS.iter().map(|w| (*w).to_string()).collect(),
            cashtags_only: false,
        }
    }
}

impl SymbolExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the stopword set
    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stopwords
            .extend(words.into_iter().map(|w| w.as_ref().to_ascii_uppercase()));
        self
    }

    /// Only accept `$`-tagged tokens
    pub fn cashtags_only(mut self) -> Self {
        self.cashtags_only = true;
        self
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Extract the distinct symbols mentioned in `text`
    pub fn extract(&self, text: &str) -> BTreeSet<Symbol> {
        text.split_whitespace()
            .filter_map(|raw| self.symbol_from_token(raw))
            .collect()
    }

    fn symbol_from_token(&self, raw: &str) -> Option<Symbol> {
        let token = clean_token(raw);
        let caps = TICKER_TOKEN.captures(token)?;
        let is_cashtag = caps.get(1).is_some();
        let ticker = caps.get(2)?.as_str();

        if !is_cashtag && (self.cashtags_only || self.is_stopword(ticker)) {
            return None;
        }

        Symbol::new(ticker).ok()
    }
}

fn clean_token(raw: &str) -> &str {
    const EDGE: &[char] = &[
        '(', ')', '[', ']', '{', '}', '"', '\'', ',', '.', ':', ';', '!', '?', '*', '\u{201c}',
        '\u{201d}', '\u{2018}', '\u{2019}',
    ];
    let token = raw.trim_matches(EDGE);
    let token = token
        .strip_suffix("'s")
        .or_else(|| token.strip_suffix("\u{2019}s"))
        .unwrap_or(token);
    token.trim_end_matches(EDGE)
}
