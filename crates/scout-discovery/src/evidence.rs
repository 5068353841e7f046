//! Per-symbol evidence aggregation
//!
//! Every unit is scored once; each symbol it names gets one mention, that
//! score, the unit's source tag and possibly a sample. Samples are the
//! earliest units by canonical ingestion position, so the result does not
//! depend on the order in which units or partial maps are folded.

use crate::ingest::{SourceKind, TextUnit, UnitSeq};
use crate::sentiment::SentimentLexicon;
use crate::symbols::{Symbol, SymbolExtractor};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Samples kept per symbol
pub const DEFAULT_SAMPLE_CAP: usize = 3;

/// Evidence for every symbol seen in a run
pub type EvidenceMap = BTreeMap<Symbol, Evidence>;

/// A text kept as an example mention
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sample {
    pub seq: UnitSeq,
    pub text: String,
}

/// Accumulated mentions of one symbol
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Evidence {
    /// Number of scored units naming the symbol
    pub mentions: usize,
    pub sentiment_sum: f64,
    /// Sorted by ingestion position, at most the aggregator's sample cap
    pub samples: Vec<Sample>,
    pub source_tags: BTreeSet<String>,
    pub kinds: BTreeSet<SourceKind>,
}

impl Evidence {
    /// Mean sentiment, `None` before the first mention
    pub fn average_sentiment(&self) -> Option<f64> {
        (self.mentions > 0).then(|| self.sentiment_sum / self.mentions as f64)
    }

    /// Mentioned by both news and social sources
    pub fn is_corroborated(&self) -> bool {
        self.kinds.contains(&SourceKind::News) && self.kinds.contains(&SourceKind::Social)
    }

    /// Every mention came from social posts
    pub fn is_social_only(&self) -> bool {
        self.kinds.len() == 1 && self.kinds.contains(&SourceKind::Social)
    }

    pub fn sample_texts(&self) -> impl Iterator<Item = &str> {
        self.samples.iter().map(|s| s.text.as_str())
    }

    fn record(&mut self, unit: &TextUnit, score: f64, sample_cap: usize) {
        self.mentions += 1;
        self.sentiment_sum += score;
        self.source_tags.insert(unit.source_id.clone());
        self.kinds.insert(unit.kind);
        self.add_samples(
            std::iter::once(Sample {
                seq: unit.seq,
                text: unit.text.clone(),
            }),
            sample_cap,
        );
    }

    fn absorb(&mut self, other: Evidence, sample_cap: usize) {
        self.mentions += other.mentions;
        self.sentiment_sum += other.sentiment_sum;
        self.source_tags.extend(other.source_tags);
        self.kinds.extend(other.kinds);
        self.add_samples(other.samples, sample_cap);
    }

    fn add_samples(&mut self, samples: impl IntoIterator<Item = Sample>, cap: usize) {
        for sample in samples {
            if let Err(pos) = self.samples.binary_search_by_key(&sample.seq, |s| s.seq) {
                self.samples.insert(pos, sample);
            }
        }
        self.samples.truncate(cap);
    }
}

/// Folds text units into an [`EvidenceMap`]
#[derive(Debug, Clone)]
pub struct EvidenceAggregator {
    news_extractor: SymbolExtractor,
    social_extractor: SymbolExtractor,
    lexicon: SentimentLexicon,
    sample_cap: usize,
}

impl Default for EvidenceAggregator {
    /// News accepts bare tickers and cashtags, social posts only cashtags
    fn default() -> Self {
        Self {
            news_extractor: SymbolExtractor::default(),
            social_extractor: SymbolExtractor::default().cashtags_only(),
            lexicon: SentimentLexicon::default(),
            sample_cap: DEFAULT_SAMPLE_CAP,
        }
    }
}

impl EvidenceAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `extractor` for units of `kind`
    pub fn with_extractor(mut self, kind: SourceKind, extractor: SymbolExtractor) -> Self {
        match kind {
            SourceKind::News => self.news_extractor = extractor,
            SourceKind::Social => self.social_extractor = extractor,
        }
        self
    }

    pub fn with_lexicon(mut self, lexicon: SentimentLexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn with_sample_cap(mut self, sample_cap: usize) -> Self {
        self.sample_cap = sample_cap;
        self
    }

    pub fn lexicon(&self) -> &SentimentLexicon {
        &self.lexicon
    }

    pub fn extractor(&self, kind: SourceKind) -> &SymbolExtractor {
        match kind {
            SourceKind::News => &self.news_extractor,
            SourceKind::Social => &self.social_extractor,
        }
    }

    /// Fold one unit, returning how many symbols it named
    pub fn fold_unit(&self, map: &mut EvidenceMap, unit: &TextUnit) -> usize {
        let symbols = self.extractor(unit.kind).extract(&unit.text);
        if symbols.is_empty() {
            return 0;
        }

        let score = self.lexicon.score(&unit.text);
        debug!(
            source = %unit.source_id,
            symbols = symbols.len(),
            score,
            "Folding unit"
        );

        let found = symbols.len();
        for symbol in symbols {
            map.entry(symbol)
                .or_default()
                .record(unit, score, self.sample_cap);
        }
        found
    }

    /// Fold a batch of units in canonical order
    pub fn fold<'a>(&self, units: impl IntoIterator<Item = &'a TextUnit>) -> EvidenceMap {
        let mut ordered: Vec<&TextUnit> = units.into_iter().collect();
        ordered.sort_by_key(|u| u.seq);

        let mut map = EvidenceMap::new();
        for unit in ordered {
            self.fold_unit(&mut map, unit);
        }
        map
    }

    /// Merge a separately folded map into `into`
    pub fn merge(&self, into: &mut EvidenceMap, other: EvidenceMap) {
        for (symbol, evidence) in other {
            into.entry(symbol)
                .or_default()
                .absorb(evidence, self.sample_cap);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(text: &str, source: &str, kind: SourceKind, source_index: usize, item_index: usize) -> TextUnit {
        TextUnit {
            text: text.to_string(),
            source_id: source.to_string(),
            kind,
            seq: UnitSeq {
                source_index,
                item_index,
            },
        }
    }

    fn sym(s: &str) -> Symbol {
        s.parse().unwrap()
    }

    #[test]
    fn test_single_headline() {
        let aggregator = EvidenceAggregator::default();
        let units = [unit("XYZ surges on earnings beat", "feed", SourceKind::News, 0, 0)];

        let map = aggregator.fold(&units);

        let evidence = &map[&sym("XYZ")];
        assert_eq!(map.len(), 1);
        assert_eq!(evidence.mentions, 1);
        assert!(evidence.sentiment_sum > 0.0);
        assert_eq!(evidence.sample_texts().collect::<Vec<_>>(), vec!["XYZ surges on earnings beat"]);
        assert!(evidence.source_tags.contains("feed"));
    }

    #[test]
    fn test_repeated_symbol_counts_once_per_unit() {
        let aggregator = EvidenceAggregator::default();
        let units = [unit("GME GME GME gains", "feed", SourceKind::News, 0, 0)];

        let map = aggregator.fold(&units);
        assert_eq!(map[&sym("GME")].mentions, 1);
    }

    #[test]
    fn test_fold_is_order_independent() {
        let aggregator = EvidenceAggregator::default();
        let a = unit("XYZ surges on earnings beat", "yahoo", SourceKind::News, 0, 0);
        let b = unit("XYZ faces lawsuit, ABC jumps", "cnbc", SourceKind::News, 1, 0);

        let forward = aggregator.fold([&a, &b]);
        let reversed = aggregator.fold([&b, &a]);
        assert_eq!(forward, reversed);

        let mut one_by_one = EvidenceMap::new();
        aggregator.fold_unit(&mut one_by_one, &b);
        aggregator.fold_unit(&mut one_by_one, &a);
        assert_eq!(forward, one_by_one);

        let xyz = &forward[&sym("XYZ")];
        assert_eq!(xyz.mentions, 2);
        assert_eq!(xyz.source_tags.len(), 2);
    }

    #[test]
    fn test_samples_keep_earliest_seen() {
        let aggregator = EvidenceAggregator::default().with_sample_cap(2);
        let units: Vec<TextUnit> = (0..4)
            .map(|i| unit(&format!("XYZ headline {i}"), "feed", SourceKind::News, 0, i))
            .collect();

        let reversed: Vec<&TextUnit> = units.iter().rev().collect();
        let mut map = EvidenceMap::new();
        for u in reversed {
            aggregator.fold_unit(&mut map, u);
        }

        let evidence = &map[&sym("XYZ")];
        assert_eq!(evidence.mentions, 4);
        assert_eq!(
            evidence.sample_texts().collect::<Vec<_>>(),
            vec!["XYZ headline 0", "XYZ headline 1"]
        );
    }

    #[test]
    fn test_merge_matches_single_fold() {
        let aggregator = EvidenceAggregator::default();
        let news = unit("SNDL gains after approval", "reuters", SourceKind::News, 0, 0);
        let social = unit("$SNDL to the moon", "twitter:penny stocks", SourceKind::Social, 1, 0);

        let combined = aggregator.fold([&news, &social]);

        let mut merged = aggregator.fold([&social]);
        aggregator.merge(&mut merged, aggregator.fold([&news]));

        assert_eq!(combined, merged);
        let evidence = &combined[&sym("SNDL")];
        assert!(evidence.is_corroborated());
        assert!(!evidence.is_social_only());
        assert_eq!(evidence.samples[0].text, "SNDL gains after approval");

        assert!(aggregator.fold([&social])[&sym("SNDL")].is_social_only());
        assert!(!aggregator.fold([&news])[&sym("SNDL")].is_social_only());
    }

    #[test]
    fn test_social_requires_cashtags() {
        let aggregator = EvidenceAggregator::default();
        let post = unit("XYZ and $ABC both ripping", "twitter:cheap stocks", SourceKind::Social, 0, 0);

        let map = aggregator.fold([&post]);
        assert!(map.contains_key(&sym("ABC")));
        assert!(!map.contains_key(&sym("XYZ")));
    }

    #[test]
    fn test_custom_extractor_per_kind() {
        let aggregator = EvidenceAggregator::default()
            .with_extractor(SourceKind::Social, SymbolExtractor::default());
        let post = unit("XYZ ripping", "twitter:cheap stocks", SourceKind::Social, 0, 0);

        let map = aggregator.fold([&post]);
        assert!(map.contains_key(&sym("XYZ")));
    }

    #[test]
    fn test_average_sentiment() {
        let evidence = Evidence::default();
        assert_eq!(evidence.average_sentiment(), None);

        let aggregator = EvidenceAggregator::default();
        let units = [
            unit("XYZ surges", "a", SourceKind::News, 0, 0),
            unit("XYZ plunges", "b", SourceKind::News, 1, 0),
        ];
        let map = aggregator.fold(&units);
        assert_eq!(map[&sym("XYZ")].average_sentiment(), Some(0.0));
    }

    #[test]
    fn test_units_without_symbols_are_ignored() {
        let aggregator = EvidenceAggregator::default();
        let mut map = EvidenceMap::new();
        let found = aggregator.fold_unit(
            &mut map,
            &unit("markets rise on rate hopes", "feed", SourceKind::News, 0, 0),
        );
        assert_eq!(found, 0);
        assert!(map.is_empty());
    }
}
