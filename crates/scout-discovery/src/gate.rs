//! Market enrichment gate
//!
//! Turns evidence into candidates. Cheap checks run first (mentions, then
//! sentiment) so symbols that cannot qualify never cost a lookup. Every
//! failure, including a failed lookup, is a [`Rejection`] and never an error.

use crate::config::{GrowthScoring, ScanProfile};
use crate::evidence::{Evidence, EvidenceMap};
use crate::market::{MarketDataProvider, MarketSnapshot};
use crate::symbols::Symbol;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Why a symbol did not become a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    TooFewMentions,
    SentimentAtOrBelowFloor,
    NotFound,
    LookupFailed,
    PriceMissing,
    PriceAboveCeiling,
    MarketCapMissing,
    MarketCapBelowFloor,
    SectorMismatch,
    GrowthScoreTooLow,
}

impl RejectReason {
    pub fn describe(&self) -> &'static str {
        match self {
            RejectReason::TooFewMentions => "too few mentions",
            RejectReason::SentimentAtOrBelowFloor => "sentiment at or below floor",
            RejectReason::NotFound => "no market data",
            RejectReason::LookupFailed => "market data lookup failed",
            RejectReason::PriceMissing => "price missing",
            RejectReason::PriceAboveCeiling => "price above ceiling",
            RejectReason::MarketCapMissing => "market cap missing",
            RejectReason::MarketCapBelowFloor => "market cap below floor",
            RejectReason::SectorMismatch => "sector mismatch",
            RejectReason::GrowthScoreTooLow => "growth score too low",
        }
    }

    /// Rejected before any market data was requested
    pub fn is_pre_lookup(&self) -> bool {
        matches!(
            self,
            RejectReason::TooFewMentions | RejectReason::SentimentAtOrBelowFloor
        )
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A symbol the gate turned away
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    pub symbol: Symbol,
    pub reason: RejectReason,
    pub mentions: usize,
    pub average_sentiment: Option<f64>,
    /// What the lookup returned, when it got that far
    pub snapshot: Option<MarketSnapshot>,
    pub error: Option<String>,
}

/// A symbol that passed every check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub symbol: Symbol,
    pub evidence: Evidence,
    pub snapshot: MarketSnapshot,
    pub average_sentiment: f64,
    pub growth_score: u8,
    /// Highest score the profile's scale allows
    pub max_growth_score: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Accepted(Candidate),
    Rejected(Rejection),
}

/// Accepted candidates and rejections, both in symbol order
#[derive(Debug, Clone, Default)]
pub struct GateOutcome {
    pub accepted: Vec<Candidate>,
    pub rejected: Vec<Rejection>,
}

impl GateOutcome {
    pub fn rejections_by_reason(&self) -> BTreeMap<RejectReason, usize> {
        let mut counts = BTreeMap::new();
        for rejection in &self.rejected {
            *counts.entry(rejection.reason).or_default() += 1;
        }
        counts
    }
}

/// Growth points for `snapshot` on the given scale
pub fn growth_score(scoring: GrowthScoring, snapshot: &MarketSnapshot) -> u8 {
    let (growth_floor, growth_points, peg_ceiling, peg_points) = match scoring {
        GrowthScoring::Standard => (0.1, 2, 1.5, 1),
        GrowthScoring::Sector => (0.15, 3, 1.2, 2),
    };

    let mut score = 0;
    if snapshot.revenue_growth.is_some_and(|g| g > growth_floor) {
        score += growth_points;
    }
    if snapshot.earnings_growth.is_some_and(|g| g > growth_floor) {
        score += growth_points;
    }
    if snapshot.peg_ratio.is_some_and(|peg| peg > 0.0 && peg < peg_ceiling) {
        score += peg_points;
    }
    score.min(scoring.max_score())
}

/// Mentions `evidence` needs under `profile`
///
/// Evidence with at least one news mention uses the news minimum;
/// social-only evidence must also meet the social minimum.
pub fn required_mentions(profile: &ScanProfile, evidence: &Evidence) -> usize {
    if evidence.is_social_only() {
        profile.min_mentions.max(profile.min_social_mentions)
    } else {
        profile.min_mentions
    }
}

/// Apply the profile's market thresholds, returning the growth score
pub fn check_snapshot(
    profile: &ScanProfile,
    snapshot: &MarketSnapshot,
) -> std::result::Result<u8, RejectReason> {
    let price = snapshot
        .price
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or(RejectReason::PriceMissing)?;
    if price > profile.price_ceiling {
        return Err(RejectReason::PriceAboveCeiling);
    }

    let market_cap = snapshot
        .market_cap
        .filter(|c| c.is_finite())
        .ok_or(RejectReason::MarketCapMissing)?;
    if market_cap < profile.market_cap_floor {
        return Err(RejectReason::MarketCapBelowFloor);
    }

    if let Some(wanted) = &profile.sector {
        let matches = snapshot
            .sector
            .as_deref()
            .is_some_and(|sector| sector.trim().eq_ignore_ascii_case(wanted.trim()));
        if !matches {
            return Err(RejectReason::SectorMismatch);
        }
    }

    let score = growth_score(profile.growth_scoring, snapshot);
    if profile.min_growth_score.is_some_and(|min| score < min) {
        return Err(RejectReason::GrowthScoreTooLow);
    }

    Ok(score)
}

/// Applies one profile against a market data provider
pub struct EnrichmentGate {
    profile: ScanProfile,
    provider: Arc<dyn MarketDataProvider>,
}

impl EnrichmentGate {
    pub fn new(profile: ScanProfile, provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { profile, provider }
    }

    pub fn profile(&self) -> &ScanProfile {
        &self.profile
    }

    /// Decide one symbol
    pub async fn evaluate(&self, symbol: &Symbol, evidence: &Evidence) -> GateDecision {
        let average_sentiment = evidence.average_sentiment();
        let reject = |reason: RejectReason, snapshot: Option<MarketSnapshot>, error: Option<String>| {
            debug!(%symbol, %reason, "Rejected");
            GateDecision::Rejected(Rejection {
                symbol: symbol.clone(),
                reason,
                mentions: evidence.mentions,
                average_sentiment,
                snapshot,
                error,
            })
        };

        if evidence.mentions < required_mentions(&self.profile, evidence) {
            return reject(RejectReason::TooFewMentions, None, None);
        }
        let Some(sentiment) = average_sentiment.filter(|s| *s > self.profile.sentiment_floor) else {
            return reject(RejectReason::SentimentAtOrBelowFloor, None, None);
        };

        let snapshot = match self.provider.lookup(symbol).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return reject(RejectReason::NotFound, None, None),
            Err(e) => return reject(RejectReason::LookupFailed, None, Some(e.to_string())),
        };

        match check_snapshot(&self.profile, &snapshot) {
            Ok(growth_score) => {
                debug!(%symbol, sentiment, growth_score, "Accepted");
                GateDecision::Accepted(Candidate {
                    symbol: symbol.clone(),
                    evidence: evidence.clone(),
                    snapshot,
                    average_sentiment: sentiment,
                    growth_score,
                    max_growth_score: self.profile.growth_scoring.max_score(),
                })
            }
            Err(reason) => reject(reason, Some(snapshot), None),
        }
    }

    /// Decide every symbol in the map, one lookup at a time
    pub async fn gate_all(&self, evidence: &EvidenceMap) -> GateOutcome {
        let mut outcome = GateOutcome::default();
        for (symbol, evidence) in evidence {
            match self.evaluate(symbol, evidence).await {
                GateDecision::Accepted(candidate) => outcome.accepted.push(candidate),
                GateDecision::Rejected(rejection) => outcome.rejected.push(rejection),
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoutError;
    use crate::ingest::SourceKind;
    use crate::market::MockMarketDataProvider;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn sym(s: &str) -> Symbol {
        s.parse().unwrap()
    }

    fn evidence_from(kinds: &[SourceKind], mentions: usize, average: f64) -> Evidence {
        Evidence {
            mentions,
            sentiment_sum: average * mentions as f64,
            kinds: kinds.iter().copied().collect(),
            ..Evidence::default()
        }
    }

    fn evidence(mentions: usize, average: f64) -> Evidence {
        evidence_from(&[SourceKind::News], mentions, average)
    }

    fn penny(price: f64, cap: f64) -> MarketSnapshot {
        MarketSnapshot::default().with_price(price).with_market_cap(cap)
    }

    #[test]
    fn test_growth_score() {
        let standard = GrowthScoring::Standard;
        assert_eq!(growth_score(standard, &MarketSnapshot::default()), 0);
        assert_eq!(
            growth_score(standard, &MarketSnapshot::default().with_growth(0.2, 0.3, 1.0)),
            5
        );
        assert_eq!(
            growth_score(standard, &MarketSnapshot::default().with_growth(0.1, 0.11, 1.5)),
            2
        );
        assert_eq!(
            growth_score(standard, &MarketSnapshot::default().with_growth(-0.5, 0.0, -2.0)),
            0
        );
    }

    #[test]
    fn test_sector_growth_score() {
        let sector = GrowthScoring::Sector;
        assert_eq!(
            growth_score(sector, &MarketSnapshot::default().with_growth(0.2, 0.3, 1.0)),
            8
        );
        // 12% growth and a 1.3 PEG only count on the standard scale
        let modest = MarketSnapshot::default().with_growth(0.12, 0.12, 1.3);
        assert_eq!(growth_score(sector, &modest), 0);
        assert_eq!(growth_score(GrowthScoring::Standard, &modest), 5);
        assert_eq!(
            growth_score(sector, &MarketSnapshot::default().with_growth(0.16, 0.0, 1.1)),
            5
        );
    }

    #[test]
    fn test_check_snapshot_thresholds() {
        let profile = ScanProfile::penny_news();

        assert_eq!(check_snapshot(&profile, &penny(5.0, 500_000.0)), Ok(0));
        assert_eq!(
            check_snapshot(&profile, &penny(5.01, 1e9)),
            Err(RejectReason::PriceAboveCeiling)
        );
        assert_eq!(
            check_snapshot(&profile, &penny(1.0, 499_999.0)),
            Err(RejectReason::MarketCapBelowFloor)
        );
        assert_eq!(
            check_snapshot(&profile, &MarketSnapshot::default().with_market_cap(1e6)),
            Err(RejectReason::PriceMissing)
        );
        assert_eq!(
            check_snapshot(&profile, &MarketSnapshot::default().with_price(1.0)),
            Err(RejectReason::MarketCapMissing)
        );
    }

    #[test]
    fn test_check_snapshot_growth_and_sector() {
        let growth = ScanProfile::low_price_growth();
        let snapshot = penny(8.0, 50_000_000.0);
        assert_eq!(
            check_snapshot(&growth, &snapshot),
            Err(RejectReason::GrowthScoreTooLow)
        );
        assert_eq!(
            check_snapshot(&growth, &snapshot.clone().with_growth(0.25, 0.0, 3.0)),
            Ok(2)
        );

        let tech = ScanProfile::sector_growth();
        assert_eq!(
            check_snapshot(&tech, &snapshot.clone().with_sector("Technology").with_growth(0.2, 0.0, 2.0)),
            Ok(3)
        );
        assert_eq!(
            check_snapshot(&tech, &snapshot.clone().with_sector("Technology").with_growth(0.12, 0.12, 1.3)),
            Err(RejectReason::GrowthScoreTooLow)
        );

        let biotech = ScanProfile::new("biotech", 10.0, 0.0).with_sector("Healthcare");
        assert_eq!(
            check_snapshot(&biotech, &snapshot.clone().with_sector("HEALTHCARE")),
            Ok(0)
        );
        assert_eq!(
            check_snapshot(&biotech, &snapshot.clone().with_sector("Energy")),
            Err(RejectReason::SectorMismatch)
        );
        assert_eq!(
            check_snapshot(&biotech, &snapshot),
            Err(RejectReason::SectorMismatch)
        );
    }

    #[test]
    fn test_gate_never_accepts_out_of_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..5_000 {
            let profile = ScanProfile::new(
                "random",
                rng.gen_range(0.5..20.0),
                rng.gen_range(0.0..50_000_000.0),
            );
            let snapshot = MarketSnapshot {
                price: rng.gen_bool(0.9).then(|| rng.gen_range(-1.0..25.0)),
                market_cap: rng.gen_bool(0.9).then(|| rng.gen_range(-1e6..1e8)),
                ..MarketSnapshot::default()
            };

            if check_snapshot(&profile, &snapshot).is_ok() {
                let price = snapshot.price.unwrap();
                let cap = snapshot.market_cap.unwrap();
                assert!(price <= profile.price_ceiling, "{price} > {}", profile.price_ceiling);
                assert!(cap >= profile.market_cap_floor, "{cap} < {}", profile.market_cap_floor);
            }
        }
    }

    #[tokio::test]
    async fn test_cheap_checks_skip_lookup() {
        let mut provider = MockMarketDataProvider::new();
        provider.expect_lookup().never();

        let gate = EnrichmentGate::new(ScanProfile::penny_social(), Arc::new(provider));

        let decision = gate.evaluate(&sym("XYZ"), &evidence(1, 0.9)).await;
        assert!(matches!(
            decision,
            GateDecision::Rejected(Rejection { reason: RejectReason::TooFewMentions, .. })
        ));

        let decision = gate.evaluate(&sym("XYZ"), &evidence(3, -0.2)).await;
        assert!(matches!(
            decision,
            GateDecision::Rejected(Rejection {
                reason: RejectReason::SentimentAtOrBelowFloor,
                ..
            })
        ));
    }

    #[test]
    fn test_required_mentions_by_source_kind() {
        let news = ScanProfile::penny_news();
        let social = ScanProfile::penny_social();

        assert_eq!(required_mentions(&news, &evidence_from(&[SourceKind::News], 1, 0.0)), 1);
        assert_eq!(required_mentions(&news, &evidence_from(&[SourceKind::Social], 1, 0.0)), 2);
        assert_eq!(
            required_mentions(&news, &evidence_from(&[SourceKind::News, SourceKind::Social], 2, 0.0)),
            1
        );
        assert_eq!(required_mentions(&social, &evidence_from(&[SourceKind::Social], 2, 0.0)), 2);

        let strict = ScanProfile::new("strict", 5.0, 0.0).with_min_mentions(4);
        assert_eq!(required_mentions(&strict, &evidence_from(&[SourceKind::Social], 1, 0.0)), 4);
    }

    #[tokio::test]
    async fn test_single_social_post_is_not_enough_for_news_profile() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_lookup()
            .times(1)
            .returning(|_| Ok(Some(penny(2.0, 1_000_000.0))));

        let gate = EnrichmentGate::new(ScanProfile::penny_news(), Arc::new(provider));

        let decision = gate
            .evaluate(&sym("ABC"), &evidence_from(&[SourceKind::Social], 1, 0.8))
            .await;
        assert!(matches!(
            decision,
            GateDecision::Rejected(Rejection { reason: RejectReason::TooFewMentions, .. })
        ));

        let decision = gate
            .evaluate(&sym("XYZ"), &evidence_from(&[SourceKind::News], 1, 0.8))
            .await;
        assert!(matches!(decision, GateDecision::Accepted(_)));
    }

    #[tokio::test]
    async fn test_lookup_outcomes() {
        let mut provider = MockMarketDataProvider::new();
        provider.expect_lookup().returning(|symbol| match symbol.as_str() {
            "GOOD" => Ok(Some(
                MarketSnapshot::default()
                    .with_price(2.0)
                    .with_market_cap(3_000_000.0)
                    .with_growth(0.3, 0.3, 0.8),
            )),
            "GONE" => Ok(None),
            "DEAR" => Ok(Some(penny(42.0, 1e9))),
            _ => Err(ScoutError::YahooFinanceError("connection reset".to_string())),
        });

        let gate = EnrichmentGate::new(ScanProfile::penny_news(), Arc::new(provider));
        let mut map = EvidenceMap::new();
        for s in ["GOOD", "GONE", "DEAR", "FAIL"] {
            map.insert(sym(s), evidence(2, 0.5));
        }

        let outcome = gate.gate_all(&map).await;

        assert_eq!(outcome.accepted.len(), 1);
        let candidate = &outcome.accepted[0];
        assert_eq!(candidate.symbol, sym("GOOD"));
        assert_eq!(candidate.growth_score, 5);
        assert_eq!(candidate.max_growth_score, 5);
        assert!((candidate.average_sentiment - 0.5).abs() < 1e-12);

        let reasons = outcome.rejections_by_reason();
        assert_eq!(reasons[&RejectReason::NotFound], 1);
        assert_eq!(reasons[&RejectReason::PriceAboveCeiling], 1);
        assert_eq!(reasons[&RejectReason::LookupFailed], 1);

        let failed = outcome
            .rejected
            .iter()
            .find(|r| r.reason == RejectReason::LookupFailed)
            .unwrap();
        assert!(failed.error.as_deref().unwrap().contains("connection reset"));

        let dear = outcome.rejected.iter().find(|r| r.symbol == sym("DEAR")).unwrap();
        assert_eq!(dear.snapshot.as_ref().and_then(|s| s.price), Some(42.0));
    }
}
