//! Text and JSON reports
//!
//! An empty result is a normal outcome. It renders the diagnostics instead of
//! a candidate list so the reader can tell "nothing qualified" apart from
//! "nothing was fetched".

use crate::config::{GrowthScoring, ScanProfile};
use crate::evidence::EvidenceMap;
use crate::gate::{Candidate, GateOutcome, RejectReason, growth_score};
use crate::ingest::IngestReport;
use crate::market::MarketSnapshot;
use crate::pipeline::DiscoveryMode;
use crate::sentiment::SentimentLabel;
use crate::symbols::Symbol;
use crate::volume::VolumeScan;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use uuid::Uuid;

/// Longest sample text shown in a report
pub const SAMPLE_DISPLAY_CHARS: usize = 100;

/// Lookup details kept for the empty-result path
pub const LOOKUP_DETAIL_LIMIT: usize = 15;

/// A source that contributed nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSource {
    pub source_id: String,
    pub reason: String,
}

/// Counts describing how a run got to its result
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    pub symbols_seen: usize,
    /// Symbols whose average sentiment is above the profile floor
    pub passing_sentiment: usize,
    pub sources_succeeded: usize,
    pub sources_empty: usize,
    pub sources_failed: usize,
    pub sources_disabled: usize,
    pub rejections_by_reason: BTreeMap<RejectReason, usize>,
    pub skipped: Vec<SkippedSource>,
    pub lookup_details: Vec<String>,
}

impl Diagnostics {
    pub fn collect(
        ingest: &IngestReport,
        evidence: &EvidenceMap,
        gate: &GateOutcome,
        profile: &ScanProfile,
    ) -> Self {
        let passing_sentiment = evidence
            .values()
            .filter_map(|e| e.average_sentiment())
            .filter(|s| *s > profile.sentiment_floor)
            .count();

        let skipped = ingest
            .skipped()
            .map(|(source_id, reason)| SkippedSource {
                source_id: source_id.to_string(),
                reason: reason.to_string(),
            })
            .collect();

        let lookup_details = gate
            .rejected
            .iter()
            .filter(|r| !r.reason.is_pre_lookup())
            .take(LOOKUP_DETAIL_LIMIT)
            .map(|r| match (&r.snapshot, &r.error) {
                (Some(snapshot), _) => format!(
                    "{}: {} (Market Cap: {}) - {}",
                    r.symbol,
                    snapshot.price.map_or_else(|| "N/A".to_string(), format_price),
                    snapshot.market_cap.map_or_else(|| "N/A".to_string(), format_dollars),
                    r.reason
                ),
                (None, Some(error)) => format!("{}: Error - {error}", r.symbol),
                (None, None) => format!("{}: Data unavailable", r.symbol),
            })
            .collect();

        Self {
            symbols_seen: evidence.len(),
            passing_sentiment,
            sources_succeeded: ingest.succeeded(),
            sources_empty: ingest.empty(),
            sources_failed: ingest.failed(),
            sources_disabled: ingest.disabled(),
            rejections_by_reason: gate.rejections_by_reason(),
            skipped,
            lookup_details,
        }
    }

    pub fn total_rejected(&self) -> usize {
        self.rejections_by_reason.values().sum()
    }
}

/// Result of one discovery run
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryReport {
    pub run_id: Uuid,
    pub mode: DiscoveryMode,
    pub profile: String,
    /// Ranked, best first
    pub candidates: Vec<Candidate>,
    pub diagnostics: Diagnostics,
}

impl DiscoveryReport {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Render the human-readable report
    pub fn render(&self) -> String {
        if self.candidates.is_empty() {
            return self.render_empty();
        }

        let mut out = String::new();
        let _ = writeln!(
            out,
            "Discovered {} candidate(s) ({} profile, {} scan):\n",
            self.candidates.len(),
            self.profile,
            self.mode
        );

        for (i, candidate) in self.candidates.iter().enumerate() {
            render_candidate(&mut out, i + 1, candidate);
        }
        out
    }

    fn render_empty(&self) -> String {
        let d = &self.diagnostics;
        let mut out = String::new();

        let _ = writeln!(
            out,
            "No candidates passed the {} profile ({} scan).\n",
            self.profile, self.mode
        );
        let _ = writeln!(out, "Diagnostics:");
        let _ = writeln!(out, "- Total symbols mentioned: {}", d.symbols_seen);
        let _ = writeln!(out, "- Symbols with acceptable sentiment: {}", d.passing_sentiment);
        let _ = writeln!(
            out,
            "- {} sources succeeded, {} returned nothing, {} failed, {} disabled",
            d.sources_succeeded, d.sources_empty, d.sources_failed, d.sources_disabled
        );

        if !d.rejections_by_reason.is_empty() {
            let parts: Vec<String> = d
                .rejections_by_reason
                .iter()
                .map(|(reason, count)| format!("{reason}: {count}"))
                .collect();
            let _ = writeln!(out, "- Rejected {} ({})", d.total_rejected(), parts.join(", "));
        }

        if !d.skipped.is_empty() {
            let _ = writeln!(out, "\nSkipped sources:");
            for skipped in &d.skipped {
                let _ = writeln!(out, "- {}: {}", skipped.source_id, skipped.reason);
            }
        }

        if !d.lookup_details.is_empty() {
            let _ = writeln!(out, "\nLookup details:");
            for detail in &d.lookup_details {
                let _ = writeln!(out, "- {detail}");
            }
        }
        out
    }
}

fn render_candidate(out: &mut String, rank: usize, candidate: &Candidate) {
    let evidence = &candidate.evidence;
    let price = candidate
        .snapshot
        .price
        .map_or_else(|| "N/A".to_string(), format_price);
    let market_cap = candidate
        .snapshot
        .market_cap
        .map_or_else(|| "N/A".to_string(), format_dollars);
    let sources: Vec<&str> = evidence.source_tags.iter().map(String::as_str).collect();
    let corroborated = if evidence.is_corroborated() {
        " [news + social]"
    } else {
        ""
    };

    let _ = writeln!(out, "{rank}. {} - {price}", candidate.symbol);
    let _ = writeln!(
        out,
        "   Market Cap: {market_cap} | Mentions: {}",
        evidence.mentions
    );
    let _ = writeln!(
        out,
        "   Sentiment Score: {:.2} ({}) | Growth Score: {}/{}",
        candidate.average_sentiment,
        SentimentLabel::from_score(candidate.average_sentiment).name(),
        candidate.growth_score,
        candidate.max_growth_score
    );
    let _ = writeln!(out, "   Sources: {}{corroborated}", sources.join(", "));

    if !evidence.samples.is_empty() {
        let _ = writeln!(out, "   Recent Mentions:");
        for text in evidence.sample_texts() {
            let _ = writeln!(out, "   • {}", truncate_chars(text, SAMPLE_DISPLAY_CHARS));
        }
    }
    out.push('\n');
}

/// Volume-spike scan result
#[derive(Debug, Clone, Serialize)]
pub struct VolumeSpikeReport {
    pub run_id: Uuid,
    pub ratio_threshold: f64,
    pub scan: VolumeScan,
}

impl VolumeSpikeReport {
    pub fn new(scan: VolumeScan, ratio_threshold: f64) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            ratio_threshold,
            scan,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        if self.scan.spikes.is_empty() {
            let _ = writeln!(
                out,
                "No significant volume spikes detected in monitored stocks ({} scanned, threshold {:.1}x).",
                self.scan.scanned, self.ratio_threshold
            );
        } else {
            let _ = writeln!(out, "Stocks with unusual volume spikes:\n");
            for (i, spike) in self.scan.spikes.iter().enumerate() {
                let _ = writeln!(out, "{}. {} - {}", i + 1, spike.symbol, format_price(spike.price));
                let _ = writeln!(out, "   Volume: {:.1}x average", spike.volume_ratio);
                let _ = writeln!(out, "   Price Change: {}", format_price(spike.price_change));
                let _ = writeln!(
                    out,
                    "   Current Volume: {}\n",
                    format_thousands(spike.current_volume as f64)
                );
            }
        }

        if !self.scan.skipped.is_empty() {
            let _ = writeln!(out, "\nSkipped:");
            for (symbol, reason) in &self.scan.skipped {
                let _ = writeln!(out, "- {symbol}: {reason}");
            }
        }
        out
    }
}

/// Snapshot of a single ticker
#[derive(Debug, Clone, Serialize)]
pub struct QuoteReport {
    pub symbol: Symbol,
    /// `None` when the provider does not know the symbol
    pub snapshot: Option<MarketSnapshot>,
    /// Standard-scale growth score, when a snapshot was found
    pub growth_score: Option<u8>,
}

impl QuoteReport {
    pub fn new(symbol: Symbol, snapshot: Option<MarketSnapshot>) -> Self {
        let growth_score = snapshot
            .as_ref()
            .map(|s| growth_score(GrowthScoring::Standard, s));
        Self {
            symbol,
            snapshot,
            growth_score,
        }
    }

    pub fn render(&self) -> String {
        let Some(snapshot) = self.snapshot.as_ref().filter(|s| s.price.is_some()) else {
            return format!(
                "Could not fetch price for {}. Please check the symbol.",
                self.symbol
            );
        };

        let na = || "N/A".to_string();
        let mut out = String::new();
        let _ = writeln!(out, "Stock: {}", self.symbol);
        let _ = writeln!(out, "Price: {}", snapshot.price.map_or_else(na, format_price));
        let _ = writeln!(
            out,
            "Market Cap: {}",
            snapshot.market_cap.map_or_else(na, format_dollars)
        );
        let _ = writeln!(out, "Sector: {}", snapshot.sector.clone().unwrap_or_else(na));
        let _ = writeln!(
            out,
            "Revenue Growth: {}",
            snapshot.revenue_growth.map_or_else(na, format_percent)
        );
        let _ = writeln!(
            out,
            "Earnings Growth: {}",
            snapshot.earnings_growth.map_or_else(na, format_percent)
        );
        let _ = writeln!(
            out,
            "PEG Ratio: {}",
            snapshot.peg_ratio.map_or_else(na, |p| format!("{p:.2}"))
        );
        if let Some(score) = self.growth_score {
            let _ = writeln!(
                out,
                "Growth Score: {score}/{}",
                GrowthScoring::Standard.max_score()
            );
        }
        out
    }
}

/// `$1.23`, `-$0.50`
pub fn format_price(value: f64) -> String {
    let cents = (value * 100.0).round() / 100.0;
    if cents < 0.0 {
        format!("-${:.2}", -cents)
    } else {
        format!("${:.2}", cents.abs())
    }
}

/// `$12,345,678`
pub fn format_dollars(value: f64) -> String {
    if value.round() < 0.0 {
        format!("-${}", format_thousands(-value))
    } else {
        format!("${}", format_thousands(value))
    }
}

/// A fraction as a percentage: `0.213` is `21.30%`
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Whole number with comma separators
pub fn format_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Cut `text` to `max` characters, marking the cut with `...`
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::{Evidence, Sample};
    use crate::gate::Rejection;
    use crate::ingest::{SkipReason, SourceKind, SourceOutcome, UnitSeq};
    use crate::market::MarketSnapshot;
    use crate::volume::{VolumeSkipReason, VolumeSpike};
    use std::time::Duration;

    fn candidate() -> Candidate {
        let long = format!("XYZ surges {}", "x".repeat(150));
        Candidate {
            symbol: "XYZ".parse().unwrap(),
            evidence: Evidence {
                mentions: 2,
                sentiment_sum: 1.2,
                samples: vec![
                    Sample {
                        seq: UnitSeq {
                            source_index: 0,
                            item_index: 0,
                        },
                        text: "XYZ surges on earnings beat".to_string(),
                    },
                    Sample {
                        seq: UnitSeq {
                            source_index: 1,
                            item_index: 0,
                        },
                        text: long,
                    },
                ],
                source_tags: ["CNBC".to_string(), "twitter:penny stocks".to_string()].into(),
                kinds: [SourceKind::News, SourceKind::Social].into(),
            },
            snapshot: MarketSnapshot::default()
                .with_price(2.345)
                .with_market_cap(12_345_678.0),
            average_sentiment: 0.6,
            growth_score: 3,
            max_growth_score: 5,
        }
    }

    fn report(candidates: Vec<Candidate>, diagnostics: Diagnostics) -> DiscoveryReport {
        DiscoveryReport {
            run_id: Uuid::nil(),
            mode: DiscoveryMode::Combined,
            profile: "penny_news".to_string(),
            candidates,
            diagnostics,
        }
    }

    #[test]
    fn test_render_candidates() {
        let text = report(vec![candidate()], Diagnostics::default()).render();

        assert!(text.starts_with("Discovered 1 candidate(s) (penny_news profile, combined scan):"));
        assert!(text.contains("1. XYZ - $2.35"));
        assert!(text.contains("Market Cap: $12,345,678 | Mentions: 2"));
        assert!(text.contains("Sentiment Score: 0.60 (Very Positive) | Growth Score: 3/5"));
        assert!(text.contains("Sources: CNBC, twitter:penny stocks [news + social]"));
        assert!(text.contains("• XYZ surges on earnings beat"));

        let long_line = text.lines().find(|l| l.contains("xxxx")).unwrap();
        assert!(long_line.ends_with("..."));
        assert_eq!(long_line.trim_start_matches("   • ").chars().count(), 103);
    }

    #[test]
    fn test_render_empty_diagnostics() {
        let ingest = IngestReport {
            outcomes: vec![
                SourceOutcome::Skipped {
                    source_id: "CNBC".to_string(),
                    reason: SkipReason::TimedOut(Duration::from_millis(10_000)),
                },
                SourceOutcome::Empty {
                    source_id: "Bloomberg".to_string(),
                },
            ],
            units: Vec::new(),
        };
        let mut evidence = EvidenceMap::new();
        evidence.insert(
            "XYZ".parse().unwrap(),
            Evidence {
                mentions: 1,
                sentiment_sum: 0.5,
                ..Evidence::default()
            },
        );
        let gate = GateOutcome {
            accepted: Vec::new(),
            rejected: vec![Rejection {
                symbol: "XYZ".parse().unwrap(),
                reason: RejectReason::PriceAboveCeiling,
                mentions: 1,
                average_sentiment: Some(0.5),
                snapshot: Some(MarketSnapshot::default().with_price(12.0)),
                error: None,
            }],
        };

        let diagnostics = Diagnostics::collect(&ingest, &evidence, &gate, &ScanProfile::penny_news());
        let text = report(Vec::new(), diagnostics).render();

        assert!(text.contains("No candidates passed the penny_news profile"));
        assert!(text.contains("- Total symbols mentioned: 1"));
        assert!(text.contains("- Symbols with acceptable sentiment: 1"));
        assert!(text.contains("0 sources succeeded, 1 returned nothing, 1 failed, 0 disabled"));
        assert!(text.contains("- Rejected 1 (price above ceiling: 1)"));
        assert!(text.contains("- CNBC: timed out after 10000ms"));
        assert!(text.contains("- XYZ: $12.00 (Market Cap: N/A) - price above ceiling"));
    }

    #[test]
    fn test_report_serializes() {
        let json = serde_json::to_value(report(vec![candidate()], Diagnostics::default())).unwrap();
        assert_eq!(json["mode"], "combined");
        assert_eq!(json["candidates"][0]["symbol"], "XYZ");
        assert_eq!(json["candidates"][0]["evidence"]["mentions"], 2);
    }

    #[test]
    fn test_render_volume_spikes() {
        let scan = VolumeScan {
            spikes: vec![VolumeSpike {
                symbol: "GME".parse().unwrap(),
                price: 10.5,
                volume_ratio: 5.0,
                price_change: -0.25,
                current_volume: 1_234_567,
                average_volume: 246_913.4,
            }],
            skipped: vec![(
                "HEXO".parse().unwrap(),
                VolumeSkipReason::FetchFailed("no data".to_string()),
            )],
            scanned: 10,
        };
        let text = VolumeSpikeReport::new(scan, 2.0).render();

        assert!(text.contains("1. GME - $10.50"));
        assert!(text.contains("Volume: 5.0x average"));
        assert!(text.contains("Price Change: -$0.25"));
        assert!(text.contains("Current Volume: 1,234,567"));
        assert!(text.contains("- HEXO: fetch failed: no data"));
    }

    #[test]
    fn test_render_no_volume_spikes() {
        let scan = VolumeScan {
            scanned: 10,
            ..VolumeScan::default()
        };
        let text = VolumeSpikeReport::new(scan, 2.0).render();
        assert!(text.starts_with("No significant volume spikes detected"));
        assert!(text.contains("10 scanned"));
    }

    #[test]
    fn test_formatting_helpers() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(500_000.0), "500,000");
        assert_eq!(format_dollars(1_234_567.4), "$1,234,567");
        assert_eq!(format_price(0.5), "$0.50");
        assert_eq!(format_price(-0.25), "-$0.25");
        assert_eq!(format_price(-0.001), "$0.00");
        assert_eq!(format_dollars(-0.4), "$0");
        assert_eq!(format_percent(0.213), "21.30%");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_render_quote() {
        let snapshot = MarketSnapshot::default()
            .with_price(2.345)
            .with_market_cap(12_345_678.0)
            .with_sector("Technology")
            .with_growth(0.213, 0.05, 0.9);
        let quote = QuoteReport::new("XYZ".parse().unwrap(), Some(snapshot));

        assert_eq!(quote.growth_score, Some(3));
        let text = quote.render();
        assert!(text.starts_with("Stock: XYZ\nPrice: $2.35\n"));
        assert!(text.contains("Market Cap: $12,345,678"));
        assert!(text.contains("Sector: Technology"));
        assert!(text.contains("Revenue Growth: 21.30%"));
        assert!(text.contains("Earnings Growth: 5.00%"));
        assert!(text.contains("PEG Ratio: 0.90"));
        assert!(text.contains("Growth Score: 3/5"));
    }

    #[test]
    fn test_render_quote_missing_fields() {
        let quote = QuoteReport::new(
            "ABC".parse().unwrap(),
            Some(MarketSnapshot::default().with_price(0.5)),
        );
        let text = quote.render();
        assert!(text.contains("Market Cap: N/A"));
        assert!(text.contains("Sector: N/A"));
        assert!(text.contains("PEG Ratio: N/A"));

        let missing = QuoteReport::new("ABC".parse().unwrap(), None);
        assert_eq!(missing.growth_score, None);
        assert_eq!(
            missing.render(),
            "Could not fetch price for ABC. Please check the symbol."
        );
    }
}
