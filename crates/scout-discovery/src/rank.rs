//! Candidate ranking

use crate::gate::Candidate;
use std::cmp::Ordering;

/// Ordering by average sentiment, then mentions, both descending
pub fn compare(a: &Candidate, b: &Candidate) -> Ordering {
    b.average_sentiment
        .total_cmp(&a.average_sentiment)
        .then_with(|| b.evidence.mentions.cmp(&a.evidence.mentions))
}

/// Sort candidates best first and keep the top `top_n`
///
/// The sort is stable: candidates that compare equal keep their input order.
pub fn rank(mut candidates: Vec<Candidate>, top_n: usize) -> Vec<Candidate> {
    candidates.sort_by(compare);
    candidates.truncate(top_n);
    candidates
}
