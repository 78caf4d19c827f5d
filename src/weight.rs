//! Weighted age/size scoring and ranking

use std::cmp::Ordering;

use crate::types::{AGE_WEIGHT, CandidateFile, SIZE_WEIGHT, ScanResult};

/// A candidate with its weighted value
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    /// The scored candidate
    pub candidate: CandidateFile,
    /// Weighted value (0.0 to 100.0)
    pub weight:    f64,
}

/// Scores candidates against the maxima of a finished scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weigher {
    /// Greatest age in the scan
    max_age:  f64,
    /// Greatest size in the scan
    max_size: u64,
}

impl Weigher {
    /// Create a weigher from explicit maxima
    #[must_use]
    pub const fn new(max_age: f64, max_size: u64) -> Self {
        Self { max_age, max_size }
    }

    /// Create a weigher from a completed scan
    #[must_use]
    pub const fn from_scan(scan: &ScanResult) -> Self {
        Self::new(scan.max_age, scan.max_size)
    }

    /// Combine an age and a size into a value out of 100
    ///
    /// Each half is the value relative to its maximum. A zero maximum makes
    /// its half zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn weight(&self, age: f64, size: u64) -> f64 {
        let age_term = if self.max_age > 0.0 {
            AGE_WEIGHT * (age / self.max_age)
        } else {
            0.0
        };
        let size_term = if self.max_size > 0 {
            SIZE_WEIGHT * (size as f64 / self.max_size as f64)
        } else {
            0.0
        };
        age_term + size_term
    }

    /// Score a single candidate
    #[must_use]
    pub const fn score(&self, candidate: &CandidateFile) -> f64 {
        self.weight(candidate.age, candidate.size)
    }
}

/// Score every candidate and sort by descending weight
///
/// The sort is stable, so equal weights keep scan order.
#[must_use]
pub fn rank(scan: ScanResult) -> Vec<ScoredCandidate> {
    let weigher = Weigher::from_scan(&scan);

    let mut ranked: Vec<_> = scan
        .candidates
        .into_iter()
        .map(|candidate| ScoredCandidate { weight: weigher.score(&candidate), candidate })
        .collect();

    ranked.sort_by(|a, b| by_weight_desc(a.weight, b.weight));

    ranked
}

fn by_weight_desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}
