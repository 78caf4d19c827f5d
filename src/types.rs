//! Common types and constants for `evict`

use std::path::PathBuf;

/// File name suffix of checksum sidecar files
pub const SIDECAR_SUFFIX: &str = ".rmd160";

/// Default version manifest file name
pub const DEFAULT_MANIFEST: &str = "current_versions.txt";

/// Default size, in bytes, that remaining archives are trimmed down to (200 GB)
pub const DEFAULT_TARGET_SIZE: u64 = 200 * 1_000_000_000;

/// Share of the weighted value contributed by age
pub const AGE_WEIGHT: f64 = 50.0;

/// Share of the weighted value contributed by size
pub const SIZE_WEIGHT: f64 = 50.0;

/// An archive file being considered for deletion
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFile {
    /// Path to the archive
    pub path:    PathBuf,
    /// Package directory the archive was found in
    pub package: String,
    /// Seconds since last modification, relative to scan start
    pub age:     f64,
    /// Size in bytes
    pub size:    u64,
}

/// Everything a completed scan knows about the candidate set
///
/// The maxima are only meaningful once the whole root has been walked, which
/// is why scoring takes a finished `ScanResult` instead of reading counters
/// while the scan is running.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanResult {
    /// Candidates in scan order
    pub candidates: Vec<CandidateFile>,
    /// Greatest age observed
    pub max_age:    f64,
    /// Greatest size observed
    pub max_size:   u64,
    /// Sum of all candidate sizes
    pub total_size: u64,
}

impl ScanResult {
    /// Record a candidate and fold it into the maxima and total
    pub fn push(&mut self, candidate: CandidateFile) {
        if candidate.age > self.max_age {
            self.max_age = candidate.age;
        }
        self.max_size = self.max_size.max(candidate.size);
        self.total_size = self.total_size.saturating_add(candidate.size);
        self.candidates.push(candidate);
    }

    /// Number of candidates
    #[must_use]
    pub const fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns true if the scan found no candidates
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

const _: () = {
    assert!(DEFAULT_TARGET_SIZE > 0);
    assert!(!SIDECAR_SUFFIX.is_empty());
};
