//! Run configuration

use std::path::PathBuf;

use crate::types::{DEFAULT_MANIFEST, DEFAULT_TARGET_SIZE};

/// Settings for one eviction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictConfig {
    /// Root directory with one subdirectory per package
    pub root:        PathBuf,
    /// Version manifest listing current `name version` pairs
    pub manifest:    PathBuf,
    /// Size in bytes the remaining candidates are trimmed down to
    pub target_size: u64,
    /// Write per-candidate scoring lines
    pub show_scores: bool,
}

impl Default for EvictConfig {
    fn default() -> Self {
        Self {
            root:        PathBuf::from("."),
            manifest:    PathBuf::from(DEFAULT_MANIFEST),
            target_size: DEFAULT_TARGET_SIZE,
            show_scores: true,
        }
    }
}

/// Parse a byte count with an optional decimal unit
///
/// Accepts `1234`, `500K`, `20M`, `200G`, `1T`, case-insensitive, with an
/// optional trailing `B` (`200GB`).
///
/// # Errors
/// Returns a message if the number is missing, malformed, has an unknown
/// unit, or overflows `u64`.
pub fn parse_size(input: &str) -> Result<u64, String> {
    let s = input.trim();
    let s = s.strip_suffix(&['b', 'B'][..]).unwrap_or(s);

    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, unit) = s.split_at(split);
    if digits.is_empty() {
        return Err(format!("invalid size {input:?}: expected a number of bytes"));
    }

    let multiplier: u64 = match unit.to_ascii_uppercase().as_str() {
        "" => 1,
        "K" => 1_000,
        "M" => 1_000_000,
        "G" => 1_000_000_000,
        "T" => 1_000_000_000_000,
        other => return Err(format!("invalid size {input:?}: unknown unit {other:?}")),
    };

    digits
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .ok_or_else(|| format!("invalid size {input:?}: too large"))
}
