//! Eviction planning

use std::path::{Path, PathBuf};

use crate::types::SIDECAR_SUFFIX;
use crate::weight::ScoredCandidate;

/// What a plan entry removes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// An archive chosen for eviction
    Archive,
    /// The checksum sidecar of the archive before it
    Sidecar,
}

/// A single path to delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    /// Path to delete
    pub path: PathBuf,
    /// Archive or sidecar
    pub kind: EntryKind,
}

/// Ordered list of paths to delete, most disposable first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionPlan {
    /// Entries in emission order
    pub entries:        Vec<PlanEntry>,
    /// Total candidate size before eviction
    pub initial_size:   u64,
    /// Total candidate size left after eviction
    pub remaining_size: u64,
    /// Size the candidates were trimmed towards
    pub target_size:    u64,
}

impl EvictionPlan {
    /// Paths in emission order
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|e| e.path.as_path())
    }

    /// Number of archives evicted, sidecars excluded
    #[must_use]
    pub fn archive_count(&self) -> usize {
        self.entries.iter().filter(|e| e.kind == EntryKind::Archive).count()
    }

    /// Bytes of archives evicted, sidecars excluded
    #[must_use]
    pub const fn reclaimed(&self) -> u64 {
        self.initial_size.saturating_sub(self.remaining_size)
    }

    /// Returns true if the remaining size is within the target
    #[must_use]
    pub const fn satisfied(&self) -> bool {
        self.remaining_size <= self.target_size
    }

    /// Returns true if nothing needs to be deleted
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Path of the checksum sidecar for `archive`
#[must_use]
pub fn sidecar_path(archive: &Path) -> PathBuf {
    let mut name = archive.as_os_str().to_os_string();
    name.push(SIDECAR_SUFFIX);
    PathBuf::from(name)
}

/// Plan deletions until the remaining size is at most `target_size`
///
/// `ranked` must be sorted most disposable first. `total_size` is the sum of
/// all candidate sizes. Sidecars are looked up on the filesystem.
#[must_use]
pub fn plan(ranked: &[ScoredCandidate], total_size: u64, target_size: u64) -> EvictionPlan {
    plan_with(ranked, total_size, target_size, Path::is_file)
}

/// Plan deletions with a caller-supplied sidecar existence check
///
/// Each evicted archive is followed by its sidecar when `has_sidecar`
/// reports one. Sidecar sizes do not count towards the total.
#[must_use]
pub fn plan_with<F>(
    ranked: &[ScoredCandidate],
    total_size: u64,
    target_size: u64,
    mut has_sidecar: F,
) -> EvictionPlan
where
    F: FnMut(&Path) -> bool,
{
    let mut entries = Vec::new();
    let mut remaining = total_size;

    for scored in ranked {
        if remaining <= target_size {
            break;
        }

        let archive = &scored.candidate.path;
        entries.push(PlanEntry { path: archive.clone(), kind: EntryKind::Archive });

        let sidecar = sidecar_path(archive);
        if has_sidecar(&sidecar) {
            entries.push(PlanEntry { path: sidecar, kind: EntryKind::Sidecar });
        }

        remaining = remaining.saturating_sub(scored.candidate.size);
    }

    EvictionPlan { entries, initial_size: total_size, remaining_size: remaining, target_size }
}
