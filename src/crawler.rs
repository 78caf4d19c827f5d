//! Package directory crawler

use std::ffi::OsStr;
use std::fs::{self, DirEntry};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{Error, Result};
use crate::manifest::VersionRules;
use crate::types::{CandidateFile, SIDECAR_SUFFIX, ScanResult};

/// Crawler over a root holding one subdirectory per package
///
/// Only the two levels below the root are visited. Files are filtered
/// against the checksum suffix and the package's current-version rule; the
/// rest become candidates.
#[derive(Debug)]
pub struct Crawler<'a> {
    /// Root directory
    root:          PathBuf,
    /// Current-version rules per package
    rules:         &'a VersionRules,
    /// Number of package directories visited
    package_count: usize,
    /// Number of candidates produced
    file_count:    usize,
    /// Number of files excluded or skipped
    skip_count:    usize,
}

impl<'a> Crawler<'a> {
    /// Create a new crawler for the given root
    ///
    /// # Errors
    /// Returns error if the root is missing or is not a directory.
    pub fn new(root: &Path, rules: &'a VersionRules) -> Result<Self> {
        let meta = fs::metadata(root)
            .map_err(|source| Error::RootUnreadable { path: root.to_path_buf(), source })?;
        if !meta.is_dir() {
            return Err(Error::RootNotDirectory(root.to_path_buf()));
        }

        Ok(Self { root: root.to_path_buf(), rules, package_count: 0, file_count: 0, skip_count: 0 })
    }

    /// Get the current progress of the crawl
    ///
    /// Returns a tuple of:
    /// - Number of package directories visited
    /// - Number of candidates produced
    /// - Number of files excluded or skipped
    #[must_use = "Progress information should be used for monitoring"]
    pub const fn progress(&self) -> (usize, usize, usize) {
        (self.package_count, self.file_count, self.skip_count)
    }

    /// Walk every package directory and collect candidates
    ///
    /// Ages are measured against `now`. Packages and files are visited in
    /// file-name order.
    ///
    /// # Errors
    /// Returns error if:
    /// - The root cannot be listed
    /// - A package directory exists but cannot be listed
    ///
    /// # Panics
    /// Panics if the candidate counter disagrees with the scan result.
    pub fn scan(&mut self, now: SystemTime) -> Result<ScanResult> {
        tracing::debug!(root = %self.root.display(), "scanning packages");
        (self.package_count, self.file_count, self.skip_count) = (0, 0, 0);

        let unreadable = |source| Error::RootUnreadable { path: self.root.clone(), source };
        let mut packages = fs::read_dir(&self.root)
            .map_err(unreadable)?
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(unreadable)?;
        packages.sort_by_key(DirEntry::file_name);

        let mut result = ScanResult::default();

        for entry in packages {
            let path = entry.path();
            // follows symlinks
            match fs::metadata(&path) {
                Ok(meta) if meta.is_dir() => {},
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping root entry");
                    continue;
                },
            }

            let package = entry.file_name().to_string_lossy().into_owned();
            self.scan_package(&package, &path, now, &mut result)?;
        }

        assert_eq!(self.file_count, result.len(), "Candidate count must match scan result");

        tracing::info!(
            packages = self.package_count,
            candidates = self.file_count,
            skipped = self.skip_count,
            total_size = result.total_size,
            "scan complete"
        );

        Ok(result)
    }

    /// Collect candidates from a single package directory
    fn scan_package(
        &mut self,
        package: &str,
        dir: &Path,
        now: SystemTime,
        result: &mut ScanResult,
    ) -> Result<()> {
        let mut files = match fs::read_dir(dir) {
            Ok(entries) => entries.collect::<std::io::Result<Vec<_>>>()?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(package, "package directory vanished during scan");
                return Ok(());
            },
            Err(e) => return Err(e.into()),
        };
        files.sort_by_key(DirEntry::file_name);
        self.package_count += 1;

        for entry in files {
            let name = entry.file_name();
            if self.is_excluded(package, &name) {
                self.skip_count += 1;
                continue;
            }

            match Self::candidate(package, entry.path(), now) {
                Some(candidate) => {
                    tracing::trace!(path = %candidate.path.display(), "candidate");
                    result.push(candidate);
                    self.file_count += 1;
                },
                None => self.skip_count += 1,
            }
        }

        Ok(())
    }

    /// Returns true for checksum sidecars and current-version archives
    fn is_excluded(&self, package: &str, name: &OsStr) -> bool {
        name.to_string_lossy().ends_with(SIDECAR_SUFFIX)
            || self.rules.is_current(package, Path::new(name))
    }

    /// Stat a file into a candidate, or `None` if it is not a regular file
    /// or disappeared since the directory was listed
    fn candidate(package: &str, path: PathBuf, now: SystemTime) -> Option<CandidateFile> {
        let stat = fs::metadata(&path)
            .and_then(|meta| Ok((meta.is_file(), meta.len(), meta.modified()?)));
        let (is_file, size, modified) = match stat {
            Ok(stat) => stat,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                return None;
            },
        };
        if !is_file {
            return None;
        }

        // mtimes in the future count as brand new
        let age = now.duration_since(modified).map_or(0.0, |d| d.as_secs_f64());

        Some(CandidateFile { path, package: package.to_owned(), age, size })
    }
}
