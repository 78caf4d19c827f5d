//! Error types for `evict`

use std::path::PathBuf;

use arrayvec::ArrayString;
use thiserror::Error;

/// Maximum length of error messages
pub const MAX_ERROR_LENGTH: usize = 256;

/// Custom result type for `evict` operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for `evict`
///
/// Every variant is fatal for a run. Per-file races during the scan are not
/// errors and never surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// IO operation failed
    #[error("Error: {0}")]
    Io(#[from] std::io::Error),

    /// Root directory is missing or cannot be listed
    #[error("Error: Cannot read root directory {}: {source}", .path.display())]
    RootUnreadable {
        /// Root directory that was requested
        path:   PathBuf,
        /// Underlying failure
        source: std::io::Error,
    },

    /// Root path exists but is not a directory
    #[error("Error: Not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    /// Version manifest cannot be opened or read
    #[error("Error: Cannot read version manifest {}: {source}", .path.display())]
    ManifestUnreadable {
        /// Manifest file that was requested
        path:   PathBuf,
        /// Underlying failure
        source: std::io::Error,
    },

    /// Manifest line is not a `name version` pair
    #[error("Error: Malformed manifest line {line}: {content:?}")]
    ManifestLine {
        /// 1-based line number
        line:    usize,
        /// Offending line, truncated to `MAX_ERROR_LENGTH`
        content: Box<ArrayString<MAX_ERROR_LENGTH>>,
    },

    /// A current-version pattern failed to compile
    #[error("Error: Invalid version pattern: {0}")]
    InvalidPattern(Box<ArrayString<MAX_ERROR_LENGTH>>),
}

/// Copy `msg` into a bounded buffer, truncating on a character boundary
fn bounded(msg: &str) -> Box<ArrayString<MAX_ERROR_LENGTH>> {
    let mut buf = ArrayString::new();
    for ch in msg.chars() {
        if buf.try_push(ch).is_err() {
            break;
        }
    }
    Box::new(buf)
}

impl Error {
    /// Create a malformed-manifest-line error
    #[must_use]
    pub fn manifest_line(line: usize, content: &str) -> Self {
        Self::ManifestLine { line, content: bounded(content) }
    }

    /// Create an invalid-pattern error
    #[must_use]
    pub fn invalid_pattern(msg: &str) -> Self {
        Self::InvalidPattern(bounded(msg))
    }

    /// Get a user-friendly error message with action items
    #[must_use]
    pub fn user_message(&self) -> String {
        let tip = match self {
            Self::Io(_) => "Check file permissions and try again",
            Self::RootUnreadable { .. } | Self::RootNotDirectory(_) => {
                "Pass the directory holding one subdirectory per package"
            },
            Self::ManifestUnreadable { .. } => {
                "Pass the version manifest as the second argument (default: current_versions.txt)"
            },
            Self::ManifestLine { .. } => {
                "Each manifest line must be exactly `name version`, separated by whitespace"
            },
            Self::InvalidPattern(_) => "Check the package name and version in the manifest",
        };
        format!("{self}\nTip: {tip}")
    }
}
