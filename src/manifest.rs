//! Current-version manifest loading and matching

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Current-version rules, one compiled matcher per package
#[derive(Debug, Default)]
pub struct VersionRules {
    /// Package name to matcher for its current archive file names
    rules: HashMap<String, globset::GlobMatcher>,
}

impl VersionRules {
    /// Load rules from a manifest file
    ///
    /// # Errors
    /// Returns error if:
    /// - The file cannot be read
    /// - Any line is not exactly `name version`
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|source| Error::ManifestUnreadable { path: path.to_path_buf(), source })?;
        let rules = Self::parse(&text)?;
        tracing::debug!(manifest = %path.display(), packages = rules.len(), "loaded version rules");
        Ok(rules)
    }

    /// Parse manifest text of whitespace-separated `name version` pairs
    ///
    /// A later line for the same package replaces the earlier one.
    ///
    /// # Errors
    /// Returns error if a line does not hold exactly two tokens, or if a
    /// pattern fails to compile.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rules = HashMap::new();

        for (idx, line) in text.lines().enumerate() {
            let mut tokens = line.split_whitespace();
            let (Some(name), Some(version), None) = (tokens.next(), tokens.next(), tokens.next())
            else {
                return Err(Error::manifest_line(idx + 1, line));
            };

            rules.insert(name.to_owned(), Self::compile(name, version)?);
        }

        Ok(Self { rules })
    }

    /// Build the matcher for `name-version.` / `name-version+` prefixed file names
    fn compile(name: &str, version: &str) -> Result<globset::GlobMatcher> {
        let pattern = format!("{}-{}[.+]*", globset::escape(name), globset::escape(version));

        let glob = globset::GlobBuilder::new(&pattern)
            .literal_separator(true)
            .backslash_escape(false)
            .build()
            .map_err(|e| Error::invalid_pattern(&e.to_string()))?;

        Ok(glob.compile_matcher())
    }

    /// Returns true if `file_name` is a current archive of `package`
    ///
    /// Packages without a rule have no current archives.
    #[must_use]
    pub fn is_current(&self, package: &str, file_name: &Path) -> bool {
        self.rules.get(package).is_some_and(|glob| glob.is_match(file_name))
    }

    /// Number of packages with a rule
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no package has a rule
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
