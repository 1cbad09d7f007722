//! Breach list index
//!
//! Holds the set of known-breached passwords and answers exact-match
//! lookups.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BreachListError {
    #[error("Breach list file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read breach list file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Breach list is not a flat JSON array of strings: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Whether a password appeared in the loaded breach list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreachStatus {
    pub is_breached: bool,
}

/// Set of known-breached passwords, keyed by lowercased string.
///
/// An empty index is valid and reports every password as not breached:
/// breach checking degrades gracefully, it never fails an evaluation.
/// The index is immutable after construction; a reload builds a new
/// instance and the caller swaps the reference.
#[derive(Debug, Clone, Default)]
pub struct BreachIndex {
    entries: HashSet<String>,
}

impl BreachIndex {
    /// Builds an index from raw entries, lowercasing each one.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|entry| entry.as_ref().to_lowercase())
            .collect();
        Self { entries }
    }

    /// Loads a breach list from a flat JSON array of strings.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File does not exist
    /// - File cannot be read
    /// - File is not a JSON array of strings
    ///
    /// An empty array is not an error; it yields the empty index.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, BreachListError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BreachListError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let raw: Vec<String> = serde_json::from_str(&content)?;
        let index = Self::from_entries(raw);

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Breach index loaded: {} entries from {}",
            index.len(),
            path.display()
        );

        Ok(index)
    }

    /// Checks if a password is in the breach list.
    ///
    /// Returns `true` iff the lowercased input exactly matches an entry.
    /// No partial, substring or fuzzy matching.
    pub fn contains(&self, password: &str) -> bool {
        self.entries.contains(&password.to_lowercase())
    }

    /// Breach status for one password.
    pub fn status(&self, password: &str) -> BreachStatus {
        BreachStatus {
            is_breached: self.contains(password),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Returns the breach list file path.
///
/// Priority:
/// 1. Environment variable `PASSGAUGE_BREACH_PATH`
/// 2. Default path `./assets/breach-top-250.json`
pub fn default_breach_path() -> PathBuf {
    std::env::var("PASSGAUGE_BREACH_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./assets/breach-top-250.json"))
}
