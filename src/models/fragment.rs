use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::Category;

/// Indicates whether an item is new, modified, or unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    New,
    Modified,
    Unchanged,
}

// ============================================================================
// Fragment Models
// ============================================================================

/// A single `.. change::` directive parsed from a fragment file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    /// Source fragment file path
    pub file: PathBuf,
    /// Position of the directive within its file (0-based)
    pub index: usize,
    /// Category labels from the `:tags:` field, lowercased
    pub tags: Vec<String>,
    /// Ticket numbers from the `:tickets:` field
    pub tickets: Vec<u64>,
    /// Prose description, paragraphs separated by blank lines
    pub body: String,
    /// Whether this fragment is new, modified, or unchanged since last run
    pub change: ChangeKind,
}

impl Fragment {
    /// The first configured category appearing in this fragment's tags
    pub fn category<'a>(&self, categories: &'a [Category]) -> Option<&'a Category> {
        categories
            .iter()
            .find(|c| self.tags.iter().any(|t| *t == c.tag))
    }

    /// The first tag that is not a category name, e.g. "orm" in "bug, orm"
    pub fn subsystem(&self, categories: &[Category]) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| !categories.iter().any(|c| c.tag == **t))
            .map(|t| t.as_str())
    }

    /// Sort key for deterministic rendering: first ticket, then file path
    pub fn sort_key(&self) -> (u64, &PathBuf, usize) {
        let ticket = self.tickets.first().copied().unwrap_or(u64::MAX);
        (ticket, &self.file, self.index)
    }
}

// ============================================================================
// Commit Models
// ============================================================================

/// A commit made since the last release
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// Short commit hash (7 characters)
    pub hash: String,
    /// Commit message (first line)
    pub message: String,
    /// Commit author name
    pub author: String,
    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Release Document Models
// ============================================================================

/// A release-notes document previously written to the output directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseDoc {
    /// Path to the document
    pub path: PathBuf,
    /// Version parsed from the file name
    pub version: String,
    /// Ticket numbers referenced by the document
    pub tickets: Vec<u64>,
}
