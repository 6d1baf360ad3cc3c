use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::fragment::{ChangeKind, Commit, Fragment};
use crate::config::Category;

/// A versioned release assembled from unreleased fragments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    /// Version string, e.g. "1.4.2"
    pub version: String,
    /// Release date
    pub date: NaiveDate,
    /// When this release document was generated
    pub generated_at: DateTime<Utc>,
    /// Fragments included in this release
    pub fragments: Vec<Fragment>,
}

/// Summary statistics for a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseStats {
    /// Number of change entries
    pub fragment_count: usize,
    /// Number of distinct tickets referenced
    pub ticket_count: usize,
    /// Number of distinct subsystems touched
    pub subsystem_count: usize,
    /// Number of entries matching no configured category
    pub uncategorized_count: usize,
}

impl Release {
    /// Compute summary statistics from the release data
    pub fn stats(&self, categories: &[Category]) -> ReleaseStats {
        let fragment_count = self.fragments.len();

        let tickets: HashSet<u64> = self
            .fragments
            .iter()
            .flat_map(|f| f.tickets.iter().copied())
            .collect();

        let subsystems: HashSet<&str> = self
            .fragments
            .iter()
            .filter_map(|f| f.subsystem(categories))
            .collect();

        let uncategorized_count = self
            .fragments
            .iter()
            .filter(|f| f.category(categories).is_none())
            .count();

        ReleaseStats {
            fragment_count,
            ticket_count: tickets.len(),
            subsystem_count: subsystems.len(),
            uncategorized_count,
        }
    }

    /// Check if there's anything to release
    pub fn has_changes(&self) -> bool {
        !self.fragments.is_empty()
    }
}

/// Unreleased work: pending fragments plus commits since the last release
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    /// When this status was generated
    pub generated_at: DateTime<Utc>,
    /// Unreleased fragments with change markers
    pub fragments: Vec<Fragment>,
    /// Commits on HEAD since the last release
    pub commits: Vec<Commit>,
}

/// Summary statistics for a status report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusStats {
    /// Number of unreleased fragments
    pub fragment_count: usize,
    /// Fragments not seen before
    pub new_count: usize,
    /// Fragments whose content changed since last run
    pub modified_count: usize,
    /// Number of distinct tickets referenced
    pub ticket_count: usize,
    /// Number of commits since the last release
    pub commit_count: usize,
}

impl Status {
    /// Compute summary statistics from the status data
    pub fn stats(&self) -> StatusStats {
        let new_count = self
            .fragments
            .iter()
            .filter(|f| f.change == ChangeKind::New)
            .count();

        let modified_count = self
            .fragments
            .iter()
            .filter(|f| f.change == ChangeKind::Modified)
            .count();

        let tickets: HashSet<u64> = self
            .fragments
            .iter()
            .flat_map(|f| f.tickets.iter().copied())
            .collect();

        StatusStats {
            fragment_count: self.fragments.len(),
            new_count,
            modified_count,
            ticket_count: tickets.len(),
            commit_count: self.commits.len(),
        }
    }

    /// Check if there's any unreleased activity
    pub fn has_activity(&self) -> bool {
        !self.fragments.is_empty() || !self.commits.is_empty()
    }
}
