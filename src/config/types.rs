use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Relnote configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directories containing unreleased changelog fragments
    pub fragment_dirs: Vec<PathBuf>,

    /// Directory where release-notes documents are written
    pub output_dir: PathBuf,

    /// Path to state file for tracking fragment changes between runs
    pub state_file: PathBuf,

    /// Git repository consulted for commits since the last release
    pub repo: PathBuf,

    /// URL template for ticket links, with an `{id}` placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_url: Option<String>,

    /// Ordered category sections for rendered release notes
    pub categories: Vec<Category>,

    /// Collection limits
    pub limits: Limits,

    /// Display settings
    pub display: Display,
}

/// A changelog category: the tag that selects it and the section title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Tag value as written in `:tags:` fields
    pub tag: String,

    /// Section title in rendered release notes
    pub title: String,
}

/// Limits for data collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum commits listed in the status report
    pub max_commits: usize,

    /// Maximum characters per fragment body before the linter warns
    pub max_chars_per_item: usize,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Display {
    /// Show author names on commits in the status report
    pub show_authors: bool,

    /// Annotate rendered entries with their source fragment file
    pub show_source_files: bool,
}

impl Config {
    /// Look up a category by tag
    pub fn category(&self, tag: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.tag == tag)
    }
}

impl Category {
    fn new(tag: &str, title: &str) -> Self {
        Self {
            tag: tag.to_string(),
            title: title.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fragment_dirs: vec![PathBuf::from("./changes")],
            output_dir: PathBuf::from("./releases"),
            state_file: PathBuf::from("./.relnote-state.json"),
            repo: PathBuf::from("."),
            ticket_url: None,
            categories: vec![
                Category::new("feature", "New Features"),
                Category::new("usecase", "Use Case Additions"),
                Category::new("bug", "Bug Fixes"),
                Category::new("change", "Behavioral Changes"),
                Category::new("misc", "Miscellaneous"),
            ],
            limits: Limits::default(),
            display: Display::default(),
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_commits: 50,
            max_chars_per_item: 2000,
        }
    }
}

impl Default for Display {
    fn default() -> Self {
        Self {
            show_authors: true,
            show_source_files: false,
        }
    }
}
