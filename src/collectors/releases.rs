use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Result;
use crate::models::ReleaseDoc;

/// Collector for release documents previously written to the output directory
pub struct ReleaseCollector<'a> {
    config: &'a Config,
}

impl<'a> ReleaseCollector<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Collect all release documents, sorted oldest version first
    pub fn collect(&self) -> Result<Vec<ReleaseDoc>> {
        let dir = &self.config.output_dir;

        if !dir.is_dir() {
            // No releases yet
            return Ok(Vec::new());
        }

        let mut docs = Vec::new();

        for entry in WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let Some(version) = version_from_filename(path) else {
                continue;
            };

            let content = match fs::read_to_string(path) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!(
                        "Warning: Skipping release document '{}': {}",
                        path.display(),
                        e
                    );
                    continue;
                }
            };

            docs.push(ReleaseDoc {
                path: path.to_path_buf(),
                version,
                tickets: extract_tickets(&content),
            });
        }

        docs.sort_by(|a, b| version_key(&a.version).cmp(&version_key(&b.version)));

        Ok(docs)
    }

    /// The most recent release document by version
    pub fn latest(&self) -> Result<Option<ReleaseDoc>> {
        Ok(self.collect()?.pop())
    }

    /// Check whether a version has already been released
    pub fn contains_version(&self, version: &str) -> Result<bool> {
        Ok(self.collect()?.iter().any(|d| d.version == version))
    }
}

/// File name for a release document
pub fn release_filename(version: &str) -> String {
    format!("release-{}.md", version)
}

/// Extract the version from a `release-<version>.md` file name
fn version_from_filename(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(".md")?;
    let version = stem.strip_prefix("release-")?;

    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}

/// Ordering key for version strings: dot-separated segments compared
/// numerically, so 1.10.0 sorts after 1.9.2
fn version_key(version: &str) -> (Vec<u64>, String) {
    let segments = version
        .split('.')
        .map(|s| {
            let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u64>().unwrap_or(0)
        })
        .collect();

    (segments, version.to_string())
}

/// Scan rendered Markdown for `#<number>` ticket references
fn extract_tickets(content: &str) -> Vec<u64> {
    let mut tickets = Vec::new();
    let mut rest = content;

    while let Some(pos) = rest.find('#') {
        rest = &rest[pos + 1..];

        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            continue;
        }

        if let Ok(ticket) = digits.parse::<u64>() {
            if !tickets.contains(&ticket) {
                tickets.push(ticket);
            }
        }
        rest = &rest[digits.len()..];
    }

    tickets
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_version_from_filename() {
        assert_eq!(
            version_from_filename(Path::new("release-1.4.2.md")),
            Some("1.4.2".to_string())
        );
        assert_eq!(version_from_filename(Path::new("release-.md")), None);
        assert_eq!(version_from_filename(Path::new("notes.md")), None);
        assert_eq!(version_from_filename(Path::new("release-1.0.txt")), None);
    }

    #[test]
    fn test_version_key_numeric_ordering() {
        assert!(version_key("1.10.0") > version_key("1.9.2"));
        assert!(version_key("2.0.0") > version_key("1.99.99"));
        assert!(version_key("0.2") > version_key("0.1.9"));
        assert!(version_key("1.0.0") < version_key("1.0.1"));
    }

    #[test]
    fn test_extract_tickets() {
        let content = "# Release 1.0.0\n\n- Fixed thing ([#5441](url), #5444)\n- Other #12\n";
        assert_eq!(extract_tickets(content), vec![5441, 5444, 12]);
    }

    #[test]
    fn test_extract_tickets_ignores_headings_and_dedups() {
        let content = "# Release\n\n## Summary\n\n- A #7\n- B #7\n";
        assert_eq!(extract_tickets(content), vec![7]);
    }

    #[test]
    fn test_collect_missing_dir_is_empty() {
        let mut config = Config::default();
        config.output_dir = PathBuf::from("/nonexistent/releases");

        let collector = ReleaseCollector::new(&config);
        assert!(collector.collect().unwrap().is_empty());
        assert!(collector.latest().unwrap().is_none());
    }

    #[test]
    fn test_collect_sorted_and_latest() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("release-1.9.0.md"), "# Release 1.9.0\n#1\n").unwrap();
        fs::write(temp.path().join("release-1.10.0.md"), "# Release 1.10.0\n#2\n").unwrap();
        fs::write(temp.path().join("release-1.2.0.md"), "# Release 1.2.0\n#3\n").unwrap();
        fs::write(temp.path().join("README.md"), "not a release\n").unwrap();

        let mut config = Config::default();
        config.output_dir = temp.path().to_path_buf();

        let collector = ReleaseCollector::new(&config);
        let docs = collector.collect().unwrap();

        let versions: Vec<&str> = docs.iter().map(|d| d.version.as_str()).collect();
        assert_eq!(versions, vec!["1.2.0", "1.9.0", "1.10.0"]);

        let latest = collector.latest().unwrap().unwrap();
        assert_eq!(latest.version, "1.10.0");
        assert_eq!(latest.tickets, vec![2]);

        assert!(collector.contains_version("1.9.0").unwrap());
        assert!(!collector.contains_version("3.0.0").unwrap());
    }
}
