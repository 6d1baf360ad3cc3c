use chrono::{Local, NaiveDate, Utc};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use crate::collectors::{release_filename, CommitCollector, FragmentCollector, ReleaseCollector};
use crate::config;
use crate::error::{RelnoteError, Result};
use crate::models::Release;
use crate::renderer::Renderer;
use crate::state::{self, SourceState};

/// Aggregate unreleased fragments into a release document
pub fn run(
    config_path: Option<PathBuf>,
    version: String,
    date: Option<String>,
    dry_run: bool,
    keep: bool,
) -> Result<()> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from("relnote.toml"));

    // Load configuration
    let config = config::load(&config_path)?;

    // Load state
    let mut state = state::load(&config.state_file)?;

    validate_version(&version)?;

    // Parse date (default to today)
    let release_date = if let Some(date_str) = date {
        NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|e| RelnoteError::Release(format!("Invalid date format: {}", e)))?
    } else {
        Local::now().date_naive()
    };

    // Collect fragments
    let collector = FragmentCollector::new(&config);
    let fragments = collector.collect(&mut state)?;

    let release = Release {
        version: version.clone(),
        date: release_date,
        generated_at: Utc::now(),
        fragments,
    };

    if !release.has_changes() {
        println!("No unreleased changes to release.");
        return Ok(());
    }

    // Render to Markdown
    let renderer = Renderer::new(&config);
    let markdown = renderer.render_release(&release);

    if dry_run {
        // Print to stdout with rich terminal formatting (if supported)
        crate::display::print_markdown(&markdown);
        return Ok(());
    }

    // Refuse to overwrite an existing release
    if ReleaseCollector::new(&config).contains_version(&version)? {
        return Err(RelnoteError::Release(format!(
            "Version {} already exists in {}",
            version,
            config.output_dir.display()
        )));
    }

    // Write release document
    if !config.output_dir.exists() {
        fs::create_dir_all(&config.output_dir)?;
    }

    let output_path = config.output_dir.join(release_filename(&version));
    fs::write(&output_path, &markdown)?;

    println!("Release notes written to: {}", output_path.display());

    // Consume fragment files
    if !keep {
        let files: BTreeSet<&PathBuf> = release.fragments.iter().map(|f| &f.file).collect();
        for file in files {
            fs::remove_file(file)?;
            println!("Removed fragment: {}", file.display());
        }

        // Fragment dirs are now empty of released content
        for dir in &config.fragment_dirs {
            state::update_source(
                &mut state,
                dir.to_string_lossy().to_string(),
                SourceState::Fragments {
                    last_checked: Utc::now(),
                    item_hashes: Vec::new(),
                },
            );
        }
    }

    // Record the release boundary for future status reports
    CommitCollector::new(&config).mark_released(&mut state)?;

    // Save state
    state::save(&state, &config.state_file)?;

    Ok(())
}

/// Reject versions that cannot form a file name
fn validate_version(version: &str) -> Result<()> {
    let valid = !version.is_empty()
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(RelnoteError::Release(format!(
            "Invalid version '{}': use digits, letters, dots, dashes",
            version
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_version() {
        assert!(validate_version("1.4.2").is_ok());
        assert!(validate_version("2.0.0-beta1").is_ok());
        assert!(validate_version("").is_err());
        assert!(validate_version("1.0/..").is_err());
        assert!(validate_version("1.0 final").is_err());
    }
}
