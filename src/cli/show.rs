use std::fs;
use std::path::PathBuf;

use crate::collectors::ReleaseCollector;
use crate::config;
use crate::error::{RelnoteError, Result};

/// Display the most recent release document
pub fn latest(config_path: Option<PathBuf>) -> Result<()> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from("relnote.toml"));

    // Load configuration
    let config = config::load(&config_path)?;

    // Find the highest released version
    let doc = ReleaseCollector::new(&config).latest()?.ok_or_else(|| {
        RelnoteError::Config(
            "No release documents found. Run 'relnote release' first.".to_string(),
        )
    })?;

    // Read and display
    let content = fs::read_to_string(&doc.path)?;
    crate::display::print_markdown(&content);

    Ok(())
}
