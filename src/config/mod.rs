//! Configuration module
//!
//! Handles loading and saving of relnote.toml configuration files.
//! Defines Config, Category, Limits, and Display types.

mod types;

#[allow(unused_imports)]
pub use types::{Category, Config, Display, Limits};

use crate::error::{RelnoteError, Result};
use std::fs;
use std::path::Path;

/// Load configuration from a TOML file
pub fn load(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        RelnoteError::Config(format!(
            "Cannot read config from '{}': {}. Run 'relnote config init' to create one.",
            path.display(),
            e
        ))
    })?;

    let config: Config = toml::from_str(&content)?;

    if config.fragment_dirs.is_empty() {
        return Err(RelnoteError::Config(
            "At least one fragment directory must be configured".to_string(),
        ));
    }

    Ok(config)
}

/// Save configuration to a TOML file
pub fn save(config: &Config, path: &Path) -> Result<()> {
    let toml = toml::to_string_pretty(config)
        .map_err(|e| RelnoteError::Config(format!("Failed to serialize config: {}", e)))?;

    // Create parent directories if needed
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, toml)?;
    Ok(())
}
