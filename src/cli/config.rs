use crate::config::{self, Config};
use crate::error::Result;
use std::fs;
use std::path::PathBuf;

/// Initialize relnote.toml configuration file
pub fn init(path: Option<PathBuf>) -> Result<()> {
    let config_path = path.unwrap_or_else(|| PathBuf::from("relnote.toml"));

    // Check if file already exists
    if config_path.exists() {
        eprintln!(
            "Configuration file already exists at: {}",
            config_path.display()
        );
        eprintln!("Remove it first if you want to reinitialize.");
        return Ok(());
    }

    // Create default configuration
    let config = Config::default();

    // Create the fragment and output directories if they don't exist
    for dir in &config.fragment_dirs {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
            println!("Created fragment directory: {}", dir.display());
        }
    }

    if !config.output_dir.exists() {
        fs::create_dir_all(&config.output_dir)?;
        println!("Created output directory: {}", config.output_dir.display());
    }

    // Save configuration
    config::save(&config, &config_path)?;

    println!("Configuration file created: {}", config_path.display());
    println!("\nNext steps:");
    println!(
        "1. Edit {} to configure fragment directories and categories",
        config_path.display()
    );
    println!("2. Run 'relnote new --tags bug --tickets 1234' to add a fragment");
    println!("3. Run 'relnote release --version 0.1.0' to cut release notes");

    Ok(())
}
