use chrono::Utc;
use std::path::PathBuf;

use crate::collectors::{CommitCollector, FragmentCollector};
use crate::config;
use crate::error::Result;
use crate::models::Status;
use crate::renderer::Renderer;
use crate::state;

/// Show unreleased fragments and commits since the last release
pub fn run(config_path: Option<PathBuf>) -> Result<()> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from("relnote.toml"));

    // Load configuration
    let config = config::load(&config_path)?;

    // Load state; status never persists it, so change markers stay
    // relative to the last release
    let mut state = state::load(&config.state_file)?;

    let fragments = FragmentCollector::new(&config).collect(&mut state)?;
    let commits = CommitCollector::new(&config).collect(&state)?;

    let status = Status {
        generated_at: Utc::now(),
        fragments,
        commits,
    };

    if !status.has_activity() {
        println!("Nothing unreleased.");
        return Ok(());
    }

    let renderer = Renderer::new(&config);
    let markdown = renderer.render_status(&status);

    crate::display::print_markdown(&markdown);

    Ok(())
}
