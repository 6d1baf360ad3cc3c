use std::fs;
use std::path::PathBuf;

use crate::config;
use crate::error::{RelnoteError, Result};

/// Create a new changelog fragment skeleton
pub fn run(
    config_path: Option<PathBuf>,
    tags: String,
    tickets: Option<String>,
    name: Option<String>,
) -> Result<()> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from("relnote.toml"));

    // Load configuration
    let config = config::load(&config_path)?;

    let dir = config.fragment_dirs.first().ok_or_else(|| {
        RelnoteError::Config("No fragment directory configured".to_string())
    })?;

    // Parse ticket numbers
    let tickets = parse_ticket_args(tickets.as_deref())?;

    // Normalize tags for the skeleton
    let tags: Vec<String> = tags
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    if tags.is_empty() {
        return Err(RelnoteError::Config(
            "At least one tag is required, e.g. --tags bug,orm".to_string(),
        ));
    }

    if !tags.iter().any(|t| config.category(t).is_some()) {
        eprintln!(
            "Warning: No tag matches a configured category; the entry will render under Miscellaneous."
        );
    }

    // Pick a file name: explicit --name, or <first-ticket>.rst
    let file_name = match name {
        Some(name) if name.ends_with(".rst") => name,
        Some(name) => format!("{}.rst", name),
        None => match tickets.first() {
            Some(ticket) => format!("{}.rst", ticket),
            None => {
                return Err(RelnoteError::Config(
                    "Provide --tickets or --name to name the fragment file".to_string(),
                ));
            }
        },
    };

    let path = dir.join(file_name);

    if path.exists() {
        return Err(RelnoteError::Config(format!(
            "Fragment already exists: {}",
            path.display()
        )));
    }

    fs::create_dir_all(dir)?;
    fs::write(&path, skeleton(&tags, &tickets))?;

    println!("Fragment created: {}", path.display());
    println!("Edit it to describe the change.");

    Ok(())
}

/// Parse a comma-separated ticket list argument
fn parse_ticket_args(tickets: Option<&str>) -> Result<Vec<u64>> {
    let Some(tickets) = tickets else {
        return Ok(Vec::new());
    };

    tickets
        .split(',')
        .map(|t| t.trim().trim_start_matches('#'))
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<u64>()
                .map_err(|_| RelnoteError::Config(format!("Invalid ticket number: {}", t)))
        })
        .collect()
}

/// Render the fragment skeleton content
fn skeleton(tags: &[String], tickets: &[u64]) -> String {
    let mut content = String::from(".. change::\n");
    content.push_str(&format!("    :tags: {}\n", tags.join(", ")));

    if !tickets.is_empty() {
        let tickets: Vec<String> = tickets.iter().map(|t| t.to_string()).collect();
        content.push_str(&format!("    :tickets: {}\n", tickets.join(", ")));
    }

    content.push_str("\n    Describe the change here.\n");
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ticket_args() {
        assert_eq!(parse_ticket_args(None).unwrap(), Vec::<u64>::new());
        assert_eq!(parse_ticket_args(Some("5441")).unwrap(), vec![5441]);
        assert_eq!(
            parse_ticket_args(Some("#5441, 5444")).unwrap(),
            vec![5441, 5444]
        );
        assert!(parse_ticket_args(Some("abc")).is_err());
    }

    #[test]
    fn test_skeleton_with_tickets() {
        let content = skeleton(
            &["bug".to_string(), "orm".to_string()],
            &[5441],
        );

        assert!(content.starts_with(".. change::\n"));
        assert!(content.contains("    :tags: bug, orm\n"));
        assert!(content.contains("    :tickets: 5441\n"));
        assert!(content.contains("    Describe the change here.\n"));
    }

    #[test]
    fn test_skeleton_without_tickets() {
        let content = skeleton(&["change".to_string()], &[]);
        assert!(!content.contains(":tickets:"));
    }
}
