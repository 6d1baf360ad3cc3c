use std::collections::HashMap;
use std::path::PathBuf;

use crate::collectors::{FragmentCollector, ReleaseCollector};
use crate::config;
use crate::error::{RelnoteError, Result};
use crate::models::Fragment;

/// Lint all changelog fragments
pub fn run(config_path: Option<PathBuf>) -> Result<()> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from("relnote.toml"));

    // Load configuration
    let config = config::load(&config_path)?;

    let collector = FragmentCollector::new(&config);
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let mut fragments: Vec<Fragment> = Vec::new();
    let mut file_count = 0;

    for dir in &config.fragment_dirs {
        if !dir.is_dir() {
            warnings.push(format!(
                "{}: fragment directory does not exist",
                dir.display()
            ));
            continue;
        }

        for file in collector.fragment_files(dir) {
            file_count += 1;

            match collector.parse_file(&file) {
                Ok(parsed) if parsed.is_empty() => {
                    warnings.push(format!("{}: no change directives", file.display()));
                }
                Ok(parsed) => fragments.extend(parsed),
                Err(e) => errors.push(e.to_string()),
            }
        }

        for file in collector.unrecognized_files(dir) {
            warnings.push(format!(
                "{}: not a fragment file (.rst expected)",
                file.display()
            ));
        }
    }

    lint_fragments(&config, &fragments, &mut errors, &mut warnings);
    lint_tickets(&config, &fragments, &mut warnings)?;

    for error in &errors {
        println!("error: {}", error);
    }
    for warning in &warnings {
        println!("warning: {}", warning);
    }

    println!(
        "{} file(s) checked: {} error(s), {} warning(s)",
        file_count,
        errors.len(),
        warnings.len()
    );

    if !errors.is_empty() {
        return Err(RelnoteError::Check(format!(
            "{} error(s) found",
            errors.len()
        )));
    }

    Ok(())
}

/// Per-fragment lints: empty bodies, unknown categories, over-long bodies
fn lint_fragments(
    config: &config::Config,
    fragments: &[Fragment],
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    for fragment in fragments {
        let loc = location(fragment);

        if fragment.body.is_empty() {
            errors.push(format!("{}: empty description", loc));
        }

        if fragment.category(&config.categories).is_none() {
            warnings.push(format!(
                "{}: no tag matches a configured category (tags: {})",
                loc,
                fragment.tags.join(", ")
            ));
        }

        if fragment.body.chars().count() > config.limits.max_chars_per_item {
            warnings.push(format!(
                "{}: description exceeds {} characters",
                loc, config.limits.max_chars_per_item
            ));
        }
    }
}

/// Cross-fragment lints: duplicate tickets in the unreleased set, and
/// tickets already mentioned by a released document
fn lint_tickets(
    config: &config::Config,
    fragments: &[Fragment],
    warnings: &mut Vec<String>,
) -> Result<()> {
    let mut ticket_uses: HashMap<u64, usize> = HashMap::new();
    for fragment in fragments {
        for ticket in &fragment.tickets {
            *ticket_uses.entry(*ticket).or_insert(0) += 1;
        }
    }

    let mut duplicates: Vec<(&u64, &usize)> =
        ticket_uses.iter().filter(|(_, count)| **count > 1).collect();
    duplicates.sort();

    for (ticket, count) in duplicates {
        warnings.push(format!(
            "ticket #{} referenced by {} unreleased fragments",
            ticket, count
        ));
    }

    let released = ReleaseCollector::new(config).collect()?;

    for fragment in fragments {
        for ticket in &fragment.tickets {
            if let Some(doc) = released.iter().find(|d| d.tickets.contains(ticket)) {
                warnings.push(format!(
                    "{}: ticket #{} already mentioned in release {}",
                    location(fragment),
                    ticket,
                    doc.version
                ));
            }
        }
    }

    Ok(())
}

fn location(fragment: &Fragment) -> String {
    format!("{} (change #{})", fragment.file.display(), fragment.index + 1)
}
