//! Markdown renderer module
//!
//! Generates release-notes and status output in Markdown format.
//! Renders sections: Summary, per-category change sections, Commits.

use std::collections::BTreeMap;

use crate::config::Config;
use crate::models::{ChangeKind, Commit, Fragment, Release, Status};

/// Markdown renderer for releases and status reports
pub struct Renderer<'a> {
    config: &'a Config,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Render a complete release document to Markdown
    pub fn render_release(&self, release: &Release) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Release {}\n\n", release.version));
        output.push_str(&format!(
            "**Released:** {}\n",
            release.date.format("%Y-%m-%d")
        ));
        output.push_str(&format!(
            "**Generated:** {}\n\n",
            release.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str(&self.render_release_summary(release));
        output.push_str("\n\n");

        for (title, fragments) in self.category_sections(&release.fragments) {
            if fragments.is_empty() {
                continue;
            }

            output.push_str(&self.render_category_section(&title, &fragments));
            output.push('\n');
        }

        output.trim_end().to_string()
    }

    /// Render summary statistics table for a release
    fn render_release_summary(&self, release: &Release) -> String {
        let stats = release.stats(&self.config.categories);
        let mut output = String::new();

        output.push_str("## Summary\n\n");
        output.push_str("| Category | Count |\n");
        output.push_str("|----------|-------|\n");

        for (title, fragments) in self.category_sections(&release.fragments) {
            output.push_str(&format!("| {} | {} |\n", title, fragments.len()));
        }

        output.push_str(&format!("| Tickets | {} |", stats.ticket_count));

        output
    }

    /// Group fragments into configured category sections, in configured
    /// order. Fragments matching no category land in a trailing
    /// "Miscellaneous" section (merged with a configured one if present).
    fn category_sections<'f>(&self, fragments: &'f [Fragment]) -> Vec<(String, Vec<&'f Fragment>)> {
        let categories = &self.config.categories;

        let mut sections: Vec<(String, Vec<&'f Fragment>)> = categories
            .iter()
            .map(|c| (c.title.clone(), Vec::new()))
            .collect();
        let mut uncategorized: Vec<&'f Fragment> = Vec::new();

        for fragment in fragments {
            match categories
                .iter()
                .position(|c| fragment.tags.iter().any(|t| *t == c.tag))
            {
                Some(i) => sections[i].1.push(fragment),
                None => uncategorized.push(fragment),
            }
        }

        if !uncategorized.is_empty() {
            match sections.iter_mut().find(|(title, _)| title == "Miscellaneous") {
                Some((_, entries)) => entries.extend(uncategorized),
                None => sections.push(("Miscellaneous".to_string(), uncategorized)),
            }
        }

        sections
    }

    /// Render a single category section with subsystem groups
    fn render_category_section(&self, title: &str, fragments: &[&Fragment]) -> String {
        let mut output = String::new();

        output.push_str(&format!("## {}\n\n", title));

        // Fragments without a subsystem tag come first, without a sub-heading
        let mut general: Vec<&Fragment> = Vec::new();
        let mut subsystems: BTreeMap<&str, Vec<&Fragment>> = BTreeMap::new();

        for fragment in fragments.iter().copied() {
            match fragment.subsystem(&self.config.categories) {
                Some(subsystem) => subsystems.entry(subsystem).or_default().push(fragment),
                None => general.push(fragment),
            }
        }

        for fragment in &general {
            output.push_str(&self.render_entry(fragment));
        }

        for (subsystem, entries) in subsystems {
            if !output.ends_with("\n\n") {
                output.push('\n');
            }
            output.push_str(&format!("### {}\n\n", subsystem));

            for fragment in entries {
                output.push_str(&self.render_entry(fragment));
            }
        }

        output
    }

    /// Render a single change entry as a Markdown list item
    fn render_entry(&self, fragment: &Fragment) -> String {
        let mut paragraphs: Vec<String> = fragment
            .body
            .split("\n\n")
            .filter(|p| !p.is_empty())
            .map(|p| p.to_string())
            .collect();

        let refs = self.ticket_refs(fragment);
        if !refs.is_empty() {
            match paragraphs.last_mut() {
                Some(last) => {
                    last.push(' ');
                    last.push_str(&refs);
                }
                None => paragraphs.push(refs),
            }
        }

        let mut output = String::new();
        for (i, paragraph) in paragraphs.iter().enumerate() {
            if i == 0 {
                output.push_str(&format!("- {}\n", paragraph));
            } else {
                output.push('\n');
                output.push_str(&format!("  {}\n", paragraph));
            }
        }

        if self.config.display.show_source_files {
            output.push_str(&format!("  *(source: `{}`)*\n", fragment.file.display()));
        }

        output
    }

    /// Render ticket references, linked when a URL template is configured
    fn ticket_refs(&self, fragment: &Fragment) -> String {
        if fragment.tickets.is_empty() {
            return String::new();
        }

        let refs: Vec<String> = fragment
            .tickets
            .iter()
            .map(|ticket| match &self.config.ticket_url {
                Some(template) => {
                    let url = template.replace("{id}", &ticket.to_string());
                    format!("[#{}]({})", ticket, url)
                }
                None => format!("#{}", ticket),
            })
            .collect();

        format!("({})", refs.join(", "))
    }

    /// Render a status report to Markdown
    pub fn render_status(&self, status: &Status) -> String {
        let mut output = String::new();

        output.push_str("# Unreleased Changes\n\n");
        output.push_str(&format!(
            "**Generated:** {}\n\n",
            status.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str(&self.render_status_summary(status));
        output.push_str("\n\n");

        if !status.fragments.is_empty() {
            output.push_str(&self.render_status_fragments(&status.fragments));
            output.push('\n');
        }

        if !status.commits.is_empty() {
            output.push_str(&self.render_commits(&status.commits));
            output.push_str("\n\n");
        }

        output.trim_end().to_string()
    }

    /// Render summary statistics table for a status report
    fn render_status_summary(&self, status: &Status) -> String {
        let stats = status.stats();
        let mut output = String::new();

        output.push_str("## Summary\n\n");
        output.push_str("| Category | Count |\n");
        output.push_str("|----------|-------|\n");
        output.push_str(&format!("| Fragments | {} |\n", stats.fragment_count));
        output.push_str(&format!("| New | {} |\n", stats.new_count));
        output.push_str(&format!("| Modified | {} |\n", stats.modified_count));
        output.push_str(&format!("| Tickets | {} |\n", stats.ticket_count));
        output.push_str(&format!("| Commits | {} |", stats.commit_count));

        output
    }

    /// Render pending fragments grouped by source file
    fn render_status_fragments(&self, fragments: &[Fragment]) -> String {
        let mut output = String::new();

        output.push_str("## Pending Fragments\n");

        let mut by_file: BTreeMap<&std::path::Path, Vec<&Fragment>> = BTreeMap::new();
        for fragment in fragments {
            by_file
                .entry(fragment.file.as_path())
                .or_default()
                .push(fragment);
        }

        for (file, entries) in by_file {
            output.push('\n');
            output.push_str(&format!("### `{}`\n\n", file.display()));

            for fragment in entries {
                output.push_str(&self.render_status_entry(fragment));
            }
        }

        output
    }

    /// Render a single pending fragment with its change marker
    fn render_status_entry(&self, fragment: &Fragment) -> String {
        let change_marker = match fragment.change {
            ChangeKind::New => " ← NEW",
            ChangeKind::Modified => " ← MODIFIED",
            ChangeKind::Unchanged => "",
        };

        let summary = fragment.body.split("\n\n").next().unwrap_or("");
        let summary = truncate(summary, self.config.limits.max_chars_per_item);

        format!(
            "- [{}] {}{}  \n",
            fragment.tags.join(", "),
            summary,
            change_marker
        )
    }

    /// Render commits made since the last release
    fn render_commits(&self, commits: &[Commit]) -> String {
        let mut output = String::new();

        output.push_str("## Commits Since Last Release\n\n");

        for commit in commits {
            let author_info = if self.config.display.show_authors {
                format!(" — *{}*", commit.author)
            } else {
                String::new()
            };

            output.push_str(&format!(
                "- `{}` {}{}  \n",
                commit.hash, commit.message, author_info
            ));
        }

        output
    }
}

/// Truncate at a character boundary with an ellipsis
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use std::path::PathBuf;

    fn create_test_config() -> Config {
        Config::default()
    }

    fn fragment(tags: &[&str], tickets: &[u64], body: &str) -> Fragment {
        Fragment {
            file: PathBuf::from("changes/frag.rst"),
            index: 0,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            tickets: tickets.to_vec(),
            body: body.to_string(),
            change: ChangeKind::New,
        }
    }

    fn release(fragments: Vec<Fragment>) -> Release {
        Release {
            version: "1.4.2".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            generated_at: Utc::now(),
            fragments,
        }
    }

    #[test]
    fn test_render_release_header_and_summary() {
        let config = create_test_config();
        let renderer = Renderer::new(&config);

        let release = release(vec![fragment(&["bug", "orm"], &[5441], "Fixed a thing.")]);
        let output = renderer.render_release(&release);

        assert!(output.contains("# Release 1.4.2"));
        assert!(output.contains("**Released:** 2024-06-15"));
        assert!(output.contains("**Generated:**"));
        assert!(output.contains("## Summary"));
        assert!(output.contains("| Bug Fixes | 1 |"));
        assert!(output.contains("| New Features | 0 |"));
        assert!(output.contains("| Tickets | 1 |"));
    }

    #[test]
    fn test_render_release_category_order() {
        let config = create_test_config();
        let renderer = Renderer::new(&config);

        let release = release(vec![
            fragment(&["bug"], &[1], "A fix."),
            fragment(&["feature"], &[2], "A feature."),
        ]);
        let output = renderer.render_release(&release);

        let features_pos = output.find("## New Features").unwrap();
        let bugs_pos = output.find("## Bug Fixes").unwrap();
        assert!(features_pos < bugs_pos);
    }

    #[test]
    fn test_render_release_subsystem_grouping() {
        let config = create_test_config();
        let renderer = Renderer::new(&config);

        let release = release(vec![
            fragment(&["bug", "orm"], &[1], "An orm fix."),
            fragment(&["bug"], &[2], "A general fix."),
            fragment(&["bug", "engine"], &[3], "An engine fix."),
        ]);
        let output = renderer.render_release(&release);

        // General entries precede subsystem sub-headings
        let general_pos = output.find("A general fix.").unwrap();
        let engine_pos = output.find("### engine").unwrap();
        let orm_pos = output.find("### orm").unwrap();
        assert!(general_pos < engine_pos);
        assert!(engine_pos < orm_pos);
    }

    #[test]
    fn test_render_release_uncategorized() {
        let config = create_test_config();
        let renderer = Renderer::new(&config);

        let release = release(vec![fragment(&["oracle"], &[9], "Driver note.")]);
        let output = renderer.render_release(&release);

        assert!(output.contains("## Miscellaneous"));
        assert!(output.contains("Driver note."));
    }

    #[test]
    fn test_render_entry_ticket_links() {
        let mut config = create_test_config();
        config.ticket_url = Some("https://example.com/i/{id}".to_string());
        let renderer = Renderer::new(&config);

        let output = renderer.render_entry(&fragment(&["bug"], &[5441, 5444], "Fixed."));

        assert!(output.contains("- Fixed. ([#5441](https://example.com/i/5441), [#5444](https://example.com/i/5444))"));
    }

    #[test]
    fn test_render_entry_plain_tickets() {
        let config = create_test_config();
        let renderer = Renderer::new(&config);

        let output = renderer.render_entry(&fragment(&["bug"], &[5441], "Fixed."));
        assert!(output.contains("- Fixed. (#5441)"));
    }

    #[test]
    fn test_render_entry_multi_paragraph() {
        let config = create_test_config();
        let renderer = Renderer::new(&config);

        let output = renderer.render_entry(&fragment(&["bug"], &[7], "First.\n\nSecond."));

        assert!(output.contains("- First.\n"));
        assert!(output.contains("\n  Second. (#7)\n"));
    }

    #[test]
    fn test_render_entry_source_annotation() {
        let mut config = create_test_config();
        config.display.show_source_files = true;
        let renderer = Renderer::new(&config);

        let output = renderer.render_entry(&fragment(&["bug"], &[], "Fixed."));
        assert!(output.contains("*(source: `changes/frag.rst`)*"));
    }

    #[test]
    fn test_render_status() {
        let config = create_test_config();
        let renderer = Renderer::new(&config);

        let mut modified = fragment(&["bug", "orm"], &[1], "A fix.");
        modified.change = ChangeKind::Modified;

        let status = Status {
            generated_at: Utc::now(),
            fragments: vec![fragment(&["feature"], &[2], "A feature."), modified],
            commits: vec![Commit {
                hash: "abc1234".to_string(),
                message: "Fix the bug".to_string(),
                author: "Alice".to_string(),
                timestamp: Utc::now(),
            }],
        };

        let output = renderer.render_status(&status);

        assert!(output.contains("# Unreleased Changes"));
        assert!(output.contains("| Fragments | 2 |"));
        assert!(output.contains("| Commits | 1 |"));
        assert!(output.contains("## Pending Fragments"));
        assert!(output.contains("[feature] A feature. ← NEW"));
        assert!(output.contains("[bug, orm] A fix. ← MODIFIED"));
        assert!(output.contains("## Commits Since Last Release"));
        assert!(output.contains("`abc1234` Fix the bug — *Alice*"));
    }

    #[test]
    fn test_render_status_without_authors() {
        let mut config = create_test_config();
        config.display.show_authors = false;
        let renderer = Renderer::new(&config);

        let status = Status {
            generated_at: Utc::now(),
            fragments: vec![],
            commits: vec![Commit {
                hash: "abc1234".to_string(),
                message: "Fix the bug".to_string(),
                author: "Alice".to_string(),
                timestamp: Utc::now(),
            }],
        };

        let output = renderer.render_status(&status);
        assert!(!output.contains("Alice"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer text", 8), "a longer...");
    }
}
