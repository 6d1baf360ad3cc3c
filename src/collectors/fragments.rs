use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{RelnoteError, Result};
use crate::models::{ChangeKind, Fragment};
use crate::state::{self, SourceState, State};

/// Fragment collector for parsing `.. change::` directive files
pub struct FragmentCollector<'a> {
    config: &'a Config,
}

impl<'a> FragmentCollector<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Collect fragments from all configured directories
    pub fn collect(&self, state: &mut State) -> Result<Vec<Fragment>> {
        let mut all_fragments = Vec::new();

        for dir in &self.config.fragment_dirs {
            match self.collect_dir(dir, state) {
                Ok(fragments) => {
                    all_fragments.extend(fragments);
                }
                Err(e) => {
                    eprintln!(
                        "Warning: Skipping fragment directory '{}': {}",
                        dir.display(),
                        e
                    );
                }
            }
        }

        all_fragments.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        Ok(all_fragments)
    }

    /// Collect fragments from a single directory
    fn collect_dir(&self, dir: &Path, state: &mut State) -> Result<Vec<Fragment>> {
        if !dir.exists() {
            return Err(RelnoteError::Fragment(format!(
                "Fragment directory does not exist: {}",
                dir.display()
            )));
        }

        if !dir.is_dir() {
            return Err(RelnoteError::Fragment(format!(
                "Fragment path is not a directory: {}",
                dir.display()
            )));
        }

        let mut fragments = Vec::new();

        for file in self.fragment_files(dir) {
            match self.parse_file(&file) {
                Ok(parsed) => {
                    fragments.extend(parsed);
                }
                Err(e) => {
                    eprintln!("Warning: Skipping fragment file '{}': {}", file.display(), e);
                }
            }
        }

        self.detect_changes(&mut fragments, state, dir);
        self.update_state_for_dir(state, dir, &fragments);

        Ok(fragments)
    }

    /// List fragment files (.rst) in a directory, sorted by name
    pub fn fragment_files(&self, dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .map(|e| e.path().to_path_buf())
            .filter(|p| is_fragment_file(p))
            .collect();

        files.sort();
        files
    }

    /// List non-fragment files in a directory (dotfiles excluded), for linting
    pub fn unrecognized_files(&self, dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .map(|e| e.path().to_path_buf())
            .filter(|p| !is_fragment_file(p) && !is_hidden_file(p))
            .collect();

        files.sort();
        files
    }

    /// Parse all `.. change::` directives from a fragment file
    pub fn parse_file(&self, path: &Path) -> Result<Vec<Fragment>> {
        let content = fs::read_to_string(path).map_err(|e| {
            RelnoteError::Fragment(format!(
                "Cannot read fragment file '{}': {}",
                path.display(),
                e
            ))
        })?;

        self.parse_fragments(&content, path)
    }

    /// Parse fragments from file content
    fn parse_fragments(&self, content: &str, file: &Path) -> Result<Vec<Fragment>> {
        let lines: Vec<&str> = content.lines().collect();
        let mut fragments = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let trimmed = lines[i].trim();

            if trimmed == ".. change::" {
                let (fragment, next) = self.parse_directive(&lines, i, file, fragments.len())?;
                fragments.push(fragment);
                i = next;
            } else if trimmed.is_empty() {
                i += 1;
            } else {
                return Err(RelnoteError::Fragment(format!(
                    "{}:{}: expected '.. change::' directive, found '{}'",
                    file.display(),
                    i + 1,
                    trimmed
                )));
            }
        }

        Ok(fragments)
    }

    /// Parse a single directive starting at `start`; returns the fragment and
    /// the index of the first line after it
    fn parse_directive(
        &self,
        lines: &[&str],
        start: usize,
        file: &Path,
        index: usize,
    ) -> Result<(Fragment, usize)> {
        let mut i = start + 1;
        let mut tags: Vec<String> = Vec::new();
        let mut tickets: Vec<u64> = Vec::new();
        let mut saw_tags = false;

        // Field lines: indented `:name: value` immediately after the directive
        while i < lines.len() {
            let line = lines[i];
            let trimmed = line.trim();

            if trimmed.is_empty() || !is_indented(line) {
                break;
            }

            match parse_field(trimmed) {
                Some(("tags", value)) => {
                    tags = parse_tags(value);
                    saw_tags = true;
                }
                Some(("tickets", value)) => {
                    tickets = parse_tickets(value, file, i + 1)?;
                }
                Some(_) => {
                    // Unknown fields such as :versions: are ignored
                }
                None => break,
            }

            i += 1;
        }

        // Body: indented block after the fields, dedented and reflowed
        let mut body_lines: Vec<String> = Vec::new();
        while i < lines.len() {
            let line = lines[i];

            if line.trim().is_empty() {
                body_lines.push(String::new());
                i += 1;
                continue;
            }

            if !is_indented(line) {
                break;
            }

            body_lines.push(line.trim().to_string());
            i += 1;
        }

        if !saw_tags || tags.is_empty() {
            return Err(RelnoteError::Fragment(format!(
                "{}: change directive #{} has no :tags: field",
                file.display(),
                index + 1
            )));
        }

        let body = normalize_body(&body_lines);

        Ok((
            Fragment {
                file: file.to_path_buf(),
                index,
                tags,
                tickets,
                body,
                change: ChangeKind::New, // Will be updated by detect_changes
            },
            i,
        ))
    }

    /// Detect changes in fragments compared to state
    fn detect_changes(&self, fragments: &mut [Fragment], state: &State, dir: &Path) {
        let source_key = dir.to_string_lossy().to_string();
        let source_state = state::get_source(state, &source_key);

        let previous_hashes = match source_state {
            Some(SourceState::Fragments { item_hashes, .. }) => Some(item_hashes),
            _ => None,
        };

        let Some(prev_hashes) = previous_hashes else {
            // No previous state, all fragments are new
            for fragment in fragments.iter_mut() {
                fragment.change = ChangeKind::New;
            }
            return;
        };

        for fragment in fragments.iter_mut() {
            let hash = hash_fragment(fragment);
            let identity = fragment_identity(fragment);

            if prev_hashes.iter().any(|h| *h == hash) {
                fragment.change = ChangeKind::Unchanged;
            } else if prev_hashes.iter().any(|h| h.starts_with(&identity)) {
                // Same file and position, different content
                fragment.change = ChangeKind::Modified;
            } else {
                fragment.change = ChangeKind::New;
            }
        }
    }

    /// Update state for a directory with its fragments
    fn update_state_for_dir(&self, state: &mut State, dir: &Path, fragments: &[Fragment]) {
        let source_key = dir.to_string_lossy().to_string();

        let item_hashes: Vec<String> = fragments.iter().map(hash_fragment).collect();

        let source_state = SourceState::Fragments {
            last_checked: Utc::now(),
            item_hashes,
        };

        state::update_source(state, source_key, source_state);
    }
}

/// Identity prefix for a fragment (location only, not content)
fn fragment_identity(fragment: &Fragment) -> String {
    format!("{}#{}|", fragment.file.display(), fragment.index)
}

/// Full hash for a fragment (location + tags + tickets + body)
fn hash_fragment(fragment: &Fragment) -> String {
    let tickets: Vec<String> = fragment.tickets.iter().map(|t| t.to_string()).collect();
    format!(
        "{}{}|{}|{}",
        fragment_identity(fragment),
        fragment.tags.join(","),
        tickets.join(","),
        fragment.body
    )
}

/// Check whether a path is a fragment file (.rst extension)
fn is_fragment_file(path: &Path) -> bool {
    if let Some(ext) = path.extension() {
        ext.to_string_lossy().to_lowercase() == "rst"
    } else {
        false
    }
}

/// Check whether a file name starts with a dot
fn is_hidden_file(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Check whether a line is indented (part of a directive block)
fn is_indented(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

/// Parse a `:name: value` field line
fn parse_field(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix(':')?;
    let colon = rest.find(':')?;
    let name = &rest[..colon];

    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    Some((name, rest[colon + 1..].trim()))
}

/// Split a `:tags:` value into lowercased tag tokens
fn parse_tags(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Parse a `:tickets:` value into ticket numbers
fn parse_tickets(value: &str, file: &Path, line: usize) -> Result<Vec<u64>> {
    let mut tickets = Vec::new();

    for token in value.split(',') {
        let token = token.trim().trim_start_matches('#');
        if token.is_empty() {
            continue;
        }

        let ticket = token.parse::<u64>().map_err(|_| {
            RelnoteError::Fragment(format!(
                "{}:{}: invalid ticket number '{}'",
                file.display(),
                line,
                token
            ))
        })?;
        tickets.push(ticket);
    }

    Ok(tickets)
}

/// Reflow dedented body lines: join wrapped lines within a paragraph,
/// keep paragraphs separated by blank lines, normalize inline markup
fn normalize_body(lines: &[String]) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in lines {
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(convert_inline(&current.join(" ")));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }

    if !current.is_empty() {
        paragraphs.push(convert_inline(&current.join(" ")));
    }

    paragraphs.join("\n\n")
}

/// Normalize RST inline markup for Markdown output:
/// ``code`` becomes `code`, and roles like :meth:`.Session.execute`
/// become `Session.execute`
fn convert_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix("``") {
            if let Some(end) = stripped.find("``") {
                out.push('`');
                out.push_str(&stripped[..end]);
                out.push('`');
                rest = &stripped[end + 2..];
                continue;
            }
        }

        if rest.starts_with(':') {
            if let Some((target, consumed)) = parse_role(rest) {
                out.push('`');
                out.push_str(target);
                out.push('`');
                rest = &rest[consumed..];
                continue;
            }
        }

        let Some(c) = rest.chars().next() else {
            break;
        };
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// Parse an RST role at the start of the string: `:name:`target``.
/// Returns the cleaned target and the number of bytes consumed.
fn parse_role(s: &str) -> Option<(&str, usize)> {
    let rest = &s[1..];
    let name_len = rest.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))?;

    if name_len == 0 {
        return None;
    }

    let after_name = &rest[name_len..];
    let target_part = after_name.strip_prefix(":`")?;
    let end = target_part.find('`')?;

    let target = target_part[..end].trim_start_matches(['~', '.']);
    // Explicit-title form `text <target>`: keep the text
    let target = match target.find(" <") {
        Some(pos) => &target[..pos],
        None => target,
    };

    let consumed = 1 + name_len + 2 + end + 1;
    Some((target, consumed))
}
