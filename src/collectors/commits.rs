use chrono::{TimeZone, Utc};
use git2::Repository;

use crate::config::Config;
use crate::error::{RelnoteError, Result};
use crate::models::Commit;
use crate::state::{self, SourceState, State};

/// Commit collector for listing commits made since the last release
pub struct CommitCollector<'a> {
    config: &'a Config,
}

impl<'a> CommitCollector<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Collect commits on HEAD back to the last released commit.
    /// A missing or unusable repository degrades to an empty list.
    pub fn collect(&self, state: &State) -> Result<Vec<Commit>> {
        match self.collect_repo(state) {
            Ok(commits) => Ok(commits),
            Err(e) => {
                eprintln!(
                    "Warning: Skipping commit listing for '{}': {}",
                    self.config.repo.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Record HEAD as the last released commit.
    /// A missing repository is tolerated: the next status simply has no
    /// release boundary to stop at.
    pub fn mark_released(&self, state: &mut State) -> Result<()> {
        let repo = match Repository::open(&self.config.repo) {
            Ok(repo) => repo,
            Err(e) => {
                eprintln!(
                    "Warning: Not recording release commit for '{}': {}",
                    self.config.repo.display(),
                    e
                );
                return Ok(());
            }
        };

        let head = repo.head()?;
        let last_release_commit = head.target().map(|oid| oid.to_string());

        state::update_source(
            state,
            self.source_key(),
            SourceState::Repo {
                last_checked: Utc::now(),
                last_release_commit,
            },
        );

        Ok(())
    }

    fn collect_repo(&self, state: &State) -> Result<Vec<Commit>> {
        let repo = Repository::open(&self.config.repo).map_err(|e| {
            RelnoteError::Git(git2::Error::from_str(&format!(
                "cannot open repository at '{}': {}",
                self.config.repo.display(),
                e
            )))
        })?;

        let last_release = self.last_release_commit(state);

        let mut revwalk = repo.revwalk()?;
        revwalk.push_head()?;

        let mut commits = Vec::new();

        for oid_result in revwalk {
            let oid = oid_result?;

            if last_release.as_deref() == Some(oid.to_string().as_str()) {
                break;
            }

            let commit = repo.find_commit(oid)?;
            commits.push(convert_commit(&commit));

            if commits.len() >= self.config.limits.max_commits {
                break;
            }
        }

        Ok(commits)
    }

    /// The commit hash recorded at the last release, if any
    fn last_release_commit(&self, state: &State) -> Option<String> {
        match state::get_source(state, &self.source_key()) {
            Some(SourceState::Repo {
                last_release_commit,
                ..
            }) => last_release_commit.clone(),
            _ => None,
        }
    }

    fn source_key(&self) -> String {
        self.config.repo.to_string_lossy().to_string()
    }
}

/// Convert a git2 commit into the domain model
fn convert_commit(commit: &git2::Commit) -> Commit {
    let hash = commit.id().to_string().chars().take(7).collect();
    let message = commit.summary().unwrap_or("").to_string();
    let author = commit.author().name().unwrap_or("unknown").to_string();
    let timestamp = Utc
        .timestamp_opt(commit.time().seconds(), 0)
        .single()
        .unwrap_or_default();

    Commit {
        hash,
        message,
        author,
        timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    /// Create a git repository with one empty-tree commit per message,
    /// returning the last commit id
    fn init_repo_with_commits(path: &Path, messages: &[&str]) -> git2::Oid {
        let repo = git2::Repository::init(path).unwrap();
        let sig = git2::Signature::now("Test User", "test@example.com").unwrap();

        let mut parent: Option<git2::Commit> = None;
        let mut last = git2::Oid::zero();

        for msg in messages {
            let tree_id = repo.index().unwrap().write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            let parents: Vec<&git2::Commit> = parent.iter().collect();

            last = repo
                .commit(Some("HEAD"), &sig, &sig, msg, &tree, &parents)
                .unwrap();
            parent = Some(repo.find_commit(last).unwrap());
        }

        last
    }

    fn config_for(path: &Path) -> Config {
        let mut config = Config::default();
        config.repo = path.to_path_buf();
        config
    }

    #[test]
    fn test_collect_without_repo_is_empty() {
        let temp = TempDir::new().unwrap();
        let config = config_for(temp.path());

        let collector = CommitCollector::new(&config);
        let commits = collector.collect(&State::default()).unwrap();

        assert!(commits.is_empty());
    }

    #[test]
    fn test_collect_all_commits_on_first_run() {
        let temp = TempDir::new().unwrap();
        init_repo_with_commits(temp.path(), &["First", "Second", "Third"]);

        let config = config_for(temp.path());
        let collector = CommitCollector::new(&config);

        let commits = collector.collect(&State::default()).unwrap();

        assert_eq!(commits.len(), 3);
        // Newest first
        assert_eq!(commits[0].message, "Third");
        assert_eq!(commits[2].message, "First");
        assert_eq!(commits[0].hash.len(), 7);
        assert_eq!(commits[0].author, "Test User");
    }

    #[test]
    fn test_collect_stops_at_release_boundary() {
        let temp = TempDir::new().unwrap();
        init_repo_with_commits(temp.path(), &["First", "Second"]);

        let config = config_for(temp.path());
        let collector = CommitCollector::new(&config);
        let mut state = State::default();

        collector.mark_released(&mut state).unwrap();

        // No new commits yet
        let commits = collector.collect(&state).unwrap();
        assert!(commits.is_empty());

        // One commit after the release
        let repo = git2::Repository::open(temp.path()).unwrap();
        let sig = git2::Signature::now("Test User", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let head = repo.head().unwrap().peel_to_commit().unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "After release", &tree, &[&head])
            .unwrap();

        let commits = collector.collect(&state).unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].message, "After release");
    }

    #[test]
    fn test_collect_respects_max_commits() {
        let temp = TempDir::new().unwrap();
        init_repo_with_commits(temp.path(), &["a", "b", "c", "d", "e"]);

        let mut config = config_for(temp.path());
        config.limits.max_commits = 2;

        let collector = CommitCollector::new(&config);
        let commits = collector.collect(&State::default()).unwrap();

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].message, "e");
    }
}
