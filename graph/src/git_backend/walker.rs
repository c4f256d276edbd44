use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use git2::{Commit as GitCommit, DiffStatsFormat, Oid, Repository, Sort};
use std::collections::HashMap;
use std::fmt::Write as _;

use crate::core::{Commit, CommitSet};

/// Reads commits and their decorations from a git repository
pub struct GitWalker {
    repo: Repository,
}

impl GitWalker {
    pub fn new(repo_path: Option<&str>) -> Result<Self> {
        let repo = match repo_path {
            Some(path) => Repository::discover(path),
            None => Repository::open_from_env(),
        }
        .context("Failed to open repository")?;

        Ok(Self { repo })
    }

    /// Collect the commits reachable from `revisions` into a commit set.
    ///
    /// No revisions means every ref plus HEAD. A revision containing `..`
    /// is a range, a leading `^` hides, anything else is a tip.
    pub fn load(&self, revisions: &[String], limit: Option<usize>) -> Result<CommitSet> {
        let mut revwalk = self.repo.revwalk()?;

        if revisions.is_empty() {
            for reference in self.repo.references()? {
                if let Ok(commit) = reference?.peel_to_commit() {
                    revwalk.push(commit.id())?;
                }
            }
            // Unborn HEAD in a fresh repository
            let _ = revwalk.push_head();
        } else {
            for revision in revisions {
                if revision.contains("..") {
                    revwalk
                        .push_range(revision)
                        .with_context(|| format!("Invalid range '{}'", revision))?;
                } else if let Some(hidden) = revision.strip_prefix('^') {
                    revwalk.hide(self.resolve(hidden)?)?;
                } else {
                    revwalk.push(self.resolve(revision)?)?;
                }
            }
        }

        // Sort by topological order and time
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        let decorations = self.branch_labels()?;
        let mut commits = CommitSet::new();

        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            let labels = decorations.get(&oid).cloned().unwrap_or_default();
            commits.insert(Self::convert(&commit).with_labels(labels));

            if limit.is_some_and(|limit| commits.len() >= limit) {
                break;
            }
        }

        tracing::debug!(commits = commits.len(), "commits loaded");
        Ok(commits)
    }

    fn resolve(&self, revision: &str) -> Result<Oid> {
        let object = self
            .repo
            .revparse_single(revision)
            .with_context(|| format!("Unknown revision '{}'", revision))?;
        let commit = object
            .peel_to_commit()
            .with_context(|| format!("'{}' does not name a commit", revision))?;
        Ok(commit.id())
    }

    /// Convert a git2::Commit to a layout commit
    fn convert(commit: &GitCommit) -> Commit {
        let parents = commit.parent_ids().map(|oid| oid.to_string()).collect();
        Commit::new(
            commit.id().to_string(),
            commit.summary().unwrap_or(""),
            commit.time().seconds(),
            parents,
        )
    }

    /// Decorations per commit in the shape of `git log --format=%D`:
    /// `HEAD -> main`, `origin/main`, `tag: v1.0`.
    pub fn branch_labels(&self) -> Result<HashMap<Oid, Vec<String>>> {
        let mut labels: HashMap<Oid, Vec<String>> = HashMap::new();

        let mut head_branch = None;
        if let Ok(head) = self.repo.head() {
            if let Ok(commit) = head.peel_to_commit() {
                let label = if head.is_branch() {
                    let name = head.shorthand().unwrap_or("HEAD").to_string();
                    let label = format!("HEAD -> {}", name);
                    head_branch = head.name().map(str::to_string);
                    label
                } else {
                    "HEAD".to_string()
                };
                labels.entry(commit.id()).or_default().push(label);
            }
        }

        for reference in self.repo.references()? {
            let reference = reference?;
            let Some(name) = reference.name() else {
                continue;
            };
            if head_branch.as_deref() == Some(name) {
                continue;
            }

            let label = if let Some(branch) = name.strip_prefix("refs/heads/") {
                branch.to_string()
            } else if let Some(remote) = name.strip_prefix("refs/remotes/") {
                remote.to_string()
            } else if let Some(tag) = name.strip_prefix("refs/tags/") {
                format!("tag: {}", tag)
            } else {
                continue;
            };

            if let Ok(commit) = reference.peel_to_commit() {
                labels.entry(commit.id()).or_default().push(label);
            }
        }

        Ok(labels)
    }

    /// Header plus diff stat against the first parent, like `git show --stat`.
    /// Abbreviated hashes are accepted.
    pub fn commit_details(&self, hash: &str) -> Result<String> {
        let commit = self.repo.find_commit(self.resolve(hash)?)?;

        let mut details = String::new();
        writeln!(details, "commit {}", commit.id())?;
        let author = commit.author();
        writeln!(
            details,
            "Author: {} <{}>",
            author.name().unwrap_or("Unknown"),
            author.email().unwrap_or("")
        )?;
        let date = Local
            .timestamp_opt(commit.time().seconds(), 0)
            .single()
            .map(|time| time.format("%a %b %e %H:%M:%S %Y").to_string())
            .unwrap_or_default();
        writeln!(details, "Date:   {}", date)?;
        writeln!(details)?;
        for line in commit.message().unwrap_or("").lines() {
            writeln!(details, "    {}", line)?;
        }
        writeln!(details)?;

        let tree = commit.tree()?;
        let parent_tree = match commit.parent(0) {
            Ok(parent) => Some(parent.tree()?),
            Err(_) => None,
        };
        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
        let stats = diff.stats()?.to_buf(DiffStatsFormat::FULL, 80)?;
        details.push_str(stats.as_str().unwrap_or(""));

        Ok(details)
    }
}
