//! Working-tree operations: status, stage-all, commit, push.

use std::fmt;
use std::path::Path;

use super::{run_git, validate_input};
use crate::coverage::coverage_percentage;
use crate::error::Result;

// ── Status ──────────────────────────────────────────────────────────────

/// Summary of `git status --short` plus unmerged paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoStatus {
    Clean,
    Dirty { conflicts: bool, changes: String },
}

impl fmt::Display for RepoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => f.write_str("Clean"),
            Self::Dirty { conflicts, changes } => {
                let mut parts = Vec::new();
                if *conflicts {
                    parts.push("Conflicts detected".to_string());
                }
                if !changes.is_empty() {
                    parts.push(format!("Changes:\n{changes}"));
                }
                f.write_str(&parts.join("\n"))
            }
        }
    }
}

/// Report whether the working tree is clean, and what changed if not.
pub fn status(repo_path: &Path) -> Result<RepoStatus> {
    let short = run_git(repo_path, &["status", "--short"])?;
    let unmerged = run_git(repo_path, &["ls-files", "-u"])?;

    let changes = short.stdout.trim_end().to_string();
    let conflicts = !unmerged.stdout_trimmed().is_empty();

    if changes.is_empty() && !conflicts {
        return Ok(RepoStatus::Clean);
    }
    Ok(RepoStatus::Dirty { conflicts, changes })
}

// ── Stage-all ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    NothingToStage,
    Staged(Vec<String>),
    Failed(String),
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NothingToStage => f.write_str("Nothing to stage."),
            Self::Staged(paths) => write!(f, "Staged {} files.", paths.len()),
            Self::Failed(err) => write!(f, "Error staging files: {err}"),
        }
    }
}

/// Paths from `git status --porcelain -z` output that may be staged.
///
/// Records are NUL-separated and paths are never quoted. A rename or copy
/// record carries the new path and is followed by a field holding the old
/// one, which is skipped. Anything under an excluded prefix is dropped.
pub fn filter_stageable(porcelain: &str, excluded_prefixes: &[String]) -> Vec<String> {
    let mut fields = porcelain.split('\0');
    let mut paths = Vec::new();
    while let Some(record) = fields.next() {
        let (Some(code), Some(path)) = (record.get(..2), record.get(3..)) else {
            continue;
        };
        if code.contains(|c: char| matches!(c, 'R' | 'C')) {
            fields.next();
        }
        if path.is_empty() || excluded_prefixes.iter().any(|p| path.starts_with(p.as_str())) {
            continue;
        }
        paths.push(path.to_string());
    }
    paths
}

/// Stage every changed or untracked path outside the excluded prefixes.
pub fn add_all(repo_path: &Path, excluded_prefixes: &[String]) -> Result<StageOutcome> {
    let porcelain = run_git(repo_path, &["status", "--porcelain", "-z"])?;
    let to_add = filter_stageable(&porcelain.stdout, excluded_prefixes);
    if to_add.is_empty() {
        return Ok(StageOutcome::NothingToStage);
    }

    let mut args = vec!["add", "--"];
    args.extend(to_add.iter().map(String::as_str));
    let out = run_git(repo_path, &args)?;
    if !out.success {
        return Ok(StageOutcome::Failed(out.stderr_trimmed().to_string()));
    }
    tracing::info!("Staged {} paths", to_add.len());
    Ok(StageOutcome::Staged(to_add))
}

// ── Commit ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed { coverage: String },
    Failed(String),
}

impl fmt::Display for CommitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Committed { coverage } => write!(f, "Committed with coverage: {coverage}"),
            Self::Failed(err) => f.write_str(err),
        }
    }
}

/// The caller's message with a trailing `Coverage:` line.
pub fn commit_message(message: &str, coverage: &str) -> String {
    format!("{message}\n\nCoverage: {coverage}")
}

/// Commit staged changes, stamping the message with the current coverage
/// read from `coverage_report`.
pub fn commit(repo_path: &Path, message: &str, coverage_report: &Path) -> Result<CommitOutcome> {
    let coverage = coverage_percentage(coverage_report);
    let full_message = commit_message(message, &coverage);

    let out = run_git(repo_path, &["commit", "-m", &full_message])?;
    if !out.success {
        // "nothing to commit" is reported on stdout, not stderr.
        let err = match out.stderr_trimmed() {
            "" => out.stdout_trimmed(),
            e => e,
        };
        tracing::warn!("git commit failed: {err}");
        return Ok(CommitOutcome::Failed(err.to_string()));
    }
    tracing::info!("Committed with coverage {coverage}");
    Ok(CommitOutcome::Committed { coverage })
}

// ── Push ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    NoBranch,
    Pushed { branch: String, remote: String },
    Failed(String),
}

impl fmt::Display for PushOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoBranch => f.write_str("Could not determine current branch."),
            Self::Pushed { branch, remote } => {
                write!(f, "Pushed branch '{branch}' to remote '{remote}'.")
            }
            Self::Failed(err) => f.write_str(err),
        }
    }
}

/// Push the current branch to `remote`, setting it as upstream.
pub fn push(repo_path: &Path, remote: &str) -> Result<PushOutcome> {
    validate_input(remote, "remote")?;

    let head = run_git(repo_path, &["rev-parse", "--abbrev-ref", "HEAD"])?;
    let branch = head.stdout_trimmed();
    if branch.is_empty() {
        return Ok(PushOutcome::NoBranch);
    }

    let out = run_git(repo_path, &["push", "-u", remote, branch])?;
    if !out.success {
        tracing::warn!("git push to {remote} failed");
        return Ok(PushOutcome::Failed(out.stderr_trimmed().to_string()));
    }
    tracing::info!("Pushed {branch} to {remote}");
    Ok(PushOutcome::Pushed {
        branch: branch.to_string(),
        remote: remote.to_string(),
    })
}

// ── Tests ───────────────────────────────────────────────────────────────
