//! Git and hosting CLI integration.
//!
//! Everything here shells out to `git` (or `gh` for pull requests) in the
//! project root. Operations return typed outcomes whose `Display` is the
//! text handed back to MCP clients; only launch failures and invalid input
//! surface as errors.

pub mod ops;
pub mod pull_request;

use std::path::Path;

use crate::error::{Result, TesterError};
use crate::exec::{run_command, CommandOutput};

pub use ops::{
    add_all, commit, commit_message, filter_stageable, push, status, CommitOutcome, PushOutcome,
    RepoStatus, StageOutcome,
};
pub use pull_request::{create_pull_request, PullRequestOutcome};

/// Run `git` with `args` in `repo_path`.
pub(crate) fn run_git(repo_path: &Path, args: &[&str]) -> Result<CommandOutput> {
    run_command(repo_path, "git", args)
}

/// Reject values that would be parsed as command-line options.
pub(crate) fn validate_input(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TesterError::Other(format!("{field} must not be empty")));
    }
    if value.starts_with('-') {
        return Err(TesterError::Other(format!(
            "{field} must not start with '-': {value}"
        )));
    }
    Ok(())
}
