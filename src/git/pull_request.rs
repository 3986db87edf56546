//! Pull request creation through the GitHub CLI (`gh`).

use std::fmt;
use std::path::Path;

use super::validate_input;
use crate::error::Result;
use crate::exec::run_command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestOutcome {
    /// `gh` succeeded; holds its stdout (the PR URL).
    Created(String),
    Failed(String),
}

impl fmt::Display for PullRequestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created(url) => f.write_str(url),
            Self::Failed(err) => write!(f, "Error creating pull request: {err}"),
        }
    }
}

/// Arguments passed to `gh` for a new pull request.
pub fn pull_request_args<'a>(title: &'a str, body: &'a str, base: &'a str) -> Vec<&'a str> {
    vec![
        "pr", "create", "--base", base, "--title", title, "--body", body,
    ]
}

/// Open a pull request from the current branch against `base`.
pub fn create_pull_request(
    repo_path: &Path,
    title: &str,
    body: &str,
    base: &str,
) -> Result<PullRequestOutcome> {
    validate_input(base, "base")?;

    let out = run_command(repo_path, "gh", &pull_request_args(title, body, base))?;
    if !out.success {
        tracing::warn!("gh pr create failed");
        return Ok(PullRequestOutcome::Failed(out.stderr_trimmed().to_string()));
    }
    let url = out.stdout_trimmed().to_string();
    tracing::info!("Created pull request {url}");
    Ok(PullRequestOutcome::Created(url))
}
