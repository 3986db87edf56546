//! Git MCP tool handler implementations (6 tools).
//!
//! Contains the text-producing logic for: status, add_all, commit, push,
//! pull_request, and update_metrics.

use crate::git;
use crate::metrics;
use crate::project::Project;

fn error_text(e: impl std::fmt::Display) -> String {
    format!("Error: {e}")
}

// 5. git_status
pub fn handle_git_status(project: &Project) -> String {
    match git::status(&project.root) {
        Ok(status) => status.to_string(),
        Err(e) => error_text(e),
    }
}

// 6. git_add_all
pub fn handle_git_add_all(project: &Project) -> String {
    match git::add_all(&project.root, &project.config.git.excluded_prefixes) {
        Ok(outcome) => outcome.to_string(),
        Err(e) => error_text(e),
    }
}

// 7. git_commit
pub fn handle_git_commit(project: &Project, message: &str) -> String {
    match git::commit(&project.root, message, &project.coverage_report()) {
        Ok(outcome) => outcome.to_string(),
        Err(e) => error_text(e),
    }
}

// 8. git_push
pub fn handle_git_push(project: &Project, remote: Option<&str>) -> String {
    let remote = remote.unwrap_or(&project.config.git.remote);
    match git::push(&project.root, remote) {
        Ok(outcome) => outcome.to_string(),
        Err(e) => error_text(e),
    }
}

// 9. git_pull_request
pub fn handle_git_pull_request(
    project: &Project,
    title: &str,
    body: Option<&str>,
    base: Option<&str>,
) -> String {
    let base = base.unwrap_or(&project.config.git.base_branch);
    match git::create_pull_request(&project.root, title, body.unwrap_or(""), base) {
        Ok(outcome) => outcome.to_string(),
        Err(e) => error_text(e),
    }
}

// 10. update_metrics
pub fn handle_update_metrics(project: &Project) -> String {
    let extension = &project.config.project.source_extension;
    match metrics::update_metrics(&project.root, extension) {
        Ok(count) => metrics::describe(extension, count),
        Err(e) => error_text(e),
    }
}
