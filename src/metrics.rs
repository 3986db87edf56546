//! Source-file metrics.
//!
//! Counts source files in the project, records the count in `metrics.txt`
//! and pushes it. Commit and push results are not checked: "nothing to
//! commit" and a missing remote are both normal here.

use std::path::Path;

use walkdir::WalkDir;

use crate::error::Result;
use crate::exec::run_command;

pub const METRICS_FILE: &str = "metrics.txt";

/// Number of `*.<extension>` files under `root`, ignoring `.git/`.
pub fn count_source_files(root: &Path, extension: &str) -> usize {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git")
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path().extension().is_some_and(|ext| ext == extension)
        })
        .count()
}

/// Contents written to [`METRICS_FILE`].
pub fn render_metrics(extension: &str, count: usize) -> String {
    format!("{extension}_files: {count}\n")
}

/// Tool result text, labelled by the capitalized extension (`Java files: 3`).
pub fn describe(extension: &str, count: usize) -> String {
    let mut chars = extension.chars();
    let label: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{label} files: {count}")
}

/// Count, write [`METRICS_FILE`], then add, commit and push it.
pub fn update_metrics(root: &Path, extension: &str) -> Result<usize> {
    let count = count_source_files(root, extension);
    std::fs::write(root.join(METRICS_FILE), render_metrics(extension, count))?;
    tracing::info!("Wrote {METRICS_FILE}: {count} {extension} files");

    for args in [
        &["add", METRICS_FILE][..],
        &["commit", "-m", "Update metrics"][..],
        &["push"][..],
    ] {
        let out = run_command(root, "git", args)?;
        if !out.success {
            tracing::debug!("git {} exited with {:?}", args[0], out.code);
        }
    }
    Ok(count)
}
