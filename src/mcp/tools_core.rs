//! Core MCP tool handler implementations (6 tools).
//!
//! Contains the text-producing logic for: add, generate_tests, run_tests,
//! coverage_analysis, fix_bug, and automated_cycle. Errors never escape a
//! handler; they are rendered into the returned text.

use std::path::Path;

use crate::build::run_tests;
use crate::coverage::{format_uncovered, read_uncovered};
use crate::cycle::Cycle;
use crate::fix::{fix_bug, FixSuggester};
use crate::project::Project;
use crate::scaffold::{generate_tests, MethodExtractor};

/// Result text of `coverage_analysis` for an unreadable or malformed report.
pub const COVERAGE_ERROR: &str = "Error: XML file not found or invalid.";

// 1. add
pub fn handle_add(a: i64, b: i64) -> String {
    match a.checked_add(b) {
        Some(sum) => sum.to_string(),
        None => "Error: integer overflow".to_string(),
    }
}

// 2. generate_tests
pub fn handle_generate_tests(project: &Project, java_file_path: &str) -> String {
    let extractor = project.method_extractor();
    handle_generate_tests_path(&project.resolve(java_file_path), extractor.as_ref())
}

pub fn handle_generate_tests_path(source: &Path, extractor: &dyn MethodExtractor) -> String {
    match generate_tests(source, extractor) {
        Ok(outcome) => outcome.describe(source),
        Err(e) => format!("Error: {e}"),
    }
}

// 3. run_tests
pub fn handle_run_tests(project: &Project) -> String {
    match run_tests(&project.root, &project.config.build) {
        Ok(stdout) => stdout,
        Err(e) => format!("Error running tests: {e}"),
    }
}

// 4. coverage_analysis
pub fn handle_coverage_analysis(project: &Project, xml_path: &str) -> String {
    match read_uncovered(&project.resolve(xml_path)) {
        Ok(methods) => format_uncovered(&methods),
        Err(e) => {
            tracing::debug!("coverage_analysis({xml_path}) failed: {e}");
            COVERAGE_ERROR.to_string()
        }
    }
}

// 11. fix_bug
pub async fn handle_fix_bug(
    project: &Project,
    file_path: &str,
    failing_test: &str,
    suggester: &dyn FixSuggester,
) -> String {
    handle_fix_path(&project.resolve(file_path), failing_test, suggester).await
}

pub async fn handle_fix_path(path: &Path, failing_test: &str, suggester: &dyn FixSuggester) -> String {
    match fix_bug(path, failing_test, suggester).await {
        Ok(outcome) => outcome.to_string(),
        Err(e) => format!("Error: {e}"),
    }
}

// 12. automated_cycle
pub async fn handle_automated_cycle(
    project: &Project,
    suggester: &dyn FixSuggester,
    iterations: Option<usize>,
) -> String {
    let iterations = iterations.unwrap_or(project.config.cycle.iterations);
    let failures = project.failure_extractor();
    let extractor = project.method_extractor();
    let cycle = Cycle::new(project, suggester, &failures, extractor.as_ref());
    cycle.run(iterations).await.join("\n")
}
