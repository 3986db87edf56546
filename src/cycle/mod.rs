//! The automated test cycle.
//!
//! Each iteration runs the build, reads coverage, repairs the sources behind
//! failing tests, scaffolds tests for files with uncovered methods, then
//! stages, commits and pushes. No step aborts the cycle: every outcome,
//! good or bad, becomes one log entry. Steps backed by a tool the config
//! turned off log that tool's disabled message instead of running. The
//! cycle stops early once coverage reports nothing missed.

pub mod failures;

use std::path::PathBuf;

pub use failures::{locate_source, source_class_for, FailureExtractor, MarkerFailureExtractor};

use crate::build::run_tests;
use crate::coverage::{format_uncovered, read_uncovered, UncoveredMethod, ALL_COVERED};
use crate::fix::FixSuggester;
use crate::mcp::registry::{disabled_message, enabled_tool_names};
use crate::mcp::tools_core::{handle_fix_path, handle_generate_tests_path, COVERAGE_ERROR};
use crate::mcp::tools_git::{handle_git_add_all, handle_git_commit, handle_git_push};
use crate::project::Project;
use crate::scaffold::MethodExtractor;

/// Everything one cycle run needs.
pub struct Cycle<'a> {
    project: &'a Project,
    suggester: &'a dyn FixSuggester,
    failures: &'a dyn FailureExtractor,
    extractor: &'a dyn MethodExtractor,
}

impl<'a> Cycle<'a> {
    pub fn new(
        project: &'a Project,
        suggester: &'a dyn FixSuggester,
        failures: &'a dyn FailureExtractor,
        extractor: &'a dyn MethodExtractor,
    ) -> Self {
        Self {
            project,
            suggester,
            failures,
            extractor,
        }
    }

    /// Run up to `iterations` iterations and return the log.
    pub async fn run(&self, iterations: usize) -> Vec<String> {
        let mut log = Vec::new();
        for i in 1..=iterations {
            tracing::info!("Cycle iteration {i}/{iterations}");
            if self.iteration(i, &mut log).await {
                log.push(format!("All methods covered; stopping after iteration {i}"));
                break;
            }
        }
        log
    }

    /// One iteration. Returns true when coverage is complete.
    async fn iteration(&self, i: usize, log: &mut Vec<String>) -> bool {
        let project = self.project;
        let enabled = enabled_tool_names(&project.config);
        let disabled = |tool: &str| {
            (!enabled.contains(tool)).then(|| disabled_message(&project.config, tool))
        };

        let build_output = match run_tests(&project.root, &project.config.build) {
            Ok(out) => {
                log.push(format!("Iteration {i}: ran tests"));
                log.push(out.trim_end().to_string());
                out
            }
            Err(e) => {
                log.push(format!("Error running tests: {e}"));
                String::new()
            }
        };

        let coverage = read_uncovered(&project.coverage_report());
        let coverage_text = match &coverage {
            Ok(methods) => format_uncovered(methods),
            Err(e) => {
                tracing::warn!("Coverage unavailable: {e}");
                COVERAGE_ERROR.to_string()
            }
        };
        log.push(format!("Coverage: {coverage_text}"));

        let source_root = project.source_root();
        let extension = &project.config.project.source_extension;
        let failing = self.failures.failing_tests(&build_output);
        match disabled("fix_bug") {
            Some(message) if !failing.is_empty() => log.push(message),
            Some(_) => {}
            None => {
                for test_id in failing {
                    match locate_source(&source_root, &test_id, extension) {
                        Some(path) => {
                            log.push(handle_fix_path(&path, &test_id, self.suggester).await)
                        }
                        None => log.push(format!("No source file found for {test_id}")),
                    }
                }
            }
        }

        match (&coverage, disabled("generate_tests")) {
            (Err(_), _) => tracing::warn!("Skipping test generation: no coverage data"),
            (Ok(methods), Some(message)) if !methods.is_empty() => log.push(message),
            (Ok(_), Some(_)) => {}
            (Ok(methods), None) => {
                for entry in owning_files(methods) {
                    match entry {
                        Ok(relative) => log.push(handle_generate_tests_path(
                            &source_root.join(relative),
                            self.extractor,
                        )),
                        Err(name) => log.push(format!(
                            "No source file known for uncovered method {name}"
                        )),
                    }
                }
            }
        }

        log.push(disabled("git_add_all").unwrap_or_else(|| handle_git_add_all(project)));
        let message = format!("{} {i}", project.config.cycle.commit_message_prefix);
        log.push(
            disabled("git_commit").unwrap_or_else(|| handle_git_commit(project, &message)),
        );
        log.push(disabled("git_push").unwrap_or_else(|| handle_git_push(project, None)));

        coverage_text == ALL_COVERED
    }
}

/// Distinct owning files of uncovered methods, in report order. Methods
/// without a known owner come back as `Err(name)`.
fn owning_files(methods: &[UncoveredMethod]) -> Vec<Result<PathBuf, String>> {
    let mut seen: Vec<&str> = Vec::new();
    let mut out = Vec::new();
    for m in methods {
        match m.source_file.as_deref() {
            Some(file) if seen.contains(&file) => {}
            Some(file) => {
                seen.push(file);
                out.push(Ok(PathBuf::from(file)));
            }
            None => out.push(Err(m.name.clone())),
        }
    }
    out
}
