//! Build/test runner.
//!
//! Runs the configured test command (`mvn test` by default) in the project
//! root and hands back its stdout untouched. The exit code is deliberately
//! not inspected: failing tests are still useful output.

use std::path::Path;

use crate::config::schema::BuildConfig;
use crate::error::{Result, TesterError};
use crate::exec::run_command;

/// Run the build command and return its stdout.
pub fn run_tests(project_root: &Path, build: &BuildConfig) -> Result<String> {
    let (program, args) = build
        .command
        .split_first()
        .ok_or_else(|| TesterError::Config("build.command is empty".into()))?;

    tracing::info!("Running {}", build.command.join(" "));
    let output = run_command(project_root, program, args)?;
    if !output.success {
        tracing::warn!(
            "{} exited with {:?}",
            program,
            output.code
        );
    }
    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(parts: &[&str]) -> BuildConfig {
        BuildConfig {
            command: parts.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn returns_stdout_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_tests(dir.path(), &command(&["sh", "-c", "printf 'Tests run: 3\\n'"])).unwrap();
        assert_eq!(out, "Tests run: 3\n");
    }

    #[test]
    fn failing_build_still_returns_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_tests(
            dir.path(),
            &command(&["sh", "-c", "echo 'FAIL CalcTest'; echo noise >&2; exit 1"]),
        )
        .unwrap();
        assert_eq!(out, "FAIL CalcTest\n");
    }

    #[test]
    fn missing_program_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_tests(dir.path(), &command(&["no-such-build-tool-xyz", "test"])).unwrap_err();
        assert!(matches!(err, TesterError::Process { .. }));
    }

    #[test]
    fn empty_command_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_tests(dir.path(), &command(&[])).unwrap_err();
        assert!(matches!(err, TesterError::Config(_)));
    }
}
