//! External process execution.
//!
//! Every tool that shells out (`git`, `gh`, the build command) goes through
//! [`run_command`]. Failing to launch the program is an error; a non-zero
//! exit status is not; callers decide what a failure means for them.

use std::path::Path;
use std::process::Command;

use crate::error::{Result, TesterError};

/// Captured result of one finished process.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Trimmed stdout.
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }

    /// Trimmed stderr.
    pub fn stderr_trimmed(&self) -> &str {
        self.stderr.trim()
    }
}

/// Run `program` with `args` in `dir` and wait for it to finish.
///
/// Blocks the calling thread; there is no timeout.
pub fn run_command<S: AsRef<str>>(dir: &Path, program: &str, args: &[S]) -> Result<CommandOutput> {
    tracing::debug!(
        "exec {} {}",
        program,
        args.iter().map(|a| a.as_ref()).collect::<Vec<_>>().join(" ")
    );

    let output = Command::new(program)
        .args(args.iter().map(|a| a.as_ref()))
        .current_dir(dir)
        .output()
        .map_err(|e| TesterError::Process {
            program: program.to_string(),
            message: e.to_string(),
        })?;

    Ok(CommandOutput {
        success: output.status.success(),
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
