//! Error types shared across the crate.
//!
//! Every fallible operation below the tool boundary returns [`Result`].
//! The MCP tool handlers flatten these into plain text before they reach
//! the client.

use thiserror::Error;

/// Errors produced by tester-agent operations.
#[derive(Debug, Error)]
pub enum TesterError {
    /// A file or directory the operation needs does not exist.
    #[error("file not found: {0}")]
    NotFound(String),

    /// A coverage report could not be read or parsed.
    #[error("invalid coverage report: {0}")]
    InvalidReport(String),

    /// An external program could not be launched.
    #[error("failed to run {program}: {message}")]
    Process { program: String, message: String },

    /// The fix model could not be reached or returned an unusable answer.
    #[error("model error: {0}")]
    Model(String),

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TesterError>;
