//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Test automation agent for Maven/JaCoCo Java projects.
#[derive(Parser, Debug)]
#[command(name = "tester-agent", author, version, about, long_about = None)]
pub struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    /// Config file (defaults to <project>/.tester-agent.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Serve the MCP tools (stdio unless --http is given)
    Serve {
        /// Listen address for streamable HTTP, e.g. 127.0.0.1:8080
        #[arg(long)]
        http: Option<String>,
    },

    /// Run the automated cycle once and print its log
    Cycle {
        /// Maximum iterations (defaults to cycle.iterations from config)
        #[arg(long)]
        iterations: Option<usize>,
    },

    /// List the tools enabled by the current config
    Tools,

    /// Count source files into metrics.txt and push it
    Metrics,
}
