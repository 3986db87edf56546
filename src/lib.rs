//! Tester agent: test automation for Java projects.
//!
//! Scaffolds JUnit tests, runs the build, reads JaCoCo coverage, asks a
//! language model to repair failing code, and drives git, either as MCP
//! tools or as an unattended cycle.

pub mod build;
pub mod cli;
pub mod config;
pub mod coverage;
pub mod cycle;
pub mod error;
pub mod exec;
pub mod fix;
pub mod git;
pub mod mcp;
pub mod metrics;
pub mod observability;
pub mod project;
pub mod scaffold;
