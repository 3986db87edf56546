//! MCP server: Model Context Protocol implementation over stdio and HTTP.
//!
//! Tool handler logic is split into modules by domain:
//! - [`tools_core`]: add, scaffolding, build, coverage, fix and the cycle
//! - [`tools_git`]: status, stage, commit, push, pull request, metrics
//! - [`registry`]: tool categories for config-based filtering
//! - [`server`]: the rmcp tool router and stdio entry point
//! - [`http`]: streamable HTTP transport via axum

pub mod http;
pub mod registry;
pub mod server;
pub mod tools_core;
pub mod tools_git;
