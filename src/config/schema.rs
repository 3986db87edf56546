//! Configuration data structures for tester-agent.
//!
//! Defines the YAML config format: project layout conventions, the build
//! command, git defaults, scaffolding and cycle knobs, the fix model, and
//! tool overrides. Every section falls back to defaults so a partial file
//! is always valid.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for tester-agent.
///
/// Loaded from `.tester-agent.yaml` and environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TesterConfig {
    /// Config format version (currently "1.0").
    #[serde(default = "default_version")]
    pub version: String,

    /// Where the project keeps sources and reports.
    #[serde(default)]
    pub project: ProjectConfig,

    /// The build/test command.
    #[serde(default)]
    pub build: BuildConfig,

    /// Git and hosting defaults.
    #[serde(default)]
    pub git: GitConfig,

    /// Test scaffolding options.
    #[serde(default)]
    pub scaffold: ScaffoldConfig,

    /// Automated cycle options.
    #[serde(default)]
    pub cycle: CycleConfig,

    /// The model used for automated fixes.
    #[serde(default)]
    pub model: ModelConfig,

    /// Per-tool and per-category overrides.
    #[serde(default)]
    pub tools: ToolsConfig,
}

impl Default for TesterConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            project: ProjectConfig::default(),
            build: BuildConfig::default(),
            git: GitConfig::default(),
            scaffold: ScaffoldConfig::default(),
            cycle: CycleConfig::default(),
            model: ModelConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

impl TesterConfig {
    /// Check whether a specific category is enabled (defaults to true).
    pub fn is_category_enabled(&self, category: &str) -> bool {
        self.tools
            .categories
            .get(category)
            .map(|c| c.enabled)
            .unwrap_or(true)
    }

    /// Check whether a specific tool is enabled (defaults to true).
    pub fn is_tool_enabled(&self, tool_name: &str) -> bool {
        self.tools
            .overrides
            .get(tool_name)
            .map(|o| o.enabled)
            .unwrap_or(true)
    }
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

/// Conventional paths, relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// JaCoCo XML report written by the build.
    #[serde(default = "default_coverage_report")]
    pub coverage_report: String,

    /// Root of the main source tree searched for fix targets.
    #[serde(default = "default_source_root")]
    pub source_root: String,

    /// Extension of source files, without the dot.
    #[serde(default = "default_source_extension")]
    pub source_extension: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            coverage_report: default_coverage_report(),
            source_root: default_source_root(),
            source_extension: default_source_extension(),
        }
    }
}

// ---------------------------------------------------------------------------
// BuildConfig
// ---------------------------------------------------------------------------

/// Build/test command, program first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "default_build_command")]
    pub command: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: default_build_command(),
        }
    }
}

// ---------------------------------------------------------------------------
// GitConfig
// ---------------------------------------------------------------------------

/// Git and pull-request defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// Remote used by `git_push` when none is given.
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Base branch for new pull requests.
    #[serde(default = "default_base_branch")]
    pub base_branch: String,

    /// Path prefixes never staged by `git_add_all`.
    #[serde(default = "default_excluded_prefixes")]
    pub excluded_prefixes: Vec<String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            base_branch: default_base_branch(),
            excluded_prefixes: default_excluded_prefixes(),
        }
    }
}

// ---------------------------------------------------------------------------
// ScaffoldConfig
// ---------------------------------------------------------------------------

/// Which method extractor the scaffolder uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    /// Textual signature pattern. Fast, tolerant of broken code.
    #[default]
    Regex,
    /// tree-sitter-java syntax tree.
    Syntax,
}

impl ExtractorKind {
    /// Parse from a loose string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "regex" | "pattern" => Some(Self::Regex),
            "syntax" | "tree-sitter" | "treesitter" => Some(Self::Syntax),
            _ => None,
        }
    }

    /// Canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regex => "regex",
            Self::Syntax => "syntax",
        }
    }
}

impl std::fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScaffoldConfig {
    #[serde(default)]
    pub extractor: ExtractorKind,
}

// ---------------------------------------------------------------------------
// CycleConfig
// ---------------------------------------------------------------------------

/// Automated cycle knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Iteration budget when the caller gives none.
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Commit message prefix; the iteration number is appended.
    #[serde(default = "default_commit_message_prefix")]
    pub commit_message_prefix: String,

    /// Substrings marking a build output line as a failure.
    #[serde(default = "default_failure_markers")]
    pub failure_markers: Vec<String>,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            commit_message_prefix: default_commit_message_prefix(),
            failure_markers: default_failure_markers(),
        }
    }
}

// ---------------------------------------------------------------------------
// ModelConfig
// ---------------------------------------------------------------------------

/// OpenAI-compatible chat completions endpoint used by `fix_bug`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// HTTP timeout for one completion. No timeout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            timeout_secs: None,
        }
    }
}

// ---------------------------------------------------------------------------
// ToolsConfig
// ---------------------------------------------------------------------------

/// Per-tool and per-category configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Individual tool overrides (enable/disable specific tools).
    #[serde(default)]
    pub overrides: HashMap<String, ToolOverride>,

    /// Category-level toggles (enable/disable entire groups).
    #[serde(default)]
    pub categories: HashMap<String, CategoryConfig>,
}

/// Override the enabled state of a single tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOverride {
    /// Whether this tool is enabled.
    pub enabled: bool,

    /// Human-readable reason for the override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ToolOverride {
    /// Create a disabled override with a reason.
    pub fn disabled(reason: impl Into<String>) -> Self {
        Self {
            enabled: false,
            reason: Some(reason.into()),
        }
    }
}

/// Enable or disable an entire tool category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub enabled: bool,
}

// ---------------------------------------------------------------------------
// ToolMetadata (for filtering)
// ---------------------------------------------------------------------------

/// Lightweight metadata about a single MCP tool, used for filtering.
#[derive(Debug, Clone)]
pub struct ToolMetadata {
    /// Tool name as registered in the MCP server.
    pub name: String,
    /// Category this tool belongs to.
    pub category: String,
    /// Human-readable description.
    pub description: String,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_version() -> String {
    "1.0".to_string()
}

fn default_coverage_report() -> String {
    "target/site/jacoco/jacoco.xml".to_string()
}

fn default_source_root() -> String {
    "src/main/java".to_string()
}

fn default_source_extension() -> String {
    "java".to_string()
}

fn default_build_command() -> Vec<String> {
    vec!["mvn".to_string(), "test".to_string()]
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_base_branch() -> String {
    "main".to_string()
}

fn default_excluded_prefixes() -> Vec<String> {
    ["target/", "bin/", "build/", ".idea/", ".vscode/"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_iterations() -> usize {
    3
}

fn default_commit_message_prefix() -> String {
    "Automated test cycle iteration".to_string()
}

fn default_failure_markers() -> Vec<String> {
    vec!["FAIL".to_string(), "Exception".to_string()]
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
