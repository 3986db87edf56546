//! Tool-to-category registry for config-based filtering.
//!
//! Maps each MCP tool to its category so that `filter_tools()` can decide
//! which tools are visible for a given config.

use std::collections::HashSet;

use crate::config::loader::filter_tools;
use crate::config::schema::{TesterConfig, ToolMetadata};

pub const CATEGORY_MATH: &str = "Math";
pub const CATEGORY_SCAFFOLD: &str = "Scaffold";
pub const CATEGORY_BUILD: &str = "Build";
pub const CATEGORY_COVERAGE: &str = "Coverage";
pub const CATEGORY_GIT: &str = "Git";
pub const CATEGORY_REPAIR: &str = "Repair";
pub const CATEGORY_CYCLE: &str = "Cycle";

pub const ALL_CATEGORIES: &[&str] = &[
    CATEGORY_MATH,
    CATEGORY_SCAFFOLD,
    CATEGORY_BUILD,
    CATEGORY_COVERAGE,
    CATEGORY_GIT,
    CATEGORY_REPAIR,
    CATEGORY_CYCLE,
];

/// Metadata for every MCP tool, in listing order.
pub fn all_tool_metadata() -> Vec<ToolMetadata> {
    vec![
        meta("add", CATEGORY_MATH, "Add two integers"),
        meta(
            "generate_tests",
            CATEGORY_SCAFFOLD,
            "Write a JUnit stub class for a source file's public methods",
        ),
        meta("run_tests", CATEGORY_BUILD, "Run the build and return its output"),
        meta(
            "coverage_analysis",
            CATEGORY_COVERAGE,
            "List methods a JaCoCo report marks as missed",
        ),
        meta("git_status", CATEGORY_GIT, "Working tree status and conflicts"),
        meta("git_add_all", CATEGORY_GIT, "Stage changes outside build output"),
        meta("git_commit", CATEGORY_GIT, "Commit with a coverage footer"),
        meta("git_push", CATEGORY_GIT, "Push the current branch upstream"),
        meta("git_pull_request", CATEGORY_GIT, "Open a pull request with gh"),
        meta(
            "update_metrics",
            CATEGORY_GIT,
            "Count source files into metrics.txt and push it",
        ),
        meta(
            "fix_bug",
            CATEGORY_REPAIR,
            "Ask the model to repair a file for a failing test",
        ),
        meta(
            "automated_cycle",
            CATEGORY_CYCLE,
            "Run build, coverage, fix, scaffold and commit iterations",
        ),
    ]
}

fn meta(name: &str, category: &str, description: &str) -> ToolMetadata {
    ToolMetadata {
        name: name.to_string(),
        category: category.to_string(),
        description: description.to_string(),
    }
}

/// Names of the tools enabled by `config`.
pub fn enabled_tool_names(config: &TesterConfig) -> HashSet<String> {
    filter_tools(config, &all_tool_metadata())
        .into_iter()
        .map(|t| t.name)
        .collect()
}

/// Text returned in place of a tool's result when the config turned it off.
pub fn disabled_message(config: &TesterConfig, tool_name: &str) -> String {
    let reason = config
        .tools
        .overrides
        .get(tool_name)
        .and_then(|o| o.reason.as_deref());
    match reason {
        Some(reason) => format!("Tool '{tool_name}' is disabled: {reason}"),
        None => format!(
            "Tool '{tool_name}' is disabled by configuration. \
             Enable it under tools: in .tester-agent.yaml."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{CategoryConfig, ToolOverride};

    #[test]
    fn registry_has_12_tools() {
        assert_eq!(all_tool_metadata().len(), 12);
    }

    #[test]
    fn all_tool_names_unique() {
        let tools = all_tool_metadata();
        let names: HashSet<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), tools.len(), "duplicate tool names in registry");
    }

    #[test]
    fn all_categories_valid() {
        let valid: HashSet<&str> = ALL_CATEGORIES.iter().copied().collect();
        for t in all_tool_metadata() {
            assert!(
                valid.contains(t.category.as_str()),
                "tool {} has invalid category: {}",
                t.name,
                t.category
            );
        }
    }

    #[test]
    fn default_config_enables_everything() {
        assert_eq!(enabled_tool_names(&TesterConfig::default()).len(), 12);
    }

    #[test]
    fn disabling_git_category_hides_six_tools() {
        let mut config = TesterConfig::default();
        config
            .tools
            .categories
            .insert(CATEGORY_GIT.to_string(), CategoryConfig { enabled: false });
        let enabled = enabled_tool_names(&config);
        assert_eq!(enabled.len(), 6);
        assert!(!enabled.contains("git_push"));
        assert!(!enabled.contains("update_metrics"));
        assert!(enabled.contains("automated_cycle"));
    }

    #[test]
    fn tool_override_beats_category() {
        let mut config = TesterConfig::default();
        config
            .tools
            .categories
            .insert(CATEGORY_GIT.to_string(), CategoryConfig { enabled: false });
        config.tools.overrides.insert(
            "git_status".to_string(),
            ToolOverride {
                enabled: true,
                reason: None,
            },
        );
        config
            .tools
            .overrides
            .insert("fix_bug".to_string(), ToolOverride::disabled("no API key"));
        let enabled = enabled_tool_names(&config);
        assert!(enabled.contains("git_status"));
        assert!(!enabled.contains("git_commit"));
        assert!(!enabled.contains("fix_bug"));
    }

    #[test]
    fn disabled_message_prefers_override_reason() {
        let mut config = TesterConfig::default();
        config
            .tools
            .overrides
            .insert("git_push".into(), ToolOverride::disabled("read-only mirror"));
        config
            .tools
            .categories
            .insert(CATEGORY_REPAIR.into(), CategoryConfig { enabled: false });
        assert_eq!(
            disabled_message(&config, "git_push"),
            "Tool 'git_push' is disabled: read-only mirror"
        );
        assert!(disabled_message(&config, "fix_bug").contains("disabled by configuration"));
    }
}
