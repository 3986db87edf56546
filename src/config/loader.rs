//! Multi-source configuration loading.
//!
//! Priority (lowest to highest):
//! 1. Built-in defaults
//! 2. `.tester-agent.yaml` / `.tester-agent.yml` in the project root, or an
//!    explicit file passed with `--config`
//! 3. `TESTER_AGENT_*` environment variables

use std::path::Path;

use super::schema::{ExtractorKind, TesterConfig, ToolMetadata};
use crate::error::{Result, TesterError};

/// Config file names probed in the project root, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &[".tester-agent.yaml", ".tester-agent.yml"];

/// Load the effective configuration.
///
/// A missing project config file is fine (defaults apply); a missing
/// explicit file, or any malformed YAML, is an error.
pub fn load_config(explicit: Option<&Path>, project_root: Option<&Path>) -> Result<TesterConfig> {
    let mut config = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(TesterError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            read_config_file(path)?
        }
        None => match project_root.and_then(find_project_config) {
            Some(path) => read_config_file(&path)?,
            None => TesterConfig::default(),
        },
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn find_project_config(root: &Path) -> Option<std::path::PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.is_file())
}

fn read_config_file(path: &Path) -> Result<TesterConfig> {
    let contents = std::fs::read_to_string(path)?;
    let config = serde_yaml::from_str(&contents)
        .map_err(|e| TesterError::Config(format!("failed to parse {}: {e}", path.display())))?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Apply `TESTER_AGENT_*` overrides using `lookup` to read variables.
///
/// Unparseable values are ignored with a warning rather than failing the load.
pub fn apply_env_overrides<F>(config: &mut TesterConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("TESTER_AGENT_ITERATIONS") {
        match v.trim().parse::<usize>() {
            Ok(n) => config.cycle.iterations = n,
            Err(_) => tracing::warn!("Ignoring TESTER_AGENT_ITERATIONS={v:?}: not a number"),
        }
    }
    if let Some(v) = lookup("TESTER_AGENT_MODEL") {
        config.model.model = v;
    }
    if let Some(v) = lookup("TESTER_AGENT_MODEL_ENDPOINT") {
        config.model.endpoint = v;
    }
    if let Some(v) = lookup("TESTER_AGENT_REMOTE") {
        config.git.remote = v;
    }
    if let Some(v) = lookup("TESTER_AGENT_EXTRACTOR") {
        match ExtractorKind::from_str_loose(&v) {
            Some(kind) => config.scaffold.extractor = kind,
            None => tracing::warn!("Ignoring TESTER_AGENT_EXTRACTOR={v:?}: unknown extractor"),
        }
    }
}

/// Keep only the tools enabled by category toggles and per-tool overrides.
///
/// A per-tool override wins over its category.
pub fn filter_tools(config: &TesterConfig, tools: &[ToolMetadata]) -> Vec<ToolMetadata> {
    tools
        .iter()
        .filter(|t| {
            if config.tools.overrides.contains_key(&t.name) {
                config.is_tool_enabled(&t.name)
            } else {
                config.is_category_enabled(&t.category)
            }
        })
        .cloned()
        .collect()
}
