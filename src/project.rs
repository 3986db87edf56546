//! The project a server or cycle operates on: a root directory plus the
//! effective configuration. Every relative path a tool receives is resolved
//! against the root.

use std::path::{Path, PathBuf};

use crate::config::loader::load_config;
use crate::config::schema::TesterConfig;
use crate::cycle::MarkerFailureExtractor;
use crate::error::Result;
use crate::scaffold::{extractor_for, MethodExtractor};

#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: TesterConfig,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, config: TesterConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Load config for `root`, from `explicit` when given.
    pub fn load(root: impl Into<PathBuf>, explicit: Option<&Path>) -> Result<Self> {
        let root = root.into();
        let config = load_config(explicit, Some(&root))?;
        Ok(Self { root, config })
    }

    /// `path` if absolute, otherwise `path` under the project root.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn coverage_report(&self) -> PathBuf {
        self.resolve(&self.config.project.coverage_report)
    }

    pub fn source_root(&self) -> PathBuf {
        self.resolve(&self.config.project.source_root)
    }

    pub fn method_extractor(&self) -> Box<dyn MethodExtractor> {
        extractor_for(self.config.scaffold.extractor)
    }

    pub fn failure_extractor(&self) -> MarkerFailureExtractor {
        MarkerFailureExtractor::new(self.config.cycle.failure_markers.clone())
    }
}
