use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tlm_merge::{Engine, MergeConfig};

use crate::cli::EngineArgs;

/// Settings read from `--config`, before command-line overrides.
///
/// ```toml
/// engine = "bounded"
///
/// [merge]
/// active_set_capacity = 256
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub engine: Engine,
    pub merge: MergeConfig,
}

impl CliConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Config file if given, otherwise defaults.
    pub fn resolve(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply command-line flags on top of file values.
    pub fn with_overrides(mut self, args: &EngineArgs) -> Self {
        if let Some(engine) = args.engine {
            self.engine = engine;
        }
        if let Some(capacity) = args.capacity {
            self.merge.active_set_capacity = capacity;
        }
        self
    }
}
