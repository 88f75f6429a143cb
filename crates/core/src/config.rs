use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

use crate::model::ModelConfig;

pub const FILE_NAME: &str = "drivescore.toml";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub strict: Option<bool>,
    pub max_danger: Option<usize>,
    pub log_level: Option<String>,
    pub model: ModelConfig,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let config: Config =
            toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
        Ok(config)
    }

    /// Loads `drivescore.toml` from the working directory when present.
    pub fn discover() -> anyhow::Result<Option<Self>> {
        Config::discover_in(Path::new("."))
    }

    /// Like [`Config::discover`], looking in `dir`. A file that is present
    /// but fails to parse is an error, not a silent fallback.
    pub fn discover_in(dir: &Path) -> anyhow::Result<Option<Self>> {
        let path = dir.join(FILE_NAME);
        if !path.exists() {
            return Ok(None);
        }
        match Config::load(&path) {
            Ok(config) => Ok(Some(config)),
            Err(e) => {
                warn!(path = %path.display(), error = %format!("{e:#}"), "config not loaded");
                Err(e)
            }
        }
    }
}
