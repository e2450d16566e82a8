pub mod toml_config;

use crate::machine_learning::SchemaPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    #[default]
    Heuristic,
    Model,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ScoringConfig {
    #[serde(default)]
    pub mode: ScoringMode,
    pub model_path: Option<PathBuf>,
    pub feature_order_path: Option<PathBuf>,
    #[serde(default)]
    pub schema_policy: SchemaPolicy,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// `None` when `logging.level` is not a level name. Callers fall back
    /// to info and report it once a logger is installed.
    pub fn log_level(&self) -> Option<log::LevelFilter> {
        self.logging.level.parse().ok()
    }
}
