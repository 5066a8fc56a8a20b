//! Session configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use oc_core::ChartWidth;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Directory under which every analysis type keeps its datasets.
    pub storage_root: PathBuf,
    pub analysis_type: String,
    pub default_chart_width: ChartWidth,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("user_uploads"),
            analysis_type: "compare_optical".to_string(),
            default_chart_width: ChartWidth::FULL,
        }
    }
}

/// Load session config from a YAML file. Missing keys keep their defaults.
pub fn load_config(path: &Path) -> AppResult<SessionConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {}", e)))
}
