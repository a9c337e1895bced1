//! Dashboard Configuration
//! Optional JSON settings file; every field falls back to a default.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings file looked up in the working directory.
pub const CONFIG_FILE: &str = "jcpao_dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration in {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV with one `ref_month_yr` column and one column per agency.
    pub data_path: PathBuf,
    pub title: String,
    /// Caption shown under the filters.
    pub data_as_of: String,
    pub chart_width: u32,
    pub chart_height: u32,
    /// Filter directive used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("Received Cases (1) by Agency.csv"),
            title: "JCPAO Criminal Cases Received by Police Agency".to_string(),
            data_as_of: "Data as of Friday, August 22, 2025.".to_string(),
            chart_width: 700,
            chart_height: 400,
            log_level: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Read `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }
}
