use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration.
///
/// Example YAML:
/// ```yaml
/// data:
///   path: final_most.csv
///   reload: 10m
/// server:
///   bind: 127.0.0.1:8080
///   cors_origins: ["http://localhost:3000"]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Where offerings come from and when they are re-read.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    /// CSV file with the offerings table
    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    /// "startup", "per-request", or an interval such as "10m"
    #[serde(default = "default_reload")]
    pub reload: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            reload: default_reload(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_origins: Vec::new(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("final_most.csv")
}

fn default_reload() -> String {
    "startup".to_string()
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}
