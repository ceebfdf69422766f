use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::config::{get_config_path, Config};

const HEADER: &str = "\
# college-pick configuration
#
# data.reload: startup | per-request | interval such as \"10m\"
# server.cors_origins: empty list allows any origin
";

/// Render the default configuration as commented YAML.
pub fn default_config_yaml() -> Result<String> {
    let yaml = serde_saphyr::to_string(&Config::default())
        .context("Failed to serialize default config")?;
    Ok(format!("{}\n{}", HEADER, yaml))
}

/// Write the default configuration file.
///
/// Uses `path` or the default config path. Refuses to replace an existing
/// file unless `force` is set. Returns the path written.
pub fn write_default_config(path: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }
    }

    let yaml = default_config_yaml()?;

    let mut file = AtomicWriteFile::open(&config_path)
        .with_context(|| format!("Failed to open atomic write file at {}", config_path.display()))?;
    file.write_all(yaml.as_bytes())
        .context("Failed to write config")?;
    file.commit().context("Failed to save config")?;

    Ok(config_path)
}
