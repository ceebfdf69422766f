pub mod init;
mod reload;
mod schema;

pub use init::write_default_config;
pub use reload::ReloadPolicy;
pub use schema::{Config, DataConfig, ServerConfig};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/college-pick/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("college-pick"))
}

/// Get the default config file path (~/.config/college-pick/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   and falls back to built-in defaults when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            p
        }
        None => {
            let default_path = get_config_path()?;
            if !default_path.exists() {
                log::debug!(
                    "No config at {}, using defaults",
                    default_path.display()
                );
                return Ok(Config::default());
            }
            default_path
        }
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    log::debug!("Loaded config from {}", config_path.display());
    Ok(config)
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.data.path.as_os_str().is_empty() {
        errors.push("data.path: must not be empty".to_string());
    }

    if let Err(e) = ReloadPolicy::parse(&config.data.reload) {
        errors.push(format!(
            "data.reload: invalid '{}' - {}",
            config.data.reload, e
        ));
    }

    match config.server.bind.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {}
        _ => errors.push(format!(
            "server.bind: expected host:port, got '{}'",
            config.server.bind
        )),
    }

    for (i, origin) in config.server.cors_origins.iter().enumerate() {
        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            errors.push(format!(
                "server.cors_origins[{}]: invalid origin '{}'",
                i, origin
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_invalid_reload() {
        let mut config = Config::default();
        config.data.reload = "whenever".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("data.reload"));
    }

    #[test]
    fn test_invalid_bind() {
        let mut config = Config::default();
        config.server.bind = "localhost".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("server.bind"));

        config.server.bind = "0.0.0.0:99999".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_origin() {
        let mut config = Config::default();
        config.server.cors_origins = vec!["localhost:3000".to_string()];
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("server.cors_origins[0]"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = Config::default();
        config.data.path = PathBuf::new();
        config.data.reload = "bad".to_string();
        config.server.bind = "nope".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_load_explicit_missing_file_is_error() {
        let path = env::temp_dir().join("college_pick_test_missing_config.yaml");
        let _ = fs::remove_file(&path);

        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_explicit_file() {
        let path = env::temp_dir().join("college_pick_test_config.yaml");
        fs::write(&path, "data:\n  path: colleges.csv\n  reload: per-request\n").unwrap();

        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.data.path, PathBuf::from("colleges.csv"));
        assert_eq!(config.data.reload, "per-request");
        assert_eq!(config.server, ServerConfig::default());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_invalid_yaml_is_error() {
        let path = env::temp_dir().join("college_pick_test_bad_config.yaml");
        fs::write(&path, "data: [unclosed\n").unwrap();

        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));

        let _ = fs::remove_file(&path);
    }
}
