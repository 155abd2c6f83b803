//! Configuration management commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use crate::cli::output::{print_formatted, print_success, OutputFormat};
use crate::cli::CliContext;
use crate::config::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Get a specific config value
    Get {
        /// Config key (e.g., "backend.base_url", "console.actor")
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., "backend.base_url", "console.actor")
        key: String,

        /// Value to set
        value: String,
    },

    /// Show config file path
    Path,
}

#[derive(Serialize)]
struct ConfigPathResult {
    path: String,
    exists: bool,
}

pub async fn run(command: ConfigCommands, cli: &CliContext) -> Result<()> {
    match command {
        ConfigCommands::Show => show(cli.format).await,
        ConfigCommands::Get { key } => get(&key, cli.format).await,
        ConfigCommands::Set { key, value } => set(&key, &value, cli.quiet).await,
        ConfigCommands::Path => path(cli.format).await,
    }
}

async fn show(format: OutputFormat) -> Result<()> {
    let mut config = Config::load()?;
    if config.backend.api_token.is_some() {
        config.backend.api_token = Some("<set>".to_string());
    }

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            let toml = toml::to_string_pretty(&config)?;
            println!("{}", toml);
        }
    }

    Ok(())
}

async fn get(key: &str, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;

    // Parse dotted key path and extract value
    let value = get_config_value(&config, key)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&value)?);
        }
        OutputFormat::Text => {
            println!("{}", value);
        }
    }

    Ok(())
}

fn get_config_value(config: &Config, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["console", "dark_theme"] => Ok(config.console.dark_theme.to_string()),
        ["console", "actor"] => Ok(config.console.actor.clone()),
        ["console", "start_in_admin_mode"] => Ok(config.console.start_in_admin_mode.to_string()),
        ["backend", "base_url"] => Ok(config.backend.base_url.clone()),
        ["backend", "api_token"] => Ok(match config.backend.api_token {
            Some(_) => "<set>".to_string(),
            None => "<not set>".to_string(),
        }),
        ["backend", "timeout_secs"] => Ok(config.backend.timeout_secs.to_string()),
        ["backend", "refresh_interval_secs"] => {
            Ok(config.backend.refresh_interval_secs.to_string())
        }
        ["downloads", "directory"] => Ok(config
            .downloads
            .directory
            .clone()
            .unwrap_or_else(|| "<not set>".to_string())),
        ["downloads", "compression_level"] => Ok(config.downloads.compression_level.to_string()),
        ["catalog", "path"] => Ok(config
            .catalog
            .path
            .clone()
            .unwrap_or_else(|| "<built-in>".to_string())),
        _ => anyhow::bail!("Unknown config key: {}", key),
    }
}

async fn set(key: &str, value: &str, quiet: bool) -> Result<()> {
    let mut config = Config::load()?;

    set_config_value(&mut config, key, value)?;
    config.save()?;

    print_success(&format!("Set {} = {}", key, value), quiet);
    Ok(())
}

/// Empty strings clear optional values
fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn set_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["console", "dark_theme"] => {
            config.console.dark_theme = value.parse()?;
        }
        ["console", "actor"] => {
            if value.trim().is_empty() {
                anyhow::bail!("console.actor must not be empty");
            }
            config.console.actor = value.trim().to_string();
        }
        ["console", "start_in_admin_mode"] => {
            config.console.start_in_admin_mode = value.parse()?;
        }
        ["backend", "base_url"] => {
            let url = reqwest::Url::parse(value)?;
            if !matches!(url.scheme(), "http" | "https") {
                anyhow::bail!("backend.base_url must be an http(s) URL");
            }
            config.backend.base_url = value.to_string();
        }
        ["backend", "api_token"] => {
            config.backend.api_token = optional(value);
        }
        ["backend", "timeout_secs"] => {
            config.backend.timeout_secs = value.parse()?;
        }
        ["backend", "refresh_interval_secs"] => {
            config.backend.refresh_interval_secs = value.parse()?;
        }
        ["downloads", "directory"] => {
            config.downloads.directory = optional(value);
        }
        ["downloads", "compression_level"] => {
            let level: u8 = value.parse()?;
            if level > 9 {
                anyhow::bail!("downloads.compression_level must be between 0 and 9");
            }
            config.downloads.compression_level = level;
        }
        ["catalog", "path"] => {
            config.catalog.path = optional(value);
        }
        _ => anyhow::bail!("Unknown or read-only config key: {}", key),
    }

    Ok(())
}

async fn path(format: OutputFormat) -> Result<()> {
    let path = Config::config_path()?;
    let exists = path.exists();

    let result = ConfigPathResult {
        path: path.to_string_lossy().to_string(),
        exists,
    };

    print_formatted(&result, format, |r| {
        format!("{}{}", r.path, if r.exists { "" } else { " (not found)" })
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_known_keys() {
        let config = Config::default();
        assert_eq!(get_config_value(&config, "console.actor").unwrap(), "Admin");
        assert_eq!(get_config_value(&config, "catalog.path").unwrap(), "<built-in>");
        assert!(get_config_value(&config, "console.theme").is_err());
    }

    #[test]
    fn test_token_is_masked() {
        let mut config = Config::default();
        config.backend.api_token = Some("secret".to_string());
        assert_eq!(get_config_value(&config, "backend.api_token").unwrap(), "<set>");
    }

    #[test]
    fn test_set_values() {
        let mut config = Config::default();
        set_config_value(&mut config, "backend.base_url", "https://example.org").unwrap();
        set_config_value(&mut config, "downloads.compression_level", "9").unwrap();
        set_config_value(&mut config, "downloads.directory", "").unwrap();
        assert_eq!(config.backend.base_url, "https://example.org");
        assert_eq!(config.downloads.compression_level, 9);
        assert!(config.downloads.directory.is_none());
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = Config::default();
        assert!(set_config_value(&mut config, "backend.base_url", "ftp://x").is_err());
        assert!(set_config_value(&mut config, "downloads.compression_level", "12").is_err());
        assert!(set_config_value(&mut config, "console.actor", "  ").is_err());
        assert!(set_config_value(&mut config, "console.dark_theme", "maybe").is_err());
    }
}
