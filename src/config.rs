//! Production configuration system
//!
//! Provides centralized configuration management with:
//! - Environment variable support
//! - Config file loading (optional)
//! - Runtime defaults
//! - Validation and type safety

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Paths configuration
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub agent_home: PathBuf,
    pub sessions_directory: PathBuf,
    pub skills_directory: PathBuf,
    pub log_directory: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let agent_home = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".claude");
        Self {
            // Reports print to stdout, so logging stays quiet by default
            logging: LoggingConfig {
                level: "ERROR".to_string(),
                format: "pretty".to_string(),
                output: "console".to_string(),
            },
            paths: PathsConfig {
                sessions_directory: agent_home.join("sessions"),
                skills_directory: agent_home.join("skills"),
                log_directory: PathBuf::from("logs"),
                agent_home,
            },
        }
    }
}

impl Config {
    /// Load configuration from environment, file, and defaults
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        // Try to load from config file if it exists
        let config_paths = [
            PathBuf::from("tool-usage.toml"),
            PathBuf::from(".tool-usage.toml"),
            dirs::config_dir()
                .map(|d| d.join("tool-usage").join("config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                info!(config_file = %path.display(), "Loading configuration from file");
                config = Self::load_from_file(path)?;
                break;
            }
        }

        // Override with environment variables
        config.apply_env_overrides();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        // Logging overrides
        if let Ok(val) = env::var("LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Ok(val) = env::var("LOG_OUTPUT") {
            self.logging.output = val;
        }

        // Path overrides; AGENT_HOME rebases both data directories unless
        // they are themselves overridden
        if let Ok(val) = env::var("AGENT_HOME") {
            self.paths.agent_home = PathBuf::from(val);
            self.paths.sessions_directory = self.paths.agent_home.join("sessions");
            self.paths.skills_directory = self.paths.agent_home.join("skills");
        }
        if let Ok(val) = env::var("AGENT_SESSIONS_DIR") {
            self.paths.sessions_directory = PathBuf::from(val);
        }
        if let Ok(val) = env::var("AGENT_SKILLS_DIR") {
            self.paths.skills_directory = PathBuf::from(val);
        }
        if let Ok(val) = env::var("TOOL_USAGE_LOG_DIR") {
            self.paths.log_directory = PathBuf::from(val);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        match self.logging.output.as_str() {
            "console" | "file" | "both" => {}
            other => {
                return Err(anyhow::anyhow!(
                    "Log output must be console, file or both, got {}",
                    other
                ));
            }
        }

        // The log directory is only needed when file logging is requested
        if self.logging.output != "console" && !self.paths.log_directory.exists() {
            fs::create_dir_all(&self.paths.log_directory)
                .context("Failed to create log directory")?;
        }

        Ok(())
    }
}

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration instance
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(|| Config::load().expect("Failed to load configuration"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "ERROR");
        assert_eq!(config.logging.output, "console");
        assert!(config.paths.sessions_directory.ends_with("sessions"));
        assert!(config.paths.skills_directory.ends_with("skills"));
    }

    #[test]
    fn test_agent_home_rebases_data_dirs() {
        let mut config = Config::default();
        config.paths.agent_home = PathBuf::from("/srv/agent");
        config.paths.sessions_directory = config.paths.agent_home.join("sessions");
        config.paths.skills_directory = config.paths.agent_home.join("skills");
        assert_eq!(
            config.paths.sessions_directory,
            PathBuf::from("/srv/agent/sessions")
        );
    }

    #[test]
    fn test_validation_rejects_unknown_output() {
        let mut config = Config::default();
        config.logging.output = "syslog".to_string();
        assert!(config.validate().is_err());
    }
}
