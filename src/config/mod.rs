// Configuration management
use crate::error::{AccessError, Result};
use crate::expiry::REFRESH_INTERVAL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "pfa-access";
const LOG_FILE: &str = "pfa-access.log";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiConfig {
    /// Countdown refresh interval in seconds
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
}

fn default_refresh_interval() -> u64 {
    REFRESH_INTERVAL.as_secs()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_interval: default_refresh_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Claims older than this are considered stale
    #[serde(default = "default_claims_max_age")]
    pub claims_max_age_minutes: i64,
}

fn default_claims_max_age() -> i64 {
    60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            claims_max_age_minutes: default_claims_max_age(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PathsConfig {
    pub cache_dir: Option<PathBuf>,
}

impl Config {
    /// Get the config directory path
    ///
    /// Priority:
    /// 1. XDG_CONFIG_HOME/pfa-access (if env var is set)
    /// 2. ~/.config/pfa-access (if ~/.config exists)
    /// 3. ~/.pfa-access (fallback on Unix)
    /// 4. Platform default on Windows
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Ok(PathBuf::from(xdg_config).join(APP_DIR));
        }

        #[cfg(unix)]
        {
            if let Some(home_dir) = dirs::home_dir() {
                let xdg_config = home_dir.join(".config");

                if xdg_config.exists() {
                    return Ok(xdg_config.join(APP_DIR));
                }

                return Ok(home_dir.join(format!(".{}", APP_DIR)));
            }
        }

        #[cfg(not(unix))]
        {
            if let Some(config_dir) = dirs::config_dir() {
                return Ok(config_dir.join(APP_DIR));
            }
        }

        Err(AccessError::ConfigError(
            "Could not determine config directory".to_string(),
        ))
    }

    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default file, environment variables, and defaults
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_file_path()?)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from `path`, falling back to defaults when it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Config file not found at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        tracing::debug!("Loading config from: {}", path.display());
        let contents = fs::read_to_string(path)
            .map_err(|e| AccessError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| AccessError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        claims_max_age_from_minutes(config.session.claims_max_age_minutes)?;
        Ok(config)
    }

    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("PFA_REFRESH_INTERVAL") {
            match value.parse() {
                Ok(secs) => {
                    tracing::debug!("Using PFA_REFRESH_INTERVAL from environment: {}", secs);
                    self.ui.refresh_interval = secs;
                }
                Err(_) => tracing::warn!("Ignoring invalid PFA_REFRESH_INTERVAL: {}", value),
            }
        }

        if let Some(value) = lookup("PFA_CLAIMS_MAX_AGE_MINUTES") {
            let parsed = value
                .parse::<i64>()
                .ok()
                .filter(|minutes| claims_max_age_from_minutes(*minutes).is_ok());
            match parsed {
                Some(minutes) => {
                    tracing::debug!(
                        "Using PFA_CLAIMS_MAX_AGE_MINUTES from environment: {}",
                        minutes
                    );
                    self.session.claims_max_age_minutes = minutes;
                }
                None => tracing::warn!("Ignoring invalid PFA_CLAIMS_MAX_AGE_MINUTES: {}", value),
            }
        }

        if let Some(dir) = lookup("PFA_CACHE_DIR") {
            tracing::debug!("Using PFA_CACHE_DIR from environment: {}", dir);
            self.paths.cache_dir = Some(PathBuf::from(dir));
        }
    }

    /// Write a commented sample config to `path`. Never overwrites.
    pub fn create_sample_at(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    AccessError::ConfigError(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        if path.exists() {
            return Err(AccessError::ConfigError(format!(
                "Config file already exists at: {}",
                path.display()
            )));
        }

        let sample_config = r#"# Physics Fighter Academy access tool configuration
# Location priority:
#   1. $XDG_CONFIG_HOME/pfa-access/config.toml (if XDG_CONFIG_HOME is set)
#   2. ~/.config/pfa-access/config.toml (if ~/.config exists)
#   3. ~/.pfa-access/config.toml (fallback)
#
# Environment overrides:
#   PFA_REFRESH_INTERVAL
#   PFA_CLAIMS_MAX_AGE_MINUTES
#   PFA_CACHE_DIR

[ui]
# Countdown refresh interval in seconds (default: 60)
refresh_interval = 60

[session]
# Role claims older than this many minutes must be refreshed (default: 60)
claims_max_age_minutes = 60

[paths]
# Where the signed-in session is stored
# Example: cache_dir = "/home/me/.cache/pfa-access"
"#;

        fs::write(path, sample_config)
            .map_err(|e| AccessError::ConfigError(format!("Failed to write sample config: {}", e)))?;

        Ok(())
    }

    pub fn create_sample() -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        Self::create_sample_at(&path)?;
        Ok(path)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.ui.refresh_interval)
    }

    pub fn claims_max_age(&self) -> Result<chrono::Duration> {
        claims_max_age_from_minutes(self.session.claims_max_age_minutes)
    }

    /// Directory for the session file
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.paths.cache_dir {
            return Ok(dir.clone());
        }

        dirs::cache_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| {
                AccessError::CacheError("Could not determine cache directory".to_string())
            })
    }

    /// Log file for live commands, next to the session file
    pub fn log_file_path(&self) -> Result<PathBuf> {
        Ok(self.cache_dir()?.join(LOG_FILE))
    }
}

/// Claims max age must be a positive number of minutes that chrono can represent
fn claims_max_age_from_minutes(minutes: i64) -> Result<chrono::Duration> {
    if minutes <= 0 {
        return Err(AccessError::ConfigError(format!(
            "claims_max_age_minutes must be positive, got {}",
            minutes
        )));
    }

    chrono::Duration::try_minutes(minutes).ok_or_else(|| {
        AccessError::ConfigError(format!(
            "claims_max_age_minutes of {} is out of range",
            minutes
        ))
    })
}
