#![warn(clippy::all, clippy::pedantic)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::Config;

// Default config file path
const CONFIG_FILE_PATH: &str = "config/reaction_speed.toml";

pub const CONFIG_ENV_VAR: &str = "REACTION_SPEED_CONFIG";

// Load the configuration from the default location
pub fn load_config_from_file() -> Result<Config, ConfigError> {
    load_config_from_path(&get_config_file_path())
}

// Load the configuration at `config_path`, writing defaults there if it doesn't exist yet
pub fn load_config_from_path(config_path: &Path) -> Result<Config, ConfigError> {
    if !config_path.exists() {
        let default_config = Config::default();
        save_config_to_path(&default_config, config_path)?;
        return Ok(default_config);
    }

    let contents = fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&contents)?;
    Ok(config)
}

// Save the configuration to the default location
pub fn save_config_to_file(config: &Config) -> Result<(), ConfigError> {
    save_config_to_path(config, &get_config_file_path())
}

pub fn save_config_to_path(config: &Config, config_path: &Path) -> Result<(), ConfigError> {
    // Create parent directory if it doesn't exist
    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let toml_string = toml::to_string_pretty(config)?;
    fs::write(config_path, toml_string)?;

    Ok(())
}

// Get the path to the config file
#[must_use]
pub fn get_config_file_path() -> PathBuf {
    // Check for environment variable override
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(path);
    }

    // Otherwise use default path in user's config directory
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("reaction_speed").join("config.toml")
    } else {
        // Fallback to local directory
        PathBuf::from(CONFIG_FILE_PATH)
    }
}

// Custom error type for configuration operations
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialize(err)
    }
}
