//! Application configuration management.
//!
//! This module handles the persistent configuration for trim-studio: where the
//! ffmpeg tools live, where trimmed files go by default, and how the player
//! recovers from audio engine faults. Configuration is stored in the user's
//! config directory (typically ~/.config/trim-studio/config.toml). Missing keys
//! fall back to their defaults, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::playback::RecoveryPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,
    /// Default export folder; the current directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    #[serde(default = "default_max_load_retries")]
    pub max_load_retries: u32,
    #[serde(default = "default_load_retry_delay_ms")]
    pub load_retry_delay_ms: u64,
    #[serde(default)]
    pub recreate_engine_on_retry: bool,
    #[serde(default = "default_repair_delay_ms")]
    pub repair_delay_ms: u64,
    #[serde(default)]
    pub reload_on_stale_resume: bool,
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_max_load_retries() -> u32 {
    1
}

fn default_load_retry_delay_ms() -> u64 {
    300
}

fn default_repair_delay_ms() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            output_dir: None,
            max_load_retries: default_max_load_retries(),
            load_retry_delay_ms: default_load_retry_delay_ms(),
            recreate_engine_on_retry: false,
            repair_delay_ms: default_repair_delay_ms(),
            reload_on_stale_resume: false,
        }
    }

    pub fn config_dir() -> Result<PathBuf, Box<dyn Error>> {
        // Check for XDG_CONFIG_HOME first (useful for testing)
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config).join("trim-studio")
        } else {
            dirs::config_dir()
                .ok_or("Unable to find config directory")?
                .join("trim-studio")
        };
        Ok(config_dir)
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn Error>> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self, Box<dyn Error>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            // Return default config instead of error
            return Ok(Default::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()?;
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(&config_path, toml_string)?;

        Ok(())
    }

    pub fn exists() -> Result<bool, Box<dyn Error>> {
        Ok(Self::config_path()?.exists())
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        match key {
            "ffmpeg_path" => self.ffmpeg_path = value.to_string(),
            "ffprobe_path" => self.ffprobe_path = value.to_string(),
            "output_dir" => {
                self.output_dir = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            "max_load_retries" => self.max_load_retries = parse_number(key, value)?,
            "load_retry_delay_ms" => self.load_retry_delay_ms = parse_number(key, value)?,
            "repair_delay_ms" => self.repair_delay_ms = parse_number(key, value)?,
            "recreate_engine_on_retry" => self.recreate_engine_on_retry = parse_bool(value)?,
            "reload_on_stale_resume" => self.reload_on_stale_resume = parse_bool(value)?,
            _ => return Err(format!("Unknown configuration key: {key}").into()),
        }
        Ok(())
    }

    /// Tilde-expanded default export folder.
    pub fn output_dir_path(&self) -> Option<PathBuf> {
        self.output_dir
            .as_deref()
            .map(|dir| PathBuf::from(shellexpand::tilde(dir).as_ref()))
    }

    pub fn ffmpeg(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.ffmpeg_path).as_ref())
    }

    pub fn ffprobe(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.ffprobe_path).as_ref())
    }

    pub fn recovery_policy(&self) -> RecoveryPolicy {
        RecoveryPolicy {
            max_load_retries: self.max_load_retries,
            retry_delay: Duration::from_millis(self.load_retry_delay_ms),
            recreate_before_retry: self.recreate_engine_on_retry,
            repair_delay: Duration::from_millis(self.repair_delay_ms),
            reload_on_stale_resume: self.reload_on_stale_resume,
        }
    }
}

fn parse_number<N: std::str::FromStr>(key: &str, value: &str) -> Result<N, Box<dyn Error>> {
    value
        .parse::<N>()
        .map_err(|_| format!("Value for {key} must be a non-negative number").into())
}

fn parse_bool(value: &str) -> Result<bool, Box<dyn Error>> {
    Ok(value
        .parse::<bool>()
        .map_err(|_| "Value must be 'true' or 'false'")?)
}
