// Global configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::RawOptions;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tool: ToolConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Program name or path placed first in compiled commands
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory receiving the playlist and segments
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Playlist base name, without extension
    #[serde(default = "default_output_name")]
    pub output_name: String,

    #[serde(default = "default_codec")]
    pub video_encoder: String,

    #[serde(default = "default_codec")]
    pub audio_encoder: String,

    #[serde(default = "default_segment_seconds")]
    pub segment_seconds: u32,

    /// Key URI written into key info files when encryption is enabled
    #[serde(default = "default_key_uri")]
    pub key_uri: String,
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_output_name() -> String {
    "playlist".to_string()
}

fn default_codec() -> String {
    "copy".to_string()
}

fn default_segment_seconds() -> u32 {
    10
}

fn default_key_uri() -> String {
    "enc.key".to_string()
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            output_name: default_output_name(),
            video_encoder: default_codec(),
            audio_encoder: default_codec(),
            segment_seconds: default_segment_seconds(),
            key_uri: default_key_uri(),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "macos") {
            dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".config")
                .join("hlscmd")
        } else {
            dirs::config_dir()
                .context("Could not determine config directory")?
                .join("hlscmd")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from disk, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();

            // Not fatal: the built-in defaults still apply
            if let Err(e) = config.save_to(&config_path) {
                tracing::warn!("Could not create default config file: {:#}", e);
                tracing::warn!(
                    "Using built-in defaults. Run 'hlscmd init-config' to create a config file."
                );
            }

            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if config.tool.ffmpeg_path.trim().is_empty() {
            tracing::warn!(
                "Empty ffmpeg_path in {}, using '{}'",
                path.display(),
                default_ffmpeg_path()
            );
            config.tool.ffmpeg_path = default_ffmpeg_path();
        }

        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Fill unset option fields from `[defaults]`; explicit values win
    pub fn apply_defaults(&self, raw: RawOptions) -> RawOptions {
        let d = &self.defaults;
        let defaults = RawOptions {
            output_dir: Some(d.output_dir.clone()),
            output_name: Some(d.output_name.clone()),
            video_encoder: Some(d.video_encoder.clone()),
            audio_encoder: Some(d.audio_encoder.clone()),
            segment_seconds: Some(i64::from(d.segment_seconds)),
            key_uri: raw
                .encryption_enabled
                .unwrap_or(false)
                .then(|| d.key_uri.clone()),
            ..RawOptions::default()
        };
        defaults.merge(raw)
    }
}
