//! Application configuration loaded from `~/.config/looptube/config.toml`.

use crate::error::{CoreError, Result};
use crate::paths;
use crate::share::DEFAULT_VIDEO_ID;
use const_format::concatcp;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LooptubeConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub share: ShareConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Playback and loop-controller tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Interval of the loop-boundary poll in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Offset applied by the seek-backward/forward shortcuts, in seconds
    #[serde(default = "default_seek_step")]
    pub seek_step_secs: f64,
    /// Lowest selectable playback rate
    #[serde(default = "default_rate_min")]
    pub rate_min: f64,
    /// Highest selectable playback rate
    #[serde(default = "default_rate_max")]
    pub rate_max: f64,
    /// Step applied by the rate-up/down shortcuts
    #[serde(default = "default_rate_step")]
    pub rate_step: f64,
}

const fn default_poll_interval() -> u64 {
    250
}

const fn default_seek_step() -> f64 {
    5.0
}

const fn default_rate_min() -> f64 {
    0.25
}

const fn default_rate_max() -> f64 {
    2.0
}

const fn default_rate_step() -> f64 {
    0.05
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            seek_step_secs: default_seek_step(),
            rate_min: default_rate_min(),
            rate_max: default_rate_max(),
            rate_step: default_rate_step(),
        }
    }
}

/// Shareable-URL composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Base URL the share button composes video/sections parameters onto
    #[serde(default = "default_share_base_url")]
    pub base_url: String,
}

fn default_share_base_url() -> String {
    "https://looptube.app/".to_string()
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: default_share_base_url(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to a file in the config directory in addition to stderr
    #[serde(default)]
    pub enabled: bool,
}

impl LooptubeConfig {
    /// Path of the config file.
    #[must_use]
    pub fn config_path() -> PathBuf {
        paths::config_path()
    }

    /// Load the config file, creating a commented template on first run.
    ///
    /// A freshly created template parses to the defaults, so first run
    /// proceeds without restarting. Validation failures and TOML syntax
    /// errors are returned for the caller to report.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed,
    /// or when the template cannot be written.
    pub fn load_or_create() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, CONFIG_TEMPLATE)?;
            tracing::info!("Created config template at {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` when a field is out of its documented range.
    pub fn validate(&self) -> Result<()> {
        if self.playback.poll_interval_ms == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "playback.poll_interval_ms must be greater than 0".to_string(),
            });
        }
        if self.playback.rate_min <= 0.0 || self.playback.rate_max <= self.playback.rate_min {
            return Err(CoreError::ConfigInvalid {
                message: "playback rate bounds must satisfy 0 < rate_min < rate_max".to_string(),
            });
        }
        if self.playback.rate_step <= 0.0 {
            return Err(CoreError::ConfigInvalid {
                message: "playback.rate_step must be greater than 0".to_string(),
            });
        }
        if self.playback.seek_step_secs <= 0.0 {
            return Err(CoreError::ConfigInvalid {
                message: "playback.seek_step_secs must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Commented template written on first run.
pub const CONFIG_TEMPLATE: &str = concatcp!(
    r"# looptube configuration
# All values are optional; the defaults below match the built-in behavior.

[playback]
# Interval of the loop-boundary poll in milliseconds
poll_interval_ms = ",
    default_poll_interval(),
    r"
# Offset applied by the seek-backward/forward shortcuts, in seconds
seek_step_secs = 5.0
# Playback rate bounds and shortcut step
rate_min = 0.25
rate_max = 2.0
rate_step = 0.05

[share]
# Base URL the share button composes video/sections parameters onto
",
    "base_url = \"https://looptube.app/\"\n",
    r#"
[logging]
# Write logs to a file in the config directory in addition to stderr
enabled = false

# The default video loaded when no shareable URL is supplied is "#,
    DEFAULT_VIDEO_ID,
    "\n"
);
