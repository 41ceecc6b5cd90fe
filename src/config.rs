//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

/// Poll intervals for server-owned state
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_room_poll")]
    pub room_poll_secs: u64,

    #[serde(default = "default_notification_poll")]
    pub notification_poll_secs: u64,

    #[serde(default = "default_deadline_poll")]
    pub deadline_poll_secs: u64,
}

fn default_room_poll() -> u64 {
    5
}

fn default_notification_poll() -> u64 {
    5
}

fn default_deadline_poll() -> u64 {
    60
}

impl SyncConfig {
    pub fn room_period(&self) -> Duration {
        Duration::from_secs(self.room_poll_secs.max(1))
    }

    pub fn notification_period(&self) -> Duration {
        Duration::from_secs(self.notification_poll_secs.max(1))
    }

    pub fn deadline_period(&self) -> Duration {
        Duration::from_secs(self.deadline_poll_secs.max(1))
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            room_poll_secs: default_room_poll(),
            notification_poll_secs: default_notification_poll(),
            deadline_poll_secs: default_deadline_poll(),
        }
    }
}

/// Room render loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Surface width in cells when stdout is not a terminal
    #[serde(default = "default_width")]
    pub width: usize,

    /// Surface height in cells when stdout is not a terminal
    #[serde(default = "default_height")]
    pub height: usize,

    /// Scene units per terminal cell
    #[serde(default = "default_scale")]
    pub scale: f32,

    /// Camera sway speed in radians per second
    #[serde(default = "default_camera_speed")]
    pub camera_speed: f32,

    /// Camera sway amplitude in scene units
    #[serde(default = "default_camera_sway")]
    pub camera_sway: f32,
}

fn default_fps() -> u32 {
    30
}

fn default_width() -> usize {
    100
}

fn default_height() -> usize {
    30
}

fn default_scale() -> f32 {
    5.0
}

fn default_camera_speed() -> f32 {
    0.5
}

fn default_camera_sway() -> f32 {
    10.0
}

impl RenderConfig {
    /// Duration of one fixed render step
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            width: default_width(),
            height: default_height(),
            scale: default_scale(),
            camera_speed: default_camera_speed(),
            camera_sway: default_camera_sway(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("taskroom").join("config.toml")),
            Some(PathBuf::from("/etc/taskroom/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Backend overrides
        if let Some(url) = var("TASKROOM_BACKEND_URL") {
            self.backend.base_url = url;
        }
        if let Some(timeout) = var("TASKROOM_REQUEST_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse() {
                self.backend.request_timeout_ms = ms;
            }
        }

        // Sync overrides
        if let Some(secs) = var("TASKROOM_ROOM_POLL_SECS") {
            if let Ok(s) = secs.parse() {
                self.sync.room_poll_secs = s;
            }
        }

        // Render overrides
        if let Some(fps) = var("TASKROOM_FPS") {
            if let Ok(f) = fps.parse() {
                self.render.fps = f;
            }
        }

        // Logging overrides
        if let Some(level) = var("TASKROOM_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("TASKROOM_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Taskroom Configuration
#
# Environment variables override these settings:
# - TASKROOM_BACKEND_URL
# - TASKROOM_REQUEST_TIMEOUT_MS
# - TASKROOM_ROOM_POLL_SECS
# - TASKROOM_FPS
# - TASKROOM_LOG_LEVEL
# - TASKROOM_LOG_FORMAT

[backend]
# Task manager backend URL
base_url = "http://localhost:5000"

# Request timeout in milliseconds
request_timeout_ms = 10000

[sync]
# How often the room objects are polled (seconds)
room_poll_secs = 5

# How often pending notifications are polled (seconds)
notification_poll_secs = 5

# How often upcoming deadlines are polled (seconds)
deadline_poll_secs = 60

[render]
# Room redraw rate (frames per second)
fps = 30

# Surface size in cells, used when stdout is not a terminal
width = 100
height = 30

# Scene units per cell
scale = 5.0

# Camera sway speed (radians per second) and amplitude (scene units)
camera_speed = 0.5
camera_sway = 10.0

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
