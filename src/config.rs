use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{NotifyError, Result};

pub const DEFAULT_NUM_MESSAGES: usize = 3;
pub const DEFAULT_MAX_BODY_LENGTH: usize = 1000;
pub const DEFAULT_SPLIT_LONG_MESSAGES: bool = true;
pub const DEFAULT_TITLE_TEMPLATE: &str = "claude code task completed {GIT_REPO} {GIT_BRANCH}";
pub const DEFAULT_API_URL: &str = "https://api.pushbullet.com/v2/pushes";

/// Hook configuration loaded from ~/.claude/config/pushbullet-notify.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub notification: NotificationConfig,
    pub pushbullet: PushbulletConfig,
    pub logging: LoggingConfig,
}

/// `[notification]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Number of trailing assistant messages used for the default body
    pub num_messages: usize,
    /// Maximum body length of a single push
    pub max_body_length: usize,
    pub split_long_messages: bool,
    /// Pause between the parts of a split notification
    pub split_delay_ms: u64,
    pub title_template: Option<String>,
    pub body_template: Option<String>,
    /// IANA timezone name used for the time variables
    pub timezone: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            num_messages: DEFAULT_NUM_MESSAGES,
            max_body_length: DEFAULT_MAX_BODY_LENGTH,
            split_long_messages: DEFAULT_SPLIT_LONG_MESSAGES,
            split_delay_ms: 0,
            title_template: None,
            body_template: None,
            timezone: None,
        }
    }
}

impl NotificationConfig {
    /// Title template, falling back to the built-in one
    pub fn title_template(&self) -> &str {
        self.title_template
            .as_deref()
            .unwrap_or(DEFAULT_TITLE_TEMPLATE)
    }
}

/// `[pushbullet]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PushbulletConfig {
    pub token: Option<String>,
    pub api_url: String,
}

impl Default for PushbulletConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl PushbulletConfig {
    /// Resolve the access token: `PUSHBULLET_TOKEN` wins over the config file.
    pub fn resolve_token(&self) -> Option<String> {
        std::env::var("PUSHBULLET_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.token.clone().filter(|t| !t.is_empty()))
    }
}

/// `[logging]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub debug: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            debug: true,
            log_file: None,
        }
    }
}

impl Config {
    /// Load config from the standard location
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_path())
    }

    /// Load config from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                NotifyError::Config(format!("Failed to read config file: {}", e))
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                NotifyError::Config(format!("Failed to parse config TOML: {}", e))
            })?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Get the standard config file path
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".claude")
            .join("config")
            .join("pushbullet-notify.toml")
    }
}

// ============================================================================
// Tests
// ============================================================================
