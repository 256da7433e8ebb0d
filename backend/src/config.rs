//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ChatError;

/// Default chat endpoint of the local backend
pub const DEFAULT_API_ENDPOINT: &str = "http://localhost:8085/api/chat";

/// Path of the configuration API on the backend's origin
pub const CONFIG_API_PATH: &str = "/api/config";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Chat backend configuration
    pub chat: ChatConfig,
    /// Local storage configuration
    pub storage: StorageConfig,
}

/// Chat backend configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Endpoint that receives chat messages
    pub api_endpoint: String,
    /// Timeout for sending a message (in seconds)
    pub send_timeout_secs: u64,
    /// Timeout for fetching remote history (in seconds)
    pub history_timeout_secs: u64,
    /// Timeout for pushing the server configuration (in seconds)
    pub config_timeout_secs: u64,
}

/// Local storage configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding persisted state and exports
    pub data_dir: PathBuf,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            send_timeout_secs: 60,
            history_timeout_secs: 5,
            config_timeout_secs: 10,
        }
    }
}

impl ChatConfig {
    /// Timeout applied to message sends
    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }

    /// Timeout applied to history fetches
    pub fn history_timeout(&self) -> Duration {
        Duration::from_secs(self.history_timeout_secs)
    }

    /// Timeout applied to configuration pushes
    pub fn config_timeout(&self) -> Duration {
        Duration::from_secs(self.config_timeout_secs)
    }
}

impl StorageConfig {
    /// Directory for exported transcripts when no save dialog is available
    pub fn exports_dir(&self) -> PathBuf {
        self.data_dir.join("exports")
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Unset or unparsable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ChatConfig::default();
        let secs = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };

        Self {
            chat: ChatConfig {
                api_endpoint: lookup("CHAT_API_ENDPOINT")
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .unwrap_or(defaults.api_endpoint),
                send_timeout_secs: secs("CHAT_SEND_TIMEOUT_SECS", defaults.send_timeout_secs),
                history_timeout_secs: secs(
                    "CHAT_HISTORY_TIMEOUT_SECS",
                    defaults.history_timeout_secs,
                ),
                config_timeout_secs: secs(
                    "CHAT_CONFIG_TIMEOUT_SECS",
                    defaults.config_timeout_secs,
                ),
            },
            storage: StorageConfig {
                data_dir: lookup("CHAT_DESK_DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| {
                        // Default to ~/.chat-desk or current directory
                        if let Some(home) = lookup("HOME") {
                            PathBuf::from(home).join(".chat-desk")
                        } else {
                            PathBuf::from(".chat-desk")
                        }
                    }),
            },
        }
    }
}

/// Derive the configuration endpoint from the chat endpoint
///
/// The configuration API lives on the same origin as the chat endpoint, at
/// [`CONFIG_API_PATH`].
pub fn config_endpoint(api_endpoint: &str) -> Result<String, ChatError> {
    let url = reqwest::Url::parse(api_endpoint)
        .map_err(|e| ChatError::Other(format!("Invalid endpoint {}: {}", api_endpoint, e)))?;
    let joined = url
        .join(CONFIG_API_PATH)
        .map_err(|e| ChatError::Other(format!("Invalid endpoint {}: {}", api_endpoint, e)))?;
    Ok(joined.to_string())
}
