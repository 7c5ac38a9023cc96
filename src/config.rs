//! Configuration management for pdff-editor using the prefer crate.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_API_URL;
use crate::editor::{EditorSettings, DEFAULT_NAVIGATION_FILTER};

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the document backend API.
    pub api_url: String,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// User agent for HTTP requests (None = built-in default).
    pub user_agent: Option<String>,
    /// Queue filter used for prev/next navigation.
    pub navigation_filter: String,
    /// Field-level input debounce in milliseconds.
    pub field_debounce_ms: u64,
    /// Controller-level preview debounce in milliseconds.
    pub preview_debounce_ms: u64,
    /// How long error banners stay visible, in milliseconds.
    pub banner_ms: u64,
    /// How long the "saved" confirmation stays visible, in milliseconds.
    pub save_feedback_ms: u64,
    /// Directory for the interactive editor's log file.
    pub log_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let log_dir = dirs::cache_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("pdff-editor");

        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: 30,
            user_agent: None,
            navigation_filter: DEFAULT_NAVIGATION_FILTER.to_string(),
            field_debounce_ms: 300,
            preview_debounce_ms: 500,
            banner_ms: 5000,
            save_feedback_ms: 2000,
            log_dir,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Path of the interactive editor's log file.
    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join("editor.log")
    }

    /// Controller timing derived from these settings.
    pub fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            field_debounce: Duration::from_millis(self.field_debounce_ms),
            preview_debounce: Duration::from_millis(self.preview_debounce_ms),
            banner_duration: Duration::from_millis(self.banner_ms),
            save_feedback_duration: Duration::from_millis(self.save_feedback_ms),
            navigation_filter: self.navigation_filter.clone(),
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API base URL.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub request_timeout: Option<u64>,
    /// User agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Navigation queue filter.
    #[serde(default)]
    pub navigation_filter: Option<String>,
    #[serde(default)]
    pub field_debounce_ms: Option<u64>,
    #[serde(default)]
    pub preview_debounce_ms: Option<u64>,
    #[serde(default)]
    pub banner_ms: Option<u64>,
    #[serde(default)]
    pub save_feedback_ms: Option<u64>,
    /// Log directory for the interactive editor.
    #[serde(default)]
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration using prefer crate.
    /// Automatically discovers pdff config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("pdff").await {
            Ok(pref_config) => Config {
                api_url: pref_config.get("api_url").ok(),
                request_timeout: pref_config.get("request_timeout").ok(),
                user_agent: pref_config.get("user_agent").ok(),
                navigation_filter: pref_config.get("navigation_filter").ok(),
                field_debounce_ms: pref_config.get("field_debounce_ms").ok(),
                preview_debounce_ms: pref_config.get("preview_debounce_ms").ok(),
                banner_ms: pref_config.get("banner_ms").ok(),
                save_feedback_ms: pref_config.get("save_feedback_ms").ok(),
                log_dir: pref_config.get("log_dir").ok(),
            },
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref api_url) = self.api_url {
            settings.api_url = api_url.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = Some(user_agent.clone());
        }
        if let Some(ref filter) = self.navigation_filter {
            settings.navigation_filter = filter.clone();
        }
        if let Some(ms) = self.field_debounce_ms {
            settings.field_debounce_ms = ms;
        }
        if let Some(ms) = self.preview_debounce_ms {
            settings.preview_debounce_ms = ms;
        }
        if let Some(ms) = self.banner_ms {
            settings.banner_ms = ms;
        }
        if let Some(ms) = self.save_feedback_ms {
            settings.save_feedback_ms = ms;
        }
        if let Some(ref dir) = self.log_dir {
            settings.log_dir = PathBuf::from(dir);
        }
    }
}

/// Load settings from configuration.
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings
}
