//! Configuration management for PlaceScout.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. Every section falls back to defaults,
//! so a partial file only needs the values it changes.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration.
///
/// This is loaded from `~/.config/placescout/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Feed discovery settings
    pub discovery: DiscoveryConfig,
    /// Enrichment pool settings
    pub scanning: ScanningConfig,
    /// Detail page field selectors
    pub selectors: DetailSelectors,
    /// Browser automation settings
    pub browser: BrowserConfig,
    /// Result file settings
    pub output: OutputConfig,
    /// HTTP API settings
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from the default location, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if not found.
    pub fn load_from(config_path: &Path) -> ConfigResult<Self> {
        let config: Self = if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(config_path)?;
            toml::from_str(&contents)?
        } else {
            tracing::debug!("Config file not found, using defaults");
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Uses `path` when given, the default location otherwise. Supports:
    /// - `PLACESCOUT_HEADLESS`: Override browser headless mode (true/false)
    /// - `PLACESCOUT_CONCURRENCY`: Override the enrichment pool size
    /// - `PLACESCOUT_OUTPUT_DIR`: Override the result file directory
    /// - `PORT`: Override the HTTP API port
    pub fn load_with_env(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production).
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(headless) = lookup("PLACESCOUT_HEADLESS").and_then(|v| v.parse().ok()) {
            self.browser.headless = headless;
            tracing::debug!("Override browser.headless from env: {}", headless);
        }

        if let Some(concurrency) = lookup("PLACESCOUT_CONCURRENCY").and_then(|v| v.parse().ok()) {
            self.scanning.concurrency = concurrency;
            tracing::debug!("Override scanning.concurrency from env: {}", concurrency);
        }

        if let Some(dir) = lookup("PLACESCOUT_OUTPUT_DIR") {
            tracing::debug!("Override output.dir from env: {}", dir);
            self.output.dir = PathBuf::from(dir);
        }

        if let Some(port) = lookup("PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
            tracing::debug!("Override server.port from env: {}", port);
        }
    }

    /// Check values the pipeline cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scanning.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scanning.concurrency".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.discovery.max_unchanged_scrolls == 0 {
            return Err(ConfigError::InvalidValue {
                field: "discovery.max_unchanged_scrolls".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if !self.discovery.search_url_template.contains("{query}") {
            return Err(ConfigError::InvalidValue {
                field: "discovery.search_url_template".to_string(),
                reason: "must contain a {query} placeholder".to_string(),
            });
        }

        let longest_navigation = self
            .discovery
            .navigation_timeout_secs
            .max(self.scanning.detail_timeout_secs)
            .max(self.scanning.website_timeout_secs);
        if self.browser.request_timeout_secs < longest_navigation {
            return Err(ConfigError::InvalidValue {
                field: "browser.request_timeout_secs".to_string(),
                reason: format!(
                    "must be at least the longest navigation timeout ({longest_navigation}s)"
                ),
            });
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/placescout/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "placescout", "placescout")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Feed discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Search URL with a `{query}` placeholder for the formatted query
    pub search_url_template: String,
    /// Selector of the scrollable results feed
    pub feed_selector: String,
    /// Selector of one entry anchor inside the feed
    pub entry_selector: String,
    /// Pixels scrolled per iteration
    pub scroll_step: u32,
    /// Settle delay after each scroll in milliseconds
    pub scroll_interval_ms: u64,
    /// Consecutive samples without growth before discovery stops
    pub max_unchanged_scrolls: u32,
    /// How long to wait for the feed container to appear, in seconds
    pub feed_wait_secs: u64,
    /// Search page navigation timeout in seconds
    pub navigation_timeout_secs: u64,
}

impl DiscoveryConfig {
    /// Settle delay after each scroll.
    #[must_use]
    pub fn scroll_interval(&self) -> Duration {
        Duration::from_millis(self.scroll_interval_ms)
    }

    /// Feed container wait timeout.
    #[must_use]
    pub fn feed_wait(&self) -> Duration {
        Duration::from_secs(self.feed_wait_secs)
    }

    /// Search page navigation timeout.
    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            search_url_template: "https://www.google.com/maps/search/{query}/".to_string(),
            feed_selector: r#"[role="feed"]"#.to_string(),
            entry_selector: "a.hfpxzc".to_string(),
            scroll_step: 500,
            scroll_interval_ms: 2000,
            max_unchanged_scrolls: 5,
            feed_wait_secs: 10,
            navigation_timeout_secs: 60,
        }
    }
}

/// Enrichment pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// Number of concurrent workers, one browsing session each
    pub concurrency: usize,
    /// Extra attempts after a failed detail fetch
    pub retry_limit: u32,
    /// Fixed delay between detail fetch attempts in milliseconds
    pub retry_delay_ms: u64,
    /// Detail page navigation timeout in seconds
    pub detail_timeout_secs: u64,
    /// External website navigation timeout in seconds
    pub website_timeout_secs: u64,
    /// Settle delay after the detail page loads in milliseconds
    pub detail_settle_ms: u64,
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            concurrency: 3,
            retry_limit: 2,
            retry_delay_ms: 5000,
            detail_timeout_secs: 60,
            website_timeout_secs: 30,
            detail_settle_ms: 2000,
        }
    }
}

/// CSS selectors for the detail page fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSelectors {
    /// First match is the address
    pub address: String,
    /// First match is the website
    pub website: String,
    /// Candidate blocks scanned for a phone number
    pub phone_candidates: String,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self {
            address: "div.rogA2c div.Io6YTe.fontBodyMedium:not(.ITvuef)".to_string(),
            website: "div.rogA2c.ITvuef div.Io6YTe.fontBodyMedium".to_string(),
            phone_candidates: "div.rogA2c div.Io6YTe.fontBodyMedium".to_string(),
        }
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Launch Chromium with `--no-sandbox`
    pub no_sandbox: bool,
    /// Browser window and viewport width
    pub window_width: u32,
    /// Browser window and viewport height
    pub window_height: u32,
    /// User agent applied to every session
    pub user_agent: String,
    /// Extra Chromium command line switches
    pub extra_args: Vec<String>,
    /// Upper bound Chromium applies to any single CDP request, navigations
    /// included, in seconds. Must cover every navigation timeout.
    pub request_timeout_secs: u64,
}

impl BrowserConfig {
    /// CDP request timeout handed to Chromium.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            no_sandbox: true,
            window_width: 1920,
            window_height: 1080,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            extra_args: vec![
                "--disable-setuid-sandbox".to_string(),
                "--disable-accelerated-2d-canvas".to_string(),
                "--disable-gpu".to_string(),
            ],
            request_timeout_secs: 90,
        }
    }
}

/// Result file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding `*_initial.json` and `*_final.json` files
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

/// HTTP API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}
