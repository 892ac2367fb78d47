//! PlaceScout Core - Foundation crate for the PlaceScout directory crawler.
//!
//! This crate provides the shared data model, error handling and configuration
//! management that the browser, scanner and store crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - Shared records (`SearchQuery`, `DiscoveryEntry`, `EnrichedRecord`, `ResultBatch`)
//!
//! # Example
//!
//! ```rust
//! use placescout_core::{AppConfig, SearchQuery};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let query = SearchQuery::new("dentist chicago")?;
//! assert_eq!(query.formatted(), "dentist+chicago");
//! assert_eq!(config.scanning.concurrency, 3);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    AppConfig, BrowserConfig, DetailSelectors, DiscoveryConfig, OutputConfig, ScanningConfig,
    ServerConfig,
};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use types::{
    ContactFacts, DetailRecord, DiscoveryEntry, EnrichedRecord, FailedRecord, ResultBatch,
    SearchQuery, SocialLinks, SocialPlatform, SuccessRecord, NOT_AVAILABLE,
};
