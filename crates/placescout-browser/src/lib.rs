//! Browser automation for JavaScript-rendered directory pages.
//!
//! Provides a headless Chromium engine that hands out independent
//! browsing sessions (one tab each), plus the [`BrowserActions`] and
//! [`SessionFactory`] traits the pipeline is written against so it can
//! run on fixture sessions in tests.

pub mod actions;
pub mod engine;
pub mod error;
pub mod profile;
pub mod session;

pub use actions::{normalize_website_url, BrowserActions, SessionFactory};
pub use engine::BrowserEngine;
pub use error::{BrowserError, Result};
pub use profile::SessionProfile;
pub use session::BrowserSession;
