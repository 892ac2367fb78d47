//! PlaceScout Store
//!
//! Persists pipeline output as pretty-printed JSON files in a results
//! directory and serves them back for listing and download.
//!
//! [`ResultStore`] implements the scanner's [`ResultSink`](placescout_scanner::ResultSink),
//! so a pipeline run writes its discovery checkpoint and final batch directly.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod files;
mod sink;

pub use error::{Result, StoreError};
pub use files::{DiscoverySnapshot, ResultStore, StoredFile};
