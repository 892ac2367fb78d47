//! Discovery and enrichment pipeline for map search results.
//!
//! A run discovers entries by scrolling the results feed until it stops
//! growing, then visits every entry with a bounded pool of browsing
//! sessions to pull contact details from its detail page and website.
//!
//! Extractors work on plain markup strings:
//!
//! ```rust
//! use placescout_scanner::extract_contacts;
//!
//! let facts = extract_contacts(r#"<a href="mailto:hi@cafe.example">hi@cafe.example</a>"#);
//! assert_eq!(facts.emails, vec!["hi@cafe.example"]);
//! assert!(facts.social_media.facebook.is_empty());
//! ```

pub mod aggregator;
pub mod contacts;
pub mod detail;
pub mod discovery;
pub mod error;
pub mod pipeline;
pub mod pool;
pub mod sink;

pub use aggregator::aggregate;
pub use contacts::extract_contacts;
pub use detail::DetailExtractor;
pub use discovery::{sample_entries, DiscoveryLoop, DiscoveryOptions, FeedTracker};
pub use error::{Result, ScanError};
pub use pipeline::Pipeline;
pub use pool::{EnrichmentPool, PoolOptions, RetryPolicy};
pub use sink::ResultSink;
