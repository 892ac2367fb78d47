//! Shared types used across PlaceScout.
//!
//! These are the records that flow through the pipeline: the validated
//! query, the entries found during discovery, the per-entry enrichment
//! results and the final batch handed to a sink. Field names serialize
//! in camelCase to match the JSON result files.

use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder stored in place of a detail field that could not be extracted.
pub const NOT_AVAILABLE: &str = "N/A";

/// A validated search query together with its URL-safe form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    formatted: String,
}

impl SearchQuery {
    /// Create a query from operator or request input.
    ///
    /// # Errors
    /// Returns `CoreError::EmptyQuery` if the input is empty or whitespace-only.
    pub fn new(raw: impl Into<String>) -> Result<Self, CoreError> {
        let raw = raw.into();
        let words: Vec<&str> = raw.split_whitespace().collect();
        if words.is_empty() {
            return Err(CoreError::EmptyQuery);
        }

        // Spaces serialize as '+', everything outside the unreserved set is percent-encoded
        let formatted = url::form_urlencoded::byte_serialize(words.join(" ").as_bytes()).collect();

        Ok(Self { raw, formatted })
    }

    /// The query as the operator typed it.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The URL-safe token, also used to name result files.
    #[must_use]
    pub fn formatted(&self) -> &str {
        &self.formatted
    }

    /// Substitute the formatted query into a `{query}` URL template.
    #[must_use]
    pub fn search_url(&self, template: &str) -> String {
        template.replace("{query}", &self.formatted)
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// One result found in the feed, identified by its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscoveryEntry {
    /// Display name, unique within one discovery run
    pub name: String,
    /// Link to the entry's detail page
    pub link: String,
}

impl DiscoveryEntry {
    /// Create a new entry.
    pub fn new(name: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
        }
    }
}

/// Fields extracted from a detail page. Missing fields hold [`NOT_AVAILABLE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    /// Street address
    pub address: String,
    /// External website as displayed on the detail page
    pub website: String,
    /// Phone number
    pub phone: String,
}

impl DetailRecord {
    /// A record with every field set to the sentinel.
    #[must_use]
    pub fn not_available() -> Self {
        Self {
            address: NOT_AVAILABLE.to_string(),
            website: NOT_AVAILABLE.to_string(),
            phone: NOT_AVAILABLE.to_string(),
        }
    }

    /// Whether the detail page listed an external website.
    #[must_use]
    pub fn has_website(&self) -> bool {
        !self.website.is_empty() && self.website != NOT_AVAILABLE
    }
}

impl Default for DetailRecord {
    fn default() -> Self {
        Self::not_available()
    }
}

/// Social platforms searched for on external websites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocialPlatform {
    /// facebook.com
    Facebook,
    /// instagram.com
    Instagram,
    /// twitter.com
    Twitter,
    /// linkedin.com company and personal pages
    Linkedin,
}

impl SocialPlatform {
    /// Every supported platform.
    pub const ALL: [Self; 4] = [
        Self::Facebook,
        Self::Instagram,
        Self::Twitter,
        Self::Linkedin,
    ];

    /// Lowercase platform name, as used for JSON keys.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::Twitter => "twitter",
            Self::Linkedin => "linkedin",
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile links found per platform. Every platform is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    /// Facebook page links
    pub facebook: Vec<String>,
    /// Instagram profile links
    pub instagram: Vec<String>,
    /// Twitter profile links
    pub twitter: Vec<String>,
    /// LinkedIn company or personal page links
    pub linkedin: Vec<String>,
}

impl SocialLinks {
    /// Links found for one platform.
    #[must_use]
    pub fn get(&self, platform: SocialPlatform) -> &[String] {
        match platform {
            SocialPlatform::Facebook => &self.facebook,
            SocialPlatform::Instagram => &self.instagram,
            SocialPlatform::Twitter => &self.twitter,
            SocialPlatform::Linkedin => &self.linkedin,
        }
    }

    /// Mutable access to the links of one platform.
    pub fn get_mut(&mut self, platform: SocialPlatform) -> &mut Vec<String> {
        match platform {
            SocialPlatform::Facebook => &mut self.facebook,
            SocialPlatform::Instagram => &mut self.instagram,
            SocialPlatform::Twitter => &mut self.twitter,
            SocialPlatform::Linkedin => &mut self.linkedin,
        }
    }
}

/// Contact facts scraped from an external website.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFacts {
    /// Unique email addresses in first-seen order
    pub emails: Vec<String>,
    /// Unique social profile links per platform
    pub social_media: SocialLinks,
}

impl ContactFacts {
    /// Whether nothing at all was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
            && SocialPlatform::ALL
                .iter()
                .all(|p| self.social_media.get(*p).is_empty())
    }
}

/// A fully enriched entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessRecord {
    /// Entry name from discovery
    pub name: String,
    /// Detail page link from discovery
    pub maps_link: String,
    /// Address, website and phone
    #[serde(flatten)]
    pub detail: DetailRecord,
    /// Facts from the external website, empty when skipped or failed
    pub website_data: ContactFacts,
    /// Completion time of this entry
    pub scraped_at: DateTime<Utc>,
}

/// An entry whose detail page could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedRecord {
    /// Entry name from discovery
    pub name: String,
    /// Detail page link from discovery
    pub maps_link: String,
    /// Last error message
    pub error: String,
    /// Time the entry was given up on
    pub scraped_at: DateTime<Utc>,
}

/// Outcome of enriching one discovered entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnrichedRecord {
    /// Detail extraction succeeded
    Success(SuccessRecord),
    /// Detail extraction failed after all retries
    Failed(FailedRecord),
}

impl EnrichedRecord {
    /// Build a success record stamped with the current time.
    #[must_use]
    pub fn success(entry: &DiscoveryEntry, detail: DetailRecord, website_data: ContactFacts) -> Self {
        Self::Success(SuccessRecord {
            name: entry.name.clone(),
            maps_link: entry.link.clone(),
            detail,
            website_data,
            scraped_at: Utc::now(),
        })
    }

    /// Build a failure record stamped with the current time.
    pub fn failed(entry: &DiscoveryEntry, error: impl Into<String>) -> Self {
        Self::Failed(FailedRecord {
            name: entry.name.clone(),
            maps_link: entry.link.clone(),
            error: error.into(),
            scraped_at: Utc::now(),
        })
    }

    /// Entry name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Success(r) => &r.name,
            Self::Failed(r) => &r.name,
        }
    }

    /// Whether this is a success record.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Error message of a failure record.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failed(r) => Some(&r.error),
        }
    }
}

/// All records of one pipeline run with summary metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultBatch {
    /// Query as entered
    pub search_query: String,
    /// URL-safe query token
    pub formatted_query: String,
    /// Number of records
    pub total_count: usize,
    /// Number of success records
    pub success_count: usize,
    /// Number of failure records
    pub error_count: usize,
    /// Completion time of the run
    pub scraped_at: DateTime<Utc>,
    /// One record per discovered entry
    pub results: Vec<EnrichedRecord>,
}
