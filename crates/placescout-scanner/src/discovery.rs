//! Incremental-scroll discovery over a dynamically loading results feed.
//!
//! The feed gives no signal when it has finished loading, so discovery
//! scrolls by a fixed step, waits a fixed settle interval, and samples
//! whatever entries are rendered. It stops once the number of distinct
//! entries has not grown for a configured number of consecutive samples.
//! A slow feed can therefore be under-sampled; raise the settle interval or
//! the stability threshold when that happens.

use crate::error::{Result, ScanError};
use placescout_browser::BrowserActions;
use placescout_core::{DiscoveryConfig, DiscoveryEntry};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;

/// Tunables for one discovery run.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    pub feed_selector: String,
    pub entry_selector: String,
    pub scroll_step: u32,
    pub scroll_interval: Duration,
    pub max_unchanged_scrolls: u32,
    pub feed_wait: Duration,
    pub navigation_timeout: Duration,
}

impl From<&DiscoveryConfig> for DiscoveryOptions {
    fn from(config: &DiscoveryConfig) -> Self {
        Self {
            feed_selector: config.feed_selector.clone(),
            entry_selector: config.entry_selector.clone(),
            scroll_step: config.scroll_step,
            scroll_interval: config.scroll_interval(),
            max_unchanged_scrolls: config.max_unchanged_scrolls,
            feed_wait: config.feed_wait(),
            navigation_timeout: config.navigation_timeout(),
        }
    }
}

/// Accumulates distinct entries across samples and tracks feed stability.
#[derive(Debug)]
pub struct FeedTracker {
    entries: Vec<DiscoveryEntry>,
    seen: HashSet<String>,
    unchanged: u32,
    max_unchanged: u32,
}

impl FeedTracker {
    pub fn new(max_unchanged: u32) -> Self {
        Self {
            entries: Vec::new(),
            seen: HashSet::new(),
            unchanged: 0,
            max_unchanged,
        }
    }

    /// Record one sample of rendered entries, returning how many were new.
    pub fn observe<I>(&mut self, sample: I) -> usize
    where
        I: IntoIterator<Item = DiscoveryEntry>,
    {
        let before = self.entries.len();
        for entry in sample {
            if self.seen.insert(entry.name.clone()) {
                self.entries.push(entry);
            }
        }

        let added = self.entries.len() - before;
        if added == 0 {
            self.unchanged += 1;
        } else {
            self.unchanged = 0;
        }
        added
    }

    /// Whether the feed stopped growing for long enough to stop scrolling.
    pub fn is_stable(&self) -> bool {
        self.unchanged >= self.max_unchanged
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<DiscoveryEntry> {
        self.entries
    }
}

/// Read every rendered entry anchor from feed markup.
///
/// Anchors missing a name (`aria-label`) or a link (`href`), or whose
/// values are blank, are skipped. Kept values are not trimmed.
pub fn sample_entries(html: &str, entry_selector: &str) -> Result<Vec<DiscoveryEntry>> {
    let selector = Selector::parse(entry_selector).map_err(|e| ScanError::InvalidSelector {
        selector: entry_selector.to_string(),
        reason: e.to_string(),
    })?;

    let document = Html::parse_document(html);
    let entries = document
        .select(&selector)
        .filter_map(|anchor| {
            let name = anchor.value().attr("aria-label")?;
            let link = anchor.value().attr("href")?;
            if name.trim().is_empty() || link.trim().is_empty() {
                return None;
            }
            Some(DiscoveryEntry::new(name, link))
        })
        .collect();

    Ok(entries)
}

/// Drives one browsing session through the feed.
#[derive(Debug, Clone)]
pub struct DiscoveryLoop {
    options: DiscoveryOptions,
}

impl DiscoveryLoop {
    pub fn new(options: DiscoveryOptions) -> Self {
        Self { options }
    }

    /// Navigate to `search_url` and collect entries until the feed is stable.
    ///
    /// Fails with [`ScanError::FeedNotFound`] if the feed container never
    /// appears. The caller owns the session and closes it.
    pub async fn run<S>(&self, session: &S, search_url: &str) -> Result<Vec<DiscoveryEntry>>
    where
        S: BrowserActions + ?Sized,
    {
        let opts = &self.options;

        session.navigate(search_url, opts.navigation_timeout).await?;
        session
            .wait_for_selector(&opts.feed_selector, opts.feed_wait)
            .await
            .map_err(|e| ScanError::FeedNotFound {
                selector: opts.feed_selector.clone(),
                reason: e.to_string(),
            })?;

        let mut tracker = FeedTracker::new(opts.max_unchanged_scrolls);
        let mut iteration: u64 = 0;

        while !tracker.is_stable() {
            session.scroll_by(&opts.feed_selector, opts.scroll_step).await?;
            tokio::time::sleep(opts.scroll_interval).await;

            let html = session.content().await?;
            let added = tracker.observe(sample_entries(&html, &opts.entry_selector)?);
            iteration += 1;

            tracing::debug!(iteration, added, total = tracker.len(), "Sampled feed");
        }

        tracing::info!(
            iterations = iteration,
            total = tracker.len(),
            "Feed stable, discovery finished"
        );
        Ok(tracker.into_entries())
    }
}
