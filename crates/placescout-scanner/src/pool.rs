//! Enrichment pool for visiting discovered entries.
//!
//! This module provides the `EnrichmentPool`, a fixed number of workers that
//! each own one browsing session and process one entry at a time: detail page
//! first, then the external website when one is listed. Detail failures are
//! retried with a fixed delay; website failures are contained.

use crate::contacts::extract_contacts;
use crate::detail::DetailExtractor;
use placescout_browser::{normalize_website_url, BrowserActions, BrowserError, SessionFactory};
use placescout_core::{ContactFacts, DetailRecord, DiscoveryEntry, EnrichedRecord, ScanningConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

/// Fixed-delay retry policy for detail page fetches.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure
    pub retry_limit: u32,
    /// Pause before each retry
    pub delay: Duration,
}

impl RetryPolicy {
    /// Total attempts, first one included.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.retry_limit + 1
    }

    /// Whether a failure on `attempt` (1-based) should be retried.
    #[must_use]
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt <= self.retry_limit
    }
}

/// Enrichment pool settings.
#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Number of workers, one session each
    pub concurrency: usize,
    /// Detail fetch retry policy
    pub retry: RetryPolicy,
    /// Detail page navigation timeout
    pub detail_timeout: Duration,
    /// External website navigation timeout
    pub website_timeout: Duration,
    /// Wait after the detail page loads before reading it
    pub detail_settle: Duration,
}

impl From<&ScanningConfig> for PoolOptions {
    fn from(config: &ScanningConfig) -> Self {
        Self {
            concurrency: config.concurrency.max(1),
            retry: RetryPolicy {
                retry_limit: config.retry_limit,
                delay: Duration::from_millis(config.retry_delay_ms),
            },
            detail_timeout: Duration::from_secs(config.detail_timeout_secs),
            website_timeout: Duration::from_secs(config.website_timeout_secs),
            detail_settle: Duration::from_millis(config.detail_settle_ms),
        }
    }
}

/// One queued entry, tagged with its discovery position.
#[derive(Debug)]
struct Job {
    index: usize,
    entry: DiscoveryEntry,
}

/// Enriches discovered entries with a fixed number of concurrent workers.
pub struct EnrichmentPool<F: SessionFactory> {
    factory: Arc<F>,
    extractor: Arc<DetailExtractor>,
    options: PoolOptions,
}

impl<F> EnrichmentPool<F>
where
    F: SessionFactory + 'static,
{
    /// Create a new pool opening sessions from `factory`.
    #[must_use]
    pub fn new(factory: Arc<F>, extractor: DetailExtractor, options: PoolOptions) -> Self {
        Self {
            factory,
            extractor: Arc::new(extractor),
            options,
        }
    }

    /// Enrich every entry, returning exactly one record per entry in
    /// discovery order.
    pub async fn enrich(&self, entries: Vec<DiscoveryEntry>) -> Vec<EnrichedRecord> {
        if entries.is_empty() {
            return Vec::new();
        }

        let workers = self.options.concurrency.clamp(1, entries.len());
        let (job_tx, job_rx) = mpsc::channel::<Job>(workers * 2);
        let job_rx = Arc::new(Mutex::new(job_rx));
        let (record_tx, mut record_rx) = mpsc::unbounded_channel::<(usize, EnrichedRecord)>();

        tracing::info!(
            entries = entries.len(),
            workers,
            "Starting enrichment pool"
        );

        let mut tasks = JoinSet::new();
        for id in 0..workers {
            let worker = Worker {
                id,
                factory: Arc::clone(&self.factory),
                extractor: Arc::clone(&self.extractor),
                options: self.options.clone(),
                session: None,
            };
            tasks.spawn(worker.run(Arc::clone(&job_rx), record_tx.clone()));
        }
        drop(record_tx);

        for (index, entry) in entries.iter().cloned().enumerate() {
            if job_tx.send(Job { index, entry }).await.is_err() {
                tracing::error!("All enrichment workers exited before the queue was drained");
                break;
            }
        }
        drop(job_tx);

        let mut slots: Vec<Option<EnrichedRecord>> = vec![None; entries.len()];
        while let Some((index, record)) = record_rx.recv().await {
            slots[index] = Some(record);
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Enrichment worker terminated abnormally: {}", e);
            }
        }

        let records: Vec<EnrichedRecord> = slots
            .into_iter()
            .zip(&entries)
            .map(|(slot, entry)| {
                slot.unwrap_or_else(|| {
                    EnrichedRecord::failed(entry, "worker terminated before finishing this entry")
                })
            })
            .collect();

        let succeeded = records.iter().filter(|r| r.is_success()).count();
        tracing::info!(
            total = records.len(),
            succeeded,
            failed = records.len() - succeeded,
            "Enrichment pool drained"
        );

        records
    }
}

/// A pool worker and the session it owns.
struct Worker<F: SessionFactory> {
    id: usize,
    factory: Arc<F>,
    extractor: Arc<DetailExtractor>,
    options: PoolOptions,
    session: Option<F::Session>,
}

impl<F: SessionFactory> Worker<F> {
    async fn run(
        mut self,
        jobs: Arc<Mutex<mpsc::Receiver<Job>>>,
        records: mpsc::UnboundedSender<(usize, EnrichedRecord)>,
    ) {
        loop {
            let job = jobs.lock().await.recv().await;
            let Some(Job { index, entry }) = job else {
                break;
            };

            let record = self.process(&entry).await;
            if records.send((index, record)).is_err() {
                break;
            }
        }

        self.release_session().await;
        tracing::debug!(worker = self.id, "Worker finished");
    }

    async fn process(&mut self, entry: &DiscoveryEntry) -> EnrichedRecord {
        tracing::info!(worker = self.id, "Processing details for: {}", entry.name);

        let detail = match self.fetch_detail_with_retry(entry).await {
            Ok(detail) => detail,
            Err(e) => {
                tracing::error!("Error processing {}: {}", entry.name, e);
                return EnrichedRecord::failed(entry, e.to_string());
            }
        };

        let website_data = if detail.has_website() {
            self.website_contacts(entry, &detail.website).await
        } else {
            tracing::debug!("No website listed for {}", entry.name);
            ContactFacts::default()
        };

        tracing::info!(worker = self.id, "Completed processing: {}", entry.name);
        EnrichedRecord::success(entry, detail, website_data)
    }

    /// Fetch the detail page, retrying on a fresh session after each failure.
    async fn fetch_detail_with_retry(
        &mut self,
        entry: &DiscoveryEntry,
    ) -> Result<DetailRecord, BrowserError> {
        let retry = self.options.retry;
        let mut attempt = 1;

        loop {
            match self.fetch_detail(entry).await {
                Ok(detail) => return Ok(detail),
                Err(e) => {
                    self.release_session().await;

                    if !retry.should_retry(attempt) {
                        return Err(e);
                    }

                    tracing::warn!(
                        "Detail fetch failed for {} (attempt {}/{}), retrying in {:?}: {}",
                        entry.name,
                        attempt,
                        retry.max_attempts(),
                        retry.delay,
                        e
                    );
                    tokio::time::sleep(retry.delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn fetch_detail(&mut self, entry: &DiscoveryEntry) -> Result<DetailRecord, BrowserError> {
        let timeout = self.options.detail_timeout;
        let settle = self.options.detail_settle;

        let session = self.session().await?;
        session.navigate(&entry.link, timeout).await?;
        tokio::time::sleep(settle).await;
        let html = session.content().await?;

        Ok(self.extractor.extract(&html))
    }

    /// Contact facts from the external website; failures yield empty facts.
    async fn website_contacts(&mut self, entry: &DiscoveryEntry, website: &str) -> ContactFacts {
        tracing::info!(worker = self.id, "Processing website for: {}", entry.name);

        match self.fetch_website(website).await {
            Ok(facts) => facts,
            Err(e) => {
                tracing::warn!("Error processing website for {}: {}", entry.name, e);
                self.release_session().await;
                ContactFacts::default()
            }
        }
    }

    async fn fetch_website(&mut self, website: &str) -> Result<ContactFacts, BrowserError> {
        let url = normalize_website_url(website)?;
        let timeout = self.options.website_timeout;

        let session = self.session().await?;
        session.navigate(&url, timeout).await?;
        let html = session.content().await?;

        Ok(extract_contacts(&html))
    }

    /// The worker's session, opened on first use.
    async fn session(&mut self) -> Result<&F::Session, BrowserError> {
        let session = match self.session.take() {
            Some(session) => session,
            None => {
                tracing::debug!(worker = self.id, "Opening browsing session");
                self.factory.open_session().await?
            }
        };
        Ok(self.session.insert(session))
    }

    async fn release_session(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = session.close().await {
                tracing::debug!(worker = self.id, "Failed to close session: {}", e);
            }
        }
    }
}
