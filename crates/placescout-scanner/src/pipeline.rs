//! End-to-end run: discovery, enrichment, aggregation, emission.

use crate::aggregator::aggregate;
use crate::detail::DetailExtractor;
use crate::discovery::{DiscoveryLoop, DiscoveryOptions};
use crate::error::Result;
use crate::pool::{EnrichmentPool, PoolOptions};
use crate::sink::ResultSink;
use placescout_browser::{BrowserActions, SessionFactory};
use placescout_core::{AppConfig, DiscoveryEntry, EnrichedRecord, ResultBatch, SearchQuery};
use std::sync::Arc;

/// Two-phase crawl pipeline over sessions from one factory.
pub struct Pipeline<F: SessionFactory> {
    factory: Arc<F>,
    search_url_template: String,
    discovery: DiscoveryLoop,
    pool: EnrichmentPool<F>,
}

impl<F> Pipeline<F>
where
    F: SessionFactory + 'static,
{
    pub fn new(factory: Arc<F>, config: &AppConfig) -> Self {
        let extractor = DetailExtractor::new(config.selectors.clone());
        let pool = EnrichmentPool::new(
            Arc::clone(&factory),
            extractor,
            PoolOptions::from(&config.scanning),
        );

        Self {
            factory,
            search_url_template: config.discovery.search_url_template.clone(),
            discovery: DiscoveryLoop::new(DiscoveryOptions::from(&config.discovery)),
            pool,
        }
    }

    /// Collect the deduplicated entry list for `query` on a dedicated session.
    pub async fn discover(&self, query: &SearchQuery) -> Result<Vec<DiscoveryEntry>> {
        let search_url = query.search_url(&self.search_url_template);
        tracing::info!("Starting discovery for '{}' at {}", query.raw(), search_url);

        let session = self.factory.open_session().await?;
        let outcome = self.discovery.run(&session, &search_url).await;

        if let Err(e) = session.close().await {
            tracing::debug!("Failed to close discovery session: {}", e);
        }

        match &outcome {
            Ok(entries) => tracing::info!("Discovery found {} entries", entries.len()),
            Err(e) => tracing::error!("Discovery failed for '{}': {}", query.raw(), e),
        }
        outcome
    }

    /// Enrich discovered entries, one record per entry in discovery order.
    pub async fn enrich(&self, entries: Vec<DiscoveryEntry>) -> Vec<EnrichedRecord> {
        self.pool.enrich(entries).await
    }

    /// Run the whole pipeline and hand the batch to `sink`.
    pub async fn run(&self, query: &SearchQuery, sink: &dyn ResultSink) -> Result<ResultBatch> {
        let entries = self.discover(query).await?;

        if let Err(e) = sink.checkpoint_discovery(query, &entries).await {
            tracing::warn!("Failed to checkpoint discovery results: {}", e);
        }

        let records = self.enrich(entries).await;
        let batch = aggregate(query, records);

        if let Err(e) = sink.emit(&batch).await {
            tracing::error!("Failed to emit results for '{}': {}", query.raw(), e);
            return Err(e);
        }

        tracing::info!(
            total = batch.total_count,
            succeeded = batch.success_count,
            failed = batch.error_count,
            "Scraping completed for '{}'",
            query.raw()
        );
        Ok(batch)
    }
}
