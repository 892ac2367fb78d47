use placescout_browser::BrowserEngine;
use placescout_core::{AppConfig, ResultBatch, SearchQuery};
use placescout_scanner::{Pipeline, ResultSink};
use std::sync::Arc;
use tracing::{info, warn};

/// Launch a browser, run the pipeline for `query` into `sink`, and shut the
/// browser down again whatever the outcome.
pub async fn scrape(
    config: &AppConfig,
    sink: &dyn ResultSink,
    query: &SearchQuery,
) -> anyhow::Result<ResultBatch> {
    let engine = Arc::new(BrowserEngine::launch(&config.browser).await?);
    let pipeline = Pipeline::new(Arc::clone(&engine), config);

    info!("Scraping '{}'", query.raw());
    let outcome = pipeline.run(query, sink).await;

    if let Err(e) = engine.shutdown().await {
        warn!("Failed to shut down browser: {}", e);
    }

    Ok(outcome?)
}
