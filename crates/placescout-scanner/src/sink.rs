use crate::error::Result;
use async_trait::async_trait;
use placescout_core::{DiscoveryEntry, ResultBatch, SearchQuery};

/// Destination for pipeline output.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Called once discovery finishes, before enrichment starts.
    ///
    /// Failures here are logged by the pipeline and do not stop the run.
    async fn checkpoint_discovery(
        &self,
        _query: &SearchQuery,
        _entries: &[DiscoveryEntry],
    ) -> Result<()> {
        Ok(())
    }

    /// Receive the final batch.
    async fn emit(&self, batch: &ResultBatch) -> Result<()>;
}
