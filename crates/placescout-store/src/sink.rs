use crate::files::ResultStore;
use async_trait::async_trait;
use placescout_core::{DiscoveryEntry, ResultBatch, SearchQuery};
use placescout_scanner::{ResultSink, ScanError};

#[async_trait]
impl ResultSink for ResultStore {
    async fn checkpoint_discovery(
        &self,
        query: &SearchQuery,
        entries: &[DiscoveryEntry],
    ) -> placescout_scanner::Result<()> {
        self.save_initial(query, entries)
            .await
            .map(|_| ())
            .map_err(|e| ScanError::Sink(e.to_string()))
    }

    async fn emit(&self, batch: &ResultBatch) -> placescout_scanner::Result<()> {
        self.save_final(batch)
            .await
            .map(|_| ())
            .map_err(|e| ScanError::Sink(e.to_string()))
    }
}
