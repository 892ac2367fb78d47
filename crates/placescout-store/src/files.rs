//! Result files on disk.
//!
//! Each run writes two files into the results directory, both named after
//! the formatted query: `<query>_initial.json` holding the discovered entries
//! and `<query>_final.json` holding the enriched batch.

use crate::error::{Result, StoreError};
use chrono::{DateTime, Utc};
use placescout_core::{DiscoveryEntry, ResultBatch, SearchQuery};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const INITIAL_SUFFIX: &str = "_initial.json";
const FINAL_SUFFIX: &str = "_final.json";

/// Entries found by discovery, persisted before enrichment starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverySnapshot {
    /// Query as entered
    pub search_query: String,
    /// URL-safe query token
    pub formatted_query: String,
    /// Number of entries
    pub total_count: usize,
    /// Time discovery finished
    pub scraped_at: DateTime<Utc>,
    /// Discovered entries in discovery order
    pub results: Vec<DiscoveryEntry>,
}

impl DiscoverySnapshot {
    /// Snapshot `entries` stamped with the current time.
    #[must_use]
    pub fn new(query: &SearchQuery, entries: &[DiscoveryEntry]) -> Self {
        Self {
            search_query: query.raw().to_string(),
            formatted_query: query.formatted().to_string(),
            total_count: entries.len(),
            scraped_at: Utc::now(),
            results: entries.to_vec(),
        }
    }
}

/// A stored final result file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    /// File name inside the results directory
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Creation time, or modification time where the platform has none
    pub created: DateTime<Utc>,
    /// Last modification time
    pub modified: DateTime<Utc>,
}

/// JSON result files in one directory.
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    /// Create a store writing into `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Results directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the discovery snapshot for `formatted_query`.
    #[must_use]
    pub fn initial_path(&self, formatted_query: &str) -> PathBuf {
        self.dir.join(format!("{formatted_query}{INITIAL_SUFFIX}"))
    }

    /// Path of the final batch for `formatted_query`.
    #[must_use]
    pub fn final_path(&self, formatted_query: &str) -> PathBuf {
        self.dir.join(format!("{formatted_query}{FINAL_SUFFIX}"))
    }

    /// Write the discovery snapshot, replacing any previous one.
    pub async fn save_initial(
        &self,
        query: &SearchQuery,
        entries: &[DiscoveryEntry],
    ) -> Result<PathBuf> {
        let path = self.initial_path(query.formatted());
        let snapshot = DiscoverySnapshot::new(query, entries);
        self.write_json(&path, &snapshot).await?;

        tracing::info!("Saved {} discovered entries to {}", entries.len(), path.display());
        Ok(path)
    }

    /// Write the final batch, replacing any previous one.
    pub async fn save_final(&self, batch: &ResultBatch) -> Result<PathBuf> {
        let path = self.final_path(&batch.formatted_query);
        self.write_json(&path, batch).await?;

        tracing::info!("Saved {} results to {}", batch.total_count, path.display());
        Ok(path)
    }

    /// Read back a final batch by file name.
    pub async fn load_final(&self, filename: &str) -> Result<ResultBatch> {
        let bytes = self.read(filename).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Final result files, newest first. A missing directory lists as empty.
    pub async fn list_results(&self) -> Result<Vec<StoredFile>> {
        let mut dir = match tokio::fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !name.ends_with(FINAL_SUFFIX) {
                continue;
            }

            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }

            let modified: DateTime<Utc> = metadata.modified()?.into();
            let created = metadata.created().map_or(modified, DateTime::<Utc>::from);

            files.push(StoredFile {
                name,
                size: metadata.len(),
                created,
                modified,
            });
        }

        files.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));
        Ok(files)
    }

    /// Resolve `filename` to a path inside the results directory.
    ///
    /// Names containing path separators or `..` are rejected before touching
    /// the filesystem.
    pub async fn resolve(&self, filename: &str) -> Result<PathBuf> {
        validate_filename(filename)?;

        let path = self.dir.join(filename);
        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(path),
            Ok(_) => Err(StoreError::NotFound(filename.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Raw contents of a stored file.
    pub async fn read(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.resolve(filename).await?;
        Ok(tokio::fs::read(path).await?)
    }

    async fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(StoreError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_use_formatted_query() {
        let store = ResultStore::new("/tmp/results");
        assert_eq!(
            store.initial_path("dentist+chicago"),
            PathBuf::from("/tmp/results/dentist+chicago_initial.json")
        );
        assert_eq!(
            store.final_path("dentist+chicago"),
            PathBuf::from("/tmp/results/dentist+chicago_final.json")
        );
    }

    #[test]
    fn test_validate_filename() {
        assert!(validate_filename("pizza_final.json").is_ok());
        assert!(validate_filename("bars+%26+grills_final.json").is_ok());

        for bad in ["", "../etc/passwd", "..", "a/b.json", r"a\b.json", "x..json"] {
            assert!(
                matches!(validate_filename(bad), Err(StoreError::InvalidFilename(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_snapshot_shape() {
        let query = SearchQuery::new("tacos austin").expect("valid query");
        let entries = vec![DiscoveryEntry::new("Taco Joint", "https://maps.example/taco")];

        let snapshot = DiscoverySnapshot::new(&query, &entries);
        let json = serde_json::to_value(&snapshot).expect("serialize");

        assert_eq!(json["searchQuery"], "tacos austin");
        assert_eq!(json["formattedQuery"], "tacos+austin");
        assert_eq!(json["totalCount"], 1);
        assert_eq!(json["results"][0]["name"], "Taco Joint");
        assert!(json["scrapedAt"].is_string());
    }
}
