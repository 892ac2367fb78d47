use chrono::Utc;
use placescout_core::{EnrichedRecord, ResultBatch, SearchQuery};

/// Wrap enrichment records into a batch stamped with the completion time.
///
/// Records are kept as given; no reordering or deduplication happens here.
pub fn aggregate(query: &SearchQuery, records: Vec<EnrichedRecord>) -> ResultBatch {
    let success_count = records.iter().filter(|r| r.is_success()).count();

    ResultBatch {
        search_query: query.raw().to_string(),
        formatted_query: query.formatted().to_string(),
        total_count: records.len(),
        success_count,
        error_count: records.len() - success_count,
        scraped_at: Utc::now(),
        results: records,
    }
}
