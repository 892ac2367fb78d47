mod common;

use common::{detail_html, feed_html, CollectingSink, FakeSite, Page};
use placescout_core::{AppConfig, SearchQuery};
use placescout_scanner::{Pipeline, ScanError};
use std::sync::Arc;

const SEARCH_URL: &str = "https://www.google.com/maps/search/dentist+chicago/";

fn query() -> SearchQuery {
    SearchQuery::new("dentist chicago").expect("valid query")
}

fn dental_site() -> FakeSite {
    let listings: Vec<(String, String)> = ["Smile Dental", "Loop Dentistry", "Closed Clinic"]
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), format!("https://maps.example/place/{i}")))
        .collect();

    FakeSite::new([
        (SEARCH_URL.to_string(), Page::Html(feed_html(&listings))),
        (
            "https://maps.example/place/0".to_string(),
            Page::Html(detail_html("233 S Wacker Dr", Some("smile.example"), Some("+1 312-555-0100"))),
        ),
        (
            "https://maps.example/place/1".to_string(),
            Page::Html(detail_html("1 N State St", None, None)),
        ),
        ("https://maps.example/place/2".to_string(), Page::Fail),
        (
            "https://smile.example".to_string(),
            Page::Html("<p>info@smile.example</p>".to_string()),
        ),
    ])
}

#[tokio::test(start_paused = true)]
async fn test_full_pipeline_emits_batch() {
    let site = dental_site();
    let pipeline = Pipeline::new(Arc::new(site.clone()), &AppConfig::default());
    let sink = CollectingSink::default();

    let batch = pipeline.run(&query(), &sink).await.expect("pipeline succeeds");

    assert_eq!(batch.search_query, "dentist chicago");
    assert_eq!(batch.formatted_query, "dentist+chicago");
    assert_eq!(batch.total_count, 3);
    assert_eq!(batch.success_count, 2);
    assert_eq!(batch.error_count, 1);
    assert_eq!(batch.results[0].name(), "Smile Dental");
    assert!(batch.results[2].error().is_some());

    let checkpoints = sink.checkpoints.lock().expect("sink lock");
    assert_eq!(checkpoints.len(), 1);
    assert_eq!(checkpoints[0].len(), 3);

    let batches = sink.batches.lock().expect("sink lock");
    assert_eq!(batches.as_slice(), &[batch]);

    // Discovery session plus the pool's sessions, all released
    assert_eq!(site.opened(), site.closed());
}

#[tokio::test(start_paused = true)]
async fn test_missing_feed_emits_nothing() {
    let site = FakeSite::new([(
        SEARCH_URL.to_string(),
        Page::Html("<div>Unusual traffic detected</div>".to_string()),
    )]);
    let pipeline = Pipeline::new(Arc::new(site.clone()), &AppConfig::default());
    let sink = CollectingSink::default();

    let err = pipeline.run(&query(), &sink).await.expect_err("feed missing");

    assert!(matches!(err, ScanError::FeedNotFound { .. }));
    assert_eq!(sink.checkpoint_count(), 0);
    assert_eq!(sink.batch_count(), 0);
    assert_eq!(site.opened(), 1);
    assert_eq!(site.closed(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_search_navigation_failure_is_fatal() {
    let site = FakeSite::new([(SEARCH_URL.to_string(), Page::Fail)]);
    let pipeline = Pipeline::new(Arc::new(site.clone()), &AppConfig::default());
    let sink = CollectingSink::default();

    let err = pipeline.run(&query(), &sink).await.expect_err("navigation fails");

    assert!(matches!(err, ScanError::Browser(_)));
    assert_eq!(sink.batch_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_sink_failure_surfaces() {
    let pipeline = Pipeline::new(Arc::new(dental_site()), &AppConfig::default());
    let sink = CollectingSink::failing();

    let err = pipeline.run(&query(), &sink).await.expect_err("emit fails");

    assert!(matches!(err, ScanError::Sink(_)));
    assert_eq!(sink.checkpoint_count(), 1);
}
