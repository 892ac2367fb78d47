//! Fixture browsing sessions and sinks shared by the scanner test suites.

#![allow(dead_code)]

use async_trait::async_trait;
use placescout_browser::{BrowserActions, BrowserError, SessionFactory};
use placescout_core::{DiscoveryEntry, ResultBatch, SearchQuery};
use placescout_scanner::{ResultSink, ScanError};
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type BrowserResult<T> = placescout_browser::Result<T>;

/// Markup of a detail page in the live directory's layout.
pub fn detail_html(address: &str, website: Option<&str>, phone: Option<&str>) -> String {
    let mut html = format!(
        r#"<div role="main"><div class="rogA2c"><div class="Io6YTe fontBodyMedium">{address}</div></div>"#
    );
    if let Some(website) = website {
        html.push_str(&format!(
            r#"<div class="rogA2c ITvuef"><div class="Io6YTe fontBodyMedium">{website}</div></div>"#
        ));
    }
    if let Some(phone) = phone {
        html.push_str(&format!(
            r#"<div class="rogA2c"><div class="Io6YTe fontBodyMedium">{phone}</div></div>"#
        ));
    }
    html.push_str("</div>");
    html
}

/// Markup of a results feed listing `entries`.
pub fn feed_html(entries: &[(String, String)]) -> String {
    let mut html = String::from(r#"<div role="feed">"#);
    for (name, link) in entries {
        html.push_str(&format!(
            r#"<div><a class="hfpxzc" aria-label="{name}" href="{link}"></a></div>"#
        ));
    }
    html.push_str("</div>");
    html
}

fn page_has(content: &str, selector: &str) -> bool {
    let Ok(selector) = Selector::parse(selector) else {
        return false;
    };
    Html::parse_document(content).select(&selector).next().is_some()
}

// ---------------------------------------------------------------------------
// Growing feed
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct FeedState {
    /// `None` keeps growing forever
    total: Option<usize>,
    per_scroll: usize,
    has_feed: bool,
    scrolls: AtomicUsize,
    opened: AtomicUsize,
    closed: AtomicUsize,
}

/// A results feed that renders `per_scroll` more entries on each scroll.
#[derive(Debug, Clone)]
pub struct FakeFeed {
    state: Arc<FeedState>,
}

impl FakeFeed {
    pub fn new(total: usize, per_scroll: usize) -> Self {
        Self::build(Some(total), per_scroll, true)
    }

    pub fn endless(per_scroll: usize) -> Self {
        Self::build(None, per_scroll, true)
    }

    pub fn without_feed() -> Self {
        Self::build(Some(0), 0, false)
    }

    fn build(total: Option<usize>, per_scroll: usize, has_feed: bool) -> Self {
        Self {
            state: Arc::new(FeedState {
                total,
                per_scroll,
                has_feed,
                scrolls: AtomicUsize::new(0),
                opened: AtomicUsize::new(0),
                closed: AtomicUsize::new(0),
            }),
        }
    }

    pub fn scrolls(&self) -> usize {
        self.state.scrolls.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> usize {
        self.state.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.state.closed.load(Ordering::SeqCst)
    }

    fn rendered(&self) -> usize {
        let grown = self.scrolls() * self.state.per_scroll;
        match self.state.total {
            Some(total) => grown.min(total),
            None => grown,
        }
    }
}

#[async_trait]
impl BrowserActions for FakeFeed {
    async fn navigate(&self, _url: &str, _timeout: Duration) -> BrowserResult<()> {
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, _timeout: Duration) -> BrowserResult<()> {
        if self.state.has_feed {
            Ok(())
        } else {
            Err(BrowserError::SelectorNotFound(selector.to_string()))
        }
    }

    async fn scroll_by(&self, selector: &str, _step: u32) -> BrowserResult<()> {
        if !self.state.has_feed {
            return Err(BrowserError::SelectorNotFound(selector.to_string()));
        }
        self.state.scrolls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn content(&self) -> BrowserResult<String> {
        let mut entries: Vec<(String, String)> = (0..self.rendered())
            .map(|i| (format!("Place {i}"), format!("https://maps.example/place/{i}")))
            .collect();
        // The live feed re-renders earlier entries; repeat the first one
        if let Some(first) = entries.first().cloned() {
            entries.push((first.0, "https://maps.example/place/duplicate".to_string()));
        }
        Ok(feed_html(&entries))
    }

    async fn close(&self) -> BrowserResult<()> {
        self.state.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl SessionFactory for FakeFeed {
    type Session = FakeFeed;

    async fn open_session(&self) -> BrowserResult<Self::Session> {
        self.state.opened.fetch_add(1, Ordering::SeqCst);
        Ok(self.clone())
    }
}

// ---------------------------------------------------------------------------
// Site of static pages
// ---------------------------------------------------------------------------

/// How a URL of [`FakeSite`] responds to navigation.
#[derive(Debug, Clone)]
pub enum Page {
    /// Loads with this markup
    Html(String),
    /// Fails the first `n` navigations, then loads
    FailFirst(u32, String),
    /// Always times out
    Fail,
    /// Panics the task navigating to it
    Panic,
}

#[derive(Debug, Default)]
struct SiteState {
    pages: HashMap<String, Page>,
    attempts: Mutex<HashMap<String, u32>>,
    open: AtomicUsize,
    max_open: AtomicUsize,
    opened: AtomicUsize,
    closed: AtomicUsize,
}

/// A set of static pages served to any number of sessions.
#[derive(Debug, Clone, Default)]
pub struct FakeSite {
    state: Arc<SiteState>,
}

impl FakeSite {
    pub fn new(pages: impl IntoIterator<Item = (String, Page)>) -> Self {
        Self {
            state: Arc::new(SiteState {
                pages: pages.into_iter().collect(),
                ..SiteState::default()
            }),
        }
    }

    /// Navigation attempts made to `url` across all sessions.
    pub fn attempts(&self, url: &str) -> u32 {
        self.state
            .attempts
            .lock()
            .expect("attempts lock")
            .get(url)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_navigations(&self) -> u32 {
        self.state.attempts.lock().expect("attempts lock").values().sum()
    }

    pub fn max_open(&self) -> usize {
        self.state.max_open.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> usize {
        self.state.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.state.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionFactory for FakeSite {
    type Session = SiteSession;

    async fn open_session(&self) -> BrowserResult<Self::Session> {
        let open = self.state.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.max_open.fetch_max(open, Ordering::SeqCst);
        self.state.opened.fetch_add(1, Ordering::SeqCst);

        Ok(SiteSession {
            site: Arc::clone(&self.state),
            current: Mutex::new(None),
        })
    }
}

/// One session on a [`FakeSite`].
#[derive(Debug)]
pub struct SiteSession {
    site: Arc<SiteState>,
    current: Mutex<Option<String>>,
}

impl SiteSession {
    fn current(&self) -> Option<String> {
        self.current.lock().expect("page lock").clone()
    }
}

#[async_trait]
impl BrowserActions for SiteSession {
    async fn navigate(&self, url: &str, _timeout: Duration) -> BrowserResult<()> {
        // Let other workers run while this page "loads"
        tokio::time::sleep(Duration::from_millis(50)).await;

        let attempt = {
            let mut attempts = self.site.attempts.lock().expect("attempts lock");
            let count = attempts.entry(url.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        let html = match self.site.pages.get(url) {
            Some(Page::Html(html)) => html.clone(),
            Some(Page::FailFirst(n, html)) if attempt > *n => html.clone(),
            Some(Page::FailFirst(..)) => {
                return Err(BrowserError::NavigationError(format!("{url}: connection reset")))
            }
            Some(Page::Fail) => {
                return Err(BrowserError::Timeout(format!("navigation to {url} exceeded 60s")))
            }
            Some(Page::Panic) => panic!("renderer crashed while loading {url}"),
            None => return Err(BrowserError::NavigationError(format!("{url}: not found"))),
        };

        *self.current.lock().expect("page lock") = Some(html);
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, _timeout: Duration) -> BrowserResult<()> {
        match self.current() {
            Some(content) if page_has(&content, selector) => Ok(()),
            _ => Err(BrowserError::SelectorNotFound(selector.to_string())),
        }
    }

    async fn scroll_by(&self, selector: &str, _step: u32) -> BrowserResult<()> {
        self.wait_for_selector(selector, Duration::ZERO).await
    }

    async fn content(&self) -> BrowserResult<String> {
        self.current()
            .ok_or_else(|| BrowserError::ChromiumError("no page loaded".to_string()))
    }

    async fn close(&self) -> BrowserResult<()> {
        self.site.open.fetch_sub(1, Ordering::SeqCst);
        self.site.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Records everything the pipeline hands over.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub checkpoints: Mutex<Vec<Vec<DiscoveryEntry>>>,
    pub batches: Mutex<Vec<ResultBatch>>,
    pub fail_emit: bool,
}

impl CollectingSink {
    pub fn failing() -> Self {
        Self {
            fail_emit: true,
            ..Self::default()
        }
    }

    pub fn checkpoint_count(&self) -> usize {
        self.checkpoints.lock().expect("sink lock").len()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.lock().expect("sink lock").len()
    }
}

#[async_trait]
impl ResultSink for CollectingSink {
    async fn checkpoint_discovery(
        &self,
        _query: &SearchQuery,
        entries: &[DiscoveryEntry],
    ) -> placescout_scanner::Result<()> {
        self.checkpoints
            .lock()
            .expect("sink lock")
            .push(entries.to_vec());
        Ok(())
    }

    async fn emit(&self, batch: &ResultBatch) -> placescout_scanner::Result<()> {
        if self.fail_emit {
            return Err(ScanError::Sink("disk full".to_string()));
        }
        self.batches.lock().expect("sink lock").push(batch.clone());
        Ok(())
    }
}
