use crate::actions::BrowserActions;
use crate::error::{BrowserError, Result};
use chromiumoxide::Page;
use std::time::{Duration, Instant};

/// Interval between selector checks while waiting for an element.
const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// One Chromium tab.
#[derive(Debug, Clone)]
pub struct BrowserSession {
    page: Page,
}

impl BrowserSession {
    pub(crate) fn new(page: Page) -> Self {
        Self { page }
    }
}

#[async_trait::async_trait]
impl BrowserActions for BrowserSession {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()> {
        tokio::time::timeout(timeout, self.page.goto(url))
            .await
            .map_err(|_| BrowserError::Timeout(format!("navigation to {url} exceeded {timeout:?}")))?
            .map_err(|e| BrowserError::NavigationError(format!("{url}: {e}")))?;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::SelectorNotFound(format!(
                    "{selector} (waited {timeout:?})"
                )));
            }
            tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }

    async fn scroll_by(&self, selector: &str, step: u32) -> Result<()> {
        let script = scroll_script(selector, step)?;
        let scrolled: bool = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::ScriptError(e.to_string()))?
            .into_value()
            .map_err(|e| BrowserError::ScriptError(e.to_string()))?;

        if scrolled {
            Ok(())
        } else {
            Err(BrowserError::SelectorNotFound(selector.to_string()))
        }
    }

    async fn content(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))
    }

    async fn close(&self) -> Result<()> {
        self.page
            .clone()
            .close()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))
    }
}

/// Script scrolling the first element matching `selector`; evaluates to
/// `false` when no element matches.
fn scroll_script(selector: &str, step: u32) -> Result<String> {
    let selector =
        serde_json::to_string(selector).map_err(|e| BrowserError::ScriptError(e.to_string()))?;
    Ok(format!(
        "(() => {{ const el = document.querySelector({selector}); \
         if (!el) return false; el.scrollBy(0, {step}); return true; }})()"
    ))
}
