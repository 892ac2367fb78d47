use crate::actions::{BrowserActions, SessionFactory};
use crate::error::{BrowserError, Result};
use crate::profile::SessionProfile;
use crate::session::BrowserSession;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromiumConfig};
use futures_util::stream::StreamExt;
use placescout_core::BrowserConfig;
use std::future::Future;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Browser automation engine.
///
/// Owns one Chromium process. Sessions are tabs opened with
/// [`BrowserEngine::open_session`]; the engine itself is released with
/// [`BrowserEngine::shutdown`].
pub struct BrowserEngine {
    browser: Mutex<Option<Browser>>,
    handler: JoinHandle<()>,
    profile: SessionProfile,
}

impl BrowserEngine {
    /// Launch Chromium with the given settings
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let profile = SessionProfile::from_config(config);

        let mut builder = ChromiumConfig::builder()
            .window_size(config.window_width, config.window_height)
            .viewport(profile.viewport())
            .request_timeout(config.request_timeout())
            .args(config.extra_args.clone());
        if config.no_sandbox {
            builder = builder.no_sandbox();
        }
        if !config.headless {
            builder = builder.with_head();
        }
        let chromium = builder.build().map_err(BrowserError::ChromiumError)?;

        let (browser, mut handler) = Browser::launch(chromium)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        // Spawn browser handler
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler event error: {}", e);
                }
            }
        });

        tracing::debug!(
            headless = config.headless,
            width = config.window_width,
            height = config.window_height,
            request_timeout_secs = config.request_timeout_secs,
            "Launched browser"
        );

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            handler,
            profile,
        })
    }

    /// Close the browser process. Sessions opened afterwards fail.
    pub async fn shutdown(&self) -> Result<()> {
        let browser = self.browser.lock().await.take();
        let result = match browser {
            Some(mut browser) => {
                let closed = browser
                    .close()
                    .await
                    .map(|_| ())
                    .map_err(|e| BrowserError::ChromiumError(e.to_string()));
                if let Err(e) = browser.wait().await {
                    tracing::warn!("Failed waiting for browser exit: {}", e);
                }
                closed
            }
            None => Ok(()),
        };

        self.handler.abort();
        tracing::debug!("Browser shut down");
        result
    }
}

#[async_trait::async_trait]
impl SessionFactory for BrowserEngine {
    type Session = BrowserSession;

    async fn open_session(&self) -> Result<BrowserSession> {
        let page = {
            let guard = self.browser.lock().await;
            let browser = guard
                .as_ref()
                .ok_or_else(|| BrowserError::ChromiumError("browser has been shut down".to_string()))?;
            browser
                .new_page("about:blank")
                .await
                .map_err(|e| BrowserError::ChromiumError(e.to_string()))?
        };

        let session = BrowserSession::new(page.clone());
        let user_agent = self.profile.user_agent.as_str();
        prepare_session(session, async {
            page.set_user_agent(user_agent)
                .await
                .map(|_| ())
                .map_err(|e| BrowserError::ChromiumError(e.to_string()))
        })
        .await
    }
}

/// Finish opening `session` with `setup`, closing it again if setup fails.
async fn prepare_session<S, F>(session: S, setup: F) -> Result<S>
where
    S: BrowserActions,
    F: Future<Output = Result<()>>,
{
    if let Err(e) = setup.await {
        if let Err(close_err) = session.close().await {
            tracing::debug!("Failed to close half-opened session: {}", close_err);
        }
        return Err(e);
    }
    Ok(session)
}

impl Drop for BrowserEngine {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
