use crate::error::{BrowserError, Result};
use std::time::Duration;

/// Browser actions for automation.
///
/// One implementor is one browsing session: a single tab that is navigated
/// sequentially. Sessions are never shared between concurrent workers.
#[async_trait::async_trait]
pub trait BrowserActions: Send + Sync {
    /// Navigate to a URL, failing if the page does not load within `timeout`
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()>;

    /// Wait for a selector to appear
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Scroll the element matching `selector` down by `step` pixels
    async fn scroll_by(&self, selector: &str, step: u32) -> Result<()>;

    /// Rendered markup of the current page
    async fn content(&self) -> Result<String>;

    /// Release the session
    async fn close(&self) -> Result<()>;
}

/// Opens browsing sessions on demand.
#[async_trait::async_trait]
pub trait SessionFactory: Send + Sync {
    /// Session type handed out by this factory
    type Session: BrowserActions + 'static;

    /// Open a fresh session
    async fn open_session(&self) -> Result<Self::Session>;
}

/// Helper to extract domain from URL
pub fn extract_domain(url: &str) -> Result<String> {
    let url = url::Url::parse(url)
        .map_err(|e| BrowserError::NavigationError(format!("Invalid URL: {}", e)))?;

    url.host_str()
        .ok_or_else(|| BrowserError::NavigationError("No host in URL".to_string()))
        .map(|s| s.to_string())
}

/// Turn a website as displayed on a detail page into a navigable URL.
///
/// Detail pages usually show a bare host (`example.com`), so anything not
/// already starting with `http` gets an `https://` prefix.
pub fn normalize_website_url(website: &str) -> Result<String> {
    let website = website.trim();
    let candidate = if website.starts_with("http") {
        website.to_string()
    } else {
        format!("https://{website}")
    };

    // Reject values that cannot be navigated to at all
    extract_domain(&candidate)?;
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domain() {
        assert_eq!(
            extract_domain("https://example.com/path").unwrap(),
            "example.com"
        );
        assert_eq!(
            extract_domain("http://subdomain.example.com:8080/path").unwrap(),
            "subdomain.example.com"
        );
    }

    #[test]
    fn test_extract_domain_invalid() {
        assert!(extract_domain("not-a-url").is_err());
    }

    #[test]
    fn test_normalize_bare_host() {
        assert_eq!(
            normalize_website_url("smiledental.com").unwrap(),
            "https://smiledental.com"
        );
        assert_eq!(
            normalize_website_url("  smiledental.com/contact ").unwrap(),
            "https://smiledental.com/contact"
        );
    }

    #[test]
    fn test_normalize_keeps_scheme() {
        assert_eq!(
            normalize_website_url("http://smiledental.com").unwrap(),
            "http://smiledental.com"
        );
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_website_url("not a website").is_err());
    }
}
