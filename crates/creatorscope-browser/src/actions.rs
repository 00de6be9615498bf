use crate::cookies::StoredCookie;
use crate::error::{BrowserError, Result};

/// Browser actions for automation.
///
/// The scraping pipeline only talks to a browser through this trait, so a
/// scripted fake can stand in for Chromium in tests.
#[async_trait::async_trait]
pub trait BrowserActions: Send + Sync {
    /// Navigate to a URL
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Reload the current page
    async fn reload(&self) -> Result<()>;

    /// URL of the current page
    async fn current_url(&self) -> Result<String>;

    /// Rendered HTML of the current page
    async fn content(&self) -> Result<String>;

    /// Whether at least one element matches the selector
    async fn exists(&self, selector: &str) -> Result<bool>;

    /// Wait for a selector to appear
    async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<()>;

    /// Fill a form field by selector, replacing its current value
    async fn fill_field(&self, selector: &str, value: &str) -> Result<()>;

    /// Click an element by selector
    async fn click(&self, selector: &str) -> Result<()>;

    /// Press Enter inside an element
    async fn press_enter(&self, selector: &str) -> Result<()>;

    /// Scroll halfway, then to the bottom, so lazily rendered content loads
    async fn scroll_to_bottom(&self) -> Result<()>;

    /// Cookies visible to the current page
    async fn cookies(&self) -> Result<Vec<StoredCookie>>;

    /// Install cookies into the session
    async fn set_cookies(&self, cookies: &[StoredCookie]) -> Result<()>;
}

/// Helper to extract domain from URL
pub fn extract_domain(url: &str) -> Result<String> {
    let url = url::Url::parse(url)
        .map_err(|e| BrowserError::NavigationError(format!("Invalid URL: {}", e)))?;

    url.host_str()
        .ok_or_else(|| BrowserError::NavigationError("No host in URL".to_string()))
        .map(|s| s.to_string())
}
