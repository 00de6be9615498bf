//! Page snapshots through a [`BrowserActions`] session.
//!
//! Navigation and render-wait failures are logged and turned into `None`:
//! a page that cannot be loaded contributes nothing and the run moves on.

use creatorscope_browser::{BrowserActions, BrowserError};

/// Readiness condition checked before the page is snapshotted.
#[derive(Debug, Clone, Copy)]
pub enum PageKind<'a> {
    /// Wait for `selector`, then scroll so lazy cards load
    Listing {
        /// Card selector that marks the listing as rendered
        selector: &'a str,
    },
    /// Wait for `body`, then scroll so lazy sections load
    Profile,
    /// Wait for `body` only
    Bio,
}

/// Navigate to `url`, wait for it to render and return its HTML.
pub async fn fetch_page(
    browser: &dyn BrowserActions,
    url: &str,
    kind: PageKind<'_>,
    timeout_ms: u64,
) -> Option<String> {
    match try_fetch(browser, url, kind, timeout_ms).await {
        Ok(html) => Some(html),
        Err(e) => {
            tracing::warn!(%url, error = %e, "Page fetch failed");
            None
        }
    }
}

async fn try_fetch(
    browser: &dyn BrowserActions,
    url: &str,
    kind: PageKind<'_>,
    timeout_ms: u64,
) -> Result<String, BrowserError> {
    browser.navigate(url).await?;

    match kind {
        PageKind::Listing { selector } => {
            browser.wait_for_selector(selector, timeout_ms).await?;
            browser.scroll_to_bottom().await?;
        }
        PageKind::Profile => {
            browser.wait_for_selector("body", timeout_ms).await?;
            browser.scroll_to_bottom().await?;
        }
        PageKind::Bio => {
            browser.wait_for_selector("body", timeout_ms).await?;
        }
    }

    browser.content().await
}
