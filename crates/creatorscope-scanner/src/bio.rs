//! Email enrichment from a creator's public social bio.

use crate::fetch::{fetch_page, PageKind};
use creatorscope_browser::BrowserActions;
use creatorscope_core::first_valid_email;
use std::sync::Arc;

/// Looks up contact emails on the social site, one handle per page load.
pub struct SocialBioResolver {
    browser: Arc<dyn BrowserActions>,
    base_url: String,
    timeout_ms: u64,
}

impl SocialBioResolver {
    pub fn new(browser: Arc<dyn BrowserActions>, base_url: &str, timeout_ms: u64) -> Self {
        Self {
            browser,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_ms,
        }
    }

    /// Bio page URL for a handle, with any leading `@` removed.
    pub fn bio_url(&self, handle: &str) -> String {
        format!("{}/{}/", self.base_url, handle.trim_start_matches('@'))
    }

    /// First valid email on the handle's bio page, or empty.
    ///
    /// An empty handle returns immediately without loading anything.
    pub async fn resolve_email(&self, handle: &str) -> String {
        if handle.trim_start_matches('@').is_empty() {
            return String::new();
        }

        let url = self.bio_url(handle);
        let Some(html) = fetch_page(self.browser.as_ref(), &url, PageKind::Bio, self.timeout_ms).await
        else {
            return String::new();
        };

        match first_valid_email(&html) {
            Some(email) => {
                tracing::debug!(%handle, "Found email in social bio");
                email
            }
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use creatorscope_browser::{BrowserError, StoredCookie};
    use std::sync::Mutex;

    /// Serves one fixed page and records every navigation.
    struct OnePage {
        html: Option<String>,
        visited: Mutex<Vec<String>>,
    }

    impl OnePage {
        fn serving(html: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                html: html.map(str::to_string),
                visited: Mutex::new(Vec::new()),
            })
        }

        fn visited(&self) -> Vec<String> {
            self.visited.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl BrowserActions for OnePage {
        async fn navigate(&self, url: &str) -> creatorscope_browser::Result<()> {
            self.visited.lock().expect("lock").push(url.to_string());
            match self.html {
                Some(_) => Ok(()),
                None => Err(BrowserError::Timeout(url.to_string())),
            }
        }
        async fn reload(&self) -> creatorscope_browser::Result<()> {
            Ok(())
        }
        async fn current_url(&self) -> creatorscope_browser::Result<String> {
            Ok(String::new())
        }
        async fn content(&self) -> creatorscope_browser::Result<String> {
            Ok(self.html.clone().unwrap_or_default())
        }
        async fn exists(&self, _selector: &str) -> creatorscope_browser::Result<bool> {
            Ok(true)
        }
        async fn wait_for_selector(&self, _s: &str, _t: u64) -> creatorscope_browser::Result<()> {
            Ok(())
        }
        async fn fill_field(&self, _s: &str, _v: &str) -> creatorscope_browser::Result<()> {
            Ok(())
        }
        async fn click(&self, _s: &str) -> creatorscope_browser::Result<()> {
            Ok(())
        }
        async fn press_enter(&self, _s: &str) -> creatorscope_browser::Result<()> {
            Ok(())
        }
        async fn scroll_to_bottom(&self) -> creatorscope_browser::Result<()> {
            Ok(())
        }
        async fn cookies(&self) -> creatorscope_browser::Result<Vec<StoredCookie>> {
            Ok(Vec::new())
        }
        async fn set_cookies(&self, _c: &[StoredCookie]) -> creatorscope_browser::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_finds_email_in_bio() {
        let page = OnePage::serving(Some("<body><p>Business: contact@foo.com</p></body>"));
        let resolver = SocialBioResolver::new(page.clone(), "https://www.instagram.com/", 1000);

        assert_eq!(resolver.resolve_email("@foo").await, "contact@foo.com");
        assert_eq!(page.visited(), vec!["https://www.instagram.com/foo/"]);
    }

    #[tokio::test]
    async fn test_empty_handle_skips_fetch() {
        let page = OnePage::serving(Some("<body>contact@foo.com</body>"));
        let resolver = SocialBioResolver::new(page.clone(), "https://www.instagram.com", 1000);

        assert_eq!(resolver.resolve_email("").await, "");
        assert_eq!(resolver.resolve_email("@").await, "");
        assert!(page.visited().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_bio_email_is_ignored() {
        let page = OnePage::serving(Some("<body>noreply@brand.com</body>"));
        let resolver = SocialBioResolver::new(page, "https://www.instagram.com", 1000);
        assert_eq!(resolver.resolve_email("foo").await, "");
    }

    #[tokio::test]
    async fn test_navigation_failure_yields_empty() {
        let page = OnePage::serving(None);
        let resolver = SocialBioResolver::new(page.clone(), "https://www.instagram.com", 1000);
        assert_eq!(resolver.resolve_email("foo").await, "");
        assert_eq!(page.visited().len(), 1);
    }
}
