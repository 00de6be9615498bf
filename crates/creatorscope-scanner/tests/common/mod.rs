//! Scripted in-memory browser for pipeline tests.

#![allow(dead_code)]

use async_trait::async_trait;
use creatorscope_browser::{BrowserActions, BrowserError, Result, StoredCookie};
use scraper::{Html, Selector};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

const BLANK_PAGE: &str = "<html><head></head><body></body></html>";

#[derive(Default)]
struct FakeState {
    current_url: String,
    current_html: String,
    visited: Vec<String>,
    filled: Vec<(String, String)>,
    clicked: Vec<String>,
    entered: Vec<String>,
    installed_cookies: Vec<StoredCookie>,
}

/// Serves fixed HTML per URL. Selector checks run against the current page.
#[derive(Default)]
pub struct FakeBrowser {
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    submit_lands_on: Option<String>,
    restored_page: Option<String>,
    session_cookies: Vec<StoredCookie>,
    state: Mutex<FakeState>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    /// Navigating to `url` fails with a timeout.
    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// Clicking submit or pressing Enter loads `url`.
    pub fn submit_lands_on(mut self, url: &str) -> Self {
        self.submit_lands_on = Some(url.to_string());
        self
    }

    /// Reloading after cookies were installed shows this page.
    pub fn restores_to(mut self, html: impl Into<String>) -> Self {
        self.restored_page = Some(html.into());
        self
    }

    /// Cookies reported by `cookies()`.
    pub fn session_cookies(mut self, cookies: Vec<StoredCookie>) -> Self {
        self.session_cookies = cookies;
        self
    }

    pub fn visited(&self) -> Vec<String> {
        self.state.lock().expect("lock").visited.clone()
    }

    pub fn visits_to(&self, prefix: &str) -> usize {
        self.visited()
            .iter()
            .filter(|url| url.starts_with(prefix))
            .count()
    }

    pub fn filled(&self) -> Vec<(String, String)> {
        self.state.lock().expect("lock").filled.clone()
    }

    pub fn clicked(&self) -> Vec<String> {
        self.state.lock().expect("lock").clicked.clone()
    }

    pub fn entered(&self) -> Vec<String> {
        self.state.lock().expect("lock").entered.clone()
    }

    pub fn installed_cookies(&self) -> Vec<StoredCookie> {
        self.state.lock().expect("lock").installed_cookies.clone()
    }

    fn load(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().expect("lock");
        state.visited.push(url.to_string());
        if self.failing.contains(url) {
            return Err(BrowserError::Timeout(format!("navigating to {url}")));
        }
        state.current_url = url.to_string();
        state.current_html = self
            .pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| BLANK_PAGE.to_string());
        Ok(())
    }

    fn submit(&self) -> Result<()> {
        match self.submit_lands_on.clone() {
            Some(url) => self.load(&url),
            None => Ok(()),
        }
    }

    fn present(&self, selector: &str) -> Result<bool> {
        let selector = Selector::parse(selector)
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;
        let html = self.state.lock().expect("lock").current_html.clone();
        let document = Html::parse_document(&html);
        let found = document.select(&selector).next().is_some();
        Ok(found)
    }
}

#[async_trait]
impl BrowserActions for FakeBrowser {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.load(url)
    }

    async fn reload(&self) -> Result<()> {
        let mut state = self.state.lock().expect("lock");
        if !state.installed_cookies.is_empty() {
            if let Some(html) = &self.restored_page {
                state.current_html = html.clone();
            }
        }
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.state.lock().expect("lock").current_url.clone())
    }

    async fn content(&self) -> Result<String> {
        Ok(self.state.lock().expect("lock").current_html.clone())
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        self.present(selector)
    }

    async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<()> {
        if self.present(selector)? {
            Ok(())
        } else {
            Err(BrowserError::Timeout(format!(
                "{selector} not present after {timeout_ms}ms"
            )))
        }
    }

    async fn fill_field(&self, selector: &str, value: &str) -> Result<()> {
        if !self.present(selector)? {
            return Err(BrowserError::SelectorNotFound(selector.to_string()));
        }
        self.state
            .lock()
            .expect("lock")
            .filled
            .push((selector.to_string(), value.to_string()));
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        if !self.present(selector)? {
            return Err(BrowserError::SelectorNotFound(selector.to_string()));
        }
        self.state
            .lock()
            .expect("lock")
            .clicked
            .push(selector.to_string());
        self.submit()
    }

    async fn press_enter(&self, selector: &str) -> Result<()> {
        self.state
            .lock()
            .expect("lock")
            .entered
            .push(selector.to_string());
        self.submit()
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        Ok(())
    }

    async fn cookies(&self) -> Result<Vec<StoredCookie>> {
        Ok(self.session_cookies.clone())
    }

    async fn set_cookies(&self, cookies: &[StoredCookie]) -> Result<()> {
        self.state.lock().expect("lock").installed_cookies = cookies.to_vec();
        Ok(())
    }
}

/// A listing page holding the given cards.
pub fn listing(cards: &[String]) -> String {
    format!("<html><body><main>{}</main></body></html>", cards.join("\n"))
}

/// A listing card. Empty arguments leave the element out.
pub fn card(href: &str, name: &str, heading: &str) -> String {
    let link = if href.is_empty() {
        format!(r#"<span>{name}</span>"#)
    } else {
        format!(
            r#"<a href="{href}"><div class="profile-listing-owner-name">{name} 4.8</div></a>"#
        )
    };
    let heading = if heading.is_empty() {
        String::new()
    } else {
        format!(r#"<h1 class="listing-title">{heading}</h1>"#)
    };
    format!(r#"<div class="profile-listing-holder">{link}{heading}</div>"#)
}

/// A profile detail page with a role heading and optional social link.
pub fn profile(heading: &str, handle: &str) -> String {
    let link = if handle.is_empty() {
        String::new()
    } else {
        format!(r#"<a href="https://www.instagram.com/{handle}/">Instagram</a>"#)
    };
    format!(
        r#"<html><body><h1 class="listing-title">{heading}</h1>
        <a href="https://www.instagram.com/collabstr/">Follow us</a>{link}</body></html>"#
    )
}

/// A social bio page.
pub fn bio(text: &str) -> String {
    format!("<html><body><header><p>{text}</p></header></body></html>")
}

pub fn session_cookie() -> StoredCookie {
    StoredCookie {
        name: "sessionid".to_string(),
        value: "abc123".to_string(),
        domain: ".collabstr.com".to_string(),
        path: "/".to_string(),
        secure: true,
        http_only: true,
    }
}
