//! Ordered selector fallbacks.
//!
//! Listing markup changes often, so every element is located through a
//! [`SelectorChain`]: a list of CSS selectors tried in order, first match wins.

use crate::error::{Result, ScanError};
use creatorscope_browser::BrowserActions;
use scraper::{ElementRef, Node, Selector};

/// Elements that start a new line when rendered; everything else is inline.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "br", "dd", "div", "dl", "dt", "footer", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "li", "main", "nav", "ol", "p", "section", "table", "td", "th", "tr",
    "ul",
];

/// Ordered CSS selector strategies for one element.
#[derive(Debug, Clone)]
pub struct SelectorChain {
    sources: Vec<String>,
    selectors: Vec<Selector>,
}

impl SelectorChain {
    /// Parse every selector up front; one bad selector rejects the chain.
    pub fn parse(sources: &[&str]) -> Result<Self> {
        let selectors = sources
            .iter()
            .map(|source| {
                Selector::parse(source).map_err(|e| ScanError::InvalidSelector {
                    selector: (*source).to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            sources: sources.iter().map(|s| (*s).to_string()).collect(),
            selectors,
        })
    }

    /// First element under `scope` matched by the highest-priority selector that matches at all.
    pub fn first_match<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.selectors
            .iter()
            .find_map(|selector| scope.select(selector).next())
    }

    /// Every element matched by any strategy, strategies in priority order.
    pub fn select_all<'a, 'b>(
        &'b self,
        scope: ElementRef<'a>,
    ) -> impl Iterator<Item = ElementRef<'a>> + 'b
    where
        'a: 'b,
    {
        self.selectors
            .iter()
            .flat_map(move |selector| scope.select(selector))
    }

    /// Normalized text of the first strategy yielding a non-empty string.
    pub fn first_text(&self, scope: ElementRef<'_>) -> Option<String> {
        self.selectors.iter().find_map(|selector| {
            scope
                .select(selector)
                .next()
                .map(element_text)
                .filter(|text| !text.is_empty())
        })
    }

    /// First selector present in the live page, waiting up to `timeout_ms` for the first
    /// strategy only; the rest are probed without waiting.
    pub async fn first_present(
        &self,
        browser: &dyn BrowserActions,
        timeout_ms: u64,
    ) -> Option<&str> {
        for (idx, source) in self.sources.iter().enumerate() {
            let present = if idx == 0 && timeout_ms > 0 {
                browser.wait_for_selector(source, timeout_ms).await.is_ok()
            } else {
                browser.exists(source).await.unwrap_or(false)
            };
            if present {
                return Some(source.as_str());
            }
        }
        None
    }
}

/// Visible text of an element with whitespace runs collapsed to single spaces.
///
/// Inline elements join their neighbours without a gap, so `jane@<b>studio.io</b>`
/// reads as one word; block elements are separated.
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => raw.push_str(text),
            Node::Element(el) if BLOCK_ELEMENTS.contains(&el.name()) => raw.push(' '),
            _ => {}
        }
    }
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
