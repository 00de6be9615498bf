//! Listing card extraction.

use crate::error::{Result, ScanError};
use crate::strategy::{element_text, SelectorChain};
use creatorscope_core::{first_valid_email, CandidateRecord, RoleType};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use url::Url;

/// One creator card on a listing page.
pub const CARD_SELECTOR: &str = "div.profile-listing-holder";
/// Site-relative links inside a card.
pub const LINK_SELECTOR: &str = "a[href^='/']";
/// Creator name strategies.
pub const NAME_SELECTORS: &[&str] = &["div.profile-listing-owner-name"];
/// Role heading strategies, shared by cards and profile pages.
pub const HEADING_SELECTORS: &[&str] = &["h1.listing-title", ".header-title"];

/// Link paths that point at site chrome rather than a creator profile.
const REJECTED_PATH_KEYWORDS: &[&str] = &["login", "signup", "about", "contact"];

fn rating_suffix() -> &'static Regex {
    static RATING_SUFFIX: OnceLock<Regex> = OnceLock::new();
    RATING_SUFFIX.get_or_init(|| Regex::new(r"\s*\d+\.\d+\s*$").expect("valid regex"))
}

/// Turns listing-page cards into [`CandidateRecord`]s.
#[derive(Debug, Clone)]
pub struct CardExtractor {
    base_url: Url,
    card: Selector,
    link: Selector,
    name: SelectorChain,
    heading: SelectorChain,
}

impl CardExtractor {
    /// Build an extractor resolving card links against `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ScanError::InvalidSeedUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            base_url,
            card: parse_selector(CARD_SELECTOR)?,
            link: parse_selector(LINK_SELECTOR)?,
            name: SelectorChain::parse(NAME_SELECTORS)?,
            heading: SelectorChain::parse(HEADING_SELECTORS)?,
        })
    }

    /// Extract every card on a listing page, in document order.
    pub fn extract_page(&self, html: &str, role: RoleType) -> Vec<CandidateRecord> {
        let document = Html::parse_document(html);
        document
            .select(&self.card)
            .map(|card| self.extract_card(card, role))
            .collect()
    }

    /// Best-effort extraction of one card. Never fails: a card that cannot be
    /// read yields an all-empty record, which the completeness filter drops.
    pub fn extract_card(&self, card: ElementRef<'_>, role: RoleType) -> CandidateRecord {
        self.try_extract(card, role).unwrap_or_else(|| {
            tracing::debug!("Card extraction failed, keeping empty record");
            CandidateRecord::empty(role)
        })
    }

    fn try_extract(&self, card: ElementRef<'_>, role: RoleType) -> Option<CandidateRecord> {
        let profile = match card.select(&self.link).next() {
            Some(anchor) => {
                let href = anchor.value().attr("href")?;
                let url = self.base_url.join(href).ok()?;
                (!is_rejected_path(url.path())).then_some(url)
            }
            None => None,
        };

        let username = profile.as_ref().map(username_from_url).unwrap_or_default();

        // A present name element wins even when it holds only a rating.
        let display_name = match self.name.first_match(card) {
            Some(element) => rating_suffix()
                .replace(&element_text(element), "")
                .trim()
                .to_string(),
            None => username.clone(),
        };

        let heading = self.heading.first_text(card).unwrap_or_default();
        let email = first_valid_email(&element_text(card)).unwrap_or_default();

        Some(CandidateRecord {
            profile_url: profile.map(String::from).unwrap_or_default(),
            username,
            display_name,
            heading,
            email,
            role_type: role,
            instagram_handle: String::new(),
        })
    }
}

fn parse_selector(source: &str) -> Result<Selector> {
    Selector::parse(source).map_err(|e| ScanError::InvalidSelector {
        selector: source.to_string(),
        reason: e.to_string(),
    })
}

fn is_rejected_path(path: &str) -> bool {
    let path = path.to_lowercase();
    REJECTED_PATH_KEYWORDS.iter().any(|kw| path.contains(kw))
}

/// `@` plus the last non-empty path segment, or empty when the path has none.
pub fn username_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(|segment| format!("@{segment}"))
        .unwrap_or_default()
}
