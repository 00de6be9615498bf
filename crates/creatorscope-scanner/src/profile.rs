//! Profile detail page resolution: authoritative role check plus social handle.

use crate::error::Result;
use crate::parser::HEADING_SELECTORS;
use crate::strategy::SelectorChain;
use creatorscope_core::RoleType;
use regex::Regex;
use scraper::Html;
use std::sync::OnceLock;

/// Anchors that may carry a creator's social handle.
const SOCIAL_LINK_SELECTOR: &str = "a[href*='instagram.com']";

/// Path segments that belong to the social site itself rather than an account.
const RESERVED_SEGMENTS: &[&str] = &[
    "p", "reel", "reels", "tv", "stories", "explore", "accounts", "direct",
];

fn handle_pattern() -> &'static Regex {
    static HANDLE: OnceLock<Regex> = OnceLock::new();
    HANDLE.get_or_init(|| {
        Regex::new(r"instagram\.com/([A-Za-z0-9._]+?)(?:/|\?|$)").expect("valid regex")
    })
}

/// Result of reading one profile page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileResolution {
    /// Social handle without `@`, empty when none was linked
    pub handle: String,
    /// Whether the page heading confirms the expected role
    pub role_confirmed: bool,
}

/// Reads profile detail pages.
#[derive(Debug, Clone)]
pub struct ProfileResolver {
    heading: SelectorChain,
    social_links: SelectorChain,
    brand_account: String,
}

impl ProfileResolver {
    /// `brand_account` is the listing site's own social account, never a creator handle.
    pub fn new(brand_account: &str) -> Result<Self> {
        Ok(Self {
            heading: SelectorChain::parse(HEADING_SELECTORS)?,
            social_links: SelectorChain::parse(&[SOCIAL_LINK_SELECTOR])?,
            brand_account: brand_account.to_lowercase(),
        })
    }

    /// Confirm the role from the page heading, then take the first linked creator handle.
    ///
    /// A missing or non-matching heading returns an unconfirmed, handle-less resolution.
    pub fn resolve(&self, html: &str, expected: RoleType) -> ProfileResolution {
        let document = Html::parse_document(html);
        let heading = self
            .heading
            .first_text(document.root_element())
            .unwrap_or_default();

        if !expected.matches(&heading) {
            tracing::debug!(%heading, role = %expected, "Profile heading does not confirm role");
            return ProfileResolution::default();
        }

        let handle = self
            .social_links
            .select_all(document.root_element())
            .filter_map(|anchor| anchor.value().attr("href"))
            .find_map(|href| self.handle_from_href(href))
            .unwrap_or_default();

        ProfileResolution {
            handle,
            role_confirmed: true,
        }
    }

    fn handle_from_href(&self, href: &str) -> Option<String> {
        let candidate = handle_pattern().captures(href)?.get(1)?.as_str();
        let lowered = candidate.to_lowercase();
        if lowered == self.brand_account || RESERVED_SEGMENTS.contains(&lowered.as_str()) {
            return None;
        }
        Some(candidate.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ProfileResolver {
        ProfileResolver::new("collabstr").expect("resolver")
    }

    fn profile(heading: &str, links: &[&str]) -> String {
        let anchors: String = links
            .iter()
            .map(|href| format!(r#"<a href="{href}">link</a>"#))
            .collect();
        format!(
            r#"<html><body><h1 class="listing-title">{heading}</h1>{anchors}</body></html>"#
        )
    }

    #[test]
    fn test_confirmed_profile_with_handle() {
        let html = profile(
            "UGC Creator & Photographer",
            &["https://www.instagram.com/jane.makes/"],
        );
        assert_eq!(
            resolver().resolve(&html, RoleType::Ugc),
            ProfileResolution {
                handle: "jane.makes".to_string(),
                role_confirmed: true,
            }
        );
    }

    #[test]
    fn test_brand_and_reserved_links_are_skipped() {
        let html = profile(
            "Video Editor",
            &[
                "https://instagram.com/Collabstr/",
                "https://www.instagram.com/p/Cx12ab/",
                "https://www.instagram.com/reels/",
                "https://www.instagram.com/sam_cuts?hl=en",
            ],
        );
        let resolution = resolver().resolve(&html, RoleType::VideoEditor);
        assert!(resolution.role_confirmed);
        assert_eq!(resolution.handle, "sam_cuts");
    }

    #[test]
    fn test_handle_at_end_of_href() {
        let html = profile("UGC", &["https://instagram.com/kai.films"]);
        assert_eq!(resolver().resolve(&html, RoleType::Ugc).handle, "kai.films");
    }

    #[test]
    fn test_confirmed_without_social_link() {
        let html = profile("Content creator", &["https://tiktok.com/@jane"]);
        assert_eq!(
            resolver().resolve(&html, RoleType::Ugc),
            ProfileResolution {
                handle: String::new(),
                role_confirmed: true,
            }
        );
    }

    #[test]
    fn test_wrong_heading_vetoes() {
        let html = profile("Video Editor", &["https://instagram.com/jane"]);
        assert_eq!(
            resolver().resolve(&html, RoleType::Ugc),
            ProfileResolution::default()
        );
    }

    #[test]
    fn test_missing_heading_vetoes() {
        let html = r#"<html><body><a href="https://instagram.com/jane">ig</a></body></html>"#;
        assert!(!resolver().resolve(html, RoleType::Ugc).role_confirmed);
    }

    #[test]
    fn test_header_title_fallback() {
        let html = r#"<html><body><div class="header-title">Freelance video editing</div>
            <a href="https://instagram.com/edits.by.mo/">ig</a></body></html>"#;
        let resolution = resolver().resolve(html, RoleType::VideoEditor);
        assert!(resolution.role_confirmed);
        assert_eq!(resolution.handle, "edits.by.mo");
    }
}
