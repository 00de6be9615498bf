//! Field validation applied wherever a value is accepted into a record.
//!
//! Both predicates are pure: identical input always gives identical output.

use crate::types::RoleType;
use regex::Regex;
use std::sync::OnceLock;

/// Substrings that mark an address as unusable for outreach.
const BLOCKED_PATTERNS: &[&str] = &[
    "noreply",
    "no-reply",
    "donotreply",
    "example.com",
    "test@",
    "admin@localhost",
];

const MIN_EMAIL_LEN: usize = 6;
const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;
const MAX_DOMAIN_LEN: usize = 253;

fn email_shape() -> &'static Regex {
    static EMAIL_SHAPE: OnceLock<Regex> = OnceLock::new();
    EMAIL_SHAPE.get_or_init(|| {
        Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$").expect("valid regex")
    })
}

fn email_in_text() -> &'static Regex {
    static EMAIL_IN_TEXT: OnceLock<Regex> = OnceLock::new();
    EMAIL_IN_TEXT.get_or_init(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
    })
}

/// Returns `true` if `email` is a usable contact address.
///
/// The value is trimmed and lowercased, then checked for shape, blocked
/// placeholder patterns and RFC length limits.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email_shape().is_match(&email) {
        return false;
    }

    if BLOCKED_PATTERNS.iter().any(|p| email.contains(p)) {
        return false;
    }

    if email.len() < MIN_EMAIL_LEN || email.len() > MAX_EMAIL_LEN {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > MAX_LOCAL_LEN || domain.contains('@') {
        return false;
    }
    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN || !domain.contains('.') {
        return false;
    }

    domain.rsplit('.').next().is_some_and(|tld| tld.len() >= 2)
}

/// First email-shaped substring of `text`, unvalidated.
#[must_use]
pub fn find_email(text: &str) -> Option<&str> {
    email_in_text().find(text).map(|m| m.as_str())
}

/// First email-shaped substring of `text`, kept only if it passes [`is_valid_email`].
///
/// Only the first match is considered; a later valid address does not rescue
/// an invalid first one.
#[must_use]
pub fn first_valid_email(text: &str) -> Option<String> {
    find_email(text)
        .filter(|email| is_valid_email(email))
        .map(str::to_string)
}

/// Case-insensitive substring match of a heading against a role's term set.
#[must_use]
pub fn heading_matches_role(heading: &str, role: RoleType) -> bool {
    if heading.trim().is_empty() {
        return false;
    }
    let heading = heading.to_lowercase();
    role.terms().iter().any(|term| heading.contains(term))
}
