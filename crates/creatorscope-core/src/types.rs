//! Shared types used across creatorscope.
//!
//! This module defines the role categories a run scrapes and the candidate
//! record that flows through extraction, resolution and enrichment.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Creator role categories scraped independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleType {
    /// User generated content creators
    Ugc,
    /// Video editors
    VideoEditor,
}

impl RoleType {
    /// Categories in the order a run must scrape them.
    pub const ALL: [RoleType; 2] = [RoleType::Ugc, RoleType::VideoEditor];

    /// Stable identifier used in exported rows.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ugc => "ugc",
            Self::VideoEditor => "video_editor",
        }
    }

    /// Lowercase terms whose presence in a heading places it in this category.
    #[must_use]
    pub fn terms(&self) -> &'static [&'static str] {
        match self {
            Self::Ugc => &["ugc", "user generated content", "content creator"],
            Self::VideoEditor => &["video", "editor", "video editor", "video editing"],
        }
    }

    /// Human-readable label for log output.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ugc => "UGC",
            Self::VideoEditor => "Video Creators",
        }
    }

    /// File name of the exported CSV for this category.
    #[must_use]
    pub fn export_file_name(&self) -> &'static str {
        match self {
            Self::Ugc => "ugc_creators.csv",
            Self::VideoEditor => "video_editors.csv",
        }
    }

    /// Case-insensitive check of a heading against this category's terms.
    ///
    /// An empty heading never matches.
    #[must_use]
    pub fn matches(&self, heading: &str) -> bool {
        crate::validation::heading_matches_role(heading, *self)
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One creator profile extracted from a listing card.
///
/// Fields are empty strings rather than `Option`s: extraction is best-effort
/// and an empty field carries the same meaning as an absent one downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Absolute profile URL on the listing site
    pub profile_url: String,
    /// `@` plus the final path segment of `profile_url`
    pub username: String,
    /// Creator display name, falls back to `username`
    pub display_name: String,
    /// Role-describing title shown on the card
    pub heading: String,
    /// Validated contact email
    pub email: String,
    /// Category the record was scraped under
    pub role_type: RoleType,
    /// Social account handle resolved from the profile page
    pub instagram_handle: String,
}

impl CandidateRecord {
    /// An all-empty record, the result of a card that yielded nothing usable.
    #[must_use]
    pub fn empty(role_type: RoleType) -> Self {
        Self {
            profile_url: String::new(),
            username: String::new(),
            display_name: String::new(),
            heading: String::new(),
            email: String::new(),
            role_type,
            instagram_handle: String::new(),
        }
    }

    /// A record is usable once it has both a profile URL and a display name.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.profile_url.is_empty() && !self.display_name.is_empty()
    }

    /// Whether the record already carries a contact email.
    #[must_use]
    pub fn has_email(&self) -> bool {
        !self.email.is_empty()
    }

    /// Records without an email but with a handle are sent to the bio resolver.
    #[must_use]
    pub fn needs_enrichment(&self) -> bool {
        !self.has_email() && !self.instagram_handle.is_empty()
    }
}
