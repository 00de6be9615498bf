//! Candidate admission before any profile page is fetched.

use crate::dedup::DeduplicationTracker;
use creatorscope_core::{CandidateRecord, RoleType};

/// Outcome of the pre-fetch filters for one extracted card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Worth a profile page fetch
    Accepted,
    /// Card heading names a different role
    WrongRole,
    /// Missing profile URL or display name
    Incomplete,
    /// Already accepted under the ugc category
    Duplicate,
}

impl Admission {
    /// Whether the candidate goes on to a profile fetch.
    pub fn is_accepted(self) -> bool {
        self == Self::Accepted
    }
}

/// Apply the coarse role check, the completeness check and, for video
/// editors, the cross-category duplicate check, in that order.
///
/// An empty card heading passes the role check; the profile page heading
/// decides for those cards.
pub fn admit(
    record: &CandidateRecord,
    role: RoleType,
    seen_ugc: &DeduplicationTracker,
) -> Admission {
    if !record.heading.is_empty() && !role.matches(&record.heading) {
        tracing::debug!(heading = %record.heading, %role, "Dropping card, heading does not match role");
        return Admission::WrongRole;
    }

    if !record.is_complete() {
        tracing::debug!(url = %record.profile_url, "Dropping incomplete card");
        return Admission::Incomplete;
    }

    if role == RoleType::VideoEditor && seen_ugc.contains(&record.profile_url) {
        tracing::debug!(url = %record.profile_url, "Dropping creator already exported as ugc");
        return Admission::Duplicate;
    }

    Admission::Accepted
}
