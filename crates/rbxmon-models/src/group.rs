//! Group membership types.

use serde::{Deserialize, Serialize};

/// A user's membership and rank in one group.
///
/// Never persisted. It is fetched fresh whenever a join is reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GroupRankInfo {
    /// Whether the user belongs to the group.
    pub is_member: bool,
    /// Rank number inside the group, 0 when not a member.
    pub rank: u32,
    /// Role name for the rank, empty when not a member.
    pub role_name: String,
}

impl GroupRankInfo {
    /// Membership with the given rank and role.
    pub fn member(rank: u32, role_name: impl Into<String>) -> Self {
        Self {
            is_member: true,
            rank,
            role_name: role_name.into(),
        }
    }

    /// Not a member of the group.
    pub fn not_member() -> Self {
        Self::default()
    }
}
