//! Upstream JSON shapes. Only the fields rbxmon reads are declared.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsernameLookupRequest<'a> {
    pub usernames: [&'a str; 1],
    pub exclude_banned_users: bool,
}

#[derive(Debug, Deserialize)]
pub struct UsernameLookupResponse {
    pub data: Vec<UsernameHit>,
}

#[derive(Debug, Deserialize)]
pub struct UsernameHit {
    pub id: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceRequest {
    pub user_ids: [u64; 1],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceResponse {
    pub user_presences: Vec<UserPresence>,
}

/// One entry of `userPresences`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPresence {
    /// Required: an entry without it says nothing about the user.
    pub user_presence_type: i64,
    #[serde(default)]
    pub last_location: Option<String>,
    #[serde(default)]
    pub place_id: Option<u64>,
    #[serde(default)]
    pub universe_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct GroupRolesResponse {
    pub data: Vec<GroupMembership>,
}

/// One entry of a user's group roles.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupMembership {
    pub group: GroupRef,
    pub role: GroupRole,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupRef {
    pub id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupRole {
    pub name: String,
    pub rank: u32,
}

#[derive(Debug, Deserialize)]
pub struct GamesResponse {
    pub data: Vec<GameDetail>,
}

#[derive(Debug, Deserialize)]
pub struct GameDetail {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceUniverseResponse {
    #[serde(default)]
    pub universe_id: Option<u64>,
}
