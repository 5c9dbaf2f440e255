//! Notification events produced by the transition engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of transition that was observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// The user entered a game, either from outside any game or by switching
    /// from another place.
    JoinedGame {
        /// Place the user is now in.
        place_id: String,
        /// Game title id, if upstream reported it.
        #[serde(skip_serializing_if = "Option::is_none")]
        universe_id: Option<u64>,
        /// Resolved game name.
        #[serde(skip_serializing_if = "Option::is_none")]
        game_name: Option<String>,
    },
    /// The user was in a game on the previous poll and no longer is.
    LeftGame {
        /// Place the user left, if it was known.
        #[serde(skip_serializing_if = "Option::is_none")]
        place_id: Option<String>,
        /// Name of the game the user left.
        #[serde(skip_serializing_if = "Option::is_none")]
        game_name: Option<String>,
    },
    /// The user was online on the previous poll and is now offline.
    WentOffline,
}

impl EventKind {
    /// Short stable label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::JoinedGame { .. } => "joined_game",
            EventKind::LeftGame { .. } => "left_game",
            EventKind::WentOffline => "went_offline",
        }
    }

    /// Returns true for [`EventKind::JoinedGame`].
    pub fn is_join(&self) -> bool {
        matches!(self, EventKind::JoinedGame { .. })
    }
}

/// How a group member's rank is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankClass {
    /// A member whose rank is not in the tracked set.
    Member,
    /// A member holding one of the tracked ranks.
    Tracked,
}

/// Group rank attached to a join event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankTag {
    pub rank: u32,
    pub role_name: String,
    pub class: RankClass,
}

impl RankTag {
    /// Returns true if the rank is one of the tracked ranks.
    pub fn is_tracked(&self) -> bool {
        self.class == RankClass::Tracked
    }
}

/// A transition ready to be delivered to a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Monitored username, as configured.
    pub username: String,
    /// What happened.
    pub kind: EventKind,
    /// Group rank, only ever present on joins by group members.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<RankTag>,
    /// Observation time of the snapshot that triggered the event.
    pub observed_at: DateTime<Utc>,
}

impl NotificationEvent {
    /// Creates an untagged event.
    pub fn new(username: impl Into<String>, kind: EventKind, observed_at: DateTime<Utc>) -> Self {
        Self {
            username: username.into(),
            kind,
            rank: None,
            observed_at,
        }
    }

    /// Attaches a rank tag.
    pub fn with_rank(mut self, rank: Option<RankTag>) -> Self {
        self.rank = rank;
        self
    }

    /// Returns true if the event carries a tracked rank.
    pub fn is_tracked_rank(&self) -> bool {
        self.rank.as_ref().is_some_and(RankTag::is_tracked)
    }
}
