//! Presence types.
//!
//! A [`PresenceSnapshot`] is the best-effort view of one user at one poll.
//! Upstream reports presence as a small integer; [`PresenceKind`] is the
//! closed set of values we understand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upstream presence type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PresenceKind {
    /// Not connected.
    #[default]
    Offline,
    /// Online on the website or app, not in a game.
    Online,
    /// Playing a game.
    InGame,
    /// In the authoring tool.
    InStudio,
}

impl PresenceKind {
    /// Maps the upstream `userPresenceType` integer.
    ///
    /// Unknown values are treated as offline.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => PresenceKind::Online,
            2 => PresenceKind::InGame,
            3 => PresenceKind::InStudio,
            _ => PresenceKind::Offline,
        }
    }

    /// Whether this kind counts as online.
    pub fn is_online(self) -> bool {
        !matches!(self, PresenceKind::Offline)
    }

    /// Whether this kind counts as in a game.
    pub fn is_in_game(self) -> bool {
        matches!(self, PresenceKind::InGame)
    }
}

/// Latest known presence of a monitored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceSnapshot {
    /// Upstream presence type is not offline.
    pub online: bool,

    /// Upstream presence type is "in game". Implies `online`.
    pub in_game: bool,

    /// Identifier of the specific place the user is in. Only set while in game.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,

    /// Identifier of the game title. May be missing even when `place_id` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub universe_id: Option<u64>,

    /// Human readable game title. Cosmetic only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_name: Option<String>,

    /// When the snapshot was taken.
    pub observed_at: DateTime<Utc>,
}

impl PresenceSnapshot {
    /// A fully offline snapshot.
    ///
    /// This is also what every failed fetch degrades to.
    pub fn offline(observed_at: DateTime<Utc>) -> Self {
        Self {
            online: false,
            in_game: false,
            place_id: None,
            universe_id: None,
            game_name: None,
            observed_at,
        }
    }

    /// Builds a snapshot from an upstream presence kind.
    ///
    /// Place and universe ids are dropped unless the kind is in game.
    pub fn from_kind(
        kind: PresenceKind,
        place_id: Option<String>,
        universe_id: Option<u64>,
        observed_at: DateTime<Utc>,
    ) -> Self {
        let in_game = kind.is_in_game();
        Self {
            online: kind.is_online(),
            in_game,
            place_id: place_id.filter(|_| in_game),
            universe_id: universe_id.filter(|_| in_game),
            game_name: None,
            observed_at,
        }
    }

    /// Attaches a resolved game name.
    pub fn with_game_name(mut self, name: Option<String>) -> Self {
        self.game_name = name;
        self
    }

    /// The presence kind this snapshot reflects.
    ///
    /// Studio and plain online collapse to [`PresenceKind::Online`].
    pub fn kind(&self) -> PresenceKind {
        if self.in_game {
            PresenceKind::InGame
        } else if self.online {
            PresenceKind::Online
        } else {
            PresenceKind::Offline
        }
    }

    /// Best display label for the game: name, then place id.
    pub fn game_label(&self) -> Option<&str> {
        self.game_name.as_deref().or(self.place_id.as_deref())
    }
}
