//! Per-user monitor state.

use std::collections::HashMap;

use rbxmon_models::PresenceSnapshot;

/// What the engine remembers about one monitored user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorState {
    /// Snapshot committed by the last poll. `None` before the first poll.
    pub last_snapshot: Option<PresenceSnapshot>,
    /// Place id of the most recent leave that was already reported.
    pub last_notified_leave_place_id: Option<String>,
    /// Whether a leave was reported since the user was last seen in game.
    ///
    /// Needed because the reported place id itself may be unknown.
    pub leave_reported: bool,
}

impl MonitorState {
    /// Forgets the reported leave. Called whenever the user is seen in game.
    pub fn clear_leave_marker(&mut self) {
        self.last_notified_leave_place_id = None;
        self.leave_reported = false;
    }

    /// Records that a leave from `place_id` has been reported.
    pub fn mark_leave_reported(&mut self, place_id: Option<String>) {
        self.last_notified_leave_place_id = place_id;
        self.leave_reported = true;
    }

    /// Whether a leave from `place_id` was already reported.
    pub fn is_leave_reported(&self, place_id: Option<&str>) -> bool {
        self.leave_reported && self.last_notified_leave_place_id.as_deref() == place_id
    }

    /// Returns true if the last snapshot was online.
    pub fn is_online(&self) -> bool {
        self.last_snapshot.as_ref().is_some_and(|s| s.online)
    }

    /// Returns true if the last snapshot was in game.
    pub fn is_in_game(&self) -> bool {
        self.last_snapshot.as_ref().is_some_and(|s| s.in_game)
    }
}

/// Last-known state for every monitored user.
///
/// Entries are created lazily on first poll and are kept for the lifetime
/// of the process.
#[derive(Debug, Default)]
pub struct StateStore {
    states: HashMap<String, MonitorState>,
}

impl StateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state for `username`, creating it if needed.
    pub fn entry(&mut self, username: &str) -> &mut MonitorState {
        self.states.entry(username.to_string()).or_default()
    }

    /// Returns the state for `username` if it has been polled.
    pub fn get(&self, username: &str) -> Option<&MonitorState> {
        self.states.get(username)
    }

    /// Last snapshot for `username`.
    pub fn snapshot(&self, username: &str) -> Option<&PresenceSnapshot> {
        self.get(username).and_then(|s| s.last_snapshot.as_ref())
    }

    /// Number of users with state.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if no user has been polled yet.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Number of users whose last snapshot is online.
    pub fn online_count(&self) -> usize {
        self.states.values().filter(|s| s.is_online()).count()
    }

    /// Number of users whose last snapshot is in game.
    pub fn in_game_count(&self) -> usize {
        self.states.values().filter(|s| s.is_in_game()).count()
    }

    /// Iterates over all known users and their state.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MonitorState)> {
        self.states.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rbxmon_models::PresenceKind;

    #[test]
    fn test_entry_is_created_lazily() {
        let mut store = StateStore::new();
        assert!(store.is_empty());
        assert!(store.get("alice").is_none());

        let state = store.entry("alice");
        assert!(state.last_snapshot.is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_counts() {
        let mut store = StateStore::new();
        let now = Utc::now();

        store.entry("alice").last_snapshot = Some(PresenceSnapshot::from_kind(
            PresenceKind::InGame,
            Some("1".to_string()),
            None,
            now,
        ));
        store.entry("bob").last_snapshot =
            Some(PresenceSnapshot::from_kind(PresenceKind::Online, None, None, now));
        store.entry("carol").last_snapshot = Some(PresenceSnapshot::offline(now));
        store.entry("dave");

        assert_eq!(store.len(), 4);
        assert_eq!(store.online_count(), 2);
        assert_eq!(store.in_game_count(), 1);
        assert!(store.snapshot("dave").is_none());
        assert!(store.snapshot("alice").is_some());
    }

    #[test]
    fn test_leave_marker() {
        let mut state = MonitorState::default();
        assert!(!state.is_leave_reported(None));
        assert!(!state.is_leave_reported(Some("P")));

        state.mark_leave_reported(Some("P".to_string()));
        assert!(state.is_leave_reported(Some("P")));
        assert!(!state.is_leave_reported(Some("Q")));

        state.mark_leave_reported(None);
        assert!(state.is_leave_reported(None));

        state.clear_leave_marker();
        assert!(!state.is_leave_reported(None));
        assert_eq!(state.last_notified_leave_place_id, None);
    }
}
