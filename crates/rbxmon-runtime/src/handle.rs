//! Control surface over a running monitor.

use std::sync::Arc;
use std::time::Duration;

use rbxmon_models::PresenceSnapshot;

use crate::poller::{CycleReport, Monitor};

/// Last known presence of one monitored user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStatus {
    /// Username as configured.
    pub username: String,
    /// `None` until the user has been polled once.
    pub snapshot: Option<PresenceSnapshot>,
}

impl UserStatus {
    /// Online as of the last poll. Never-polled users count as offline.
    pub fn is_online(&self) -> bool {
        self.snapshot.as_ref().is_some_and(|s| s.online)
    }

    /// In a game as of the last poll.
    pub fn is_in_game(&self) -> bool {
        self.snapshot.as_ref().is_some_and(|s| s.in_game)
    }
}

/// Summary shown by status commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorStatus {
    /// Whether ticks currently run cycles.
    pub monitoring: bool,
    /// Time between ticks.
    pub poll_interval: Duration,
    /// Number of monitored users.
    pub users: usize,
    /// Users online as of their last poll.
    pub online: usize,
    /// Users in a game as of their last poll.
    pub in_game: usize,
}

/// Cloneable handle for chat commands and the binary.
#[derive(Clone)]
pub struct MonitorHandle {
    monitor: Arc<Monitor>,
}

impl MonitorHandle {
    pub(crate) fn new(monitor: Arc<Monitor>) -> Self {
        Self { monitor }
    }

    /// Whether ticks currently run cycles.
    pub fn is_monitoring(&self) -> bool {
        self.monitor.is_monitoring()
    }

    /// Turns monitoring on or off. Returns the previous value.
    ///
    /// A cycle already in flight runs to completion either way.
    pub fn set_monitoring(&self, enabled: bool) -> bool {
        self.monitor.set_monitoring(enabled)
    }

    /// Runs a cycle now. `None` if one is already running.
    pub async fn trigger_cycle(&self) -> Option<CycleReport> {
        self.monitor.try_cycle().await
    }

    /// Every monitored user in poll order.
    pub async fn users(&self) -> Vec<UserStatus> {
        let store = self.monitor.store().read().await;
        self.monitor
            .users()
            .iter()
            .map(|username| UserStatus {
                username: username.clone(),
                snapshot: store.snapshot(username).cloned(),
            })
            .collect()
    }

    /// Users currently in a game.
    pub async fn in_game_users(&self) -> Vec<UserStatus> {
        self.users()
            .await
            .into_iter()
            .filter(UserStatus::is_in_game)
            .collect()
    }

    /// Counts over the latest snapshots plus the monitoring flag and interval.
    pub async fn status(&self) -> MonitorStatus {
        let store = self.monitor.store().read().await;
        MonitorStatus {
            monitoring: self.monitor.is_monitoring(),
            poll_interval: self.monitor.poll_interval(),
            users: self.monitor.users().len(),
            online: store.online_count(),
            in_game: store.in_game_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeConfig;
    use crate::poller::MonitorParts;
    use crate::testing::{RecordingSink, ScriptedPresence, StaticRanks};
    use chrono::Utc;
    use rbxmon_models::PresenceKind;

    fn handle(presence: Arc<ScriptedPresence>) -> MonitorHandle {
        let monitor = Monitor::new(
            RuntimeConfig::new(["alice", "bob", "carol"]),
            MonitorParts {
                presence,
                ranks: Arc::new(StaticRanks::default()),
                sink: Arc::new(RecordingSink::new()),
            },
        );
        MonitorHandle::new(Arc::new(monitor))
    }

    #[tokio::test]
    async fn test_users_before_first_cycle() {
        let handle = handle(Arc::new(ScriptedPresence::new()));

        let users = handle.users().await;
        assert_eq!(users.len(), 3);
        assert!(users.iter().all(|u| u.snapshot.is_none()));
        assert!(handle.in_game_users().await.is_empty());
    }

    #[tokio::test]
    async fn test_users_after_cycle() {
        let presence = Arc::new(ScriptedPresence::new());
        presence.push(
            "bob",
            Ok(PresenceSnapshot::from_kind(
                PresenceKind::InGame,
                Some("100".into()),
                None,
                Utc::now(),
            )),
        );
        presence.push(
            "carol",
            Ok(PresenceSnapshot::from_kind(PresenceKind::Online, None, None, Utc::now())),
        );
        let handle = handle(presence);

        handle.trigger_cycle().await.unwrap();

        let users = handle.users().await;
        let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
        assert!(!users[0].is_online());
        assert!(users[2].is_online());

        let in_game = handle.in_game_users().await;
        assert_eq!(in_game.len(), 1);
        assert_eq!(in_game[0].username, "bob");

        let status = handle.status().await;
        assert_eq!(status.users, 3);
        assert_eq!(status.online, 2);
        assert_eq!(status.in_game, 1);
        assert!(status.monitoring);
    }

    #[tokio::test]
    async fn test_set_monitoring_returns_previous() {
        let handle = handle(Arc::new(ScriptedPresence::new()));

        assert!(handle.set_monitoring(false));
        assert!(!handle.is_monitoring());
        assert!(!handle.set_monitoring(true));
        assert!(handle.is_monitoring());
    }
}
