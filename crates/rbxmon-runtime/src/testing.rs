//! Scripted sources and a recording sink for runtime tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;

use rbxmon_core::{GroupRankSource, PresenceSource, SourceResult};
use rbxmon_models::{GroupRankInfo, NotificationEvent, PresenceSnapshot};

use crate::sink::{NotificationSink, SinkError};

/// Presence source replaying queued results per user.
///
/// Once a user's queue runs dry the user reads as offline.
#[derive(Default)]
pub struct ScriptedPresence {
    script: Mutex<HashMap<String, VecDeque<SourceResult<PresenceSnapshot>>>>,
    calls: AtomicUsize,
    gate: Option<(Notify, Notify)>,
}

impl ScriptedPresence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every fetch wait for [`ScriptedPresence::release`].
    pub fn gated(mut self) -> Self {
        self.gate = Some((Notify::new(), Notify::new()));
        self
    }

    pub fn push(&self, username: &str, result: SourceResult<PresenceSnapshot>) {
        self.script
            .lock()
            .unwrap()
            .entry(username.to_string())
            .or_default()
            .push_back(result);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Waits until a gated fetch has started.
    pub async fn entered(&self) {
        if let Some((entered, _)) = &self.gate {
            entered.notified().await;
        }
    }

    /// Lets one gated fetch finish.
    pub fn release(&self) {
        if let Some((_, release)) = &self.gate {
            release.notify_one();
        }
    }
}

#[async_trait]
impl PresenceSource for ScriptedPresence {
    async fn fetch(&self, username: &str) -> SourceResult<PresenceSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }

        let next = self
            .script
            .lock()
            .unwrap()
            .get_mut(username)
            .and_then(VecDeque::pop_front);
        next.unwrap_or_else(|| Ok(PresenceSnapshot::offline(Utc::now())))
    }
}

/// Group rank source with fixed memberships.
#[derive(Default)]
pub struct StaticRanks {
    members: Mutex<HashMap<String, GroupRankInfo>>,
    calls: AtomicUsize,
}

impl StaticRanks {
    pub fn set(&self, username: &str, rank: u32, role_name: &str) {
        self.members
            .lock()
            .unwrap()
            .insert(username.to_string(), GroupRankInfo::member(rank, role_name));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GroupRankSource for StaticRanks {
    async fn fetch(&self, username: &str, _group_id: u64) -> SourceResult<GroupRankInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .members
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .unwrap_or_else(GroupRankInfo::not_member))
    }
}

/// Sink that keeps every delivered event.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<NotificationEvent>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects every event for `username`.
    pub fn fail_for(&self, username: &str) {
        self.failing.lock().unwrap().insert(username.to_string());
    }

    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn deliver(&self, event: &NotificationEvent) -> Result<(), SinkError> {
        if self.failing.lock().unwrap().contains(&event.username) {
            return Err(SinkError::Delivery("chat unreachable".into()));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
