//! Upstream source traits.
//!
//! The engine and poller only ever talk to upstream through these traits,
//! which keeps the HTTP clients swappable and lets tests script presence.

use async_trait::async_trait;
use std::sync::Arc;

use rbxmon_models::{GroupRankInfo, PresenceSnapshot};

use crate::error::SourceResult;

/// Fetches the current presence of a user.
#[async_trait]
pub trait PresenceSource: Send + Sync {
    /// Returns a best-effort snapshot for `username`.
    ///
    /// Callers treat any error as a fully offline snapshot.
    async fn fetch(&self, username: &str) -> SourceResult<PresenceSnapshot>;
}

/// Fetches a user's membership and rank in a group.
#[async_trait]
pub trait GroupRankSource: Send + Sync {
    /// Returns membership of `username` in `group_id`.
    async fn fetch(&self, username: &str, group_id: u64) -> SourceResult<GroupRankInfo>;
}

#[async_trait]
impl<T: PresenceSource + ?Sized> PresenceSource for Arc<T> {
    async fn fetch(&self, username: &str) -> SourceResult<PresenceSnapshot> {
        (**self).fetch(username).await
    }
}

#[async_trait]
impl<T: GroupRankSource + ?Sized> GroupRankSource for Arc<T> {
    async fn fetch(&self, username: &str, group_id: u64) -> SourceResult<GroupRankInfo> {
        (**self).fetch(username, group_id).await
    }
}
