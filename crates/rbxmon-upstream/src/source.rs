//! Presence and group rank sources backed by [`RobloxClient`].

use async_trait::async_trait;
use chrono::Utc;
use rbxmon_core::{GroupRankSource, PresenceSource, SourceResult, TargetFilter};
use rbxmon_models::{GroupRankInfo, PresenceKind, PresenceSnapshot};
use tracing::debug;

use crate::cache::MemoCache;
use crate::client::RobloxClient;
use crate::error::Result;
use crate::game_name::GameNameResolver;

/// Roblox-backed implementation of the presence and rank sources.
///
/// Holds the username to id cache and the game name resolver, so one
/// instance should be shared for the lifetime of the process.
pub struct RobloxSource {
    client: RobloxClient,
    user_ids: MemoCache<String, u64>,
    names: GameNameResolver<RobloxClient>,
}

impl RobloxSource {
    /// Creates a source. `target` feeds the first step of name resolution.
    pub fn new(client: RobloxClient, target: TargetFilter) -> Self {
        Self {
            names: GameNameResolver::new(client.clone(), target),
            client,
            user_ids: MemoCache::new(),
        }
    }

    /// Resolves a username to its id, memoized.
    pub async fn user_id(&self, username: &str) -> Result<u64> {
        if let Some(id) = self.user_ids.get(username) {
            return Ok(id);
        }

        let id = self.client.lookup_user_id(username).await?;
        debug!(username = %username, user_id = id, "resolved username");
        self.user_ids.insert(username.to_string(), id);
        Ok(id)
    }
}

#[async_trait]
impl PresenceSource for RobloxSource {
    async fn fetch(&self, username: &str) -> SourceResult<PresenceSnapshot> {
        let user_id = self.user_id(username).await?;
        let observed_at = Utc::now();

        let Some(presence) = self.client.presence(user_id).await? else {
            debug!(username = %username, "no presence entry, treating as offline");
            return Ok(PresenceSnapshot::offline(observed_at));
        };

        let kind = PresenceKind::from_code(presence.user_presence_type);
        let snapshot = PresenceSnapshot::from_kind(
            kind,
            presence.place_id.map(|id| id.to_string()),
            presence.universe_id,
            observed_at,
        );

        if !snapshot.in_game {
            return Ok(snapshot);
        }

        let name = self
            .names
            .resolve(
                snapshot.place_id.as_deref(),
                snapshot.universe_id,
                presence.last_location.as_deref(),
            )
            .await;
        Ok(snapshot.with_game_name(name))
    }
}

#[async_trait]
impl GroupRankSource for RobloxSource {
    async fn fetch(&self, username: &str, group_id: u64) -> SourceResult<GroupRankInfo> {
        let user_id = self.user_id(username).await?;
        let memberships = self.client.group_roles(user_id).await?;

        Ok(memberships
            .into_iter()
            .find(|m| m.group.id == group_id)
            .map(|m| GroupRankInfo::member(m.role.rank, m.role.name))
            .unwrap_or_else(GroupRankInfo::not_member))
    }
}
