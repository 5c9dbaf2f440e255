//! Group rank enrichment for join events.
//!
//! Ranks are looked up only when a join is about to be reported, never on
//! quiet polls. Lookup failures are logged and the event goes out untagged.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rbxmon_models::{EventKind, NotificationEvent, RankClass, RankTag};
use tracing::{debug, warn};

use crate::config::MonitorConfig;
use crate::source::GroupRankSource;

/// Turns transitions into notification events, tagging joins with group rank.
#[derive(Debug, Clone, Default)]
pub struct RankEnricher {
    group_id: Option<u64>,
    tracked_ranks: BTreeSet<u32>,
    tag_members: bool,
}

impl RankEnricher {
    /// Creates an enricher for `group_id`.
    ///
    /// With `tag_members` off, only members holding a tracked rank are tagged.
    pub fn new(
        group_id: Option<u64>,
        tracked_ranks: impl IntoIterator<Item = u32>,
        tag_members: bool,
    ) -> Self {
        Self {
            group_id,
            tracked_ranks: tracked_ranks.into_iter().collect(),
            tag_members,
        }
    }

    /// An enricher that never tags.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Returns the configured group.
    pub fn group_id(&self) -> Option<u64> {
        self.group_id
    }

    /// Looks up the rank tag for `username`.
    pub async fn rank_tag(&self, source: &dyn GroupRankSource, username: &str) -> Option<RankTag> {
        let group_id = self.group_id?;

        let info = match source.fetch(username, group_id).await {
            Ok(info) => info,
            Err(e) => {
                warn!(username = %username, group_id, error = %e, "rank lookup failed");
                return None;
            }
        };

        if !info.is_member {
            debug!(username = %username, group_id, "not a group member");
            return None;
        }

        let class = if self.tracked_ranks.contains(&info.rank) {
            RankClass::Tracked
        } else {
            RankClass::Member
        };

        if class == RankClass::Member && !self.tag_members {
            return None;
        }

        Some(RankTag {
            rank: info.rank,
            role_name: info.role_name,
            class,
        })
    }

    /// Builds the notification event for one transition.
    ///
    /// Only joins are enriched.
    pub async fn build_event(
        &self,
        source: &dyn GroupRankSource,
        username: &str,
        kind: EventKind,
        observed_at: DateTime<Utc>,
    ) -> NotificationEvent {
        let rank = if kind.is_join() {
            self.rank_tag(source, username).await
        } else {
            None
        };
        NotificationEvent::new(username, kind, observed_at).with_rank(rank)
    }
}

impl From<&MonitorConfig> for RankEnricher {
    fn from(config: &MonitorConfig) -> Self {
        Self::new(
            config.group_id,
            config.tracked_ranks.iter().copied(),
            config.notify_group_members,
        )
    }
}
