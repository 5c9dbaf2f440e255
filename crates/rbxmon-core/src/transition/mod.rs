//! Presence transition detection.
//!
//! The engine compares a fresh snapshot against the stored state of one user
//! and decides which notifications to emit. Rules are applied in a fixed
//! order:
//! 1. **JoinedGame** - entered a game, or switched to a different place
//! 2. **LeftGame** - was in a game, now is not (deduplicated per place)
//! 3. **WentOffline** - was online, now is not (opt-in)
//!
//! The first observation of a user has no previous snapshot, so it can only
//! ever produce a join.

#[cfg(test)]
mod tests;

use rbxmon_models::{EventKind, PresenceSnapshot};
use tracing::trace;

use crate::config::{MonitorConfig, TargetFilter};
use crate::store::MonitorState;

/// Switches that shape which transitions are reported.
#[derive(Debug, Clone)]
pub struct TransitionPolicy {
    /// Report users going offline.
    pub notify_on_offline: bool,
    /// Report users leaving a game.
    pub notify_on_leave: bool,
    /// Only report joins into this game, when active.
    pub target: TargetFilter,
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionPolicy {
    /// Policy with leave notifications on, offline off, no target.
    pub fn new() -> Self {
        Self {
            notify_on_offline: false,
            notify_on_leave: true,
            target: TargetFilter::default(),
        }
    }

    /// Enables or disables offline notifications.
    pub fn with_notify_on_offline(mut self, enabled: bool) -> Self {
        self.notify_on_offline = enabled;
        self
    }

    /// Enables or disables leave notifications.
    pub fn with_notify_on_leave(mut self, enabled: bool) -> Self {
        self.notify_on_leave = enabled;
        self
    }

    /// Sets the target game filter.
    pub fn with_target(mut self, target: TargetFilter) -> Self {
        self.target = target;
        self
    }
}

impl From<&MonitorConfig> for TransitionPolicy {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            notify_on_offline: config.notify_on_offline,
            notify_on_leave: config.notify_on_leave,
            target: config.target.clone(),
        }
    }
}

/// Decides which transitions a new snapshot represents.
#[derive(Debug, Clone, Default)]
pub struct TransitionEngine {
    policy: TransitionPolicy,
}

impl TransitionEngine {
    /// Creates an engine with the given policy.
    pub fn new(policy: TransitionPolicy) -> Self {
        Self { policy }
    }

    /// Returns the active policy.
    pub fn policy(&self) -> &TransitionPolicy {
        &self.policy
    }

    /// Evaluates `current` against `state` and commits it.
    ///
    /// Returns the transitions to report, in emission order. `state` is
    /// updated whether or not anything fires.
    pub fn evaluate(&self, state: &mut MonitorState, current: PresenceSnapshot) -> Vec<EventKind> {
        let mut events = Vec::new();
        let previous = state.last_snapshot.take();

        if current.in_game {
            state.clear_leave_marker();
        }

        if let Some(joined) = self.joined_game(previous.as_ref(), &current) {
            events.push(joined);
        }

        if let Some(prev) = previous.as_ref() {
            if prev.in_game && !current.in_game && self.policy.notify_on_leave {
                let place = prev.place_id.as_deref();
                if state.is_leave_reported(place) {
                    trace!(place_id = ?place, "leave already reported");
                } else {
                    state.mark_leave_reported(prev.place_id.clone());
                    events.push(EventKind::LeftGame {
                        place_id: prev.place_id.clone(),
                        game_name: prev.game_name.clone(),
                    });
                }
            }

            if prev.online && !current.online && self.policy.notify_on_offline {
                events.push(EventKind::WentOffline);
            }
        }

        state.last_snapshot = Some(current);
        events
    }

    fn joined_game(
        &self,
        previous: Option<&PresenceSnapshot>,
        current: &PresenceSnapshot,
    ) -> Option<EventKind> {
        if !current.in_game {
            return None;
        }
        let place_id = current.place_id.as_ref()?;

        let fires = if self.policy.target.is_active() {
            let was_in_target = previous.is_some_and(|p| self.policy.target.matches(p));
            self.policy.target.matches(current) && !was_in_target
        } else {
            match previous {
                None => true,
                Some(prev) => !prev.in_game || prev.place_id.as_ref() != Some(place_id),
            }
        };

        fires.then(|| EventKind::JoinedGame {
            place_id: place_id.clone(),
            universe_id: current.universe_id,
            game_name: current.game_name.clone(),
        })
    }
}
