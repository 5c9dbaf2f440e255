//! Presence poller.
//!
//! A [`Monitor`] owns everything one poll cycle needs. [`MonitorPoller`]
//! drives it from a ticker until shutdown. Manual triggers reach the same
//! monitor through [`crate::MonitorHandle`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use rbxmon_core::{
    GroupRankSource, PresenceSource, RankEnricher, StateStore, TransitionEngine,
};
use rbxmon_models::PresenceSnapshot;

use crate::config::RuntimeConfig;
use crate::sink::NotificationSink;

/// Upstream and delivery collaborators of a monitor.
#[derive(Clone)]
pub struct MonitorParts {
    /// Presence lookups.
    pub presence: Arc<dyn PresenceSource>,
    /// Group rank lookups for join enrichment.
    pub ranks: Arc<dyn GroupRankSource>,
    /// Where notifications go.
    pub sink: Arc<dyn NotificationSink>,
}

/// Outcome of one poll cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Users polled.
    pub polled: usize,
    /// Users online after the cycle.
    pub online: usize,
    /// Users in a game after the cycle.
    pub in_game: usize,
    /// Notifications delivered.
    pub delivered: usize,
    /// Presence lookups and deliveries that failed.
    pub failures: usize,
}

/// Shared monitor state and the poll cycle.
pub struct Monitor {
    users: Vec<String>,
    poll_interval: Duration,
    engine: TransitionEngine,
    enricher: RankEnricher,
    parts: MonitorParts,
    store: RwLock<StateStore>,
    monitoring: AtomicBool,
    cycle_guard: Mutex<()>,
}

impl Monitor {
    /// Creates a monitor from its configuration and collaborators.
    pub fn new(config: RuntimeConfig, parts: MonitorParts) -> Self {
        Self {
            users: config.users,
            poll_interval: config.poll_interval,
            engine: TransitionEngine::new(config.policy),
            enricher: config.enricher,
            parts,
            store: RwLock::new(StateStore::new()),
            monitoring: AtomicBool::new(config.monitoring),
            cycle_guard: Mutex::new(()),
        }
    }

    /// Monitored usernames, in poll order.
    pub fn users(&self) -> &[String] {
        &self.users
    }

    /// Time between ticker-driven cycles.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Per-user state, readable by the control surface.
    pub fn store(&self) -> &RwLock<StateStore> {
        &self.store
    }

    /// Whether ticks currently run cycles.
    pub fn is_monitoring(&self) -> bool {
        self.monitoring.load(Ordering::SeqCst)
    }

    /// Turns monitoring on or off. Returns the previous value.
    pub fn set_monitoring(&self, enabled: bool) -> bool {
        self.monitoring.swap(enabled, Ordering::SeqCst)
    }

    /// Runs a cycle unless one is already in flight.
    ///
    /// Returns `None` when another cycle holds the guard.
    pub async fn try_cycle(&self) -> Option<CycleReport> {
        let Ok(_guard) = self.cycle_guard.try_lock() else {
            debug!("poll cycle already running, skipping");
            return None;
        };
        Some(self.run_cycle().await)
    }

    /// Polls every user once, in order, and delivers the resulting events.
    async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        for username in &self.users {
            report.polled += 1;
            let snapshot = self.fetch_snapshot(username, &mut report).await;
            let observed_at = snapshot.observed_at;

            let events = {
                let mut store = self.store.write().await;
                self.engine.evaluate(store.entry(username), snapshot)
            };

            for kind in events {
                let label = kind.label();
                let event = self
                    .enricher
                    .build_event(self.parts.ranks.as_ref(), username, kind, observed_at)
                    .await;

                match self.parts.sink.deliver(&event).await {
                    Ok(()) => {
                        debug!(username = %username, event = label, "notification delivered");
                        report.delivered += 1;
                    }
                    Err(e) => {
                        warn!(username = %username, event = label, error = %e, "notification failed");
                        report.failures += 1;
                    }
                }
            }
        }

        {
            let store = self.store.read().await;
            report.online = store.online_count();
            report.in_game = store.in_game_count();
        }

        info!(
            polled = report.polled,
            online = report.online,
            in_game = report.in_game,
            delivered = report.delivered,
            failures = report.failures,
            "poll cycle complete"
        );

        report
    }

    /// Fetches presence, degrading any failure to an offline snapshot.
    async fn fetch_snapshot(&self, username: &str, report: &mut CycleReport) -> PresenceSnapshot {
        match self.parts.presence.fetch(username).await {
            Ok(snapshot) => {
                trace!(username = %username, kind = ?snapshot.kind(), "presence fetched");
                snapshot
            }
            Err(e) => {
                warn!(username = %username, error = %e, "presence lookup failed, treating as offline");
                report.failures += 1;
                PresenceSnapshot::offline(Utc::now())
            }
        }
    }
}

/// Drives poll cycles from a ticker until shutdown.
pub struct MonitorPoller {
    monitor: Arc<Monitor>,
    shutdown: watch::Receiver<bool>,
}

impl MonitorPoller {
    /// Creates a new poller.
    pub fn new(monitor: Arc<Monitor>, shutdown: watch::Receiver<bool>) -> Self {
        Self { monitor, shutdown }
    }

    /// Run the polling loop until shutdown signal.
    pub async fn run(&mut self) {
        let poll_interval = self.monitor.poll_interval();
        let mut ticker = interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        debug!(
            poll_interval_secs = poll_interval.as_secs(),
            users = self.monitor.users().len(),
            "starting presence poller"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !self.monitor.is_monitoring() {
                        trace!("monitoring paused, ignoring tick");
                        continue;
                    }
                    self.monitor.try_cycle().await;
                }
                _ = self.shutdown.changed() => {
                    if *self.shutdown.borrow() {
                        debug!("poller received shutdown signal");
                        break;
                    }
                }
            }
        }

        debug!("presence poller stopped");
    }
}
