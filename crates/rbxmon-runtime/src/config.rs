//! Runtime configuration.

use std::time::Duration;

use rbxmon_core::{MonitorConfig, RankEnricher, TransitionPolicy};

/// Default time between poll cycles.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Configuration for the runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Usernames polled every cycle, in order.
    pub users: Vec<String>,
    /// How often to run a poll cycle.
    pub poll_interval: Duration,
    /// Rules deciding which transitions are reported.
    pub policy: TransitionPolicy,
    /// Rank enrichment applied to joins.
    pub enricher: RankEnricher,
    /// Whether ticks run cycles right after start.
    pub monitoring: bool,
}

impl RuntimeConfig {
    /// Creates a config for `users` with default values.
    pub fn new<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            users: users.into_iter().map(Into::into).collect(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            policy: TransitionPolicy::default(),
            enricher: RankEnricher::disabled(),
            monitoring: true,
        }
    }

    /// Sets the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the transition policy.
    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the rank enricher.
    pub fn with_enricher(mut self, enricher: RankEnricher) -> Self {
        self.enricher = enricher;
        self
    }

    /// Sets whether monitoring is on when the runtime starts.
    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitoring = enabled;
        self
    }
}

impl From<&MonitorConfig> for RuntimeConfig {
    fn from(config: &MonitorConfig) -> Self {
        Self::new(config.users.iter().cloned())
            .with_poll_interval(config.poll_interval)
            .with_policy(TransitionPolicy::from(config))
            .with_enricher(RankEnricher::from(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RuntimeConfig::new(["alice"]);

        assert_eq!(config.users, vec!["alice".to_string()]);
        assert_eq!(config.poll_interval, Duration::from_secs(15));
        assert!(config.monitoring);
        assert!(config.policy.notify_on_leave);
        assert!(!config.policy.notify_on_offline);
        assert_eq!(config.enricher.group_id(), None);
    }

    #[test]
    fn test_config_builder() {
        let config = RuntimeConfig::new(["alice", "bob"])
            .with_poll_interval(Duration::from_millis(100))
            .with_policy(TransitionPolicy::new().with_notify_on_offline(true))
            .with_monitoring(false);

        assert_eq!(config.users.len(), 2);
        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert!(config.policy.notify_on_offline);
        assert!(!config.monitoring);
    }

    #[test]
    fn test_from_monitor_config() {
        let mut monitor = MonitorConfig::new(["carol"]);
        monitor.poll_interval = Duration::from_secs(30);
        monitor.group_id = Some(42);
        monitor.notify_on_offline = true;

        let config = RuntimeConfig::from(&monitor);
        assert_eq!(config.users, vec!["carol".to_string()]);
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert!(config.policy.notify_on_offline);
        assert_eq!(config.enricher.group_id(), Some(42));
    }
}
