//! rbxmon core - presence transition detection shared by every front end.
//!
//! - **config**: environment-driven configuration and well-known paths
//! - **error**: configuration and upstream source errors
//! - **source**: traits the engine uses to reach upstream services
//! - **store**: per-user monitor state
//! - **transition**: the transition engine deciding what to report
//! - **enrich**: group rank enrichment for join events

pub mod config;
pub mod enrich;
pub mod error;
pub mod source;
pub mod store;
pub mod transition;

pub use config::{config_dir, env_file, Endpoints, MonitorConfig, TargetFilter, UpstreamConfig};
pub use enrich::RankEnricher;
pub use error::{ConfigError, SourceError, SourceResult};
pub use source::{GroupRankSource, PresenceSource};
pub use store::{MonitorState, StateStore};
pub use transition::{TransitionEngine, TransitionPolicy};
