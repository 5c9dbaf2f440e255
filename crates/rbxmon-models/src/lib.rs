//! Core data models for rbxmon.
//!
//! This crate provides the fundamental data types shared by every rbxmon
//! crate: presence snapshots, group rank information, and the notification
//! events produced by the transition engine.

pub mod event;
pub mod group;
pub mod presence;

// Re-export main types
pub use event::{EventKind, NotificationEvent, RankClass, RankTag};
pub use group::GroupRankInfo;
pub use presence::{PresenceKind, PresenceSnapshot};
