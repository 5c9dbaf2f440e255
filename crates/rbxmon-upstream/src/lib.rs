//! Roblox upstream clients for rbxmon.
//!
//! - `RobloxClient` - raw HTTP calls for each upstream capability
//! - `first_success` - tries an ordered list of base URLs, mirror first
//! - `GameNameResolver` - layered, memoized game name lookup
//! - `RobloxSource` - the presence and group rank sources used by the poller
//!
//! Every capability has its own list of base URLs (see
//! [`rbxmon_core::UpstreamConfig`]). A request walks the list in order and
//! returns the first success. Definitive answers such as an unknown username
//! are returned as-is without trying the remaining bases.

pub mod cache;
pub mod client;
pub mod error;
pub mod fallback;
pub mod game_name;
pub mod source;
pub mod wire;

pub use cache::MemoCache;
pub use client::RobloxClient;
pub use error::{Result, UpstreamError};
pub use fallback::first_success;
pub use game_name::{GameCatalog, GameNameResolver};
pub use source::RobloxSource;
