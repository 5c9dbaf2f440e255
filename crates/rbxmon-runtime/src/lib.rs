//! Async runtime for rbxmon.
//!
//! This crate drives presence polling:
//! - `Monitor` - owns the state store and runs one poll cycle at a time
//! - `MonitorPoller` - ticks the monitor until shutdown
//! - `Runtime` - spawns the poller and hands out a `MonitorHandle`
//! - `NotificationSink` - where events go once the engine emits them
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rbxmon_core::MonitorConfig;
//! use rbxmon_runtime::{LogSink, MonitorParts, Runtime, RuntimeConfig};
//!
//! let config = MonitorConfig::from_env()?;
//! let parts = MonitorParts {
//!     presence: source.clone(),
//!     ranks: source,
//!     sink: Arc::new(LogSink),
//! };
//! let mut runtime = Runtime::new(RuntimeConfig::from(&config), parts);
//! runtime.start()?;
//!
//! tokio::signal::ctrl_c().await?;
//! runtime.shutdown().await?;
//! ```
//!
//! # Cycles
//!
//! Users are polled sequentially and each user's events are delivered before
//! the next user is polled. A failed lookup counts as offline for that cycle.
//! Cycles never overlap: ticks that fall behind are skipped and a manual
//! trigger while a cycle is running does nothing.

pub mod config;
pub mod error;
pub mod handle;
pub mod poller;
pub mod runtime;
pub mod sink;

#[cfg(test)]
mod testing;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use handle::{MonitorHandle, MonitorStatus, UserStatus};
pub use poller::{CycleReport, Monitor, MonitorParts, MonitorPoller};
pub use runtime::Runtime;
pub use sink::{LogSink, NotificationSink, SinkError};
