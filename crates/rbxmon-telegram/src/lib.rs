//! Telegram front end for rbxmon.
//!
//! Posts presence notifications to one chat and answers control commands
//! against the running monitor.
//!
//! # Environment Variables
//!
//! Required (unless running with `--dry-run`):
//! - `TELEGRAM_BOT_TOKEN`: Bot token from @BotFather
//! - `TELEGRAM_CHAT_ID`: Chat that receives notifications
//!
//! Monitor settings (`MONITORED_USERS`, `GROUP_ID`, ...) are read by
//! `rbxmon_core::MonitorConfig`.
//!
//! # Commands
//!
//! - `/help` - Show available commands
//! - `/status` - Monitoring flag, interval and counts
//! - `/users` - Every monitored user's presence
//! - `/games` - Users currently in a game
//! - `/start`, `/stop` - Toggle monitoring (notification chat only)
//! - `/check` - Run a poll cycle now

pub mod bot;
pub mod error;
pub mod handlers;
pub mod notifications;
pub mod state;

pub use bot::{BotConfig, MonitorBot};
pub use error::{Result, TelegramError};
pub use notifications::TelegramSink;
pub use state::{create_shared_state, BotState};
