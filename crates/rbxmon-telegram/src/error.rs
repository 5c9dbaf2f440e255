//! Error types for the Telegram front end.

use thiserror::Error;

/// Errors that can occur while setting up or running the bot.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Bot token not provided.
    #[error("Telegram bot token not set. Set TELEGRAM_BOT_TOKEN environment variable.")]
    NoToken,

    /// Notification chat not provided.
    #[error("Telegram chat not set. Set TELEGRAM_CHAT_ID environment variable.")]
    NoChatId,

    /// Notification chat is not a numeric id.
    #[error("Invalid TELEGRAM_CHAT_ID {0:?}: expected a numeric chat id")]
    InvalidChatId(String),

    /// Failed to start the bot.
    #[error("Failed to start bot: {0}")]
    BotStartFailed(String),

    /// Monitor configuration error.
    #[error(transparent)]
    Config(#[from] rbxmon_core::ConfigError),

    /// Upstream client setup error.
    #[error("Upstream error: {0}")]
    Upstream(#[from] rbxmon_upstream::UpstreamError),

    /// Runtime lifecycle error.
    #[error("Runtime error: {0}")]
    Runtime(#[from] rbxmon_runtime::RuntimeError),
}

/// Result type for Telegram operations.
pub type Result<T> = std::result::Result<T, TelegramError>;
