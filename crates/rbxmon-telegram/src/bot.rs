//! Main Telegram bot implementation.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::ChatId;
use tracing::{debug, info};

use rbxmon_runtime::MonitorHandle;

use crate::error::{Result, TelegramError};
use crate::handlers::{handle_command, Command};
use crate::state::{create_shared_state, BotState};

/// Bot credentials and notification chat.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub chat_id: ChatId,
}

impl BotConfig {
    /// Reads `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID` from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the bot settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("TELEGRAM_BOT_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(TelegramError::NoToken)?;

        let raw = lookup("TELEGRAM_CHAT_ID")
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(TelegramError::NoChatId)?;
        let chat_id = raw
            .parse::<i64>()
            .map_err(|_| TelegramError::InvalidChatId(raw.clone()))?;

        Ok(Self {
            token,
            chat_id: ChatId(chat_id),
        })
    }
}

/// The rbxmon Telegram bot: answers commands against a running monitor.
pub struct MonitorBot {
    /// The teloxide bot instance.
    bot: Bot,
    /// Shared state across handlers.
    state: Arc<BotState>,
}

impl MonitorBot {
    /// Creates a bot bound to `handle`.
    pub fn new(bot: Bot, chat_id: ChatId, handle: MonitorHandle) -> Self {
        Self {
            bot,
            state: create_shared_state(handle, chat_id),
        }
    }

    /// Get the bot's username.
    pub async fn get_me(&self) -> Result<String> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| TelegramError::BotStartFailed(e.to_string()))?;
        Ok(me.username().to_string())
    }

    /// Answers commands until Ctrl+C.
    pub async fn run(&self) {
        let bot = self.bot.clone();
        let state = Arc::clone(&self.state);

        let handler = dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let state = Arc::clone(&state);
                        debug!(chat_id = %msg.chat.id, command = ?cmd, "command received");
                        async move { handle_command(bot, msg, cmd, state).await }
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter(|msg: Message| msg.text().is_some_and(|t| t.starts_with('/')))
                    .endpoint(|bot: Bot, msg: Message| async move {
                        let text = msg.text().unwrap_or_default();
                        let command = text.split_whitespace().next().unwrap_or(text);
                        debug!(chat_id = %msg.chat.id, command = %command, "unknown command");
                        bot.send_message(
                            msg.chat.id,
                            format!(
                                "Unknown command: {}\n\nUse /help to see available commands.",
                                command
                            ),
                        )
                        .await?;
                        respond(())
                    }),
            );

        info!(chat_id = %self.state.chat_id, "bot is running");

        Dispatcher::builder(bot, handler)
            .default_handler(|upd| async move {
                debug!(update_id = ?upd.id, "unhandled update");
            })
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}
