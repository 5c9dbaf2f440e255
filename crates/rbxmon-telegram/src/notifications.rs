//! Chat notifications for presence transitions.
//!
//! Joins are loud unless pinging is switched off, tracked ranks always ping.
//! Leaves and offline notices go out silently.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode};
use tracing::debug;

use rbxmon_models::{EventKind, NotificationEvent, RankClass};
use rbxmon_runtime::{NotificationSink, SinkError};

/// Delivers notification events to one Telegram chat.
#[derive(Clone)]
pub struct TelegramSink {
    bot: Bot,
    chat_id: ChatId,
    ping_everyone: bool,
}

impl TelegramSink {
    /// Creates a sink posting to `chat_id`. With `ping_everyone` every join is sent audibly,
    /// otherwise only joins by tracked group ranks are.
    pub fn new(bot: Bot, chat_id: ChatId, ping_everyone: bool) -> Self {
        Self {
            bot,
            chat_id,
            ping_everyone,
        }
    }
}

#[async_trait]
impl NotificationSink for TelegramSink {
    async fn deliver(&self, event: &NotificationEvent) -> Result<(), SinkError> {
        let ping = should_ping(event, self.ping_everyone);

        self.bot
            .send_message(self.chat_id, render_event(event))
            .parse_mode(ParseMode::Html)
            .disable_notification(!ping)
            .await
            .map_err(|e| SinkError::Delivery(e.to_string()))?;

        debug!(
            chat_id = %self.chat_id,
            username = %event.username,
            event = event.kind.label(),
            ping,
            "notification sent"
        );
        Ok(())
    }
}

/// Whether the event should trigger an audible notification.
pub fn should_ping(event: &NotificationEvent, ping_everyone: bool) -> bool {
    event.kind.is_join() && (ping_everyone || event.is_tracked_rank())
}

/// Renders an event as Telegram HTML.
pub fn render_event(event: &NotificationEvent) -> String {
    let user = html_escape(&event.username);

    let mut text = match &event.kind {
        EventKind::JoinedGame {
            place_id,
            game_name,
            ..
        } => {
            let title = match event.rank.as_ref().map(|r| r.class) {
                Some(RankClass::Tracked) => "⭐ <b>High rank joined</b>",
                Some(RankClass::Member) => "👥 <b>Group member joined</b>",
                None => "🟢 <b>User joined</b>",
            };
            format!(
                "{}\n<b>{}</b> joined {}",
                title,
                user,
                game_label(game_name.as_deref(), Some(place_id.as_str()))
            )
        }
        EventKind::LeftGame { place_id, game_name } => format!(
            "🟠 <b>User left</b>\n<b>{}</b> left {}",
            user,
            game_label(game_name.as_deref(), place_id.as_deref())
        ),
        EventKind::WentOffline => format!("🔴 <b>User offline</b>\n<b>{}</b> is now offline", user),
    };

    if let Some(rank) = &event.rank {
        text.push_str(&format!(
            "\nRole: {} (rank {})",
            html_escape(&rank.role_name),
            rank.rank
        ));
    }

    text
}

/// Game name, then place id, then a placeholder.
fn game_label(game_name: Option<&str>, place_id: Option<&str>) -> String {
    match (game_name, place_id) {
        (Some(name), _) => format!("<b>{}</b>", html_escape(name)),
        (None, Some(place)) => format!("place <code>{}</code>", html_escape(place)),
        (None, None) => "an unknown game".to_string(),
    }
}

/// Escape HTML special characters for Telegram HTML mode.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
