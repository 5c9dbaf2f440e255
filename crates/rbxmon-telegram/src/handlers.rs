//! Command handlers for the Telegram bot.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::command::BotCommands;
use tracing::info;

use rbxmon_runtime::{CycleReport, MonitorStatus, UserStatus};

use crate::notifications::html_escape;
use crate::state::BotState;

/// Bot commands that can be invoked with /.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Show help message")]
    Help,

    #[command(description = "Show monitoring status")]
    Status,

    #[command(description = "List monitored users and their presence")]
    Users,

    #[command(description = "List users currently in a game")]
    Games,

    #[command(description = "Start monitoring")]
    Start,

    #[command(description = "Stop monitoring")]
    Stop,

    #[command(description = "Check everyone right now")]
    Check,
}

impl Command {
    /// Commands that change or drive the monitor. Only the notification chat may use them.
    pub fn is_control(&self) -> bool {
        matches!(self, Command::Start | Command::Stop | Command::Check)
    }
}

/// Handle the /help command.
pub async fn handle_help(bot: Bot, msg: Message) -> ResponseResult<()> {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

/// Handle the /status command.
pub async fn handle_status(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let status = state.handle.status().await;
    send_html(&bot, &msg, format_status(&status)).await
}

/// Handle the /users command.
pub async fn handle_users(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let users = state.handle.users().await;
    send_html(&bot, &msg, format_users(&users)).await
}

/// Handle the /games command.
pub async fn handle_games(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let users = state.handle.in_game_users().await;
    send_html(&bot, &msg, format_games(&users)).await
}

/// Handle the /start command. Kicks off a cycle right away.
pub async fn handle_start(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    if state.handle.set_monitoring(true) {
        bot.send_message(msg.chat.id, "Monitoring is already running.")
            .await?;
        return Ok(());
    }

    info!(chat_id = %msg.chat.id, "monitoring started from chat");
    let handle = state.handle.clone();
    tokio::spawn(async move {
        handle.trigger_cycle().await;
    });

    bot.send_message(msg.chat.id, "▶️ Monitoring started.").await?;
    Ok(())
}

/// Handle the /stop command.
pub async fn handle_stop(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    if !state.handle.set_monitoring(false) {
        bot.send_message(msg.chat.id, "Monitoring is already stopped.")
            .await?;
        return Ok(());
    }

    info!(chat_id = %msg.chat.id, "monitoring stopped from chat");
    bot.send_message(msg.chat.id, "⏸️ Monitoring stopped.").await?;
    Ok(())
}

/// Handle the /check command.
pub async fn handle_check(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let report = state.handle.trigger_cycle().await;
    send_html(&bot, &msg, format_cycle(report)).await
}

/// Route a parsed command to its handler.
///
/// Control commands from any chat other than the notification chat are refused.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<BotState>,
) -> ResponseResult<()> {
    if cmd.is_control() && !state.is_control_chat(msg.chat.id) {
        return reject_control(&bot, &msg).await;
    }

    match cmd {
        Command::Help => handle_help(bot, msg).await,
        Command::Status => handle_status(bot, msg, state).await,
        Command::Users => handle_users(bot, msg, state).await,
        Command::Games => handle_games(bot, msg, state).await,
        Command::Start => handle_start(bot, msg, state).await,
        Command::Stop => handle_stop(bot, msg, state).await,
        Command::Check => handle_check(bot, msg, state).await,
    }
}

async fn send_html(bot: &Bot, msg: &Message, text: String) -> ResponseResult<()> {
    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

async fn reject_control(bot: &Bot, msg: &Message) -> ResponseResult<()> {
    info!(chat_id = %msg.chat.id, "control command from foreign chat ignored");
    bot.send_message(
        msg.chat.id,
        "This command only works in the notification chat.",
    )
    .await?;
    Ok(())
}

/// Body of the /status reply.
pub fn format_status(status: &MonitorStatus) -> String {
    format!(
        "📊 <b>Status</b>\n\n\
        Monitoring: {}\n\
        Interval: {}s\n\
        Users: {} ({} online, {} in game)",
        if status.monitoring { "✅ running" } else { "⏸️ stopped" },
        status.poll_interval.as_secs(),
        status.users,
        status.online,
        status.in_game,
    )
}

/// Body of the /users reply.
pub fn format_users(users: &[UserStatus]) -> String {
    let mut text = String::from("👥 <b>Monitored users</b>\n");

    for user in users {
        let name = html_escape(&user.username);
        let line = match &user.snapshot {
            None => format!("❔ <b>{}</b>: not checked yet", name),
            Some(s) => {
                let state = if s.in_game {
                    match s.game_label() {
                        Some(game) => format!("in {}", html_escape(game)),
                        None => "in a game".to_string(),
                    }
                } else if s.online {
                    "online".to_string()
                } else {
                    "offline".to_string()
                };
                let icon = if s.in_game {
                    "🎮"
                } else if s.online {
                    "🟢"
                } else {
                    "⚫"
                };
                format!(
                    "{} <b>{}</b>: {} <i>({})</i>",
                    icon,
                    name,
                    state,
                    s.observed_at.format("%H:%M:%S UTC")
                )
            }
        };
        text.push('\n');
        text.push_str(&line);
    }

    text
}

/// Body of the /games reply.
pub fn format_games(users: &[UserStatus]) -> String {
    let lines: Vec<String> = users
        .iter()
        .filter_map(|user| {
            let snapshot = user.snapshot.as_ref().filter(|s| s.in_game)?;
            let game = snapshot
                .game_name
                .as_deref()
                .map(html_escape)
                .unwrap_or_else(|| "unknown game".to_string());
            let place = snapshot
                .place_id
                .as_deref()
                .map(|p| format!(" (place <code>{}</code>)", html_escape(p)))
                .unwrap_or_default();
            Some(format!("🎮 <b>{}</b>: {}{}", html_escape(&user.username), game, place))
        })
        .collect();

    if lines.is_empty() {
        return "Nobody is in a game right now.".to_string();
    }

    format!("🎮 <b>In game</b>\n\n{}", lines.join("\n"))
}

/// Body of the /check reply.
pub fn format_cycle(report: Option<CycleReport>) -> String {
    let Some(report) = report else {
        return "⏳ A check is already running.".to_string();
    };

    let mut text = format!(
        "✅ Checked {} users: {} online, {} in game, {} notifications sent.",
        report.polled, report.online, report.in_game, report.delivered
    );
    if report.failures > 0 {
        text.push_str(&format!("\n⚠️ {} lookups or deliveries failed.", report.failures));
    }
    text
}
