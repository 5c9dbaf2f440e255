//! rbxmon binary.
//!
//! Start monitoring with:
//! ```bash
//! MONITORED_USERS=alice,bob TELEGRAM_BOT_TOKEN=xxx TELEGRAM_CHAT_ID=123 cargo run -p rbxmon-telegram
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use rbxmon_core::{env_file, MonitorConfig};
use rbxmon_runtime::{LogSink, MonitorParts, NotificationSink, Runtime, RuntimeConfig};
use rbxmon_telegram::{BotConfig, MonitorBot, TelegramSink};
use rbxmon_upstream::{RobloxClient, RobloxSource};
use teloxide::Bot;
use tracing_subscriber::EnvFilter;

/// rbxmon - Roblox presence notifications for Telegram
#[derive(Parser, Debug)]
#[command(name = "rbxmon")]
#[command(about = "Watch Roblox users and post game joins and leaves to Telegram")]
struct Args {
    /// Seconds between checks (overrides CHECK_INTERVAL)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,

    /// Log notifications instead of sending them to Telegram
    #[arg(long)]
    dry_run: bool,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Config directory first, then the working directory
    let env_path = env_file();
    if env_path.exists() {
        let _ = dotenvy::from_path(&env_path);
    }
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    let filter = match args.verbose {
        0 => "rbxmon=info,rbxmon_runtime=info,rbxmon_telegram=info,teloxide=warn",
        1 => "rbxmon=debug,rbxmon_runtime=debug,rbxmon_core=debug,rbxmon_upstream=debug,rbxmon_telegram=debug,teloxide=info",
        2 => "rbxmon=trace,rbxmon_runtime=trace,rbxmon_core=trace,rbxmon_upstream=trace,rbxmon_telegram=trace,teloxide=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(filter))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = MonitorConfig::from_env()?;
    if let Some(secs) = args.interval {
        config.poll_interval = Duration::from_secs(secs);
    }

    tracing::info!(
        users = config.users.len(),
        group_id = ?config.group_id,
        interval_secs = config.poll_interval.as_secs(),
        target_active = config.target.is_active(),
        "configuration loaded"
    );

    let client = RobloxClient::new(config.upstream.clone())?;
    let source = Arc::new(RobloxSource::new(client, config.target.clone()));

    if args.dry_run {
        let mut runtime = Runtime::new(
            RuntimeConfig::from(&config),
            MonitorParts {
                presence: source.clone(),
                ranks: source,
                sink: Arc::new(LogSink),
            },
        );
        runtime.start()?;

        println!("\n[dry-run] rbxmon is watching {} users", config.users.len());
        println!("   Press Ctrl+C to stop\n");

        tokio::signal::ctrl_c().await?;
        runtime.shutdown().await?;
        return Ok(());
    }

    let bot_config = BotConfig::from_env()?;
    let bot = Bot::new(bot_config.token);
    let sink: Arc<dyn NotificationSink> = Arc::new(TelegramSink::new(
        bot.clone(),
        bot_config.chat_id,
        config.ping_everyone,
    ));

    let mut runtime = Runtime::new(
        RuntimeConfig::from(&config),
        MonitorParts {
            presence: source.clone(),
            ranks: source,
            sink,
        },
    );

    let monitor_bot = MonitorBot::new(bot, bot_config.chat_id, runtime.handle());
    match monitor_bot.get_me().await {
        Ok(username) => {
            tracing::info!(username = %username, "Bot initialized successfully");
            println!("\n[robot] rbxmon");
            println!("   Bot: @{}", username);
            println!("   Watching: {}", config.users.join(", "));
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to get bot info");
            return Err(e.into());
        }
    }
    println!("   Press Ctrl+C to stop\n");

    runtime.start()?;
    monitor_bot.run().await;
    runtime.shutdown().await?;

    Ok(())
}
