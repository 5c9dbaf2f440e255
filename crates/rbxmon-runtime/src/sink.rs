//! Notification delivery.

use std::sync::Arc;

use async_trait::async_trait;
use rbxmon_models::{EventKind, NotificationEvent};
use thiserror::Error;
use tracing::info;

/// Errors a sink can report for a single delivery.
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    /// The message could not be delivered.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Destination for notification events.
///
/// Failures are reported per event. The poller logs them and moves on.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers one event.
    async fn deliver(&self, event: &NotificationEvent) -> Result<(), SinkError>;
}

#[async_trait]
impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    async fn deliver(&self, event: &NotificationEvent) -> Result<(), SinkError> {
        (**self).deliver(event).await
    }
}

/// Sink that writes events to the log. Used for dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, event: &NotificationEvent) -> Result<(), SinkError> {
        let rank = event.rank.as_ref().map(|r| r.rank);
        match &event.kind {
            EventKind::JoinedGame {
                place_id,
                game_name,
                ..
            } => info!(
                username = %event.username,
                place_id = %place_id,
                game = game_name.as_deref().unwrap_or("unknown"),
                rank = ?rank,
                "joined game"
            ),
            EventKind::LeftGame { place_id, game_name } => info!(
                username = %event.username,
                place_id = place_id.as_deref().unwrap_or("unknown"),
                game = game_name.as_deref().unwrap_or("unknown"),
                "left game"
            ),
            EventKind::WentOffline => info!(username = %event.username, "went offline"),
        }
        Ok(())
    }
}
