//! State shared by the command handlers.

use std::sync::Arc;

use teloxide::types::ChatId;

use rbxmon_runtime::MonitorHandle;

/// What every handler needs: the monitor and the notification chat.
pub struct BotState {
    pub handle: MonitorHandle,
    /// Chat that receives notifications. Only it may start or stop monitoring.
    pub chat_id: ChatId,
}

impl BotState {
    pub fn new(handle: MonitorHandle, chat_id: ChatId) -> Self {
        Self { handle, chat_id }
    }

    /// Whether `chat` may change the monitoring state.
    pub fn is_control_chat(&self, chat: ChatId) -> bool {
        chat == self.chat_id
    }
}

/// Creates shared state for the dispatcher.
pub fn create_shared_state(handle: MonitorHandle, chat_id: ChatId) -> Arc<BotState> {
    Arc::new(BotState::new(handle, chat_id))
}
