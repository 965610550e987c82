use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::id::MessageId;
use crate::types::AgentMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    ModeChanged(AgentMode),
    TypingChanged(bool),
    MessageAppended { id: MessageId, is_user: bool },
    SpeakingStarted,
    SpeakingFinished,
    AgentsUpdated { agents: usize, notifications: usize },
    Shutdown,
    #[serde(other)]
    Unknown,
}

/// Fan-out of UI-facing state changes. Cloning shares the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
