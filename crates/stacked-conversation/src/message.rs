use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stacked_common::MessageId;

/// Author name used for messages the app itself produces.
pub const SYSTEM_AUTHOR: &str = "System";

/// One entry of the conversation log. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub is_user: bool,
    pub agent_name: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::build(text.into(), true, None)
    }

    pub fn agent(text: impl Into<String>, agent_name: impl Into<String>) -> Self {
        Self::build(text.into(), false, Some(agent_name.into()))
    }

    /// An app-authored notice, such as a failed request.
    pub fn system(text: impl Into<String>) -> Self {
        Self::agent(text, SYSTEM_AUTHOR)
    }

    pub fn is_system(&self) -> bool {
        !self.is_user && self.agent_name.as_deref() == Some(SYSTEM_AUTHOR)
    }

    fn build(text: String, is_user: bool, agent_name: Option<String>) -> Self {
        Self {
            id: MessageId::new(),
            text,
            is_user,
            agent_name,
            timestamp: Utc::now(),
        }
    }
}
