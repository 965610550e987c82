//! Snapshot type for the status poller.

use crate::protocol::{AgentNotification, AgentStatus};

/// Statuses and notifications from one successful poll cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentSnapshot {
    pub statuses: Vec<AgentStatus>,
    pub notifications: Vec<AgentNotification>,
}
