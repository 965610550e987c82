//! Wire types for the autonomous agent service.
//!
//! Field names follow the service's snake_case JSON exactly.

use serde::{Deserialize, Serialize};

/// One entry of `GET /agents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub status: String,
    #[serde(default)]
    pub last_run: Option<String>,
    /// 1-10, how independently the agent acts.
    pub autonomy_level: i64,
}

/// One entry of `GET /agents/{id}/thoughts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thought {
    pub id: i64,
    pub agent_id: String,
    pub timestamp: String,
    pub trigger: String,
    pub thought: String,
    pub action_taken: String,
    pub priority: i64,
}

impl Thought {
    /// Chat-log rendering of a thought.
    pub fn display_text(&self) -> String {
        format!("💭 {}\n\n🎯 Action: {}", self.thought, self.action_taken)
    }
}

/// One entry of `GET /notifications`, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentNotification {
    pub timestamp: String,
    /// Display name of the agent that raised it.
    pub agent: String,
    pub emoji: String,
    pub message: String,
    pub priority: i64,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub agents: u32,
    pub scheduler_running: bool,
    pub jobs: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_status_with_null_last_run() {
        let json = r#"{"id":"monitor","name":"Monitor","emoji":"👁","status":"idle","last_run":null,"autonomy_level":9}"#;
        let status: AgentStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.id, "monitor");
        assert!(status.last_run.is_none());
        assert_eq!(status.autonomy_level, 9);
    }

    #[test]
    fn agent_status_without_last_run_field() {
        let json = r#"{"id":"a","name":"A","emoji":"","status":"running","autonomy_level":1}"#;
        let status: AgentStatus = serde_json::from_str(json).unwrap();
        assert!(status.last_run.is_none());
    }

    #[test]
    fn thought_display_text() {
        let thought = Thought {
            id: 4,
            agent_id: "monitor".into(),
            timestamp: "2024-05-01T10:00:00".into(),
            trigger: "schedule".into(),
            thought: "Disk is filling up".into(),
            action_taken: "notify".into(),
            priority: 7,
        };
        assert_eq!(
            thought.display_text(),
            "💭 Disk is filling up\n\n🎯 Action: notify"
        );
    }

    #[test]
    fn notification_deserializes() {
        let json = r#"[{"timestamp":"2024-05-01T10:00:00","agent":"Monitor","emoji":"👁","message":"CPU hot","priority":10}]"#;
        let list: Vec<AgentNotification> = serde_json::from_str(json).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].priority, 10);
    }

    #[test]
    fn health_deserializes() {
        let json = r#"{"status":"running","agents":4,"scheduler_running":true,"jobs":4}"#;
        let health: HealthStatus = serde_json::from_str(json).unwrap();
        assert!(health.scheduler_running);
        assert_eq!(health.agents, 4);
    }
}
