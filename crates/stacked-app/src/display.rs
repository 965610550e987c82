//! Plain-text rendering for the terminal.

use stacked_agents::{AgentNotification, AgentSnapshot, AgentStatus, HealthStatus};
use stacked_ai::Persona;
use stacked_conversation::Message;

pub fn status_line(status: &AgentStatus) -> String {
    let last = status.last_run.as_deref().unwrap_or("never");
    format!(
        "{} {:<14} {:<10} autonomy {:>2}  last run {}",
        status.emoji, status.name, status.status, status.autonomy_level, last
    )
}

pub fn notification_line(n: &AgentNotification) -> String {
    format!("[{}] {} {}: {}", n.timestamp, n.emoji, n.agent, n.message)
}

pub fn snapshot(snapshot: &AgentSnapshot) -> String {
    let mut out = String::new();
    if snapshot.statuses.is_empty() {
        out.push_str("no agents\n");
    }
    for status in &snapshot.statuses {
        out.push_str(&status_line(status));
        out.push('\n');
    }
    if !snapshot.notifications.is_empty() {
        out.push_str("\nnotifications:\n");
        for n in &snapshot.notifications {
            out.push_str("  ");
            out.push_str(&notification_line(n));
            out.push('\n');
        }
    }
    out
}

pub fn health(health: &HealthStatus) -> String {
    let scheduler = if health.scheduler_running {
        "running"
    } else {
        "stopped"
    };
    format!(
        "{}: {} agents, {} jobs, scheduler {}",
        health.status, health.agents, health.jobs, scheduler
    )
}

pub fn message(message: &Message) -> String {
    let time = message.timestamp.format("%H:%M:%S");
    let author = if message.is_user {
        "you"
    } else {
        message.agent_name.as_deref().unwrap_or("agent")
    };
    format!("{time} {author}> {}", message.text)
}

pub fn persona(persona: &Persona, selected: bool) -> String {
    let marker = if selected { '*' } else { ' ' };
    format!(
        "{marker} {:<8} {}  ({})  {}",
        persona.id,
        persona.label(),
        persona.model,
        persona.description
    )
}
