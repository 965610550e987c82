//! One-shot subcommands against the agent service.

use stacked_agents::{AgentDirectory, AgentServiceClient, AgentServiceError, AgentSnapshot};
use stacked_common::StackedError;
use stacked_config::StackedConfig;

use crate::cli::Command;
use crate::display;

fn agents_error(e: AgentServiceError) -> StackedError {
    StackedError::Agents(e.to_string())
}

/// Runs `command` and returns what should be printed.
pub async fn run(
    command: &Command,
    config: &StackedConfig,
    client: &AgentServiceClient,
) -> Result<String, StackedError> {
    match command {
        Command::Agents => {
            let (statuses, notifications) =
                tokio::join!(client.agents(), client.notifications());
            let snapshot = AgentSnapshot {
                statuses: statuses.map_err(agents_error)?,
                notifications: notifications.map_err(agents_error)?,
            };
            Ok(display::snapshot(&snapshot))
        }
        Command::Thoughts { agent, limit } => {
            let limit = limit.unwrap_or(config.modes.thoughts_limit);
            let thoughts = client.thoughts(agent, limit).await.map_err(agents_error)?;
            if thoughts.is_empty() {
                return Ok(format!("{agent} has no thoughts yet\n"));
            }
            let mut out = String::new();
            for thought in &thoughts {
                out.push_str(&format!("[{}] {}\n", thought.timestamp, thought.trigger));
                out.push_str(&thought.display_text());
                out.push_str("\n\n");
            }
            Ok(out)
        }
        Command::Trigger { agent } => {
            client.trigger(agent).await.map_err(agents_error)?;
            Ok(format!("triggered {agent}\n"))
        }
        Command::Health => {
            let health = client.health().await.map_err(agents_error)?;
            Ok(format!("{}\n", display::health(&health)))
        }
        Command::Config => Ok(format!("{}\n", stacked_config::config_to_json(config))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use stacked_agents::AgentServiceConfig;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> AgentServiceClient {
        AgentServiceClient::new(
            AgentServiceConfig::new(server.uri()).with_timeout(Duration::from_secs(5)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn agents_lists_statuses_and_notifications() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/agents"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"id":"scout","name":"Scout","emoji":"🔭","status":"idle","last_run":null,"autonomy_level":5}]"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/notifications"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"timestamp":"t1","agent":"Scout","emoji":"🔭","message":"ping","priority":1}]"#,
            ))
            .mount(&server)
            .await;

        let out = run(&Command::Agents, &StackedConfig::default(), &client(&server))
            .await
            .unwrap();
        assert!(out.contains("Scout"));
        assert!(out.contains("ping"));
    }

    #[tokio::test]
    async fn thoughts_use_config_limit_by_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/agents/scout/thoughts"))
            .and(query_param("limit", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"id":1,"agent_id":"scout","timestamp":"t1","trigger":"scheduled","thought":"look around","action_taken":"none","priority":1}]"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let command = Command::Thoughts {
            agent: "scout".into(),
            limit: None,
        };
        let out = run(&command, &StackedConfig::default(), &client(&server))
            .await
            .unwrap();
        assert!(out.contains("💭 look around"));
        assert!(out.contains("🎯 Action: none"));
    }

    #[tokio::test]
    async fn empty_thoughts_say_so() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/agents/scout/thoughts"))
            .and(query_param("limit", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let command = Command::Thoughts {
            agent: "scout".into(),
            limit: Some(3),
        };
        let out = run(&command, &StackedConfig::default(), &client(&server))
            .await
            .unwrap();
        assert_eq!(out, "scout has no thoughts yet\n");
    }

    #[tokio::test]
    async fn trigger_failure_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/agents/scout/trigger"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such agent"))
            .mount(&server)
            .await;

        let command = Command::Trigger {
            agent: "scout".into(),
        };
        let err = run(&command, &StackedConfig::default(), &client(&server))
            .await
            .unwrap_err();
        assert!(matches!(err, StackedError::Agents(_)));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn health_summary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"status":"ok","agents":4,"scheduler_running":false,"jobs":2}"#,
            ))
            .mount(&server)
            .await;

        let out = run(&Command::Health, &StackedConfig::default(), &client(&server))
            .await
            .unwrap();
        assert_eq!(out, "ok: 4 agents, 2 jobs, scheduler stopped\n");
    }

    #[tokio::test]
    async fn config_prints_json() {
        let server = MockServer::start().await;
        let out = run(&Command::Config, &StackedConfig::default(), &client(&server))
            .await
            .unwrap();
        assert!(out.contains("\"chat_url\""));
    }
}
