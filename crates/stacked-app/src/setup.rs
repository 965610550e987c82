//! Turns configuration into wired-up services.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use stacked_agents::{AgentServiceClient, AgentServiceConfig, StatusPoller};
use stacked_ai::{
    ChatConfig, GenerationClient, Persona, PersonaRegistry, RetryPolicy, SynthesisClient,
    SynthesisConfig,
};
use stacked_common::{EventBus, StackedError};
use stacked_config::{ModesConfig, PersonaConfig, RetryConfig, StackedConfig};
use stacked_conversation::{ControllerSettings, ConversationController};
use tokio::sync::mpsc;

use crate::cli::Args;
use crate::sink::{FileSink, PlaybackDone};

pub struct Services {
    pub controller: ConversationController,
    pub playback_rx: mpsc::UnboundedReceiver<PlaybackDone>,
}

/// Command-line and environment values win over the config file.
pub fn apply_overrides(config: &mut StackedConfig, args: &Args) {
    if let Some(url) = &args.chat_url {
        config.endpoints.chat_url = url.clone();
    }
    if let Some(url) = &args.tts_url {
        config.endpoints.tts_url = url.clone();
    }
    if let Some(url) = &args.agents_url {
        config.endpoints.agents_url = url.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.playback.output_dir = Some(dir.display().to_string());
    }
}

pub fn retry_policy(retry: &RetryConfig) -> RetryPolicy {
    RetryPolicy::from_secs(
        retry.max_attempts,
        retry.base_delay_secs,
        retry.max_delay_secs,
        retry.jitter_secs,
    )
}

pub fn request_timeout(config: &StackedConfig) -> Duration {
    Duration::from_secs(u64::from(config.network.request_timeout_secs.max(1)))
}

pub fn personas(configs: &[PersonaConfig]) -> Vec<Persona> {
    configs
        .iter()
        .map(|p| Persona {
            id: p.id.clone(),
            name: p.name.clone(),
            emoji: p.emoji.clone(),
            description: p.description.clone(),
            model: p.model.clone(),
            system_prompt: p.system_prompt.clone(),
        })
        .collect()
}

pub fn controller_settings(modes: &ModesConfig) -> ControllerSettings {
    ControllerSettings {
        live_poll_interval: Duration::from_secs(u64::from(modes.live_poll_interval_secs)),
        auto_prompt_interval: Duration::from_secs(u64::from(modes.auto_prompt_interval_secs)),
        auto_prompt: modes.auto_prompt.clone(),
        thoughts_limit: modes.thoughts_limit,
    }
}

pub fn agent_client(config: &StackedConfig) -> Result<AgentServiceClient, StackedError> {
    AgentServiceClient::new(
        AgentServiceConfig::new(config.endpoints.agents_url.clone())
            .with_timeout(request_timeout(config)),
    )
    .map_err(|e| StackedError::Agents(e.to_string()))
}

pub fn build(config: &StackedConfig, events: EventBus) -> Result<Services, StackedError> {
    let timeout = request_timeout(config);

    let generator = GenerationClient::new(
        ChatConfig::new(config.endpoints.chat_url.clone())
            .with_timeout(timeout)
            .with_retry(retry_policy(&config.retry)),
    )
    .map_err(|e| StackedError::Ai(e.to_string()))?;

    let synthesizer = SynthesisClient::new(
        SynthesisConfig::new(config.endpoints.tts_url.clone()).with_timeout(timeout),
    )
    .map_err(|e| StackedError::Ai(e.to_string()))?;

    let poller = Arc::new(StatusPoller::new(
        Arc::new(agent_client(config)?),
        events.clone(),
    ));

    let registry = PersonaRegistry::new(personas(&config.personas))
        .ok_or_else(|| StackedError::Other("no personas configured".into()))?;

    let output_dir = config.playback.output_dir.as_ref().map(PathBuf::from);
    let (sink, playback_rx) = FileSink::new(output_dir);

    let controller = ConversationController::new(
        Arc::new(generator),
        Arc::new(synthesizer),
        Arc::new(sink),
        poller,
        registry,
        controller_settings(&config.modes),
        events,
    );

    Ok(Services {
        controller,
        playback_rx,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn overrides_replace_config_values() {
        let mut config = StackedConfig::default();
        let args = Args::try_parse_from([
            "stacked",
            "--chat-url",
            "http://gpu:5555",
            "--output-dir",
            "/tmp/voices",
        ])
        .unwrap();

        apply_overrides(&mut config, &args);

        assert_eq!(config.endpoints.chat_url, "http://gpu:5555");
        assert_eq!(config.endpoints.tts_url, "http://127.0.0.1:5556");
        assert_eq!(config.playback.output_dir.as_deref(), Some("/tmp/voices"));
    }

    #[test]
    fn retry_policy_from_defaults() {
        let policy = retry_policy(&RetryConfig::default());
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
        assert_eq!(policy.max_delay, Duration::from_secs(60));
        assert!((policy.jitter.as_secs_f64() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn settings_from_defaults() {
        let settings = controller_settings(&ModesConfig::default());
        assert_eq!(settings.live_poll_interval, Duration::from_secs(5));
        assert_eq!(settings.auto_prompt_interval, Duration::from_secs(30));
        assert_eq!(settings.auto_prompt, "Autonomous task");
        assert_eq!(settings.thoughts_limit, 20);
    }

    #[test]
    fn default_personas_map_in_order() {
        let config = StackedConfig::default();
        let list = personas(&config.personas);
        let names: Vec<&str> = list.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Nova", "Julie", "Stheno", "Dolphin"]);
        assert_eq!(list[2].model, "fluffy/l3-8b-stheno-v3.2");
    }

    #[tokio::test]
    async fn build_wires_default_config() {
        let services = build(&StackedConfig::default(), EventBus::default()).unwrap();
        assert_eq!(services.controller.selected_persona().await.id, "nova");
    }

    #[tokio::test]
    async fn build_rejects_empty_roster() {
        let mut config = StackedConfig::default();
        config.personas.clear();
        assert!(build(&config, EventBus::default()).is_err());
    }
}
