//! The conversation controller.
//!
//! Owns the message log, the typing indicator, the input buffer, the
//! persona selection, the playback queue, and the agent mode. Every
//! mutation goes through one of the controller's locks; network calls run
//! outside them and re-enter to publish their results.

mod manager;
mod modes;
mod send;


use std::sync::Arc;
use std::time::Duration;

use stacked_agents::StatusPoller;
use stacked_ai::{PersonaRegistry, SpeechSynthesizer, TextGenerator};
use stacked_common::EventBus;
use tokio::sync::Mutex;

use crate::message::Message;
use crate::modes::ModeState;
use crate::playback::{AudioPlayer, PlaybackQueue};

/// Timer cadences and the autonomous prompt.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub live_poll_interval: Duration,
    pub auto_prompt_interval: Duration,
    pub auto_prompt: String,
    pub thoughts_limit: u32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            live_poll_interval: Duration::from_secs(5),
            auto_prompt_interval: Duration::from_secs(30),
            auto_prompt: "Autonomous task".to_string(),
            thoughts_limit: 20,
        }
    }
}

/// Chat state guarded by a single lock.
struct ChatState {
    messages: Vec<Message>,
    /// Generation requests still waiting for a reply.
    pending: usize,
    input: String,
    personas: PersonaRegistry,
}

pub(crate) struct Inner {
    generator: Arc<dyn TextGenerator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    poller: Arc<StatusPoller>,
    events: EventBus,
    settings: ControllerSettings,
    chat: Mutex<ChatState>,
    playback: Mutex<PlaybackQueue>,
    mode: Mutex<ModeState>,
}

/// Cheap to clone; clones share the same conversation.
#[derive(Clone)]
pub struct ConversationController {
    inner: Arc<Inner>,
}

impl ConversationController {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        player: Arc<dyn AudioPlayer>,
        poller: Arc<StatusPoller>,
        personas: PersonaRegistry,
        settings: ControllerSettings,
        events: EventBus,
    ) -> Self {
        let inner = Inner {
            generator,
            synthesizer,
            poller,
            playback: Mutex::new(PlaybackQueue::new(player, events.clone())),
            events,
            settings,
            chat: Mutex::new(ChatState {
                messages: Vec::new(),
                pending: 0,
                input: String::new(),
                personas,
            }),
            mode: Mutex::new(ModeState::default()),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.inner.settings
    }
}
