//! The send pipeline: generate, log, synthesize, enqueue.

use stacked_common::{Event, MessageId};
use tracing::{debug, info, warn};

use super::{ConversationController, Inner};
use crate::message::Message;

/// Who asked for a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Origin {
    /// Typed or dictated by the user. Echoed into the log; failures are shown.
    User,
    /// Fired by the auto-mode timer. Not echoed; failures are only logged.
    Autonomous,
}

impl Inner {
    /// Run one prompt through the pipeline. Returns the id of the reply
    /// message, or `None` if nothing was sent or generation failed.
    pub(crate) async fn send(&self, text: &str, origin: Origin) -> Option<MessageId> {
        if text.trim().is_empty() {
            return None;
        }

        let persona = {
            let mut chat = self.chat.lock().await;
            if origin == Origin::User {
                let msg = Message::user(text);
                self.events.publish(Event::MessageAppended {
                    id: msg.id.clone(),
                    is_user: true,
                });
                chat.messages.push(msg);
            }
            chat.pending += 1;
            if chat.pending == 1 {
                self.events.publish(Event::TypingChanged(true));
            }
            chat.personas.selected().clone()
        };

        debug!(persona = %persona.id, model = %persona.model, ?origin, "sending prompt");
        let result = self.generator.generate(&persona.request(text)).await;

        let reply = {
            let mut chat = self.chat.lock().await;
            chat.pending -= 1;

            let reply = match result {
                Ok(reply) => {
                    let msg = Message::agent(reply.clone(), persona.name.clone());
                    let id = msg.id.clone();
                    self.events.publish(Event::MessageAppended {
                        id: id.clone(),
                        is_user: false,
                    });
                    chat.messages.push(msg);
                    Some((id, reply))
                }
                Err(e) => {
                    warn!(persona = %persona.id, ?origin, error = %e, "generation failed");
                    if origin == Origin::User {
                        let msg = Message::system(format!("Error: {e}"));
                        self.events.publish(Event::MessageAppended {
                            id: msg.id.clone(),
                            is_user: false,
                        });
                        chat.messages.push(msg);
                    }
                    None
                }
            };

            if chat.pending == 0 {
                self.events.publish(Event::TypingChanged(false));
            }
            reply
        };

        let (id, reply) = reply?;
        info!(persona = %persona.id, chars = reply.chars().count(), "reply received");
        self.speak(&reply).await;
        Some(id)
    }

    /// Synthesize `text` and queue it. Failures are logged, never shown.
    async fn speak(&self, text: &str) {
        match self.synthesizer.synthesize(text).await {
            Ok(audio) => {
                let id = self.playback.lock().await.enqueue(audio);
                debug!(%id, "reply queued for playback");
            }
            Err(e) => warn!(error = %e, "speech synthesis failed"),
        }
    }
}

impl ConversationController {
    /// Send `text` as the user, exactly as typed. Blank input is ignored.
    ///
    /// Returns the id of the agent's reply message on success.
    pub async fn send_message(&self, text: &str) -> Option<MessageId> {
        self.inner.send(text, Origin::User).await
    }

    pub async fn set_input(&self, text: impl Into<String>) {
        self.inner.chat.lock().await.input = text.into();
    }

    pub async fn input(&self) -> String {
        self.inner.chat.lock().await.input.clone()
    }

    /// Send the input buffer. The buffer is emptied before the request goes
    /// out so typing can continue while the reply is pending.
    pub async fn submit_input(&self) -> Option<MessageId> {
        let prompt = std::mem::take(&mut self.inner.chat.lock().await.input);
        self.send_message(&prompt).await
    }
}
