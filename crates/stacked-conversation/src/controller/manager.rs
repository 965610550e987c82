//! Accessors plus persona, playback, and agent-service operations.

use stacked_agents::{AgentServiceError, AgentSnapshot};
use stacked_ai::Persona;

use super::ConversationController;
use crate::message::Message;

impl ConversationController {
    /// A copy of the log, oldest first.
    pub async fn messages(&self) -> Vec<Message> {
        self.inner.chat.lock().await.messages.clone()
    }

    /// True while any generation request is outstanding.
    pub async fn is_typing(&self) -> bool {
        self.inner.chat.lock().await.pending > 0
    }

    // -- personas -------------------------------------------------------------

    pub async fn selected_persona(&self) -> Persona {
        self.inner.chat.lock().await.personas.selected().clone()
    }

    pub async fn personas(&self) -> Vec<Persona> {
        self.inner.chat.lock().await.personas.all().to_vec()
    }

    pub async fn next_persona(&self) -> Persona {
        self.inner.chat.lock().await.personas.next().clone()
    }

    pub async fn previous_persona(&self) -> Persona {
        self.inner.chat.lock().await.personas.previous().clone()
    }

    /// `None` when no persona has that id; the selection is kept.
    pub async fn select_persona(&self, id: &str) -> Option<Persona> {
        self.inner.chat.lock().await.personas.select(id).cloned()
    }

    // -- playback -------------------------------------------------------------

    /// Called by the audio player when the current payload ends.
    pub async fn playback_finished(&self, success: bool) {
        self.inner.playback.lock().await.on_playback_finished(success);
    }

    /// Audio was interrupted from outside.
    pub async fn suspend_playback(&self) {
        self.inner.playback.lock().await.suspend();
    }

    pub async fn resume_playback(&self) {
        self.inner.playback.lock().await.resume();
    }

    pub async fn is_speaking(&self) -> bool {
        self.inner.playback.lock().await.is_speaking()
    }

    /// Payloads waiting or playing.
    pub async fn queued_audio(&self) -> usize {
        self.inner.playback.lock().await.len()
    }

    // -- agent service --------------------------------------------------------

    pub async fn poll_agents(&self) -> Result<AgentSnapshot, AgentServiceError> {
        self.inner.poller.poll_once().await
    }

    pub async fn agent_snapshot(&self) -> AgentSnapshot {
        self.inner.poller.snapshot().await
    }

    pub async fn trigger_agent(&self, agent_id: &str) -> Result<(), AgentServiceError> {
        self.inner.poller.trigger_agent(agent_id).await
    }

    /// An agent's recent thoughts rendered as chat messages, newest first.
    /// The conversation log is left as it is.
    pub async fn thoughts_as_messages(
        &self,
        agent_id: &str,
    ) -> Result<Vec<Message>, AgentServiceError> {
        let thoughts = self
            .inner
            .poller
            .get_thoughts(agent_id, self.inner.settings.thoughts_limit)
            .await?;
        Ok(thoughts
            .iter()
            .map(|t| Message::agent(t.display_text(), agent_id))
            .collect())
    }
}
