//! Idle / live / auto transitions.
//!
//! The mode and its timer change under one lock, so a switch can never
//! leave two timers running or none where one is due.

use std::sync::Arc;

use stacked_common::{AgentMode, Event, RepeatingTask};
use tracing::{debug, info};

use super::send::Origin;
use super::ConversationController;
use crate::modes::{ModeState, ModeTimer};

impl ConversationController {
    pub async fn mode(&self) -> AgentMode {
        self.inner.mode.lock().await.mode
    }

    /// Which timer is running, if any.
    pub async fn active_timer(&self) -> Option<AgentMode> {
        self.inner.mode.lock().await.timer.as_ref().map(ModeTimer::mode)
    }

    /// Poll the agent service on the live cadence. No-op when already live;
    /// from auto, the auto timer is cancelled first.
    pub async fn start_live(&self) {
        let mut state = self.inner.mode.lock().await;
        if state.mode == AgentMode::Live {
            debug!("already live");
            return;
        }
        let handle = self
            .inner
            .poller
            .spawn_polling(self.inner.settings.live_poll_interval);
        self.switch(&mut state, AgentMode::Live, Some(ModeTimer::LivePoll(handle)));
    }

    /// Leave live mode. Does nothing in any other mode.
    pub async fn stop_live(&self) {
        let mut state = self.inner.mode.lock().await;
        if state.mode != AgentMode::Live {
            debug!(mode = %state.mode, "stop_live ignored");
            return;
        }
        self.switch(&mut state, AgentMode::Idle, None);
    }

    /// Send the autonomous prompt on the auto cadence, replacing any live timer.
    pub async fn start_auto(&self) {
        let mut state = self.inner.mode.lock().await;
        if state.mode == AgentMode::Auto {
            debug!("already auto");
            return;
        }
        let task = self.spawn_auto_prompts();
        self.switch(&mut state, AgentMode::Auto, Some(ModeTimer::AutoPrompt(task)));
    }

    /// Leave auto mode. Does nothing in any other mode.
    pub async fn stop_auto(&self) {
        let mut state = self.inner.mode.lock().await;
        if state.mode != AgentMode::Auto {
            debug!(mode = %state.mode, "stop_auto ignored");
            return;
        }
        self.switch(&mut state, AgentMode::Idle, None);
    }

    /// Auto off if on, on otherwise.
    pub async fn toggle_auto(&self) {
        if self.mode().await == AgentMode::Auto {
            self.stop_auto().await;
        } else {
            self.start_auto().await;
        }
    }

    /// Back to idle from whatever mode is active.
    pub async fn go_idle(&self) {
        let mut state = self.inner.mode.lock().await;
        if state.mode != AgentMode::Idle {
            self.switch(&mut state, AgentMode::Idle, None);
        }
    }

    /// Dispatch a mode by name, as the CLI does.
    pub async fn set_mode(&self, mode: AgentMode) {
        match mode {
            AgentMode::Idle => self.go_idle().await,
            AgentMode::Live => self.start_live().await,
            AgentMode::Auto => self.start_auto().await,
        }
    }

    fn switch(&self, state: &mut ModeState, mode: AgentMode, timer: Option<ModeTimer>) {
        let from = state.mode;
        // Dropping the old timer cancels it.
        state.timer = timer;
        state.mode = mode;
        info!(%from, to = %mode, "agent mode changed");
        self.inner.events.publish(Event::ModeChanged(mode));
    }

    fn spawn_auto_prompts(&self) -> RepeatingTask {
        let weak = Arc::downgrade(&self.inner);
        let prompt = self.inner.settings.auto_prompt.clone();
        RepeatingTask::spawn(self.inner.settings.auto_prompt_interval, move || {
            let inner = weak.upgrade()?;
            let prompt = prompt.clone();
            Some(async move {
                inner.send(&prompt, Origin::Autonomous).await;
            })
        })
    }
}
