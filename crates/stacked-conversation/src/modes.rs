//! Timers owned by the agent-mode state machine.

use stacked_common::{AgentMode, RepeatingTask};

/// The one timer a non-idle mode keeps alive.
#[derive(Debug)]
pub enum ModeTimer {
    LivePoll(RepeatingTask),
    AutoPrompt(RepeatingTask),
}

impl ModeTimer {
    pub fn mode(&self) -> AgentMode {
        match self {
            ModeTimer::LivePoll(_) => AgentMode::Live,
            ModeTimer::AutoPrompt(_) => AgentMode::Auto,
        }
    }
}

/// Current mode plus its timer. Replacing `timer` drops, and so cancels,
/// the previous one.
#[derive(Debug, Default)]
pub(crate) struct ModeState {
    pub(crate) mode: AgentMode,
    pub(crate) timer: Option<ModeTimer>,
}
