//! Interactive chat loop.
//!
//! Plain lines are sent to the selected persona; lines starting with `/`
//! are commands. Replies and state changes are printed as the event bus
//! reports them, so a slow reply never blocks the prompt.

use stacked_common::{AgentMode, Event, StackedError};
use stacked_conversation::ConversationController;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::display;
use crate::sink::PlaybackDone;

const HELP: &str = "\
commands:
  /live              poll agents continuously
  /auto              toggle autonomous prompts
  /idle              stop all timers
  /next, /prev       cycle personas
  /persona [id]      list personas or select one
  /agents            refresh and show agent statuses
  /notifications     show the latest notifications
  /thoughts <id>     show an agent's recent thoughts
  /trigger <id>      run an agent now
  /pause, /resume    hold or continue speech
  /history           print the conversation
  /help              this text
  /quit              exit
anything else is sent to the selected persona";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Send(String),
    Live,
    Auto,
    Idle,
    Next,
    Prev,
    Persona(Option<String>),
    Agents,
    Notifications,
    Thoughts(String),
    Trigger(String),
    Pause,
    Resume,
    History,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

impl ReplCommand {
    /// Plain text is kept exactly as read.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Self::Send(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::to_string);

        match (name, arg) {
            ("live", None) => Self::Live,
            ("auto", None) => Self::Auto,
            ("idle", None) => Self::Idle,
            ("next", None) => Self::Next,
            ("prev", None) => Self::Prev,
            ("persona", arg) => Self::Persona(arg),
            ("agents", None) => Self::Agents,
            ("notifications", None) => Self::Notifications,
            ("thoughts", Some(id)) => Self::Thoughts(id),
            ("trigger", Some(id)) => Self::Trigger(id),
            ("pause", None) => Self::Pause,
            ("resume", None) => Self::Resume,
            ("history", None) => Self::History,
            ("help", None) => Self::Help,
            ("quit" | "exit", None) => Self::Quit,
            ("thoughts" | "trigger", None) => Self::Invalid(format!("/{name} needs an agent id")),
            _ => Self::Invalid(format!("unknown command: {trimmed}")),
        }
    }
}

/// Prints replies and mode changes until the bus shuts down.
fn spawn_printer(
    controller: ConversationController,
    mut events: broadcast::Receiver<Event>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last_counts = (0, 0);
        loop {
            match events.recv().await {
                Ok(Event::MessageAppended { id, is_user: false }) => {
                    let messages = controller.messages().await;
                    if let Some(message) = messages.iter().rev().find(|m| m.id == id) {
                        println!("{}", display::message(message));
                    }
                }
                Ok(Event::ModeChanged(mode)) => println!("-- mode: {mode}"),
                Ok(Event::AgentsUpdated {
                    agents,
                    notifications,
                }) => {
                    if (agents, notifications) != last_counts {
                        println!("-- {agents} agents, {notifications} notifications");
                        last_counts = (agents, notifications);
                    }
                }
                Ok(Event::Shutdown) | Err(broadcast::error::RecvError::Closed) => break,
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    debug!(skipped = n, "event printer lagged");
                }
            }
        }
    })
}

/// Handles one command. Returns `false` when the loop should stop.
async fn dispatch(controller: &ConversationController, command: ReplCommand) -> bool {
    match command {
        ReplCommand::Send(text) => {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller.send_message(&text).await;
            });
        }
        ReplCommand::Live => controller.start_live().await,
        ReplCommand::Auto => controller.toggle_auto().await,
        ReplCommand::Idle => controller.go_idle().await,
        ReplCommand::Next => {
            let persona = controller.next_persona().await;
            println!("-- now talking to {}", persona.label());
        }
        ReplCommand::Prev => {
            let persona = controller.previous_persona().await;
            println!("-- now talking to {}", persona.label());
        }
        ReplCommand::Persona(None) => {
            let selected = controller.selected_persona().await;
            for persona in controller.personas().await {
                println!("{}", display::persona(&persona, persona.id == selected.id));
            }
        }
        ReplCommand::Persona(Some(id)) => match controller.select_persona(&id).await {
            Some(persona) => println!("-- now talking to {}", persona.label()),
            None => println!("-- no persona named {id}"),
        },
        ReplCommand::Agents => match controller.poll_agents().await {
            Ok(snapshot) => print!("{}", display::snapshot(&snapshot)),
            Err(e) => println!("-- agent service unavailable: {e}"),
        },
        ReplCommand::Notifications => {
            let snapshot = controller.agent_snapshot().await;
            if snapshot.notifications.is_empty() {
                println!("-- no notifications");
            }
            for n in &snapshot.notifications {
                println!("{}", display::notification_line(n));
            }
        }
        ReplCommand::Thoughts(id) => match controller.thoughts_as_messages(&id).await {
            Ok(messages) if messages.is_empty() => println!("-- {id} has no thoughts yet"),
            Ok(messages) => {
                for message in &messages {
                    println!("{}", display::message(message));
                }
            }
            Err(e) => println!("-- could not load thoughts: {e}"),
        },
        ReplCommand::Trigger(id) => match controller.trigger_agent(&id).await {
            Ok(()) => println!("-- triggered {id}"),
            Err(e) => println!("-- trigger failed: {e}"),
        },
        ReplCommand::Pause => controller.suspend_playback().await,
        ReplCommand::Resume => controller.resume_playback().await,
        ReplCommand::History => {
            for message in controller.messages().await {
                println!("{}", display::message(&message));
            }
        }
        ReplCommand::Help => println!("{HELP}"),
        ReplCommand::Quit => return false,
        ReplCommand::Empty => {}
        ReplCommand::Invalid(reason) => println!("-- {reason}"),
    }
    true
}

/// Runs until `/quit`, end of input, or Ctrl-C.
pub async fn run(
    controller: ConversationController,
    mut playback_rx: mpsc::UnboundedReceiver<PlaybackDone>,
    start_mode: AgentMode,
) -> Result<(), StackedError> {
    let printer = spawn_printer(controller.clone(), controller.events().subscribe());

    if let Err(e) = controller.poll_agents().await {
        warn!(error = %e, "initial agent poll failed");
    }
    controller.set_mode(start_mode).await;

    let persona = controller.selected_persona().await;
    println!("talking to {} (/help for commands)", persona.label());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                if !dispatch(&controller, ReplCommand::parse(&line)).await {
                    break;
                }
            }
            Some(done) = playback_rx.recv() => {
                debug!(id = %done.id, success = done.success, "playback finished");
                controller.playback_finished(done.success).await;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    controller.go_idle().await;
    controller.events().publish(Event::Shutdown);
    let _ = printer.await;
    Ok(())
}
