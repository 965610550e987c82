use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stacked_common::AgentMode;

/// Stacked: chat with a roster of local AI personas and watch your
/// autonomous agents.
#[derive(Parser, Debug)]
#[command(name = "stacked", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error) or a full filter directive.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Chat service base URL.
    #[arg(long, env = "STACKED_CHAT_URL")]
    pub chat_url: Option<String>,

    /// Text-to-speech service base URL.
    #[arg(long, env = "STACKED_TTS_URL")]
    pub tts_url: Option<String>,

    /// Agent service base URL.
    #[arg(long, env = "STACKED_AGENTS_URL")]
    pub agents_url: Option<String>,

    /// Persona to start with (by id).
    #[arg(long)]
    pub persona: Option<String>,

    /// Directory where synthesized replies are written.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Agent mode to enter at startup (idle, live, auto).
    #[arg(long)]
    pub mode: Option<AgentMode>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List agent statuses and notifications once.
    Agents,
    /// Show an agent's recent thoughts.
    Thoughts {
        agent: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Run an agent now.
    Trigger { agent: String },
    /// Check the agent service.
    Health,
    /// Print the effective configuration as JSON.
    Config,
}

pub fn parse() -> Args {
    Args::parse()
}
