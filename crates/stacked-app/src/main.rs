mod cli;
mod commands;
mod display;
mod repl;
mod setup;
mod sink;

use std::process::ExitCode;

use stacked_common::{ConfigError, EventBus, StackedError};
use stacked_config::StackedConfig;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::Args;

/// Load `KEY=VALUE` lines from `./.env` without overriding the environment.
fn load_dotenv() {
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return;
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}

/// A bare level like `debug` applies to our crates only.
fn log_directive(arg: Option<&str>, config: &StackedConfig) -> String {
    match arg {
        Some(level) if !level.contains('=') && !level.contains(',') => {
            format!("stacked={level}")
        }
        Some(directive) => directive.to_string(),
        None => config.logging.level.as_directive().to_string(),
    }
}

fn init_tracing(directive: &str) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse(directive)
        .unwrap_or_else(|e| {
            eprintln!("invalid log filter {directive:?} ({e}), using info");
            EnvFilter::new("stacked=info")
        });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// An explicit `--config` must load; the default location falls back to
/// built-in settings.
fn load_config(args: &Args) -> (Result<StackedConfig, ConfigError>, bool) {
    match &args.config {
        Some(path) => (stacked_config::load_config_from(path), true),
        None => (stacked_config::load_config(), false),
    }
}

async fn run(args: Args, mut config: StackedConfig) -> Result<(), StackedError> {
    setup::apply_overrides(&mut config, &args);

    if let Some(command) = &args.command {
        let client = setup::agent_client(&config)?;
        let output = commands::run(command, &config, &client).await?;
        print!("{output}");
        return Ok(());
    }

    let events = EventBus::default();
    let services = setup::build(&config, events)?;

    if let Some(id) = &args.persona {
        if services.controller.select_persona(id).await.is_none() {
            tracing::warn!(persona = %id, "unknown persona, keeping default");
        }
    }

    repl::run(
        services.controller,
        services.playback_rx,
        args.mode.unwrap_or_default(),
    )
    .await
}

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();

    let args = cli::parse();
    let (loaded, explicit) = load_config(&args);
    let config = loaded.as_ref().cloned().unwrap_or_default();

    init_tracing(&log_directive(args.log_level.as_deref(), &config));
    tracing::info!("Stacked v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok(_) => config,
        Err(e) if explicit => {
            tracing::error!(error = %e, "config load failed");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            tracing::warn!(error = %e, "config load failed, using defaults");
            config
        }
    };
    tracing::debug!(
        chat = %config.endpoints.chat_url,
        tts = %config.endpoints.tts_url,
        agents = %config.endpoints.agents_url,
        personas = config.personas.len(),
        "config loaded"
    );

    match run(args, config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "stacked failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
