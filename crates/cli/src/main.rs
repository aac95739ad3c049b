// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! agora - drive the Agora event bus from the command line

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod error;
mod logging;
mod output;
mod settings;

use agora_core::EventBus;
use agora_modules::Platform;
use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{pattern, publish, routes, run};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::error::AgoraError;
use crate::output::OutputFormat;
use crate::settings::{Settings, CONFIG_ENV};

#[derive(Parser)]
#[command(
    name = "agora",
    version,
    about = "Agora - publish events to the platform modules and inspect dispatch"
)]
struct Cli {
    /// Settings file (defaults to $AGORA_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish one event and print the dispatch report
    Publish(publish::PublishArgs),
    /// Publish every event in a JSON-lines file
    Run(run::RunArgs),
    /// Check which event types a pattern matches
    Match(pattern::MatchArgs),
    /// List subscriptions registered by the modules
    Routes,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<AgoraError>() {
                Some(user_error) => eprint!("{}", user_error),
                None => eprintln!("error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.config)?;
    let _log_guard = logging::setup_logging(&settings.log)?;

    match cli.command {
        Commands::Match(args) => pattern::check(args, cli.format),
        Commands::Publish(args) => publish::publish(&boot(settings)?, args, cli.format).await,
        Commands::Run(args) => run::run(&boot(settings)?, args, cli.format).await,
        Commands::Routes => routes::routes(&boot(settings)?, cli.format),
    }
}

/// Build the bus and install every platform module on it
fn boot(settings: Settings) -> Result<EventBus> {
    let bus = EventBus::new(settings.bus);
    Platform::install(&bus)?;
    tracing::debug!(subscriptions = bus.subscription_count(), "platform ready");
    Ok(bus)
}

fn load_settings(flag: Option<PathBuf>) -> Result<Settings> {
    let env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let Some(path) = settings::locate(flag.as_deref(), env) else {
        return Ok(Settings::default());
    };
    let settings = Settings::load(&path).map_err(|e| AgoraError::config(&path, e))?;
    Ok(settings)
}
