//! services/app/src/bin/study_aid.rs

use app_lib::{
    cli::{Cli, Commands},
    commands,
    config::Config,
    error::AppError,
    state::AppState,
};
use clap::Parser;
use console::style;
use std::{process::ExitCode, sync::Arc};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded.");

    // --- 2. Commands that need no services ---
    let command = match cli.command {
        Commands::Render(args) => return commands::render::execute(args).await,
        command => command,
    };

    // --- 3. Build the Shared AppState (restores any remembered session) ---
    let mut state = AppState::from_config(config)?;

    // --- 4. Dispatch ---
    match command {
        Commands::Auth(args) => commands::auth::execute(&mut state, args).await,
        Commands::Upload(args) => commands::upload::execute(&mut state, args).await,
        Commands::Summaries(args) => commands::summaries::execute(&mut state, args).await,
        Commands::Ask(args) => commands::ask::execute(&mut state, args).await,
        Commands::Quiz(args) => commands::quiz::execute(&mut state, args).await,
        Commands::Schedule(args) => commands::schedule::execute(&mut state, args).await,
        Commands::Performance => commands::performance::execute(&mut state).await,
        Commands::Dashboard => commands::dashboard::execute(&mut state).await,
        Commands::Render(args) => commands::render::execute(args).await,
    }
}
