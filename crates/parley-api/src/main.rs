//! Parley console and REST API entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, initializes database and services, then dispatches
//! to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing::warn;

use cli::{AgentAction, Cli, Commands, HistoryAction};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity; RUST_LOG wins when set
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,parley=debug",
        _ => "trace",
    };
    parley_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;

    parley_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "parley", &mut std::io::stdout());
        return Ok(());
    }

    // Initialize application state (config, DB, services)
    let state = AppState::init().await?;

    match cli.command {
        Commands::Chat { agent } => {
            cli::chat::loop_runner::run_chat_loop(&state, agent).await?;
        }

        Commands::Agent { action } => match action {
            AgentAction::Create {
                name,
                description,
                agent_type,
                system_prompt,
            } => {
                cli::agent::create_agent(
                    &state,
                    name,
                    description,
                    agent_type,
                    system_prompt,
                    cli.json,
                )
                .await?;
            }
            AgentAction::List => cli::agent::list_agents(&state, cli.json).await?,
            AgentAction::Show { id } => cli::agent::show_agent(&state, id, cli.json).await?,
            AgentAction::Delete { id, force } => {
                cli::agent::delete_agent(&state, id, force, cli.json).await?;
            }
        },

        Commands::History { action } => match action {
            HistoryAction::Show { id } => cli::history::show_history(&state, id, cli.json).await?,
            HistoryAction::Clear { id, force } => {
                cli::history::clear_history(&state, id, force, cli.json).await?;
            }
        },

        Commands::Serve { port, host } => {
            if !state.has_credential() {
                warn!(
                    "No API key configured; chat requests will fail until {} is set",
                    parley_infra::config::API_KEY_ENV
                );
            }

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} Parley API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!(
                    "  {}  {}",
                    console::style("Model:").bold(),
                    console::style(&state.config.model).dim()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// If a handler cannot be installed, that branch never resolves and the
/// other one still triggers shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
