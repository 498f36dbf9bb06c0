//! omnipkg CLI entry point.
//!
//! Binary name: `opkg`
//!
//! Parses CLI arguments, initializes the provider registry, then
//! dispatches to the appropriate command handler. Ctrl+C cancels any
//! in-flight dispatch through a shared cancellation token.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,omnipkg_core=debug,omnipkg_infra=debug,omnipkg_cli=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "opkg", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    // Ctrl+C cancels in-flight dispatches cooperatively.
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    match cli.command {
        Commands::Get { name, provider } => {
            cli::source::get_sources(&state, &cancel, name, provider, cli.json).await?;
        }

        Commands::Set {
            name,
            location,
            trusted,
            untrusted,
            provider,
            passthru,
            yes,
        } => {
            cli::source::set_source(
                &state,
                &cancel,
                name,
                location,
                cli::trusted_flag(trusted, untrusted),
                provider,
                passthru,
                yes,
                cli.json,
            )
            .await?;
        }

        Commands::Register {
            name,
            location,
            trusted,
            force,
            provider,
            passthru,
            yes,
        } => {
            cli::source::register_source(
                &state, &cancel, name, location, trusted, force, provider, passthru, yes,
                cli.json,
            )
            .await?;
        }

        Commands::Unregister {
            name,
            provider,
            passthru,
            yes,
        } => {
            cli::source::unregister_source(
                &state, &cancel, name, provider, passthru, yes, cli.json,
            )
            .await?;
        }

        Commands::Providers => {
            cli::provider::list_providers(&state, cli.json)?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
