//! Package source CLI commands: get, set, register, unregister.
//!
//! Each mutating command enforces the confirmation gate before calling
//! dispatch, calls dispatch exactly once per confirmed request, and
//! translates the report into per-provider diagnostics.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use dialoguer::Confirm;
use tokio_util::sync::CancellationToken;

use omnipkg_core::source::{DispatchReport, SourceDispatcher};
use omnipkg_types::error::DispatchError;
use omnipkg_types::source::{
    GetSourceRequest, PackageSourceInfo, RegisterSourceRequest, SetSourceRequest,
    UnregisterSourceRequest,
};

use crate::state::AppState;

/// Update an existing source's configuration.
#[allow(clippy::too_many_arguments)]
pub async fn set_source(
    state: &AppState,
    cancel: &CancellationToken,
    name: String,
    location: Option<String>,
    trusted: Option<bool>,
    provider: Option<String>,
    passthru: bool,
    yes: bool,
    json: bool,
) -> Result<()> {
    if !confirmed(yes, json, &format!("Set package source '{}'?", style(&name).cyan()), true)? {
        return Ok(());
    }

    let filter = state.provider_filter(provider);
    let request = SetSourceRequest {
        name: name.clone(),
        location,
        trusted,
        pass_through: passthru,
    };

    tracing::debug!(source = %name, "Setting package source");

    let dispatcher = SourceDispatcher::new(&state.registry, cancel.clone());
    let Some(report) = unwrap_dispatch(dispatcher.set_source(&request, filter.as_deref()).await)?
    else {
        return Ok(());
    };

    report_mutation(report, &name, "set", json)
}

/// Register a new source.
#[allow(clippy::too_many_arguments)]
pub async fn register_source(
    state: &AppState,
    cancel: &CancellationToken,
    name: String,
    location: String,
    trusted: bool,
    force: bool,
    provider: Option<String>,
    passthru: bool,
    yes: bool,
    json: bool,
) -> Result<()> {
    let prompt = format!(
        "Register package source '{}' at '{}'?",
        style(&name).cyan(),
        location
    );
    if !confirmed(yes, json, &prompt, true)? {
        return Ok(());
    }

    let filter = state.provider_filter(provider);
    let request = RegisterSourceRequest {
        name: name.clone(),
        location,
        trusted: trusted.then_some(true),
        force,
        pass_through: passthru,
    };

    tracing::debug!(source = %name, "Registering package source");

    let dispatcher = SourceDispatcher::new(&state.registry, cancel.clone());
    let Some(report) =
        unwrap_dispatch(dispatcher.register_source(&request, filter.as_deref()).await)?
    else {
        return Ok(());
    };

    report_mutation(report, &name, "registered", json)
}

/// Remove a registered source.
pub async fn unregister_source(
    state: &AppState,
    cancel: &CancellationToken,
    name: String,
    provider: Option<String>,
    passthru: bool,
    yes: bool,
    json: bool,
) -> Result<()> {
    let prompt = format!(
        "Unregister package source '{}'?",
        style(&name).red().bold()
    );
    if !confirmed(yes, json, &prompt, false)? {
        return Ok(());
    }

    let filter = state.provider_filter(provider);
    let request = UnregisterSourceRequest {
        name: name.clone(),
        pass_through: passthru,
    };

    tracing::debug!(source = %name, "Unregistering package source");

    let dispatcher = SourceDispatcher::new(&state.registry, cancel.clone());
    let Some(report) =
        unwrap_dispatch(dispatcher.unregister_source(&request, filter.as_deref()).await)?
    else {
        return Ok(());
    };

    report_mutation(report, &name, "unregistered", json)
}

/// List registered sources across providers.
pub async fn get_sources(
    state: &AppState,
    cancel: &CancellationToken,
    name: String,
    provider: Option<String>,
    json: bool,
) -> Result<()> {
    let filter = state.provider_filter(provider);
    let request = GetSourceRequest { name: name.clone() };

    let dispatcher = SourceDispatcher::new(&state.registry, cancel.clone());
    let Some(report) = unwrap_dispatch(dispatcher.get_sources(&request, filter.as_deref()).await)?
    else {
        return Ok(());
    };

    if json {
        let found = report.succeeded();
        let errors: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        let payload = serde_json::json!({
            "sources": report.emitted,
            "errors": errors,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        if !found {
            anyhow::bail!("no package source found matching '{name}'");
        }
        return Ok(());
    }

    let mut errors = report.errors;
    let terminal = if report.emitted.is_empty() {
        errors.pop()
    } else {
        None
    };
    for error in &errors {
        eprintln!("  {} {}", style("!").yellow().bold(), error);
    }

    if let Some(terminal) = terminal {
        anyhow::bail!("{terminal}");
    }

    println!();
    print_sources_table(&report.emitted);
    println!(
        "  {} source{}",
        style(report.emitted.len()).bold(),
        if report.emitted.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Run the confirmation gate. Returns false (after printing) when the
/// user declines; dispatch must not be called in that case.
fn confirmed(yes: bool, json: bool, prompt: &str, default: bool) -> Result<bool> {
    if yes || json {
        return Ok(true);
    }

    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?;

    if !confirmed {
        println!("  Cancelled.");
    }
    Ok(confirmed)
}

/// Translate a dispatch result: `Ok(None)` means the operation was
/// cancelled and already reported; resolution errors propagate.
fn unwrap_dispatch(
    result: Result<DispatchReport, DispatchError>,
) -> Result<Option<DispatchReport>> {
    match result {
        Ok(report) => Ok(Some(report)),
        Err(DispatchError::Cancelled) => {
            println!("  Cancelled.");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

/// Render the report of a mutating dispatch.
///
/// Faults from providers that were tried before the winner are surfaced
/// as warnings; a dispatch where nothing succeeded exits non-zero with
/// the terminal error.
fn report_mutation(report: DispatchReport, name: &str, action: &str, json: bool) -> Result<()> {
    if json {
        let success = report.succeeded();
        let errors: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        let payload = serde_json::json!({
            "success": success,
            "provider": report.provider,
            "sources": report.emitted,
            "errors": errors,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        if !success {
            anyhow::bail!("failed to {action} package source '{name}'");
        }
        return Ok(());
    }

    if report.succeeded() {
        for error in &report.errors {
            eprintln!("  {} {}", style("!").yellow().bold(), error);
        }
        let provider = report.provider.as_deref().unwrap_or("-");
        println!(
            "  {} Package source '{}' {} via '{}'.",
            style("✓").green().bold(),
            style(name).cyan(),
            action,
            style(provider).white()
        );
        if !report.emitted.is_empty() {
            println!();
            print_sources_table(&report.emitted);
        }
        return Ok(());
    }

    let mut errors = report.errors;
    let terminal = errors.pop();
    for error in &errors {
        eprintln!("  {} {}", style("!").red().bold(), error);
    }
    match terminal {
        Some(err) => anyhow::bail!("{err}"),
        None => anyhow::bail!("failed to {action} package source '{name}'"),
    }
}

fn print_sources_table(sources: &[PackageSourceInfo]) {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Location").fg(Color::White),
        Cell::new("Provider").fg(Color::White),
        Cell::new("Trusted").fg(Color::White),
    ]);

    for source in sources {
        let trusted_cell = if source.trusted {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::Yellow)
        };

        table.add_row(vec![
            Cell::new(&source.name).fg(Color::Cyan),
            Cell::new(&source.location).fg(Color::White),
            Cell::new(&source.provider).fg(Color::DarkGrey),
            trusted_cell,
        ]);
    }

    println!("{table}");
}
