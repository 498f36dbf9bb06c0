//! Provider listing CLI command.
//!
//! Shows every registered provider and the source operations it
//! declares, in registration (resolution) order.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use crate::state::AppState;

/// List registered providers and their capabilities.
pub fn list_providers(state: &AppState, json: bool) -> Result<()> {
    if json {
        let payload: Vec<serde_json::Value> = state
            .registry
            .iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.name(),
                    "capabilities": p.capabilities(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if state.registry.is_empty() {
        println!();
        println!(
            "  {} No providers registered.",
            style("i").blue().bold()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("  {}", style("Registered Providers").bold());
    println!();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Provider").fg(Color::White),
        Cell::new("Get").fg(Color::White),
        Cell::new("Set").fg(Color::White),
        Cell::new("Register").fg(Color::White),
        Cell::new("Unregister").fg(Color::White),
    ]);

    let cap_cell = |supported: bool| {
        if supported {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("-").fg(Color::DarkGrey)
        }
    };

    for provider in state.registry.iter() {
        let caps = provider.capabilities();
        table.add_row(vec![
            Cell::new(provider.name()).fg(Color::Cyan),
            cap_cell(caps.get_source),
            cap_cell(caps.set_source),
            cap_cell(caps.register_source),
            cap_cell(caps.unregister_source),
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} provider{}",
        style(state.registry.len()).bold(),
        if state.registry.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}
