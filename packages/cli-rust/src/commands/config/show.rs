//! Config show subcommand
//!
//! Displays current configuration in table or JSON format.

use anyhow::Result;
use cluster_ssh_core::{Config, config};
use comfy_table::{Cell, Color, Table};

/// Show current configuration
pub fn cmd_config_show(config: &Config, json: bool, _quiet: bool) -> Result<()> {
    if json {
        let output = serde_json::to_string_pretty(config)?;
        println!("{output}");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Key", "Value"]);

    table.add_row(vec![
        Cell::new("version"),
        Cell::new(config.version.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("environment"),
        match config.environment_name() {
            Some(env) => Cell::new(env),
            None => Cell::new("(not set)").fg(Color::Red),
        },
    ]);
    table.add_row(vec![Cell::new("cluster"), Cell::new(&config.cluster)]);
    table.add_row(vec![
        Cell::new("inventory"),
        Cell::new(config.inventory.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("aws_profile"),
        Cell::new(format_optional(&config.aws_profile)),
    ]);
    table.add_row(vec![
        Cell::new("aws_region"),
        Cell::new(format_optional(&config.aws_region)),
    ]);
    table.add_row(vec![
        Cell::new("inventory_file"),
        Cell::new(format_optional(&config.inventory_file)),
    ]);
    table.add_row(vec![
        Cell::new("environment_tag"),
        Cell::new(&config.environment_tag),
    ]);
    table.add_row(vec![Cell::new("role_tag"), Cell::new(&config.role_tag)]);
    table.add_row(vec![Cell::new("ssh_user"), Cell::new(&config.ssh_user)]);
    table.add_row(vec![
        Cell::new("ssh_private_key_path"),
        Cell::new(format_optional(&config.ssh_private_key_path)),
    ]);
    table.add_row(vec![
        Cell::new("require_bastion"),
        Cell::new(config.require_bastion.to_string()),
    ]);

    println!("{table}");

    if let Some(path) = config::get_config_path() {
        println!();
        println!("Config file: {}", path.display());
    }

    Ok(())
}

fn format_optional(value: &Option<String>) -> String {
    match value {
        Some(s) if !s.is_empty() => s.clone(),
        _ => "(not set)".to_string(),
    }
}
