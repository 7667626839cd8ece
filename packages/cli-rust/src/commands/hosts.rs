//! cluster-ssh hosts - List the running hosts of the cluster

use anyhow::Result;
use clap::Args;
use cluster_ssh_core::{AmazonProvider, Config, Host, LocalCluster, Provider};
use comfy_table::{Cell, Color, Table};
use console::style;
use serde_json::{Map, Value};

use super::inventory_source;
use crate::output::host_error;

/// Arguments for hosts command
#[derive(Args)]
pub struct HostsArgs {
    /// Only show hosts holding this role
    #[arg(short, long)]
    pub role: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON row for a host: its parameters plus its aliases
fn host_row(host: &dyn Host) -> Value {
    let mut row: Map<String, Value> = host
        .parameters()
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    row.insert("aliases".to_string(), Value::from(host.aliases().to_vec()));
    Value::Object(row)
}

pub fn cmd_hosts(args: &HostsArgs, config: &Config, quiet: bool) -> Result<()> {
    let cluster = LocalCluster::from_config(config).map_err(host_error)?;
    let source = inventory_source(config)?;
    let provider = AmazonProvider::from_config(&cluster, source, config);

    let hosts = provider.list_hosts().map_err(host_error)?;

    // Aliases are assigned over the whole cluster before filtering
    let filtered: Vec<&dyn Host> = hosts
        .iter()
        .map(|h| &**h as &dyn Host)
        .filter(|h| {
            args.role
                .as_ref()
                .map(|role| h.roles().contains(role))
                .unwrap_or(true)
        })
        .collect();

    if args.json {
        let rows: Vec<Value> = filtered.iter().map(|h| host_row(*h)).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if filtered.is_empty() {
        if !quiet {
            match &args.role {
                Some(role) => println!("No hosts with role '{role}'."),
                None => println!(
                    "No running hosts found in environment '{}'.",
                    config.environment_name().unwrap_or_default()
                ),
            }
        }
        return Ok(());
    }

    if quiet {
        for host in &filtered {
            println!("{}", host.aliases().first().map_or(host.id(), String::as_str));
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Aliases", "Roles", "Hostname", "Access"]);

    for host in &filtered {
        let aliases = if host.aliases().is_empty() {
            "-".to_string()
        } else {
            host.aliases().join(" ")
        };
        let roles = if host.roles().is_empty() {
            "-".to_string()
        } else {
            host.roles().join(", ")
        };

        table.add_row(vec![
            Cell::new(host.id()),
            Cell::new(aliases),
            Cell::new(roles),
            Cell::new(host.hostname()),
            access_cell(host.hostname_public()),
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} {} ({} of {} host(s))",
        style("Provider:").dim(),
        provider.name(),
        filtered.len(),
        hosts.len()
    );

    Ok(())
}

/// Public hosts are reached directly, the rest through the bastion
fn access_cell(public: bool) -> Cell {
    if public {
        Cell::new("public").fg(Color::Green)
    } else {
        Cell::new("via bastion").fg(Color::Yellow)
    }
}
