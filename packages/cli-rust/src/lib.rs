//! cluster-ssh CLI - SSH access to the hosts of a cluster
//!
//! This module contains the CLI implementation used by the binary.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cluster_ssh_core::{config, get_version, get_version_long, load_config};
use console::style;
use tracing_subscriber::EnvFilter;

/// SSH access to the hosts of a cluster
#[derive(Parser)]
#[command(name = "cluster-ssh")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Discover cluster hosts and generate bastion-aware SSH config", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Increase verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the running hosts of the cluster
    Hosts(commands::HostsArgs),
    /// Generate the cluster's SSH client config
    SshConfig(commands::SshConfigArgs),
    /// Open an SSH session to a host by alias or instance id
    Ssh(commands::SshArgs),
    /// Manage configuration
    Config(commands::ConfigArgs),
}

/// Log level from -v count, overridden by RUST_LOG
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    // Load config (creates default if missing)
    let config_path = config::paths::get_config_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Configuration error", style("Error:").red().bold());
            eprintln!();
            eprintln!("  {e:#}");
            eprintln!();
            eprintln!("  Config file: {}", style(config_path.display()).yellow());
            eprintln!();
            eprintln!(
                "  {} Check the config file for syntax errors or unknown fields.",
                style("Tip:").cyan()
            );
            std::process::exit(1);
        }
    };

    if cli.verbose > 0 {
        eprintln!(
            "{} Config: {}",
            style("[info]").cyan(),
            config_path.display()
        );
    }

    match cli.command {
        Some(Commands::Hosts(args)) => commands::cmd_hosts(&args, &config, cli.quiet),
        Some(Commands::SshConfig(args)) => commands::cmd_ssh_config(&args, &config, cli.quiet),
        Some(Commands::Ssh(args)) => commands::cmd_ssh(&args, &config, cli.quiet),
        Some(Commands::Config(args)) => commands::cmd_config(args, &config, cli.quiet),
        None => {
            if !cli.quiet {
                let version = if cli.verbose > 0 {
                    get_version_long()
                } else {
                    get_version()
                };
                println!(
                    "{} {}",
                    style("cluster-ssh").cyan().bold(),
                    style(version).dim()
                );
                println!();
                println!("Run {} for available commands.", style("--help").green());
            }
            Ok(())
        }
    }
}
