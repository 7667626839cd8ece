//! cluster-ssh ssh-config - Generate the cluster's SSH client config

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use cluster_ssh_core::{
    AmazonProvider, BastionPolicy, Cluster, Config, LocalCluster, Provider, render_ssh_config,
    write_ssh_config,
};
use console::style;

use super::inventory_source;
use crate::output::host_error;

/// Arguments for ssh-config command
#[derive(Args)]
pub struct SshConfigArgs {
    /// Print the config instead of writing it to the cluster directory
    #[arg(long)]
    pub stdout: bool,

    /// Fail if private hosts exist but no host is aliased 'bastion'
    #[arg(long)]
    pub require_bastion: bool,
}

/// Result of one generation run
pub struct GeneratedConfig {
    pub path: PathBuf,
    pub contents: String,
    pub host_count: usize,
}

/// Query the inventory and render the combined SSH config
///
/// Nothing is written; see [`write_generated`].
pub fn generate(config: &Config, require_bastion: bool) -> Result<GeneratedConfig> {
    let cluster = LocalCluster::from_config(config).map_err(host_error)?;
    let source = inventory_source(config)?;
    let provider = AmazonProvider::from_config(&cluster, source, config);

    let hosts = provider.list_hosts().map_err(host_error)?;

    let policy = if require_bastion || config.require_bastion {
        BastionPolicy::Require
    } else {
        BastionPolicy::Permissive
    };
    let contents = render_ssh_config(&hosts, policy).map_err(host_error)?;
    let path = cluster.ssh_config_path().map_err(host_error)?;

    Ok(GeneratedConfig {
        path,
        contents,
        host_count: hosts.len(),
    })
}

/// Write a generated config to its cluster path
pub fn write_generated(generated: &GeneratedConfig) -> Result<()> {
    write_ssh_config(&generated.path, &generated.contents).map_err(host_error)?;
    tracing::info!(
        "Wrote SSH config for {} host(s) to {}",
        generated.host_count,
        generated.path.display()
    );
    Ok(())
}

pub fn cmd_ssh_config(args: &SshConfigArgs, config: &Config, quiet: bool) -> Result<()> {
    let generated = generate(config, args.require_bastion)?;

    if args.stdout {
        print!("{}", generated.contents);
        return Ok(());
    }

    write_generated(&generated)?;

    if !quiet {
        println!(
            "{} Wrote {} host(s) to {}",
            style("Success:").green().bold(),
            generated.host_count,
            style(generated.path.display()).cyan()
        );
        println!();
        println!(
            "  {} {}",
            style("Connect with:").dim(),
            style(format!("ssh -F {} <alias>", generated.path.display())).yellow()
        );
        println!(
            "  {} {}",
            style("Or add to ~/.ssh/config:").dim(),
            style(format!("Include {}", generated.path.display())).yellow()
        );
    }

    Ok(())
}
