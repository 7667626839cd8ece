//! cluster-ssh ssh - Connect to a host by alias or instance id
//!
//! Regenerates the cluster's SSH config first so aliases match the
//! current inventory, then hands over to the system `ssh`.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::Args;
use cluster_ssh_core::host::{ResolvedHost, configured_host_names, resolve_ssh_host};
use cluster_ssh_core::{Cluster, Config, LocalCluster};
use console::style;

use super::ssh_config::{generate, write_generated};
use crate::output::host_error;

/// Arguments for ssh command
#[derive(Args)]
pub struct SshArgs {
    /// Host alias (e.g. "worker-2", "bastion") or instance id
    pub name: String,

    /// Use the existing SSH config instead of querying the inventory
    #[arg(long)]
    pub no_refresh: bool,

    /// Extra arguments passed to ssh
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

pub fn cmd_ssh(args: &SshArgs, config: &Config, quiet: bool) -> Result<()> {
    let path = if args.no_refresh {
        LocalCluster::from_config(config)
            .and_then(|cluster| cluster.ssh_config_path())
            .map_err(host_error)?
    } else {
        let generated = generate(config, false)?;
        write_generated(&generated)?;
        generated.path
    };

    if !path.exists() {
        bail!(
            "No SSH config at {}.\nGenerate it with: cluster-ssh ssh-config",
            path.display()
        );
    }

    let names = configured_host_names(&path).map_err(host_error)?;
    if !names.iter().any(|n| n == &args.name) {
        bail!(
            "Unknown host '{}'.\n\nKnown hosts: {}",
            args.name,
            names.join(", ")
        );
    }

    if !quiet {
        if let Some(target) = resolve_ssh_host(&path, &args.name).map_err(host_error)? {
            eprintln!("{}", style(connect_line(&args.name, &target)).dim());
        }
    }

    let status = ssh_command(&path, &args.name, &args.args)
        .status()
        .context("Failed to run ssh. Install OpenSSH client.")?;

    if !status.success() {
        std::process::exit(status.code().unwrap_or(1));
    }
    Ok(())
}

/// Where `name` leads, e.g. `worker-2 -> centos@10.0.0.5`
fn connect_line(name: &str, target: &ResolvedHost) -> String {
    match &target.user {
        Some(user) => format!("{name} -> {user}@{}", target.hostname),
        None => format!("{name} -> {}", target.hostname),
    }
}

/// `ssh -F <config> <name> [args...]`
fn ssh_command(config_path: &Path, name: &str, extra: &[String]) -> Command {
    let mut cmd = Command::new("ssh");
    cmd.arg("-F").arg(config_path).arg(name).args(extra);
    tracing::debug!("Running {:?}", cmd);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssh_command_args() {
        let cmd = ssh_command(
            Path::new("/srv/cssh/prod-hub/ssh_config"),
            "worker-2",
            &["uptime".to_string()],
        );
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(cmd.get_program(), "ssh");
        assert_eq!(
            args,
            vec!["-F", "/srv/cssh/prod-hub/ssh_config", "worker-2", "uptime"]
        );
    }

    #[test]
    fn test_connect_line_names_user_and_hostname() {
        let target = ResolvedHost {
            hostname: "10.0.0.5".to_string(),
            user: Some("centos".to_string()),
        };
        assert_eq!(connect_line("worker-2", &target), "worker-2 -> centos@10.0.0.5");

        let target = ResolvedHost {
            hostname: "54.0.0.1".to_string(),
            user: None,
        };
        assert_eq!(connect_line("bastion", &target), "bastion -> 54.0.0.1");
    }
}
