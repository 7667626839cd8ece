//! Config reset subcommand
//!
//! Restores the default configuration. The previous file is kept as
//! config.json.bak by the save.

use anyhow::{Result, bail};
use cluster_ssh_core::{Config, save_config};
use console::style;

/// Reset configuration to defaults
pub fn cmd_config_reset(force: bool, quiet: bool) -> Result<()> {
    if !force {
        bail!(
            "This replaces your configuration with defaults.\n\
             Re-run with --force to confirm: cluster-ssh config reset --force"
        );
    }

    save_config(&Config::default())?;

    if !quiet {
        println!(
            "{} Configuration reset to defaults",
            style("Success:").green().bold()
        );
    }

    Ok(())
}
