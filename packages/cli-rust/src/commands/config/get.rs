//! Config get subcommand
//!
//! Retrieves a single configuration value by key.

use anyhow::{Result, bail};
use cluster_ssh_core::Config;

/// Get a single configuration value
///
/// Outputs just the value (no formatting) for scripting.
pub fn cmd_config_get(config: &Config, key: &str, _quiet: bool) -> Result<()> {
    println!("{}", config_value(config, key)?);
    Ok(())
}

fn config_value(config: &Config, key: &str) -> Result<String> {
    let value = match key.to_lowercase().as_str() {
        "version" => config.version.to_string(),
        "environment" | "env" => config.environment_name().unwrap_or_default().to_string(),
        "cluster" => config.cluster.clone(),
        "inventory" => config.inventory.to_string(),
        "aws_profile" | "profile" => config.aws_profile.clone().unwrap_or_default(),
        "aws_region" | "region" => config.aws_region.clone().unwrap_or_default(),
        "inventory_file" => config.inventory_file.clone().unwrap_or_default(),
        "environment_tag" => config.environment_tag.clone(),
        "role_tag" => config.role_tag.clone(),
        "ssh_user" | "user" => config.ssh_user.clone(),
        "ssh_private_key_path" | "key" => config.ssh_private_key_path.clone().unwrap_or_default(),
        "require_bastion" => config.require_bastion.to_string(),
        _ => {
            bail!(
                "Unknown configuration key: {key}\n\n\
                Valid keys:\n  \
                  version\n  \
                  environment / env\n  \
                  cluster\n  \
                  inventory\n  \
                  aws_profile / profile\n  \
                  aws_region / region\n  \
                  inventory_file\n  \
                  environment_tag\n  \
                  role_tag\n  \
                  ssh_user / user\n  \
                  ssh_private_key_path / key\n  \
                  require_bastion"
            );
        }
    };
    Ok(value)
}
