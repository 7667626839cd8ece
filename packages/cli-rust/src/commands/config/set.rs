//! Config set subcommand
//!
//! Sets a single configuration value.

use anyhow::{Result, bail};
use cluster_ssh_core::config::validate_name;
use cluster_ssh_core::{Config, InventoryKind, load_config, save_config};
use console::style;

/// Set a configuration value
///
/// Omitting the value clears an optional key.
pub fn cmd_config_set(key: &str, value: Option<&str>, quiet: bool) -> Result<()> {
    let mut config = load_config()?;
    let display_value = apply_setting(&mut config, key, value)?;

    save_config(&config)?;

    if !quiet {
        println!(
            "{} Set {} = {}",
            style("Success:").green().bold(),
            key,
            display_value
        );
    }

    Ok(())
}

/// Apply one key/value to a config, returning the value to display
fn apply_setting(config: &mut Config, key: &str, value: Option<&str>) -> Result<String> {
    let display_value = match key.to_lowercase().as_str() {
        "environment" | "env" => {
            let val = require_value(value, key)?;
            validate_name("environment", val).map_err(|e| anyhow::anyhow!(e))?;
            config.environment = Some(val.to_string());
            val.to_string()
        }

        "cluster" => {
            let val = require_value(value, key)?;
            validate_name("cluster", val).map_err(|e| anyhow::anyhow!(e))?;
            config.cluster = val.to_string();
            val.to_string()
        }

        "inventory" => {
            let val = require_value(value, key)?;
            let kind: InventoryKind = val.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            config.inventory = kind;
            kind.to_string()
        }

        "aws_profile" | "profile" => set_optional(&mut config.aws_profile, value),
        "aws_region" | "region" => set_optional(&mut config.aws_region, value),
        "inventory_file" => set_optional(&mut config.inventory_file, value),
        "ssh_private_key_path" | "key" => set_optional(&mut config.ssh_private_key_path, value),

        "environment_tag" => {
            let val = require_non_empty(value, key)?;
            config.environment_tag = val.to_string();
            val.to_string()
        }

        "role_tag" => {
            let val = require_non_empty(value, key)?;
            config.role_tag = val.to_string();
            val.to_string()
        }

        "ssh_user" | "user" => {
            let val = require_non_empty(value, key)?;
            config.ssh_user = val.to_string();
            val.to_string()
        }

        "require_bastion" => {
            let val = require_value(value, key)?;
            let parsed = parse_bool(val).ok_or_else(|| {
                anyhow::anyhow!("Invalid boolean value: {val}. Use: true/false, yes/no, or 1/0")
            })?;
            config.require_bastion = parsed;
            parsed.to_string()
        }

        _ => {
            bail!(
                "Unknown configuration key: {key}\n\n\
                Valid keys:\n  \
                  environment / env\n  \
                  cluster\n  \
                  inventory (aws | file)\n  \
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

    Ok(display_value)
}

fn set_optional(field: &mut Option<String>, value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => {
            *field = Some(v.to_string());
            v.to_string()
        }
        None => {
            *field = None;
            "(not set)".to_string()
        }
    }
}

/// Require a value for keys that cannot be cleared
fn require_value<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str> {
    value.ok_or_else(|| {
        anyhow::anyhow!("Value required for key '{key}'.\nUsage: cluster-ssh config set {key} <value>")
    })
}

fn require_non_empty<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str> {
    let val = require_value(value, key)?.trim();
    if val.is_empty() {
        bail!("Value for '{key}' cannot be empty");
    }
    Ok(val)
}

/// Parse boolean from various string representations
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
