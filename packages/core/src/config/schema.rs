//! Configuration schema for cluster-ssh
//!
//! Defines the structure and defaults for the config.json file.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where the running-instance inventory comes from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InventoryKind {
    /// EC2 via the `aws` command line client
    #[default]
    Aws,
    /// A JSON inventory snapshot on disk
    File,
}

impl fmt::Display for InventoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryKind::Aws => write!(f, "aws"),
            InventoryKind::File => write!(f, "file"),
        }
    }
}

impl FromStr for InventoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aws" | "amazon" | "ec2" => Ok(InventoryKind::Aws),
            "file" => Ok(InventoryKind::File),
            other => Err(format!(
                "Invalid inventory: '{other}'. Must be 'aws' or 'file'."
            )),
        }
    }
}

/// Main configuration structure for cluster-ssh
///
/// Serialized to/from `~/.config/cluster-ssh/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Config file version for migrations
    pub version: u32,

    /// Environment whose instances are listed (default: None, must be set)
    #[serde(default)]
    pub environment: Option<String>,

    /// Cluster name within the environment (default: "cluster")
    #[serde(default = "default_cluster")]
    pub cluster: String,

    /// Inventory source (default: "aws")
    #[serde(default)]
    pub inventory: InventoryKind,

    /// AWS CLI profile used for the inventory query
    #[serde(default)]
    pub aws_profile: Option<String>,

    /// AWS region used for the inventory query
    #[serde(default)]
    pub aws_region: Option<String>,

    /// Inventory snapshot read by the "file" provider
    #[serde(default)]
    pub inventory_file: Option<String>,

    /// Tag key holding the environment name (default: "Environment")
    #[serde(default = "default_environment_tag")]
    pub environment_tag: String,

    /// Tag key holding the comma-separated role list (default: "tarmak_role")
    #[serde(default = "default_role_tag")]
    pub role_tag: String,

    /// SSH login user for every instance (default: "centos")
    #[serde(default = "default_ssh_user")]
    pub ssh_user: String,

    /// Override for the environment's private key path
    #[serde(default)]
    pub ssh_private_key_path: Option<String>,

    /// Fail rendering when private hosts exist but no host is aliased "bastion"
    #[serde(default)]
    pub require_bastion: bool,
}

fn default_cluster() -> String {
    "cluster".to_string()
}

fn default_environment_tag() -> String {
    "Environment".to_string()
}

fn default_role_tag() -> String {
    "tarmak_role".to_string()
}

fn default_ssh_user() -> String {
    "centos".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            environment: None,
            cluster: default_cluster(),
            inventory: InventoryKind::default(),
            aws_profile: None,
            aws_region: None,
            inventory_file: None,
            environment_tag: default_environment_tag(),
            role_tag: default_role_tag(),
            ssh_user: default_ssh_user(),
            ssh_private_key_path: None,
            require_bastion: false,
        }
    }
}

impl Config {
    /// The configured environment, if it is set and non-blank
    pub fn environment_name(&self) -> Option<&str> {
        self.environment
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Validate an environment or cluster name
///
/// Names end up in directory names and tag filters, so they must be
/// non-empty and free of path separators and whitespace.
pub fn validate_name(kind: &str, name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err(format!("{kind} name cannot be empty"));
    }
    if name == "." || name == ".." {
        return Err(format!("Invalid {kind} name '{name}'"));
    }
    if let Some(c) = name
        .chars()
        .find(|c| c.is_whitespace() || *c == '/' || *c == '\\')
    {
        return Err(format!("Invalid {kind} name '{name}': contains '{c}'"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, 1);
        assert!(config.environment.is_none());
        assert_eq!(config.cluster, "cluster");
        assert_eq!(config.inventory, InventoryKind::Aws);
        assert_eq!(config.environment_tag, "Environment");
        assert_eq!(config.role_tag, "tarmak_role");
        assert_eq!(config.ssh_user, "centos");
        assert!(config.ssh_private_key_path.is_none());
        assert!(!config.require_bastion);
    }

    #[test]
    fn test_deserialize_with_missing_optional_fields() {
        let json = r#"{"version": 1, "environment": "prod", "inventory": "file"}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.environment_name(), Some("prod"));
        assert_eq!(config.inventory, InventoryKind::File);
        assert_eq!(config.cluster, "cluster");
        assert_eq!(config.ssh_user, "centos");
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let json = r#"{"version": 1, "bastion_alias": "jump"}"#;
        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_environment_is_unset() {
        let config = Config {
            environment: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.environment_name(), None);
    }

    #[test]
    fn test_inventory_kind_parse() {
        assert_eq!("aws".parse::<InventoryKind>(), Ok(InventoryKind::Aws));
        assert_eq!("EC2".parse::<InventoryKind>(), Ok(InventoryKind::Aws));
        assert_eq!("file".parse::<InventoryKind>(), Ok(InventoryKind::File));
        assert!("gce".parse::<InventoryKind>().is_err());
        assert_eq!(InventoryKind::File.to_string(), "file");
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("environment", "staging").is_ok());
        assert!(validate_name("environment", "").is_err());
        assert!(validate_name("cluster", "a/b").is_err());
        assert!(validate_name("cluster", "a b").is_err());
        assert!(validate_name("cluster", "..").is_err());
    }
}
