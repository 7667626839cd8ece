//! cluster-ssh-core - Core library for cluster-ssh
//!
//! Discovers the running instances of a cluster, aliases them by role and
//! renders SSH client config that reaches private instances through the
//! cluster's bastion.

pub mod cluster;
pub mod config;
pub mod host;
pub mod inventory;
pub mod provider;
pub mod version;

// Re-export version functions for Rust consumers
pub use version::{get_version, get_version_long};

// Re-export config types
pub use config::{Config, InventoryKind, load_config, save_config};

// Re-export the host pipeline
pub use cluster::{Cluster, LocalCluster};
pub use host::{BastionPolicy, ClusterHost, Host, HostError, render_ssh_config, write_ssh_config};
pub use inventory::{AwsCliInventory, FileInventory, InstanceRecord, InventoryError, InventorySource};
pub use provider::{AmazonProvider, Provider, assemble_hosts};
