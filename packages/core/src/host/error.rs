//! Host-specific error types
//!
//! Errors that can occur while listing hosts or rendering their SSH config.

use thiserror::Error;

use crate::inventory::InventoryError;

/// Errors that can occur during host operations
#[derive(Error, Debug)]
pub enum HostError {
    /// Inventory query failed; surfaced exactly as the source reported it
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// A cluster-scoped path could not be resolved
    #[error("Could not resolve cluster path: {0}")]
    ClusterPath(String),

    /// Private hosts need a bastion but none is in the host list
    #[error(
        "No host is aliased 'bastion' but {0} host(s) without a public address need it as a jump host"
    )]
    MissingBastion(usize),

    /// Failed to read a generated SSH config file
    #[error("Failed to read SSH config: {0}")]
    SshConfigRead(String),

    /// Failed to write the generated SSH config file
    #[error("Failed to write SSH config: {0}")]
    SshConfigWrite(String),
}
