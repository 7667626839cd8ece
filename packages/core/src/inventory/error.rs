//! Inventory-specific error types
//!
//! Errors raised by an inventory source while listing running instances.
//! None of these are retried; callers decide whether to try again.

use thiserror::Error;

/// Errors that can occur while querying an instance inventory
#[derive(Error, Debug)]
pub enum InventoryError {
    /// Failed to spawn the inventory command
    #[error("Failed to run inventory command: {0}")]
    Spawn(String),

    /// Inventory command exited unsuccessfully
    #[error("Inventory command failed ({status}): {stderr}")]
    Command { status: String, stderr: String },

    /// Credentials missing, expired or lacking permission
    #[error("Not authorized to list instances: {0}")]
    Unauthorized(String),

    /// Response could not be decoded
    #[error("Malformed inventory response: {0}")]
    Malformed(String),

    /// Failed to read an inventory snapshot
    #[error("Failed to read inventory: {0}")]
    Io(String),
}
