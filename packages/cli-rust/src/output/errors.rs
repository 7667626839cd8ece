//! Error formatting for host pipeline failures

use cluster_ssh_core::{HostError, InventoryError};

/// Render a host error with a hint on how to fix it, when there is one
pub fn format_host_error(err: &HostError) -> String {
    let hint = match err {
        HostError::Inventory(InventoryError::Unauthorized(_)) => Some(
            "Check your AWS credentials, or pick a profile with: cluster-ssh config set aws_profile <name>",
        ),
        HostError::Inventory(InventoryError::Spawn(_)) => {
            Some("Install the AWS CLI, or switch to a snapshot: cluster-ssh config set inventory file")
        }
        HostError::MissingBastion(_) => Some(
            "Tag a public instance with the 'bastion' role, or drop --require-bastion / require_bastion",
        ),
        HostError::ClusterPath(_) => {
            Some("Check environment, cluster and ssh_private_key_path with: cluster-ssh config show")
        }
        _ => None,
    };

    match hint {
        Some(hint) => format!("{err}\n\nTip: {hint}"),
        None => err.to_string(),
    }
}

/// Convert a host error into an anyhow error carrying the formatted message
pub fn host_error(err: HostError) -> anyhow::Error {
    anyhow::anyhow!(format_host_error(&err))
}
