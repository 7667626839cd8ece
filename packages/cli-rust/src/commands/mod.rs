//! CLI command implementations

mod config;
mod hosts;
mod ssh;
mod ssh_config;

use anyhow::{Result, bail};
use cluster_ssh_core::{AwsCliInventory, Config, FileInventory, InventoryKind, InventorySource};

pub use config::{ConfigArgs, cmd_config};
pub use hosts::{HostsArgs, cmd_hosts};
pub use ssh::{SshArgs, cmd_ssh};
pub use ssh_config::{SshConfigArgs, cmd_ssh_config};

/// Build the inventory source selected by the config
fn inventory_source(config: &Config) -> Result<Box<dyn InventorySource>> {
    match config.inventory {
        InventoryKind::Aws => {
            let mut source = AwsCliInventory::new();
            if let Some(profile) = &config.aws_profile {
                source = source.with_profile(profile);
            }
            if let Some(region) = &config.aws_region {
                source = source.with_region(region);
            }
            Ok(Box::new(source))
        }
        InventoryKind::File => {
            let Some(path) = &config.inventory_file else {
                bail!(
                    "Inventory 'file' needs a snapshot path.\n\
                     Set one with: cluster-ssh config set inventory_file <path>"
                );
            };
            Ok(Box::new(FileInventory::new(path)))
        }
    }
}
