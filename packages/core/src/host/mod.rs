//! Host discovery module
//!
//! Turns an inventory snapshot into SSH-addressable hosts:
//! - Host entity and the capability trait providers implement
//! - Role classification and alias assignment
//! - Per-host SSH client config stanzas and the combined config file

mod aliases;
mod entity;
mod error;
mod ssh_config;

// Public exports
pub use aliases::{assign_aliases, classify};
pub use entity::{ClusterHost, Host, parse_roles};
pub use error::HostError;
pub use ssh_config::{
    BASTION_ALIAS, BastionPolicy, ResolvedHost, configured_host_names, missing_bastion,
    render_ssh_config, render_stanza, resolve_ssh_host, write_ssh_config,
};
