//! Cloud providers
//!
//! A provider lists the running instances of the configured environment
//! and turns them into classified hosts. Providers only differ in how
//! instances are fetched and mapped; assembly is shared.

mod amazon;

use std::collections::HashSet;

pub use amazon::AmazonProvider;

use crate::cluster::Cluster;
use crate::host::{ClusterHost, Host, HostError, classify};
use crate::inventory::InstanceRecord;

/// Capability set every provider supplies
pub trait Provider {
    /// Short provider name for logs and reports
    fn name(&self) -> &'static str;

    /// Raw running/pending instances of the cluster's environment
    fn list_running_instances(&self) -> Result<Vec<InstanceRecord>, HostError>;

    /// Classified hosts, ready to render
    ///
    /// On error no hosts are returned.
    fn list_hosts(&self) -> Result<Vec<Box<dyn Host + '_>>, HostError>;
}

/// Build classified hosts from one inventory snapshot
///
/// Records without an id or any address are dropped, as are repeats of
/// an id already seen. Inventory order is kept and drives alias numbering.
pub fn assemble_hosts<'c>(
    cluster: &'c dyn Cluster,
    records: &[InstanceRecord],
    role_tag: &str,
    user: &str,
) -> Vec<ClusterHost<'c>> {
    let mut seen = HashSet::new();
    let mut hosts = Vec::with_capacity(records.len());

    for record in records {
        let Some(host) = ClusterHost::from_record(cluster, record, role_tag, user) else {
            tracing::debug!("Skipping instance '{}': no usable address", record.id);
            continue;
        };
        if !seen.insert(record.id.as_str()) {
            tracing::debug!("Skipping duplicate instance '{}'", record.id);
            continue;
        }
        hosts.push(host);
    }

    classify(hosts)
}
