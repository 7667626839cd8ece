//! Host entity
//!
//! One discovered cluster member, plus the capability surface every
//! provider's host type exposes to callers and report generators.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::error::HostError;
use super::ssh_config::render_stanza;
use crate::cluster::Cluster;
use crate::inventory::InstanceRecord;

/// What callers can ask of a discovered host
pub trait Host: Send + Sync {
    /// Provider-assigned instance identifier
    fn id(&self) -> &str;

    /// Roles this host performs, in tag order, without duplicates
    fn roles(&self) -> &[String];

    /// One alias per role, in role order
    fn aliases(&self) -> &[String];

    /// Address SSH connects to
    fn hostname(&self) -> &str;

    /// Whether `hostname` is reachable without the bastion
    fn hostname_public(&self) -> bool;

    /// SSH login user
    fn user(&self) -> &str;

    /// Flattened key/value view for templating and reports
    fn parameters(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("id".to_string(), self.id().to_string()),
            ("hostname".to_string(), self.hostname().to_string()),
            ("roles".to_string(), self.roles().join(", ")),
        ])
    }

    /// The SSH client config stanza for this host
    fn ssh_config(&self) -> Result<String, HostError>;
}

impl<H: Host + ?Sized> Host for Box<H> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn roles(&self) -> &[String] {
        (**self).roles()
    }

    fn aliases(&self) -> &[String] {
        (**self).aliases()
    }

    fn hostname(&self) -> &str {
        (**self).hostname()
    }

    fn hostname_public(&self) -> bool {
        (**self).hostname_public()
    }

    fn user(&self) -> &str {
        (**self).user()
    }

    fn parameters(&self) -> BTreeMap<String, String> {
        (**self).parameters()
    }

    fn ssh_config(&self) -> Result<String, HostError> {
        (**self).ssh_config()
    }
}

/// A host belonging to a cluster
///
/// Built fresh from every inventory snapshot. Aliases are only filled in
/// by [`classify`](super::classify); everything else is fixed at
/// construction.
#[derive(Clone)]
pub struct ClusterHost<'c> {
    id: String,
    hostname: String,
    hostname_public: bool,
    roles: Vec<String>,
    aliases: Vec<String>,
    user: String,
    cluster: &'c dyn Cluster,
}

impl<'c> ClusterHost<'c> {
    /// Create a host with no roles
    pub fn new(
        cluster: &'c dyn Cluster,
        id: impl Into<String>,
        hostname: impl Into<String>,
        hostname_public: bool,
        user: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            hostname: hostname.into(),
            hostname_public,
            roles: Vec::new(),
            aliases: Vec::new(),
            user: user.into(),
            cluster,
        }
    }

    /// Build a host from an inventory record
    ///
    /// The public address wins when present. Returns `None` for records
    /// without an id or without any address.
    pub fn from_record(
        cluster: &'c dyn Cluster,
        record: &InstanceRecord,
        role_tag: &str,
        user: &str,
    ) -> Option<Self> {
        if record.id.is_empty() {
            return None;
        }

        let non_empty = |addr: &Option<String>| addr.clone().filter(|a| !a.is_empty());
        let (hostname, public) = match (
            non_empty(&record.public_address),
            non_empty(&record.private_address),
        ) {
            (Some(public), _) => (public, true),
            (None, Some(private)) => (private, false),
            (None, None) => return None,
        };

        let host = Self::new(cluster, &record.id, hostname, public, user);
        Some(match record.tag(role_tag) {
            Some(value) => host.with_roles(parse_roles(value)),
            None => host,
        })
    }

    /// Builder pattern: set roles, dropping duplicates
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        self.roles = roles
            .into_iter()
            .map(Into::into)
            .filter(|role| seen.insert(role.clone()))
            .collect();
        self
    }

    pub(super) fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }
}

impl Host for ClusterHost<'_> {
    fn id(&self) -> &str {
        &self.id
    }

    fn roles(&self) -> &[String] {
        &self.roles
    }

    fn aliases(&self) -> &[String] {
        &self.aliases
    }

    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn hostname_public(&self) -> bool {
        self.hostname_public
    }

    fn user(&self) -> &str {
        &self.user
    }

    fn ssh_config(&self) -> Result<String, HostError> {
        render_stanza(self, self.cluster)
    }
}

impl fmt::Debug for ClusterHost<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterHost")
            .field("id", &self.id)
            .field("hostname", &self.hostname)
            .field("hostname_public", &self.hostname_public)
            .field("roles", &self.roles)
            .field("aliases", &self.aliases)
            .field("user", &self.user)
            .field("cluster", &self.cluster.name())
            .finish()
    }
}

/// Split a role tag value into distinct roles
///
/// Parts are trimmed; empty parts and repeats are dropped.
pub fn parse_roles(value: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    value
        .split(',')
        .map(str::trim)
        .filter(|role| !role.is_empty() && seen.insert(*role))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::LocalCluster;

    fn cluster() -> LocalCluster {
        LocalCluster::new("prod", "hub").with_base_dir("/srv/cssh")
    }

    #[test]
    fn test_parse_roles() {
        assert_eq!(parse_roles("etcd,master"), vec!["etcd", "master"]);
        assert_eq!(parse_roles(" worker , etcd "), vec!["worker", "etcd"]);
        assert_eq!(parse_roles("etcd,etcd,master"), vec!["etcd", "master"]);
        assert!(parse_roles("").is_empty());
        assert!(parse_roles(",,").is_empty());
    }

    #[test]
    fn test_from_record_prefers_public_address() {
        let cluster = cluster();
        let record = InstanceRecord::new("i-1")
            .with_private_address("10.0.0.1")
            .with_public_address("54.0.0.1")
            .with_tag("tarmak_role", "bastion");
        let host = ClusterHost::from_record(&cluster, &record, "tarmak_role", "centos").unwrap();
        assert_eq!(host.hostname(), "54.0.0.1");
        assert!(host.hostname_public());
        assert_eq!(host.roles(), ["bastion"]);
        assert!(host.aliases().is_empty());
    }

    #[test]
    fn test_from_record_private_only() {
        let cluster = cluster();
        let record = InstanceRecord::new("i-2")
            .with_private_address("10.0.0.2")
            .with_public_address("");
        let host = ClusterHost::from_record(&cluster, &record, "tarmak_role", "centos").unwrap();
        assert_eq!(host.hostname(), "10.0.0.2");
        assert!(!host.hostname_public());
        assert!(host.roles().is_empty());
    }

    #[test]
    fn test_from_record_rejects_unusable_records() {
        let cluster = cluster();
        let no_address = InstanceRecord::new("i-3").with_tag("tarmak_role", "worker");
        assert!(ClusterHost::from_record(&cluster, &no_address, "tarmak_role", "centos").is_none());

        let no_id = InstanceRecord::new("").with_private_address("10.0.0.3");
        assert!(ClusterHost::from_record(&cluster, &no_id, "tarmak_role", "centos").is_none());
    }

    #[test]
    fn test_parameters() {
        let cluster = cluster();
        let host = ClusterHost::new(&cluster, "i-4", "10.0.0.4", false, "centos")
            .with_roles(["master", "etcd", "master"]);
        let params = host.parameters();
        assert_eq!(params.len(), 3);
        assert_eq!(params["id"], "i-4");
        assert_eq!(params["hostname"], "10.0.0.4");
        assert_eq!(params["roles"], "master, etcd");
    }

    #[test]
    fn test_boxed_host_delegates() {
        let cluster = cluster();
        let host: Box<dyn Host + '_> =
            Box::new(ClusterHost::new(&cluster, "i-5", "10.0.0.5", true, "centos"));
        assert_eq!(host.id(), "i-5");
        assert_eq!(host.user(), "centos");
        assert!(host.hostname_public());
    }
}
