//! Amazon EC2 provider
//!
//! Instances are scoped by an environment tag and carry their roles in a
//! comma-separated role tag. Every instance logs in as the image's default
//! user.

use super::{Provider, assemble_hosts};
use crate::cluster::Cluster;
use crate::config::Config;
use crate::host::{Host, HostError};
use crate::inventory::{InstanceRecord, InventorySource};

/// EC2-backed provider for one cluster
pub struct AmazonProvider<'c, S> {
    cluster: &'c dyn Cluster,
    source: S,
    environment_tag: String,
    role_tag: String,
    user: String,
}

impl<'c, S: InventorySource> AmazonProvider<'c, S> {
    /// Provider with the default tag keys and login user
    pub fn new(cluster: &'c dyn Cluster, source: S) -> Self {
        let defaults = Config::default();
        Self {
            cluster,
            source,
            environment_tag: defaults.environment_tag,
            role_tag: defaults.role_tag,
            user: defaults.ssh_user,
        }
    }

    /// Provider using the tag keys and login user from a config
    pub fn from_config(cluster: &'c dyn Cluster, source: S, config: &Config) -> Self {
        Self::new(cluster, source)
            .with_environment_tag(&config.environment_tag)
            .with_role_tag(&config.role_tag)
            .with_user(&config.ssh_user)
    }

    /// Builder pattern: set the tag key holding the environment
    pub fn with_environment_tag(mut self, tag: impl Into<String>) -> Self {
        self.environment_tag = tag.into();
        self
    }

    /// Builder pattern: set the tag key holding the roles
    pub fn with_role_tag(mut self, tag: impl Into<String>) -> Self {
        self.role_tag = tag.into();
        self
    }

    /// Builder pattern: set the login user
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }
}

impl<S: InventorySource> Provider for AmazonProvider<'_, S> {
    fn name(&self) -> &'static str {
        "amazon"
    }

    fn list_running_instances(&self) -> Result<Vec<InstanceRecord>, HostError> {
        let records = self
            .source
            .list_running_instances(&self.environment_tag, self.cluster.environment())?;
        Ok(records)
    }

    fn list_hosts(&self) -> Result<Vec<Box<dyn Host + '_>>, HostError> {
        let records = self.list_running_instances()?;
        let hosts = assemble_hosts(self.cluster, &records, &self.role_tag, &self.user);

        tracing::debug!(
            "Found {} host(s) in environment '{}' ({} instance record(s))",
            hosts.len(),
            self.cluster.environment(),
            records.len()
        );

        Ok(hosts
            .into_iter()
            .map(|h| Box::new(h) as Box<dyn Host + '_>)
            .collect())
    }
}
