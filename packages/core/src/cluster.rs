//! Cluster context
//!
//! A cluster supplies the environment name that scopes the inventory query
//! and the on-disk locations every generated SSH stanza points at. Hosts
//! hold a shared reference to it and only ever read from it.

use std::path::PathBuf;

use crate::config::{Config, get_cluster_dir, get_environment_dir, validate_name};
use crate::host::HostError;

/// Path and naming queries a host needs from its cluster
pub trait Cluster: Send + Sync {
    /// Environment name used to scope the inventory query
    fn environment(&self) -> &str;

    /// Cluster name within the environment
    fn name(&self) -> &str;

    /// Per-cluster local config directory
    fn config_path(&self) -> Result<PathBuf, HostError>;

    /// Generated SSH client config for this cluster
    fn ssh_config_path(&self) -> Result<PathBuf, HostError> {
        Ok(self.config_path()?.join("ssh_config"))
    }

    /// Known-hosts file isolating this cluster's host keys
    fn ssh_host_keys_path(&self) -> Result<PathBuf, HostError> {
        Ok(self.config_path()?.join("ssh_known_hosts"))
    }

    /// Private key used to log in to every host
    fn ssh_private_key_path(&self) -> Result<PathBuf, HostError>;
}

/// Cluster whose state lives under the local cluster-ssh config directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCluster {
    environment: String,
    name: String,
    base_dir: Option<PathBuf>,
    private_key_path: Option<PathBuf>,
}

impl LocalCluster {
    /// Cluster rooted at the default config directory
    pub fn new(environment: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            name: name.into(),
            base_dir: None,
            private_key_path: None,
        }
    }

    /// Build the cluster described by a loaded config
    ///
    /// Fails if no environment is configured, or if either name would not
    /// stay a single path segment.
    pub fn from_config(config: &Config) -> Result<Self, HostError> {
        let environment = config.environment_name().ok_or_else(|| {
            HostError::ClusterPath(
                "No environment configured. Set one with: cluster-ssh config set environment <name>"
                    .to_string(),
            )
        })?;

        let name = config.cluster.trim();
        validate_name("environment", environment).map_err(HostError::ClusterPath)?;
        validate_name("cluster", name).map_err(HostError::ClusterPath)?;

        let mut cluster = Self::new(environment, name);
        if let Some(key) = &config.ssh_private_key_path {
            cluster = cluster.with_private_key_path(key);
        }
        Ok(cluster)
    }

    /// Builder pattern: root per-cluster state somewhere other than the config directory
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Builder pattern: use an explicit private key
    pub fn with_private_key_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.private_key_path = Some(path.into());
        self
    }

    fn environment_dir(&self) -> Result<PathBuf, HostError> {
        match &self.base_dir {
            Some(base) => Ok(base.join(&self.environment)),
            None => get_environment_dir(&self.environment).ok_or_else(|| {
                HostError::ClusterPath("Could not determine config directory".to_string())
            }),
        }
    }
}

impl Cluster for LocalCluster {
    fn environment(&self) -> &str {
        &self.environment
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn config_path(&self) -> Result<PathBuf, HostError> {
        match &self.base_dir {
            Some(base) => Ok(base.join(format!("{}-{}", self.environment, self.name))),
            None => get_cluster_dir(&self.environment, &self.name).ok_or_else(|| {
                HostError::ClusterPath("Could not determine config directory".to_string())
            }),
        }
    }

    fn ssh_private_key_path(&self) -> Result<PathBuf, HostError> {
        match &self.private_key_path {
            Some(path) => Ok(path.clone()),
            None => Ok(self.environment_dir()?.join("id_rsa")),
        }
    }
}
