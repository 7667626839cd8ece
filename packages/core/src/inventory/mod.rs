//! Running-instance inventory
//!
//! The inventory is the only external input of the host pipeline: one
//! query per invocation returning every running or pending instance of an
//! environment. Sources are constructed explicitly and passed in, so
//! several environments can be queried side by side.

mod aws_cli;
mod error;
mod file;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use aws_cli::{AwsCliInventory, parse_describe_instances};
pub use error::InventoryError;
pub use file::FileInventory;

/// One instance as reported by an inventory source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    /// Provider-assigned instance identifier
    pub id: String,

    /// Address inside the cluster network
    #[serde(default)]
    pub private_address: Option<String>,

    /// Externally routable address, if the instance has one
    #[serde(default)]
    pub public_address: Option<String>,

    /// Instance tags
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl InstanceRecord {
    /// Create a record with only an id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Builder pattern: set private address
    pub fn with_private_address(mut self, address: impl Into<String>) -> Self {
        self.private_address = Some(address.into());
        self
    }

    /// Builder pattern: set public address
    pub fn with_public_address(mut self, address: impl Into<String>) -> Self {
        self.public_address = Some(address.into());
        self
    }

    /// Builder pattern: add a tag
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Look up a tag value
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

/// A source of running instances
///
/// Implementations perform exactly one query per call and never retry.
pub trait InventorySource: Send + Sync {
    /// List instances in running or pending state whose `environment_tag`
    /// tag equals `environment`
    fn list_running_instances(
        &self,
        environment_tag: &str,
        environment: &str,
    ) -> Result<Vec<InstanceRecord>, InventoryError>;
}

impl<S: InventorySource + ?Sized> InventorySource for &S {
    fn list_running_instances(
        &self,
        environment_tag: &str,
        environment: &str,
    ) -> Result<Vec<InstanceRecord>, InventoryError> {
        (**self).list_running_instances(environment_tag, environment)
    }
}

impl<S: InventorySource + ?Sized> InventorySource for Box<S> {
    fn list_running_instances(
        &self,
        environment_tag: &str,
        environment: &str,
    ) -> Result<Vec<InstanceRecord>, InventoryError> {
        (**self).list_running_instances(environment_tag, environment)
    }
}
