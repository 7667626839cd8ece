//! Inventory snapshot stored as JSON
//!
//! The file holds an array of [`InstanceRecord`]s. Every record in it is
//! treated as running; only the environment tag filter is applied.

use std::fs;
use std::path::PathBuf;

use super::InstanceRecord;
use super::InventorySource;
use super::error::InventoryError;

/// Inventory read from a JSON file on each query
#[derive(Debug, Clone)]
pub struct FileInventory {
    path: PathBuf,
}

impl FileInventory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl InventorySource for FileInventory {
    fn list_running_instances(
        &self,
        environment_tag: &str,
        environment: &str,
    ) -> Result<Vec<InstanceRecord>, InventoryError> {
        let contents = fs::read_to_string(&self.path)
            .map_err(|e| InventoryError::Io(format!("{}: {}", self.path.display(), e)))?;

        let records: Vec<InstanceRecord> = serde_json::from_str(&contents).map_err(|e| {
            InventoryError::Malformed(format!("{}: {}", self.path.display(), e))
        })?;

        Ok(records
            .into_iter()
            .filter(|r| r.tag(environment_tag) == Some(environment))
            .collect())
    }
}
