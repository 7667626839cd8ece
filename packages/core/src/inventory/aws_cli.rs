//! EC2 inventory via the `aws` command line client
//!
//! Runs `aws ec2 describe-instances` once per query and decodes its JSON
//! output. The CLI handles credential resolution and pagination.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::Deserialize;

use super::InstanceRecord;
use super::InventorySource;
use super::error::InventoryError;

/// Error codes and messages the AWS CLI prints for credential problems
const AUTH_FAILURE_MARKERS: &[&str] = &[
    "UnauthorizedOperation",
    "AuthFailure",
    "ExpiredToken",
    "InvalidClientTokenId",
    "Unable to locate credentials",
];

/// EC2 inventory session
///
/// Holds everything needed to talk to EC2 for one account and region.
/// Construct one per environment; nothing is shared globally.
#[derive(Debug, Clone)]
pub struct AwsCliInventory {
    binary: PathBuf,
    profile: Option<String>,
    region: Option<String>,
}

impl Default for AwsCliInventory {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("aws"),
            profile: None,
            region: None,
        }
    }
}

impl AwsCliInventory {
    /// Create a session using the `aws` binary from PATH and ambient credentials
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: use a named profile
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Builder pattern: query a specific region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Builder pattern: use a different `aws` executable
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Arguments passed to the `aws` executable for one query
    pub fn build_args(&self, environment_tag: &str, environment: &str) -> Vec<String> {
        let mut args = vec![
            "ec2".to_string(),
            "describe-instances".to_string(),
            "--output".to_string(),
            "json".to_string(),
            "--filters".to_string(),
            "Name=instance-state-name,Values=running,pending".to_string(),
            format!("Name=tag:{environment_tag},Values={environment}"),
        ];

        if let Some(profile) = &self.profile {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }
        if let Some(region) = &self.region {
            args.push("--region".to_string());
            args.push(region.clone());
        }

        args
    }
}

impl InventorySource for AwsCliInventory {
    fn list_running_instances(
        &self,
        environment_tag: &str,
        environment: &str,
    ) -> Result<Vec<InstanceRecord>, InventoryError> {
        let args = self.build_args(environment_tag, environment);

        tracing::debug!(
            "Listing instances: {} {}",
            self.binary.display(),
            args.join(" ")
        );

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    InventoryError::Spawn(format!(
                        "{} not found. Install the AWS CLI.",
                        self.binary.display()
                    ))
                } else {
                    InventoryError::Spawn(e.to_string())
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if AUTH_FAILURE_MARKERS.iter().any(|m| stderr.contains(m)) {
                return Err(InventoryError::Unauthorized(stderr));
            }
            return Err(InventoryError::Command {
                status: output.status.to_string(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let records = parse_describe_instances(&stdout)?;

        tracing::debug!(
            "EC2 returned {} instance(s) for {}={}",
            records.len(),
            environment_tag,
            environment
        );
        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeInstancesOutput {
    #[serde(default)]
    reservations: Vec<Reservation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Reservation {
    #[serde(default)]
    instances: Vec<Ec2Instance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Ec2Instance {
    #[serde(default)]
    instance_id: Option<String>,
    #[serde(default)]
    private_ip_address: Option<String>,
    #[serde(default)]
    public_ip_address: Option<String>,
    #[serde(default)]
    tags: Vec<Ec2Tag>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Ec2Tag {
    key: String,
    #[serde(default)]
    value: String,
}

impl From<Ec2Instance> for InstanceRecord {
    fn from(instance: Ec2Instance) -> Self {
        Self {
            id: instance.instance_id.unwrap_or_default(),
            private_address: instance.private_ip_address,
            public_address: instance.public_ip_address,
            tags: instance
                .tags
                .into_iter()
                .map(|tag| (tag.key, tag.value))
                .collect(),
        }
    }
}

/// Decode `aws ec2 describe-instances --output json`
///
/// Instances are returned in reservation order. Records are not
/// validated here; the host assembler drops unusable ones.
pub fn parse_describe_instances(json: &str) -> Result<Vec<InstanceRecord>, InventoryError> {
    let output: DescribeInstancesOutput =
        serde_json::from_str(json).map_err(|e| InventoryError::Malformed(e.to_string()))?;

    Ok(output
        .reservations
        .into_iter()
        .flat_map(|r| r.instances)
        .map(InstanceRecord::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIBE_OUTPUT: &str = r#"{
        "Reservations": [
            {
                "ReservationId": "r-1",
                "Instances": [
                    {
                        "InstanceId": "i-aaa",
                        "PrivateIpAddress": "10.0.1.10",
                        "PublicIpAddress": "54.1.2.3",
                        "State": {"Name": "running"},
                        "Tags": [
                            {"Key": "Environment", "Value": "prod"},
                            {"Key": "tarmak_role", "Value": "bastion"}
                        ]
                    }
                ]
            },
            {
                "ReservationId": "r-2",
                "Instances": [
                    {
                        "InstanceId": "i-bbb",
                        "PrivateIpAddress": "10.0.2.20",
                        "Tags": [{"Key": "tarmak_role", "Value": "etcd,master"}]
                    },
                    {
                        "InstanceId": "i-ccc"
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_describe_instances() {
        let records = parse_describe_instances(DESCRIBE_OUTPUT).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].id, "i-aaa");
        assert_eq!(records[0].public_address.as_deref(), Some("54.1.2.3"));
        assert_eq!(records[0].tag("tarmak_role"), Some("bastion"));

        assert_eq!(records[1].id, "i-bbb");
        assert!(records[1].public_address.is_none());
        assert_eq!(records[1].tag("tarmak_role"), Some("etcd,master"));

        assert_eq!(records[2].id, "i-ccc");
        assert!(records[2].private_address.is_none());
        assert!(records[2].tags.is_empty());
    }

    #[test]
    fn test_parse_empty_reservations() {
        assert!(parse_describe_instances("{}").unwrap().is_empty());
        assert!(
            parse_describe_instances(r#"{"Reservations": []}"#)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_parse_malformed() {
        let err = parse_describe_instances("not json").unwrap_err();
        assert!(matches!(err, InventoryError::Malformed(_)));
    }

    #[test]
    fn test_build_args_filters_state_and_environment() {
        let args = AwsCliInventory::new().build_args("Environment", "staging");
        assert_eq!(&args[..2], ["ec2", "describe-instances"]);
        assert!(args.contains(&"Name=instance-state-name,Values=running,pending".to_string()));
        assert!(args.contains(&"Name=tag:Environment,Values=staging".to_string()));
        assert!(!args.contains(&"--profile".to_string()));
    }

    #[test]
    fn test_build_args_profile_and_region() {
        let args = AwsCliInventory::new()
            .with_profile("ops")
            .with_region("eu-west-1")
            .build_args("Env", "prod");
        let profile = args.iter().position(|a| a == "--profile").unwrap();
        assert_eq!(args[profile + 1], "ops");
        let region = args.iter().position(|a| a == "--region").unwrap();
        assert_eq!(args[region + 1], "eu-west-1");
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let inventory = AwsCliInventory::new().with_binary("/nonexistent/cluster-ssh-aws");
        let err = inventory
            .list_running_instances("Environment", "prod")
            .unwrap_err();
        assert!(matches!(err, InventoryError::Spawn(_)));
    }
}
