//! SSH client config generation
//!
//! Renders one `host` stanza per discovered host and writes the combined
//! file that `ssh -F` (or an `Include`) consumes. Hosts without a public
//! address are reached through the host aliased `bastion` in the same file.

use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use ssh2_config::{ParseRule, SshConfig};

use super::entity::Host;
use super::error::HostError;
use crate::cluster::Cluster;

/// Alias private hosts jump through
pub const BASTION_ALIAS: &str = "bastion";

/// What to do when private hosts exist but nothing is aliased `bastion`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BastionPolicy {
    /// Render anyway and log a warning
    #[default]
    Permissive,
    /// Fail with [`HostError::MissingBastion`]
    Require,
}

/// Render the stanza for one host
pub fn render_stanza<H: Host + ?Sized>(host: &H, cluster: &dyn Cluster) -> Result<String, HostError> {
    let known_hosts = stanza_path(cluster.ssh_host_keys_path()?)?;
    let control_dir = stanza_path(cluster.config_path()?)?;
    let identity_file = stanza_path(cluster.ssh_private_key_path()?)?;

    let mut names: Vec<&str> = host.aliases().iter().map(String::as_str).collect();
    names.push(host.id());

    let mut config = format!(
        "host {names}
    User {user}
    Hostname {hostname}

    # use custom host key file per cluster
    UserKnownHostsFile {known_hosts}
    StrictHostKeyChecking no

    # enable connection multiplexing
    ControlPath {control_dir}/ssh-control-%r@%h:%p
    ControlMaster auto
    ControlPersist 10m

    # keep connections alive
    ServerAliveInterval 60
    IdentitiesOnly yes
    IdentityFile {identity_file}
",
        names = names.join(" "),
        user = host.user(),
        hostname = host.hostname(),
    );

    if !host.hostname_public() {
        let ssh_config = stanza_path(cluster.ssh_config_path()?)?;
        config.push_str(&format!(
            "    ProxyCommand ssh -F {} -W {}:%p {}\n",
            ssh_config,
            host.hostname(),
            BASTION_ALIAS
        ));
    }

    config.push('\n');
    Ok(config)
}

/// Paths are written unquoted, so whitespace would split the argument
fn stanza_path(path: PathBuf) -> Result<String, HostError> {
    let text = path.display().to_string();
    if text.chars().any(char::is_whitespace) {
        return Err(HostError::ClusterPath(format!(
            "Path '{text}' contains whitespace and cannot be used in an SSH config"
        )));
    }
    Ok(text)
}

/// Check that private hosts have a bastion to jump through
///
/// Returns the number of hosts that need one when no host declares the
/// `bastion` alias (or id), `None` otherwise.
pub fn missing_bastion<'a, H>(hosts: impl IntoIterator<Item = &'a H>) -> Option<usize>
where
    H: Host + ?Sized + 'a,
{
    let mut private = 0;
    let mut has_bastion = false;

    for host in hosts {
        if !host.hostname_public() {
            private += 1;
        }
        if host.id() == BASTION_ALIAS || host.aliases().iter().any(|a| a == BASTION_ALIAS) {
            has_bastion = true;
        }
    }

    (private > 0 && !has_bastion).then_some(private)
}

/// Render the combined SSH config for a host list, in list order
pub fn render_ssh_config<'a, H>(
    hosts: impl IntoIterator<Item = &'a H>,
    policy: BastionPolicy,
) -> Result<String, HostError>
where
    H: Host + ?Sized + 'a,
{
    let hosts: Vec<&H> = hosts.into_iter().collect();

    if let Some(count) = missing_bastion(hosts.iter().copied()) {
        match policy {
            BastionPolicy::Require => return Err(HostError::MissingBastion(count)),
            BastionPolicy::Permissive => tracing::warn!(
                "{} host(s) proxy through '{}' but no host has that alias",
                count,
                BASTION_ALIAS
            ),
        }
    }

    let mut config = String::new();
    for host in hosts {
        config.push_str(&host.ssh_config()?);
    }
    Ok(config)
}

/// Write a generated SSH config, replacing any previous contents
///
/// Creates the parent directory (mode 700 on Unix) and leaves the file
/// at mode 600.
pub fn write_ssh_config(path: &Path, contents: &str) -> Result<(), HostError> {
    if let Some(dir) = path.parent() {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                HostError::SshConfigWrite(format!("Failed to create {}: {}", dir.display(), e))
            })?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(dir, fs::Permissions::from_mode(0o700)).map_err(|e| {
                    HostError::SshConfigWrite(format!(
                        "Failed to set permissions on {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
            }
        }
    }

    let mut file = File::create(path).map_err(|e| {
        HostError::SshConfigWrite(format!("Failed to create {}: {}", path.display(), e))
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|e| {
            HostError::SshConfigWrite(format!(
                "Failed to set permissions on {}: {}",
                path.display(),
                e
            ))
        })?;
    }

    file.write_all(contents.as_bytes()).map_err(|e| {
        HostError::SshConfigWrite(format!("Failed to write {}: {}", path.display(), e))
    })?;

    tracing::debug!("Wrote SSH config to {}", path.display());
    Ok(())
}

fn parse_ssh_config_file(path: &Path) -> Result<SshConfig, HostError> {
    let file = File::open(path).map_err(|e| {
        HostError::SshConfigRead(format!("Failed to open {}: {}", path.display(), e))
    })?;
    let mut reader = BufReader::new(file);

    SshConfig::default()
        .parse(&mut reader, ParseRule::ALLOW_UNKNOWN_FIELDS)
        .map_err(|e| HostError::SshConfigRead(format!("Failed to parse {}: {e}", path.display())))
}

/// Names declared by `host` lines of an SSH config file, in file order
///
/// Wildcard and negated patterns are skipped.
pub fn configured_host_names(path: &Path) -> Result<Vec<String>, HostError> {
    let config = parse_ssh_config_file(path)?;

    let mut names = Vec::new();
    for host in config.get_hosts() {
        for clause in &host.pattern {
            let name = clause.pattern.as_str();
            if clause.negated || name.contains('*') || name.contains('?') {
                continue;
            }
            names.push(name.to_string());
        }
    }
    Ok(names)
}

/// Where a name in a generated SSH config leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHost {
    pub hostname: String,
    pub user: Option<String>,
}

/// Look up the hostname and user a name resolves to in an SSH config file
///
/// Returns `None` when the file has no `Hostname` for the name.
pub fn resolve_ssh_host(path: &Path, name: &str) -> Result<Option<ResolvedHost>, HostError> {
    let config = parse_ssh_config_file(path)?;
    let params = config.query(name);

    Ok(params.host_name.map(|hostname| ResolvedHost {
        hostname,
        user: params.user,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::LocalCluster;
    use crate::host::classify;
    use crate::host::entity::ClusterHost;

    fn cluster() -> LocalCluster {
        LocalCluster::new("prod", "hub")
            .with_base_dir("/srv/cssh")
            .with_private_key_path("/srv/cssh/prod/id_rsa")
    }

    const PRIVATE_WORKER: &str = "host worker-2 i-123
    User centos
    Hostname 10.0.0.5

    # use custom host key file per cluster
    UserKnownHostsFile /srv/cssh/prod-hub/ssh_known_hosts
    StrictHostKeyChecking no

    # enable connection multiplexing
    ControlPath /srv/cssh/prod-hub/ssh-control-%r@%h:%p
    ControlMaster auto
    ControlPersist 10m

    # keep connections alive
    ServerAliveInterval 60
    IdentitiesOnly yes
    IdentityFile /srv/cssh/prod/id_rsa
    ProxyCommand ssh -F /srv/cssh/prod-hub/ssh_config -W 10.0.0.5:%p bastion

";

    #[test]
    fn test_private_host_stanza() {
        let cluster = cluster();
        let host = ClusterHost::new(&cluster, "i-123", "10.0.0.5", false, "centos")
            .with_roles(["worker"])
            .with_aliases(vec!["worker-2".to_string()]);

        let stanza = host.ssh_config().unwrap();
        assert_eq!(stanza, PRIVATE_WORKER);
        assert_eq!(stanza.lines().next(), Some("host worker-2 i-123"));
    }

    #[test]
    fn test_public_host_has_no_proxy_command() {
        let cluster = cluster();
        let host = ClusterHost::new(&cluster, "i-1", "54.0.0.1", true, "centos")
            .with_roles(["bastion"])
            .with_aliases(vec!["bastion".to_string()]);

        let stanza = host.ssh_config().unwrap();
        assert!(stanza.starts_with("host bastion i-1\n"));
        assert!(stanza.contains("    Hostname 54.0.0.1\n"));
        assert!(!stanza.contains("ProxyCommand"));
        assert!(stanza.ends_with("IdentityFile /srv/cssh/prod/id_rsa\n\n"));
    }

    #[test]
    fn test_host_without_aliases_matches_id_only() {
        let cluster = cluster();
        let host = ClusterHost::new(&cluster, "i-9", "10.0.0.9", false, "centos");
        let stanza = host.ssh_config().unwrap();
        assert!(stanza.starts_with("host i-9\n"));
    }

    struct BrokenCluster;

    impl Cluster for BrokenCluster {
        fn environment(&self) -> &str {
            "prod"
        }

        fn name(&self) -> &str {
            "hub"
        }

        fn config_path(&self) -> Result<std::path::PathBuf, HostError> {
            Err(HostError::ClusterPath("no home directory".to_string()))
        }

        fn ssh_private_key_path(&self) -> Result<std::path::PathBuf, HostError> {
            Err(HostError::ClusterPath("no home directory".to_string()))
        }
    }

    #[test]
    fn test_cluster_path_failure_propagates() {
        let cluster = BrokenCluster;
        let host = ClusterHost::new(&cluster, "i-1", "10.0.0.1", false, "centos");
        let err = host.ssh_config().unwrap_err();
        assert!(matches!(err, HostError::ClusterPath(_)));
    }

    fn sample_hosts(cluster: &LocalCluster) -> Vec<ClusterHost<'_>> {
        classify(vec![
            ClusterHost::new(cluster, "i-1", "54.0.0.1", true, "centos").with_roles(["bastion"]),
            ClusterHost::new(cluster, "i-2", "10.0.0.2", false, "centos")
                .with_roles(["master", "etcd"]),
            ClusterHost::new(cluster, "i-3", "10.0.0.3", false, "centos").with_roles(["worker"]),
            ClusterHost::new(cluster, "i-123", "10.0.0.5", false, "centos")
                .with_roles(["worker"]),
        ])
    }

    #[test]
    fn test_paths_with_whitespace_are_rejected() {
        let cluster = LocalCluster::new("prod", "hub").with_base_dir("/home/J Doe/.config/cluster-ssh");
        let host = ClusterHost::new(&cluster, "i-123", "10.0.0.2", false, "centos");
        let err = render_stanza(&host, &cluster).unwrap_err();
        assert!(matches!(err, HostError::ClusterPath(ref msg) if msg.contains("J Doe")));

        let cluster = LocalCluster::new("prod", "hub")
            .with_base_dir("/srv/cssh")
            .with_private_key_path("/keys/my key.pem");
        let host = ClusterHost::new(&cluster, "i-124", "54.0.0.9", true, "centos");
        assert!(matches!(
            host.ssh_config(),
            Err(HostError::ClusterPath(_))
        ));
    }

    #[test]
    fn test_render_ssh_config_concatenates_in_order() {
        let cluster = cluster();
        let hosts = sample_hosts(&cluster);
        let config = render_ssh_config(&hosts, BastionPolicy::Require).unwrap();

        let headers: Vec<&str> = config.lines().filter(|l| l.starts_with("host ")).collect();
        assert_eq!(
            headers,
            vec![
                "host bastion i-1",
                "host master etcd i-2",
                "host worker-1 i-3",
                "host worker-2 i-123",
            ]
        );
        assert_eq!(config.matches("ProxyCommand").count(), 3);
        assert!(config.ends_with(PRIVATE_WORKER));

        let again = render_ssh_config(&hosts, BastionPolicy::Require).unwrap();
        assert_eq!(config, again);
    }

    #[test]
    fn test_missing_bastion_policy() {
        let cluster = cluster();
        let hosts = classify(vec![
            ClusterHost::new(&cluster, "i-2", "10.0.0.2", false, "centos").with_roles(["master"]),
            ClusterHost::new(&cluster, "i-3", "10.0.0.3", false, "centos").with_roles(["worker"]),
        ]);

        assert_eq!(missing_bastion(&hosts), Some(2));
        let err = render_ssh_config(&hosts, BastionPolicy::Require).unwrap_err();
        assert!(matches!(err, HostError::MissingBastion(2)));

        let config = render_ssh_config(&hosts, BastionPolicy::Permissive).unwrap();
        assert_eq!(config.matches("ProxyCommand").count(), 2);
    }

    #[test]
    fn test_public_only_cluster_needs_no_bastion() {
        let cluster = cluster();
        let hosts = classify(vec![
            ClusterHost::new(&cluster, "i-1", "54.0.0.1", true, "centos").with_roles(["worker"]),
        ]);
        assert_eq!(missing_bastion(&hosts), None);
        assert!(render_ssh_config(&hosts, BastionPolicy::Require).is_ok());
    }

    #[test]
    fn test_written_config_is_readable_by_ssh_parser() {
        let dir = tempfile::tempdir().unwrap();
        let cluster = LocalCluster::new("prod", "hub").with_base_dir(dir.path());
        let hosts = sample_hosts(&cluster);
        let config = render_ssh_config(&hosts, BastionPolicy::Require).unwrap();

        let path = cluster.ssh_config_path().unwrap();
        write_ssh_config(&path, &config).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), config);

        let names = configured_host_names(&path).unwrap();
        for expected in ["bastion", "i-1", "master", "etcd", "worker-2", "i-123"] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }

        let resolved = resolve_ssh_host(&path, "worker-2").unwrap().unwrap();
        assert_eq!(resolved.hostname, "10.0.0.5");
        assert_eq!(resolved.user.as_deref(), Some("centos"));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_ssh_config_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prod-hub").join("ssh_config");
        write_ssh_config(&path, "host a\n").unwrap();
        write_ssh_config(&path, "host b\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "host b\n");
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        let dir_mode = fs::metadata(path.parent().unwrap())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(dir_mode & 0o777, 0o700);
    }
}
