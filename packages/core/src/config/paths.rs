//! XDG-style path resolution for cluster-ssh
//!
//! Everything cluster-ssh keeps on disk lives under one directory:
//! - Linux/macOS: `~/.config/cluster-ssh/`
//! - Windows: `%APPDATA%\cluster-ssh\`
//!
//! Per-environment and per-cluster state (private keys, generated SSH
//! config, known hosts) is nested below it.

use std::path::PathBuf;

/// Get the configuration directory path
///
/// - Linux: `~/.config/cluster-ssh/`
/// - macOS: `~/.config/cluster-ssh/` (XDG-style, not ~/Library)
/// - Windows: `%APPDATA%\cluster-ssh\`
pub fn get_config_dir() -> Option<PathBuf> {
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    {
        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".config").join("cluster-ssh"))
    }
    #[cfg(target_os = "windows")]
    {
        directories::BaseDirs::new()
            .and_then(|dirs| dirs.config_dir().map(|d| d.to_path_buf()))
            .map(|d| d.join("cluster-ssh"))
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        None
    }
}

/// Get the full path to the config file
///
/// Returns: `{config_dir}/config.json`
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join("config.json"))
}

/// Directory holding state shared by every cluster of one environment
///
/// Returns: `{config_dir}/{environment}`
pub fn get_environment_dir(environment: &str) -> Option<PathBuf> {
    get_config_dir().map(|d| d.join(environment))
}

/// Per-cluster local config directory
///
/// Returns: `{config_dir}/{environment}-{cluster}`
pub fn get_cluster_dir(environment: &str, cluster: &str) -> Option<PathBuf> {
    get_config_dir().map(|d| d.join(format!("{environment}-{cluster}")))
}
