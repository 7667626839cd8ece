//! Role classification and alias assignment
//!
//! Every role membership gets an alias `{role}-{n}`, where `n` counts the
//! hosts holding that role in inventory order, starting at 1. A role held
//! by exactly one host is aliased by its bare name instead.

use std::collections::{HashMap, HashSet};

use super::entity::{ClusterHost, Host};

/// Compute aliases for a list of per-host role lists
///
/// Returns one alias list per input, in input order. Each alias list has
/// one entry per distinct role of that host. Existing aliases play no
/// part, so the result depends only on the roles and their order.
pub fn assign_aliases<R: AsRef<[String]>>(role_lists: &[R]) -> Vec<Vec<String>> {
    let mut members: HashMap<&str, usize> = HashMap::new();

    let numbered: Vec<Vec<(&str, usize)>> = role_lists
        .iter()
        .map(|roles| {
            let mut seen = HashSet::new();
            roles
                .as_ref()
                .iter()
                .map(String::as_str)
                .filter(|role| seen.insert(*role))
                .map(|role| {
                    let count = members.entry(role).or_insert(0);
                    *count += 1;
                    (role, *count)
                })
                .collect()
        })
        .collect();

    numbered
        .into_iter()
        .map(|roles| {
            roles
                .into_iter()
                .map(|(role, n)| {
                    if members.get(role) == Some(&1) {
                        role.to_string()
                    } else {
                        format!("{role}-{n}")
                    }
                })
                .collect()
        })
        .collect()
}

/// Assign aliases to every host
///
/// Hosts keep their order; hosts without roles get no aliases.
pub fn classify(hosts: Vec<ClusterHost<'_>>) -> Vec<ClusterHost<'_>> {
    let role_lists: Vec<&[String]> = hosts.iter().map(|h| h.roles()).collect();
    let aliases = assign_aliases(&role_lists);

    hosts
        .into_iter()
        .zip(aliases)
        .map(|(host, aliases)| host.with_aliases(aliases))
        .collect()
}
