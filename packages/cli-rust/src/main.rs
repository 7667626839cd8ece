//! cluster-ssh - SSH access to the hosts of a cluster
//!
//! Binary entry point; the implementation lives in the library.

fn main() -> anyhow::Result<()> {
    cluster_ssh::run()
}
