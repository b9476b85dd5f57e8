//! Utility functions for Kubedeck
//!
//! File-system location helpers for the local cluster store.

use std::path::{Path, PathBuf};

/// Directory holding the cluster store, relative to the user's home
pub const CLUSTER_DB_DIR: &str = ".kube/.kubedeck";

/// File name of the cluster store
pub const CLUSTER_DB_FILE: &str = "cluster.db";

/// Get the invoking user's home directory from `HOME`
///
/// Returns `None` when the variable is unset or empty.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Directory of the cluster store under the given home directory
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use kubedeck_common::cluster_db_dir;
///
/// let dir = cluster_db_dir(Path::new("/home/ops"));
/// assert_eq!(dir, Path::new("/home/ops/.kube/.kubedeck"));
/// ```
pub fn cluster_db_dir(home: &Path) -> PathBuf {
    home.join(CLUSTER_DB_DIR)
}

/// Full path of the cluster store file under the given home directory
pub fn cluster_db_path(home: &Path) -> PathBuf {
    cluster_db_dir(home).join(CLUSTER_DB_FILE)
}
