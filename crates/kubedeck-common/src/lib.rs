//! Kubedeck Common - Shared types and utilities
//!
//! This crate provides the foundational pieces used across Kubedeck crates:
//! - The repository error taxonomy
//! - Location helpers for the local cluster store

pub mod error;
pub mod utils;

// Re-exports for convenience
pub use error::{KubedeckError, Result};
pub use utils::{CLUSTER_DB_DIR, CLUSTER_DB_FILE, cluster_db_dir, cluster_db_path, home_dir};
