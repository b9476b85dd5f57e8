//! Persistence traits for the cluster registry
//!
//! The repository contract is backend-agnostic: the file-based
//! implementation in [`crate::embedded`] is one backend, and a relational
//! backend implements the same trait. The choice is made at wiring time.

pub mod cluster;

pub use cluster::ClusterRepository;
