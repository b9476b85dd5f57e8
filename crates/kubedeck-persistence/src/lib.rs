//! Kubedeck Persistence - Cluster registry storage layer
//!
//! This crate provides:
//! - The `ClusterRepository` trait, the backend-agnostic contract
//! - SeaORM entity for the `cluster` table
//! - The embedded single-file store (SQLite) with schema bootstrap
//! - The file-based repository that translates entities to domain models
//! - The config codec used to store the free-form cluster config

pub mod codec;
pub mod embedded;
pub mod entity;
pub mod model;
pub mod store;
pub mod traits;

// Re-export sea-orm for convenience
pub use sea_orm;

// Re-export entity prelude
pub use entity::prelude::*;

// Re-export persistence traits
pub use traits::ClusterRepository;

// Re-export embedded backend
pub use embedded::FileBasedClusterRepository;
pub use store::{EmbeddedStore, StoreOptions};

pub use codec::{ConfigCodec, JsonConfigCodec};

// Re-export model types
pub use model::{AuditLog, Cluster};
