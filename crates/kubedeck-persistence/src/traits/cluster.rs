//! Cluster repository trait
//!
//! Defines the interface for cluster registration storage. Every backend
//! returns the same `KubedeckError` messages so callers never depend on which
//! one is in use.

use async_trait::async_trait;

use kubedeck_common::Result;

use crate::model::Cluster;

/// Cluster registration persistence operations
///
/// Lookups that find nothing return `Ok(None)` or an empty vec. Only rows
/// with `active == true` are visible to the lookups, except for
/// [`find_all_with_inactive`](ClusterRepository::find_all_with_inactive).
#[async_trait]
pub trait ClusterRepository: Send + Sync {
    /// Insert a new cluster and write the assigned id back onto `cluster`
    async fn save(&self, cluster: &mut Cluster) -> Result<()>;

    /// Overwrite every field of the stored cluster with the same id
    async fn update(&self, cluster: &Cluster) -> Result<()>;

    /// Find an active cluster by name
    async fn find_one(&self, cluster_name: &str) -> Result<Option<Cluster>>;

    async fn find_one_active(&self, cluster_name: &str) -> Result<Option<Cluster>>;

    /// Find all active clusters, skipping rows that cannot be decoded
    async fn find_all(&self) -> Result<Vec<Cluster>>;

    async fn find_all_active(&self) -> Result<Vec<Cluster>>;

    /// Find every cluster including soft-deleted ones
    async fn find_all_with_inactive(&self) -> Result<Vec<Cluster>>;

    /// Find an active cluster by id
    async fn find_by_id(&self, id: i32) -> Result<Option<Cluster>>;

    /// Find the active clusters among `ids`, in no particular order
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Cluster>>;

    /// Physically remove the cluster row
    async fn delete(&self, cluster: &Cluster) -> Result<()>;

    /// Soft delete: mark the cluster inactive and persist it
    async fn mark_cluster_deleted(&self, cluster: &mut Cluster) -> Result<()>;

    /// Update only the connection error of a cluster
    async fn update_cluster_connection_status(
        &self,
        cluster_id: i32,
        error_in_connecting: &str,
    ) -> Result<()>;
}
