// File-based cluster repository on top of the embedded SQLite store
// Used by disconnected installs that have no central database

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ActiveValue::NotSet, ColumnTrait, Condition, Set};
use tracing::{debug, error, warn};

use kubedeck_common::error::{
    MSG_DELETE_CLUSTER, MSG_FETCH_CLUSTER, MSG_SAVE_CLUSTER, MSG_UPDATE_CLUSTER,
    MSG_UPDATE_CLUSTER_STATUS,
};
use kubedeck_common::{KubedeckError, Result};

use crate::codec::{ConfigCodec, JsonConfigCodec};
use crate::entity::cluster;
use crate::model::{AuditLog, Cluster};
use crate::store::EmbeddedStore;
use crate::traits::ClusterRepository;

/// Upper bound on ids bound into one `IN (...)` list
const ID_BATCH_SIZE: usize = 500;

/// Cluster repository backed by the local store file
///
/// Translates between [`Cluster`] and the `cluster` entity, encoding the
/// config map with `C`. Soft-deleted rows stay in the file but are hidden
/// from every active lookup.
pub struct FileBasedClusterRepository<C = JsonConfigCodec> {
    store: Arc<EmbeddedStore>,
    codec: C,
}

impl FileBasedClusterRepository {
    pub fn new(store: Arc<EmbeddedStore>) -> Self {
        Self::with_codec(store, JsonConfigCodec)
    }
}

impl<C: ConfigCodec> FileBasedClusterRepository<C> {
    pub fn with_codec(store: Arc<EmbeddedStore>, codec: C) -> Self {
        Self { store, codec }
    }

    /// Get the underlying store
    pub fn store(&self) -> &EmbeddedStore {
        &self.store
    }

    /// Convert a cluster into a full-row active model
    ///
    /// The id is left unset: inserts get one from the store and updates
    /// select the row by filter instead.
    fn to_entity(&self, cluster: &Cluster) -> Result<cluster::ActiveModel> {
        let config = self.codec.encode(&cluster.config)?;
        Ok(cluster::ActiveModel {
            id: NotSet,
            cluster_name: Set(cluster.cluster_name.clone()),
            server_url: Set(cluster.server_url.clone()),
            active: Set(Some(cluster.active)),
            config: Set(config),
            k8s_version: Set(cluster.k8s_version.clone()),
            error_in_connecting: Set(cluster.error_in_connecting.clone()),
            created_on: Set(cluster.audit_log.created_on),
            created_by: Set(cluster.audit_log.created_by),
            updated_on: Set(cluster.audit_log.updated_on),
            updated_by: Set(cluster.audit_log.updated_by),
        })
    }

    /// Convert a stored row into a cluster
    ///
    /// A NULL `active` column reads as inactive.
    pub fn to_model(&self, entity: cluster::Model) -> Result<Cluster> {
        let config = self.codec.decode(&entity.config)?;
        Ok(Cluster {
            id: Some(entity.id),
            cluster_name: entity.cluster_name,
            server_url: entity.server_url,
            config,
            k8s_version: entity.k8s_version,
            error_in_connecting: entity.error_in_connecting,
            active: entity.active.unwrap_or(false),
            audit_log: AuditLog {
                created_on: entity.created_on,
                created_by: entity.created_by,
                updated_on: entity.updated_on,
                updated_by: entity.updated_by,
            },
        })
    }

    /// Decode a batch, dropping rows whose config cannot be decoded
    fn to_models(&self, entities: Vec<cluster::Model>) -> Vec<Cluster> {
        entities
            .into_iter()
            .filter_map(|entity| {
                let id = entity.id;
                match self.to_model(entity) {
                    Ok(cluster) => Some(cluster),
                    Err(e) => {
                        error!(
                            cluster_id = id,
                            error = %e,
                            "Skipping cluster that cannot be decoded"
                        );
                        None
                    }
                }
            })
            .collect()
    }

    fn active() -> Condition {
        Condition::all().add(cluster::Column::Active.eq(true))
    }

    fn by_id(id: i32) -> Condition {
        Condition::all().add(cluster::Column::Id.eq(id))
    }

    /// Fetch the first row matching `filter` and decode it
    async fn find_single(&self, filter: Condition) -> Result<Option<Cluster>> {
        let entity = self
            .store
            .find_where::<cluster::Entity>(filter, Some(1))
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to find cluster");
                KubedeckError::persistence(MSG_FETCH_CLUSTER)
            })?
            .into_iter()
            .next();

        let Some(entity) = entity else {
            return Ok(None);
        };
        let id = entity.id;
        self.to_model(entity).map(Some).map_err(|e| {
            error!(cluster_id = id, error = %e, "Failed to convert cluster data to model");
            KubedeckError::persistence(MSG_FETCH_CLUSTER)
        })
    }

    /// Fetch every row matching `filter`, skipping undecodable ones
    async fn find_many(&self, filter: Condition) -> Result<Vec<Cluster>> {
        let entities = self
            .store
            .find_where::<cluster::Entity>(filter, None)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to find cluster data");
                KubedeckError::persistence(MSG_FETCH_CLUSTER)
            })?;
        Ok(self.to_models(entities))
    }
}

#[async_trait]
impl<C: ConfigCodec + 'static> ClusterRepository for FileBasedClusterRepository<C> {
    async fn save(&self, cluster: &mut Cluster) -> Result<()> {
        if let Some(id) = cluster.id {
            warn!(cluster_id = id, "Refusing to save a cluster that already has an id");
            return Err(KubedeckError::persistence(MSG_SAVE_CLUSTER));
        }

        let entity = self.to_entity(cluster)?;
        let id = self.store.insert(entity).await.map_err(|e| {
            error!(cluster_name = %cluster.cluster_name, error = %e, "Failed to insert cluster");
            KubedeckError::persistence(MSG_SAVE_CLUSTER)
        })?;

        cluster.id = Some(id);
        debug!(cluster_id = id, cluster_name = %cluster.cluster_name, "Saved cluster");
        Ok(())
    }

    async fn update(&self, cluster: &Cluster) -> Result<()> {
        let Some(id) = cluster.id else {
            warn!(cluster_name = %cluster.cluster_name, "Cannot update a cluster without an id");
            return Err(KubedeckError::persistence(MSG_UPDATE_CLUSTER));
        };

        let entity = self.to_entity(cluster).map_err(|e| {
            error!(cluster_id = id, error = %e, "Failed to convert cluster to entity");
            KubedeckError::persistence(MSG_UPDATE_CLUSTER)
        })?;
        let affected = self
            .store
            .update_where(entity, Self::by_id(id))
            .await
            .map_err(|e| {
                error!(cluster_id = id, error = %e, "Failed to update cluster");
                KubedeckError::persistence(MSG_UPDATE_CLUSTER)
            })?;

        if affected == 0 {
            warn!(cluster_id = id, "No stored cluster matched the update");
        }
        Ok(())
    }

    async fn find_one(&self, cluster_name: &str) -> Result<Option<Cluster>> {
        self.find_one_active(cluster_name).await
    }

    async fn find_one_active(&self, cluster_name: &str) -> Result<Option<Cluster>> {
        self.find_single(Self::active().add(cluster::Column::ClusterName.eq(cluster_name)))
            .await
    }

    async fn find_all(&self) -> Result<Vec<Cluster>> {
        self.find_all_active().await
    }

    async fn find_all_active(&self) -> Result<Vec<Cluster>> {
        self.find_many(Self::active()).await
    }

    async fn find_all_with_inactive(&self) -> Result<Vec<Cluster>> {
        self.find_many(Condition::all()).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Cluster>> {
        self.find_single(Self::active().add(cluster::Column::Id.eq(id)))
            .await
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Cluster>> {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let mut clusters = Vec::new();
        for chunk in ids.chunks(ID_BATCH_SIZE) {
            let filter = Self::active().add(cluster::Column::Id.is_in(chunk.iter().copied()));
            clusters.extend(self.find_many(filter).await?);
        }
        Ok(clusters)
    }

    async fn delete(&self, cluster: &Cluster) -> Result<()> {
        let Some(id) = cluster.id else {
            warn!(cluster_name = %cluster.cluster_name, "Cannot delete a cluster without an id");
            return Err(KubedeckError::persistence(MSG_DELETE_CLUSTER));
        };

        let removed = self
            .store
            .delete_where::<cluster::Entity>(Self::by_id(id))
            .await
            .map_err(|e| {
                error!(cluster_id = id, error = %e, "Failed to delete cluster");
                KubedeckError::persistence(MSG_DELETE_CLUSTER)
            })?;

        if removed == 0 {
            warn!(cluster_id = id, "No stored cluster matched the delete");
        }
        Ok(())
    }

    async fn mark_cluster_deleted(&self, cluster: &mut Cluster) -> Result<()> {
        cluster.active = false;
        self.update(cluster).await
    }

    async fn update_cluster_connection_status(
        &self,
        cluster_id: i32,
        error_in_connecting: &str,
    ) -> Result<()> {
        let values = cluster::ActiveModel {
            error_in_connecting: Set(error_in_connecting.to_string()),
            ..Default::default()
        };
        self.store
            .update_where(values, Self::by_id(cluster_id))
            .await
            .map_err(|e| {
                error!(
                    cluster_id,
                    error_in_connecting,
                    error = %e,
                    "Failed to update cluster connection status"
                );
                KubedeckError::persistence(MSG_UPDATE_CLUSTER_STATUS)
            })?;
        Ok(())
    }
}
