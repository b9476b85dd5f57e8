//! Domain model types for the cluster registry
//!
//! These types are what callers of the repository see. They are decoupled
//! from the on-disk entity in [`crate::entity::cluster`].

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Audit metadata carried through the repository untouched
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub created_on: NaiveDateTime,
    pub created_by: i32,
    pub updated_on: NaiveDateTime,
    pub updated_by: i32,
}

impl AuditLog {
    /// Audit stamp for a record created and last touched by `user_id` at `at`
    pub fn created_by(user_id: i32, at: NaiveDateTime) -> Self {
        Self {
            created_on: at,
            created_by: user_id,
            updated_on: at,
            updated_by: user_id,
        }
    }

    /// Record a modification, keeping the creation stamp
    pub fn touch(&mut self, user_id: i32, at: NaiveDateTime) {
        self.updated_on = at;
        self.updated_by = user_id;
    }
}

/// A registered cluster
///
/// `id` is `None` until the store assigns one on the first save.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub id: Option<i32>,
    pub cluster_name: String,
    pub server_url: String,
    pub config: HashMap<String, String>,
    pub k8s_version: String,
    pub error_in_connecting: String,
    pub active: bool,
    #[serde(flatten)]
    pub audit_log: AuditLog,
}

impl Cluster {
    /// New active cluster with no id, empty config and default audit fields
    pub fn new(cluster_name: impl Into<String>, server_url: impl Into<String>) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            server_url: server_url.into(),
            active: true,
            ..Default::default()
        }
    }

    pub fn with_config<K, V>(mut self, config: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.config = config
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn with_audit_log(mut self, audit_log: AuditLog) -> Self {
        self.audit_log = audit_log;
        self
    }
}
