//! Error types for Kubedeck
//!
//! `KubedeckError` is the only error type that crosses the repository
//! boundary. Storage engine errors are logged where they happen and replaced
//! by one of these variants, so callers see the same messages whichever
//! backend is in use.

/// Fixed messages returned at the repository boundary
pub const MSG_PROCESS_CLUSTER_DATA: &str = "failed to process cluster data";
pub const MSG_SAVE_CLUSTER: &str = "failed to save cluster";
pub const MSG_UPDATE_CLUSTER: &str = "failed to update cluster";
pub const MSG_FETCH_CLUSTER: &str = "failed to fetch cluster";
pub const MSG_DELETE_CLUSTER: &str = "failed to delete cluster";
pub const MSG_UPDATE_CLUSTER_STATUS: &str = "failed to update cluster status";

/// Application-specific error types
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum KubedeckError {
    /// The store could not be opened or its schema could not be created
    #[error("cluster store initialization failed: {0}")]
    InitializationFailure(String),

    /// Stored cluster config text could not be decoded
    #[error("failed to process cluster data")]
    DataCorruption,

    /// Any other storage failure, described by a backend-agnostic message
    #[error("{0}")]
    PersistenceFailure(String),
}

impl KubedeckError {
    pub fn persistence(message: &str) -> Self {
        KubedeckError::PersistenceFailure(message.to_string())
    }

    pub fn initialization(message: impl Into<String>) -> Self {
        KubedeckError::InitializationFailure(message.into())
    }

    /// Whether the process can keep running after this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, KubedeckError::InitializationFailure(_))
    }
}

pub type Result<T> = std::result::Result<T, KubedeckError>;
