//! Encoding of the free-form cluster config
//!
//! The config map is collapsed into a single text column. Only round-trip
//! fidelity is part of the contract; the text format belongs to the codec.

use std::collections::HashMap;

use kubedeck_common::KubedeckError;
use kubedeck_common::error::MSG_PROCESS_CLUSTER_DATA;

/// Converts a cluster config map to and from its stored text form
pub trait ConfigCodec: Send + Sync {
    /// Encode a config map; the empty map must decode back to an empty map
    fn encode(&self, config: &HashMap<String, String>) -> Result<String, KubedeckError>;

    /// Decode stored text, failing with `DataCorruption` on malformed input
    fn decode(&self, text: &str) -> Result<HashMap<String, String>, KubedeckError>;
}

/// JSON object codec
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonConfigCodec;

impl ConfigCodec for JsonConfigCodec {
    fn encode(&self, config: &HashMap<String, String>) -> Result<String, KubedeckError> {
        serde_json::to_string(config).map_err(|e| {
            tracing::error!(error = %e, "Failed to encode cluster config");
            KubedeckError::persistence(MSG_PROCESS_CLUSTER_DATA)
        })
    }

    fn decode(&self, text: &str) -> Result<HashMap<String, String>, KubedeckError> {
        if text.trim().is_empty() {
            return Ok(HashMap::new());
        }
        // `null` is what an absent map encodes to in older records
        serde_json::from_str::<Option<HashMap<String, String>>>(text)
            .map(Option::unwrap_or_default)
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to decode cluster config");
                KubedeckError::DataCorruption
            })
    }
}
