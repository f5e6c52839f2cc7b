//! Provenance/custody collaborator.
//!
//! Registering a model creates one provenance record (a stable piece id plus a
//! retrieval URL) whose identifiers are copied into the metadata of every
//! ingested view.

use crate::error::{Error, Result, Service};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What the custody service is told about a model file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub title: String,
    pub file_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    pub piece_id: String,
    pub url: String,
}

pub trait ProvenanceService: Send + Sync {
    fn create_record(&self, metadata: &RecordMetadata) -> Result<ProvenanceRecord>;
    fn fetch_record(&self, piece_id: &str) -> Result<String>;
}

/// Process-local provenance store issuing sequential piece ids.
pub struct InMemoryProvenance {
    base_url: String,
    records: Mutex<HashMap<String, (RecordMetadata, String)>>,
}

impl InMemoryProvenance {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn metadata(&self, piece_id: &str) -> Option<RecordMetadata> {
        self.records.lock().get(piece_id).map(|(m, _)| m.clone())
    }
}

impl Default for InMemoryProvenance {
    fn default() -> Self {
        Self::new("memory://pieces")
    }
}

impl ProvenanceService for InMemoryProvenance {
    fn create_record(&self, metadata: &RecordMetadata) -> Result<ProvenanceRecord> {
        let mut records = self.records.lock();
        let piece_id = format!("piece-{:06}", records.len() + 1);
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), piece_id);
        records.insert(piece_id.clone(), (metadata.clone(), url.clone()));
        Ok(ProvenanceRecord { piece_id, url })
    }

    fn fetch_record(&self, piece_id: &str) -> Result<String> {
        self.records
            .lock()
            .get(piece_id)
            .map(|(_, url)| url.clone())
            .ok_or_else(|| {
                Error::external(Service::Provenance, format!("no record for {piece_id}"))
            })
    }
}
