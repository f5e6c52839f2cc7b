//! Perceptual image-signature index collaborator.
//!
//! The pipeline only relies on [`SignatureMatcher`]: ingest rasters with
//! metadata, search by raster, and map a signature back to its metadata.
//! [`InMemoryIndex`] is a reference implementation built on a coarse
//! grid-of-means signature and the normalized distance
//! `|a - b| / (|a| + |b|)`, which lies in `[0, 1]`.

mod grid;

pub use grid::{grid_signature, normalized_distance};

use crate::error::Result;
use crate::image::Raster;
use log::debug;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

pub type SignatureId = u64;

/// Metadata stored next to each ingested signature.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Model the image was rendered from.
    pub model_id: String,
    /// View stem, e.g. `"0.1.front.0"`.
    pub view: String,
    /// Provenance piece the model was registered under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub piece_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub piece_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

/// One search hit. Smaller distances are more similar.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SignatureMatch {
    pub signature_id: SignatureId,
    pub distance: f64,
}

/// Contract for a persistent perceptual-signature index.
pub trait SignatureMatcher: Send + Sync {
    fn ingest(&self, raster: &Raster, metadata: ImageMetadata) -> Result<SignatureId>;

    /// Nearest neighbours of `raster`, ordered by ascending distance.
    ///
    /// The cutoff is advisory; implementations may return hits above it.
    fn search(&self, raster: &Raster, distance_cutoff: f64) -> Result<Vec<SignatureMatch>>;

    fn metadata(&self, id: SignatureId) -> Option<ImageMetadata>;

    /// Model identity a signature was ingested for.
    fn model_of(&self, id: SignatureId) -> Option<String> {
        self.metadata(id).map(|m| m.model_id)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexParams {
    /// Signature grid is `grid × grid` cell means.
    pub grid: usize,
    /// Upper bound on hits returned per search.
    pub max_results: usize,
}

impl Default for IndexParams {
    fn default() -> Self {
        Self {
            grid: 16,
            max_results: 10,
        }
    }
}

struct Entry {
    signature: Vec<f32>,
    metadata: ImageMetadata,
}

/// Brute-force in-memory signature index.
#[derive(Default)]
pub struct InMemoryIndex {
    params: IndexParams,
    entries: RwLock<Vec<Entry>>,
}

impl InMemoryIndex {
    pub fn new(params: IndexParams) -> Self {
        Self {
            params,
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SignatureMatcher for InMemoryIndex {
    fn ingest(&self, raster: &Raster, metadata: ImageMetadata) -> Result<SignatureId> {
        let signature = grid_signature(raster, self.params.grid);
        let mut entries = self.entries.write();
        let id = entries.len() as SignatureId;
        debug!("InMemoryIndex: ingest #{id} {}:{}", metadata.model_id, metadata.view);
        entries.push(Entry {
            signature,
            metadata,
        });
        Ok(id)
    }

    fn search(&self, raster: &Raster, distance_cutoff: f64) -> Result<Vec<SignatureMatch>> {
        let query = grid_signature(raster, self.params.grid);
        let entries = self.entries.read();
        let mut hits: Vec<SignatureMatch> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| SignatureMatch {
                signature_id: i as SignatureId,
                distance: normalized_distance(&query, &e.signature),
            })
            .filter(|m| m.distance <= distance_cutoff)
            .collect();
        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.signature_id.cmp(&b.signature_id))
        });
        hits.truncate(self.params.max_results);
        Ok(hits)
    }

    fn metadata(&self, id: SignatureId) -> Option<ImageMetadata> {
        self.entries
            .read()
            .get(id as usize)
            .map(|e| e.metadata.clone())
    }
}
