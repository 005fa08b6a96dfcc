use crate::types::{GenerationRequest, Neighbor, QueryVector};
use crate::Result;

/// Turns a question into a query-oriented embedding.
pub trait QueryEmbedder: Send + Sync {
    fn embed_query(&self, text: &str) -> Result<QueryVector>;
}

/// Turns corpus text into document-oriented embeddings for index builds.
pub trait DocumentEmbedder: Send + Sync {
    fn embed_document(&self, text: &str) -> Result<Vec<f32>>;
}

/// A read-only nearest-neighbor index keyed by chunk position.
pub trait NearestNeighbors: Send + Sync {
    /// Up to `k` neighbors ordered by ascending distance.
    fn search(&self, query: &QueryVector, k: usize) -> Result<Vec<Neighbor>>;
}

/// A remote (or fake) generative model.
pub trait Generator: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> Result<String>;
}
