use sanjaya_core::traits::NearestNeighbors;
use sanjaya_core::types::{ChunkSet, Neighbor, QueryVector, RetrievedContext};

/// Top-`k` chunks for `query`, nearest first. A failed search yields an
/// empty context rather than an error.
pub fn retrieve(index: &dyn NearestNeighbors, query: &QueryVector, chunks: &ChunkSet, k: usize) -> RetrievedContext {
    match index.search(query, k) {
        Ok(neighbors) => {
            let neighbors = &neighbors[..neighbors.len().min(k)];
            let selected = select_chunks(neighbors, chunks);
            if selected.len() < neighbors.len() {
                tracing::debug!(
                    dropped = neighbors.len() - selected.len(),
                    corpus_len = chunks.len(),
                    "index returned positions outside the corpus"
                );
            }
            selected.into()
        }
        Err(e) => {
            tracing::warn!(error = %e, "nearest-neighbor search failed; continuing without context");
            RetrievedContext::empty()
        }
    }
}

/// Maps neighbors to chunk texts in the order given, dropping positions that
/// are not valid for `chunks`.
pub fn select_chunks(neighbors: &[Neighbor], chunks: &ChunkSet) -> Vec<String> {
    neighbors
        .iter()
        .filter_map(|n| chunks.get(n.position))
        .map(str::to_string)
        .collect()
}
