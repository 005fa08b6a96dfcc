//! Domain types flowing through the retrieval and generation steps.

use serde::{Deserialize, Serialize};

/// Row position of a chunk in the corpus. Signed because vector indexes
/// may report missing neighbors with a negative sentinel.
pub type Position = i64;

/// The ordered corpus. A chunk is identified solely by its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkSet {
    chunks: Vec<String>,
}

impl ChunkSet {
    pub fn new(chunks: Vec<String>) -> Self {
        Self { chunks }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Chunk text at `position`, or `None` when the position is negative or
    /// past the end of the corpus.
    pub fn get(&self, position: Position) -> Option<&str> {
        let index = usize::try_from(position).ok()?;
        self.chunks.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.chunks.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.chunks
    }
}

impl From<Vec<String>> for ChunkSet {
    fn from(chunks: Vec<String>) -> Self {
        Self::new(chunks)
    }
}

/// A single query embedding, used as a one-row matrix by nearest-neighbor search.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryVector {
    values: Vec<f32>,
}

impl QueryVector {
    /// Returns `None` for an empty vector, which no index can search with.
    pub fn new(values: Vec<f32>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        Some(Self { values })
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.values
    }
}

/// One `(distance, position)` pair reported by the index. Lower distance is nearer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub distance: f32,
    pub position: Position,
}

/// Chunk texts retrieved for a query, nearest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievedContext {
    chunks: Vec<String>,
}

impl RetrievedContext {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }
}

impl From<Vec<String>> for RetrievedContext {
    fn from(chunks: Vec<String>) -> Self {
        Self { chunks }
    }
}

/// Sampling parameters sent with every generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self { temperature: 0.3, max_output_tokens: 2048 }
    }
}

/// A fully assembled single-turn request for the generation model.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub user_prompt: String,
    pub params: GenerationParams,
}
