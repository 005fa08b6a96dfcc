//! Gemini REST clients for query/document embeddings and text generation,
//! plus a deterministic offline embedder.

mod client;
pub mod embed;
pub mod fake;
pub mod generate;

pub use client::{validate_api_key, GeminiClient, PLACEHOLDER_API_KEY};
pub use embed::{EmbedContentResponse, TaskType};
pub use fake::FakeEmbedder;
pub use generate::GenerateContentResponse;

/// Output dimension of `text-embedding-004`.
pub const EMBEDDING_DIM: usize = 768;
