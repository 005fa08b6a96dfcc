use serde::{Deserialize, Serialize};

use sanjaya_core::traits::{DocumentEmbedder, QueryEmbedder};
use sanjaya_core::types::QueryVector;
use sanjaya_core::{Error, Result};

use crate::client::{Content, GeminiClient};

/// Intended use of an embedding. Index vectors are documents; questions are queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    RetrievalQuery,
    RetrievalDocument,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedContentRequest<'a> {
    model: String,
    content: Content<'a>,
    task_type: TaskType,
}

impl<'a> EmbedContentRequest<'a> {
    pub fn new(model: &str, text: &'a str, task_type: TaskType) -> Self {
        let model = if model.starts_with("models/") { model.to_string() } else { format!("models/{model}") };
        Self { model, content: Content::text(None, text), task_type }
    }
}

/// The two response shapes seen across embedding API versions.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EmbedContentResponse {
    Single { embedding: ContentEmbedding },
    Batch { embeddings: Vec<ContentEmbedding> },
}

#[derive(Debug, Deserialize)]
pub struct ContentEmbedding {
    #[serde(default)]
    pub values: Vec<f32>,
}

impl EmbedContentResponse {
    /// The first embedding's values, or `None` when the response carries none.
    pub fn into_values(self) -> Option<Vec<f32>> {
        let values = match self {
            Self::Single { embedding } => embedding.values,
            Self::Batch { embeddings } => embeddings.into_iter().next()?.values,
        };
        (!values.is_empty()).then_some(values)
    }
}

impl GeminiClient {
    pub fn embed(&self, text: &str, task_type: TaskType) -> Result<Vec<f32>> {
        let request = EmbedContentRequest::new(&self.embedding_model, text, task_type);
        let response: EmbedContentResponse = self
            .call(&self.embedding_model, "embedContent", &request)
            .map_err(Error::Embedding)?;
        response
            .into_values()
            .ok_or_else(|| Error::Embedding("response contained no embedding values".into()))
    }
}

impl QueryEmbedder for GeminiClient {
    fn embed_query(&self, text: &str) -> Result<QueryVector> {
        let values = self.embed(text, TaskType::RetrievalQuery)?;
        QueryVector::new(values).ok_or_else(|| Error::Embedding("empty query embedding".into()))
    }
}

impl DocumentEmbedder for GeminiClient {
    fn embed_document(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(text, TaskType::RetrievalDocument)
    }
}
