//! One question in, one answer out: load, embed, retrieve, assemble, generate.
//!
//! Retrieval is an optional enhancement. Missing assets, a failed embedding or
//! a failed search all fall through to an empty context, and a failed
//! generation becomes an apology answer, so [`QueryOrchestrator::answer`]
//! always returns displayable text.

use sanjaya_core::config::{Settings, DEFAULT_TOP_K};
use sanjaya_core::prompt::assemble;
use sanjaya_core::traits::{Generator, QueryEmbedder};
use sanjaya_core::types::{GenerationParams, GenerationRequest, RetrievedContext};
use sanjaya_vector::{retrieve, Availability, CorpusLoader};

pub const APOLOGY_PREFIX: &str = "I am having trouble connecting to the AI Guru.";

pub struct QueryOrchestrator<'a> {
    corpus: &'a dyn CorpusLoader,
    embedder: &'a dyn QueryEmbedder,
    generator: &'a dyn Generator,
    top_k: usize,
    params: GenerationParams,
}

impl<'a> QueryOrchestrator<'a> {
    pub fn new(corpus: &'a dyn CorpusLoader, embedder: &'a dyn QueryEmbedder, generator: &'a dyn Generator) -> Self {
        Self { corpus, embedder, generator, top_k: DEFAULT_TOP_K, params: GenerationParams::default() }
    }

    pub fn with_settings(self, settings: &Settings) -> Self {
        self.with_top_k(settings.retrieval.top_k).with_params(settings.generation)
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn answer(&self, query: &str) -> String {
        let context = self.gather_context(query);
        let request = assemble(query, &context).into_request(self.params);
        generate_or_apologize(self.generator, &request)
    }

    /// Loads the corpus, embeds the question and retrieves neighbors. Never
    /// fails; every miss is an empty context.
    pub fn gather_context(&self, query: &str) -> RetrievedContext {
        let corpus = match self.corpus.load() {
            Availability::Found(corpus) => corpus,
            Availability::Unavailable(reason) => {
                tracing::info!(%reason, "retrieval unavailable");
                return RetrievedContext::empty();
            }
        };
        let vector = match self.embedder.embed_query(query) {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!(error = %e, "query embedding failed; answering without context");
                return RetrievedContext::empty();
            }
        };
        let context = retrieve(corpus.index.as_ref(), &vector, &corpus.chunks, self.top_k);
        tracing::info!(chunks = context.len(), top_k = self.top_k, "retrieved context");
        context
    }
}

/// The model's trimmed answer, or an apology carrying the failure detail.
pub fn generate_or_apologize(generator: &dyn Generator, request: &GenerationRequest) -> String {
    match generator.generate(request) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            tracing::error!(error = %e, "generation failed");
            format!("{APOLOGY_PREFIX} Error: {e}")
        }
    }
}
