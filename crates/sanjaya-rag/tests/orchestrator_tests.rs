use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use sanjaya_core::prompt::REFERENCE_HEADER;
use sanjaya_core::traits::{Generator, NearestNeighbors, QueryEmbedder};
use sanjaya_core::types::{ChunkSet, GenerationRequest, Neighbor, QueryVector};
use sanjaya_core::{Error, Result};
use sanjaya_rag::{QueryOrchestrator, APOLOGY_PREFIX};
use sanjaya_vector::{Availability, Corpus, CorpusLoader};

#[derive(Default)]
struct Calls {
    embed: AtomicUsize,
    search: AtomicUsize,
    last_k: AtomicUsize,
}

struct NoAssets;

impl CorpusLoader for NoAssets {
    fn load(&self) -> Availability {
        Availability::Unavailable("Not found: chunk file scripture_chunks.txt".into())
    }
}

struct ScriptedIndex {
    positions: Vec<i64>,
    calls: Arc<Calls>,
}

impl NearestNeighbors for ScriptedIndex {
    fn search(&self, _query: &QueryVector, k: usize) -> Result<Vec<Neighbor>> {
        self.calls.search.fetch_add(1, Ordering::SeqCst);
        self.calls.last_k.store(k, Ordering::SeqCst);
        Ok(self.positions.iter().map(|p| Neighbor { distance: 0.5, position: *p }).collect())
    }
}

struct InMemoryCorpus {
    chunks: Vec<&'static str>,
    positions: Vec<i64>,
    calls: Arc<Calls>,
}

impl CorpusLoader for InMemoryCorpus {
    fn load(&self) -> Availability {
        Availability::Found(Corpus {
            chunks: ChunkSet::new(self.chunks.iter().map(|c| c.to_string()).collect()),
            index: Box::new(ScriptedIndex { positions: self.positions.clone(), calls: Arc::clone(&self.calls) }),
        })
    }
}

struct StubEmbedder {
    fail: bool,
    calls: Arc<Calls>,
}

impl QueryEmbedder for StubEmbedder {
    fn embed_query(&self, _text: &str) -> Result<QueryVector> {
        self.calls.embed.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Embedding("failed to parse embedContent response: missing field".into()));
        }
        Ok(QueryVector::new(vec![0.25; 4]).expect("non-empty"))
    }
}

#[derive(Default)]
struct RecordingGenerator {
    requests: Mutex<Vec<GenerationRequest>>,
    failure: Option<&'static str>,
}

impl RecordingGenerator {
    fn failing(detail: &'static str) -> Self {
        Self { failure: Some(detail), ..Default::default() }
    }

    fn only_request(&self) -> GenerationRequest {
        let requests = self.requests.lock().unwrap();
        assert_eq!(requests.len(), 1, "exactly one generation call");
        requests[0].clone()
    }
}

impl Generator for RecordingGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        match self.failure {
            Some(detail) => Err(Error::Generation(detail.to_string())),
            None => Ok("  Namaste, seeker. Dharma is righteous duty.\n".to_string()),
        }
    }
}

#[test]
fn absent_assets_skip_retrieval_and_still_generate() {
    let calls = Arc::new(Calls::default());
    let embedder = StubEmbedder { fail: false, calls: Arc::clone(&calls) };
    let generator = RecordingGenerator::default();

    let answer = QueryOrchestrator::new(&NoAssets, &embedder, &generator).answer("What is dharma?");

    assert_eq!(answer, "Namaste, seeker. Dharma is righteous duty.");
    assert_eq!(calls.embed.load(Ordering::SeqCst), 0);
    let request = generator.only_request();
    assert!(request.user_prompt.starts_with("USER QUESTION: What is dharma?\n\nINSTRUCTION:"));
    assert!(!request.user_prompt.contains("REFERENCE MATERIAL"));
    assert_eq!(request.params.max_output_tokens, 2048);
}

#[test]
fn desynced_positions_are_dropped_before_prompting() {
    let calls = Arc::new(Calls::default());
    let corpus = InMemoryCorpus { chunks: vec!["A", "B", "C"], positions: vec![0, 5, 1], calls: Arc::clone(&calls) };
    let embedder = StubEmbedder { fail: false, calls: Arc::clone(&calls) };
    let generator = RecordingGenerator::default();

    let orchestrator = QueryOrchestrator::new(&corpus, &embedder, &generator);
    assert_eq!(orchestrator.gather_context("q").chunks(), &["A", "B"]);
    orchestrator.answer("q");

    assert_eq!(calls.last_k.load(Ordering::SeqCst), 15);
    let request = generator.only_request();
    assert!(request.user_prompt.ends_with(&format!("\n\n{REFERENCE_HEADER}\nA\n---\nB")), "{}", request.user_prompt);
}

#[test]
fn embedding_failure_never_reaches_the_index() {
    let calls = Arc::new(Calls::default());
    let corpus = InMemoryCorpus { chunks: vec!["A"], positions: vec![0], calls: Arc::clone(&calls) };
    let embedder = StubEmbedder { fail: true, calls: Arc::clone(&calls) };
    let generator = RecordingGenerator::default();

    let answer = QueryOrchestrator::new(&corpus, &embedder, &generator).answer("What is karma?");

    assert!(!answer.is_empty());
    assert_eq!(calls.embed.load(Ordering::SeqCst), 1);
    assert_eq!(calls.search.load(Ordering::SeqCst), 0);
    assert!(!generator.only_request().user_prompt.contains("REFERENCE MATERIAL"));
}

#[test]
fn fully_filtered_results_leave_no_reference_block() {
    let calls = Arc::new(Calls::default());
    let corpus = InMemoryCorpus { chunks: vec!["A"], positions: vec![7, 8], calls: Arc::clone(&calls) };
    let embedder = StubEmbedder { fail: false, calls: Arc::clone(&calls) };
    let generator = RecordingGenerator::default();

    QueryOrchestrator::new(&corpus, &embedder, &generator).answer("q");

    assert_eq!(calls.search.load(Ordering::SeqCst), 1);
    assert!(!generator.only_request().user_prompt.contains("REFERENCE MATERIAL"));
}

#[test]
fn generation_failure_becomes_an_apology() {
    let calls = Arc::new(Calls::default());
    let embedder = StubEmbedder { fail: false, calls };
    let generator = RecordingGenerator::failing("Gemini returned 429 Too Many Requests: quota exhausted");

    let answer = QueryOrchestrator::new(&NoAssets, &embedder, &generator).answer("What is dharma?");

    assert!(answer.starts_with(APOLOGY_PREFIX), "{answer}");
    assert!(answer.contains("quota exhausted"));
}

#[test]
fn configured_top_k_and_params_are_forwarded() {
    let calls = Arc::new(Calls::default());
    let corpus = InMemoryCorpus { chunks: vec!["A", "B"], positions: vec![1], calls: Arc::clone(&calls) };
    let embedder = StubEmbedder { fail: false, calls: Arc::clone(&calls) };
    let generator = RecordingGenerator::default();
    let mut settings = sanjaya_core::config::Settings::default();
    settings.retrieval.top_k = 3;
    settings.generation.temperature = 0.7;

    QueryOrchestrator::new(&corpus, &embedder, &generator).with_settings(&settings).answer("q");

    assert_eq!(calls.last_k.load(Ordering::SeqCst), 3);
    assert!((generator.only_request().params.temperature - 0.7).abs() < f32::EPSILON);
}
