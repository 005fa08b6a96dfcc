use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use sanjaya_cli::logging::init_logging;
use sanjaya_core::config::Settings;
use sanjaya_core::traits::QueryEmbedder;
use sanjaya_gemini::{FakeEmbedder, GeminiClient, EMBEDDING_DIM};
use sanjaya_rag::{QueryOrchestrator, Reply};
use sanjaya_vector::CorpusStore;

#[derive(Parser, Debug)]
#[command(
    name = "sanjaya",
    about = "Answer a question about the Gita, Ramayana and Mahabharata as a JSON payload",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// Question to answer; without it the tool only reports readiness
    #[arg(allow_hyphen_values = true)]
    query: Option<String>,

    /// Extra arguments are accepted and ignored
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    _rest: Vec<String>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return emit(&Reply::failure("invalid arguments", e.to_string())),
    };
    let reply = panic::catch_unwind(AssertUnwindSafe(move || run(cli)))
        .unwrap_or_else(|payload| Reply::failure(panic_message(payload.as_ref()), "panic in query pipeline"));
    emit(&reply)
}

fn run(cli: Cli) -> Reply {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => return Reply::failure(format!("Failed to load configuration: {e}"), format!("{e:?}")),
    };
    init_logging(&settings.logging);

    // Readiness needs no credentials; they are checked before any question is handled.
    let Some(query) = cli.query else {
        return Reply::ready();
    };
    let client = match GeminiClient::new(&settings.gemini) {
        Ok(client) => client,
        Err(e) => return Reply::failure(format!("Failed to initialize Gemini client: {e}"), format!("{e:?}")),
    };
    match answer(&settings, &client, &query) {
        Ok(answer) => Reply::answer(answer),
        Err(e) => Reply::failure(e.to_string(), format!("{e:?}")),
    }
}

fn answer(settings: &Settings, client: &GeminiClient, query: &str) -> anyhow::Result<String> {
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let store = CorpusStore::from_settings(&settings.assets, &cwd);
    let fake = FakeEmbedder::new(EMBEDDING_DIM);
    let embedder: &dyn QueryEmbedder = if settings.embedding.use_fake { &fake } else { client };
    tracing::info!(query_len = query.len(), fake_embeddings = settings.embedding.use_fake, "answering query");
    Ok(QueryOrchestrator::new(&store, embedder, client)
        .with_settings(settings)
        .answer(query))
}

fn emit(reply: &Reply) -> ExitCode {
    match reply.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => println!(r#"{{"error":"failed to serialize reply","trace":"{}"}}"#, e.to_string().replace('"', "'")),
    }
    ExitCode::from(u8::try_from(reply.exit_code()).unwrap_or(1))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
