use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use sanjaya_cli::logging::init_logging;
use sanjaya_core::config::Settings;
use sanjaya_core::data_processor::DataProcessor;
use sanjaya_core::traits::DocumentEmbedder;
use sanjaya_gemini::{FakeEmbedder, GeminiClient, EMBEDDING_DIM};
use sanjaya_vector::chunk_file::{read_chunk_file, write_chunk_file};
use sanjaya_vector::write_index;

#[derive(Parser, Debug)]
#[command(
    name = "sanjaya-indexer",
    about = "Build the scripture chunk file and its position-keyed vector index"
)]
struct IndexerCli {
    /// Directory of .txt scripture sources to chunk
    #[arg(long, conflicts_with = "chunks")]
    source: Option<PathBuf>,

    /// Existing chunk file to index instead of chunking sources
    #[arg(long)]
    chunks: Option<PathBuf>,

    /// Keep only the first N chunks
    #[arg(long)]
    limit: Option<usize>,
}

fn main() -> Result<()> {
    let cli = IndexerCli::parse();
    let settings = Settings::load().context("failed to load configuration")?;
    init_logging(&settings.logging);

    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let separator = settings.assets.separator.as_str();
    let chunks_path = settings.assets.chunks_path(&cwd);
    let index_path = settings.assets.index_path(&cwd);

    println!("Sanjaya Indexer\n===============");
    let mut chunks: Vec<String> = match &cli.source {
        Some(dir) => {
            println!("Source directory: {}", dir.display());
            DataProcessor::new()
                .process_directory(dir)?
                .into_iter()
                .map(|c| c.content)
                .collect()
        }
        None => {
            let file = cli.chunks.clone().unwrap_or_else(|| chunks_path.clone());
            println!("Chunk file: {}", file.display());
            read_chunk_file(&file, separator)?.as_slice().to_vec()
        }
    };
    chunks.retain(|c| !c.trim().is_empty());
    if let Some(limit) = cli.limit {
        chunks.truncate(limit);
        println!("🔢 Limited to first {limit} chunks");
    }
    if chunks.is_empty() {
        bail!("no chunks to index");
    }

    // Rewritten even when read from disk so chunk positions match index rows.
    write_chunk_file(&chunks_path, &chunks, separator)?;
    println!("📝 Wrote {} chunks to {}", chunks.len(), chunks_path.display());

    let fake = FakeEmbedder::new(EMBEDDING_DIM);
    let client;
    let embedder: &dyn DocumentEmbedder = if settings.embedding.use_fake {
        println!("🧪 Using FakeEmbedder");
        &fake
    } else {
        client = GeminiClient::new(&settings.gemini).context("Failed to initialize Gemini client")?;
        &client
    };

    let pb = ProgressBar::new(chunks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")
            .context("invalid progress template")?
            .progress_chars("#>-"),
    );
    let mut vectors = Vec::with_capacity(chunks.len());
    for (position, chunk) in chunks.iter().enumerate() {
        let vector = embedder
            .embed_document(chunk)
            .with_context(|| format!("failed to embed chunk {position}"))?;
        vectors.push(vector);
        pb.inc(1);
    }
    pb.finish_with_message("embedded");

    let rows = write_index(&index_path, &settings.assets.table, &vectors)?;
    println!("\n✅ Indexed {rows} chunks into {}", index_path.display());
    println!("💡 To ask a question, use: cargo run --bin sanjaya '<question>'");
    Ok(())
}
