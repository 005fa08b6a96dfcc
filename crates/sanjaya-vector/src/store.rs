//! Loads the chunk file and the vector index once per invocation.

use std::path::{Path, PathBuf};

use sanjaya_core::config::AssetSettings;
use sanjaya_core::traits::NearestNeighbors;
use sanjaya_core::types::ChunkSet;
use sanjaya_core::{Error, Result};

use crate::chunk_file::read_chunk_file;
use crate::index::LanceIndex;

/// The chunk sequence and the index built from it, loaded together.
pub struct Corpus {
    pub chunks: ChunkSet,
    pub index: Box<dyn NearestNeighbors>,
}

/// Retrieval assets are optional; `Unavailable` carries the reason for logs.
pub enum Availability {
    Found(Corpus),
    Unavailable(String),
}

pub trait CorpusLoader {
    fn load(&self) -> Availability;
}

pub struct CorpusStore {
    chunks_path: PathBuf,
    index_path: PathBuf,
    table: String,
    separator: String,
}

impl CorpusStore {
    pub fn new(chunks_path: PathBuf, index_path: PathBuf, table: &str, separator: &str) -> Self {
        Self { chunks_path, index_path, table: table.to_string(), separator: separator.to_string() }
    }

    /// Relative asset paths resolve against `base` (normally the working directory).
    pub fn from_settings(assets: &AssetSettings, base: &Path) -> Self {
        Self::new(assets.chunks_path(base), assets.index_path(base), &assets.table, &assets.separator)
    }

    fn try_load(&self) -> Result<Corpus> {
        if !self.chunks_path.is_file() {
            return Err(Error::NotFound(format!("chunk file {}", self.chunks_path.display())));
        }
        if !self.index_path.exists() {
            return Err(Error::NotFound(format!("index directory {}", self.index_path.display())));
        }
        let chunks = read_chunk_file(&self.chunks_path, &self.separator)?;
        let index = LanceIndex::open(&self.index_path, &self.table)?;
        Ok(Corpus { chunks, index: Box::new(index) })
    }
}

impl CorpusLoader for CorpusStore {
    fn load(&self) -> Availability {
        match self.try_load() {
            Ok(corpus) => {
                tracing::info!(chunks = corpus.chunks.len(), "loaded corpus assets");
                Availability::Found(corpus)
            }
            Err(e @ Error::NotFound(_)) => {
                tracing::debug!(reason = %e, "no local knowledge base");
                Availability::Unavailable(e.to_string())
            }
            Err(e) => {
                tracing::warn!(error = %e, "corpus assets could not be loaded; answering without retrieval");
                Availability::Unavailable(e.to_string())
            }
        }
    }
}
