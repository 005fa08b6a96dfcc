//! The chunk file: chunk texts joined by a literal separator.
//!
//! Splitting is literal and keeps empty segments, so segment `i` is always
//! the chunk at index position `i`. There is no escaping; the writer refuses
//! any chunk that contains the separator instead.

use std::fs;
use std::path::Path;

use sanjaya_core::types::ChunkSet;
use sanjaya_core::{Error, Result};

pub fn parse_chunks(text: &str, separator: &str) -> ChunkSet {
    text.split(separator).map(str::to_string).collect::<Vec<_>>().into()
}

pub fn read_chunk_file(path: &Path, separator: &str) -> Result<ChunkSet> {
    let text = fs::read_to_string(path)
        .map_err(|e| Error::Asset(format!("failed to read chunk file {}: {e}", path.display())))?;
    Ok(parse_chunks(&text, separator))
}

pub fn render_chunks<S: AsRef<str>>(chunks: &[S], separator: &str) -> Result<String> {
    if let Some(position) = chunks.iter().position(|c| c.as_ref().contains(separator)) {
        return Err(Error::InvalidConfig(format!(
            "chunk {position} contains the chunk separator and cannot be stored"
        )));
    }
    Ok(chunks.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join(separator))
}

pub fn write_chunk_file<S: AsRef<str>>(path: &Path, chunks: &[S], separator: &str) -> Result<()> {
    let text = render_chunks(chunks, separator)?;
    fs::write(path, text)
        .map_err(|e| Error::Asset(format!("failed to write chunk file {}: {e}", path.display())))
}
