//! Builds the position-keyed vector index consumed by [`crate::LanceIndex`].

use std::fs;
use std::path::Path;
use std::sync::Arc;

use arrow_array::types::Float32Type;
use arrow_array::{FixedSizeListArray, Int64Array, RecordBatch, RecordBatchIterator};
use lancedb::connect;

use sanjaya_core::{Error, Result};

use crate::schema::build_index_schema;

/// Replaces any existing index at `path` with one row per vector; row `i`
/// gets position `i`. Returns the number of rows written.
pub fn write_index(path: &Path, table_name: &str, vectors: &[Vec<f32>]) -> Result<usize> {
    let dim = vectors
        .first()
        .map(Vec::len)
        .filter(|d| *d > 0)
        .ok_or_else(|| Error::InvalidConfig("no vectors to index".into()))?;
    if let Some(position) = vectors.iter().position(|v| v.len() != dim) {
        return Err(Error::InvalidConfig(format!(
            "vector {position} has dimension {} but the index uses {dim}",
            vectors[position].len()
        )));
    }
    let dim_i32 = i32::try_from(dim).map_err(|_| Error::InvalidConfig(format!("dimension {dim} is too large")))?;

    let schema = build_index_schema(dim_i32);
    let positions = Int64Array::from_iter_values(0..vectors.len() as i64);
    let values = FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(
        vectors.iter().map(|v| Some(v.iter().copied().map(Some))),
        dim_i32,
    );
    let batch = RecordBatch::try_new(schema.clone(), vec![Arc::new(positions), Arc::new(values)])
        .map_err(|e| Error::Asset(format!("failed to build index batch: {e}")))?;

    if path.exists() {
        fs::remove_dir_all(path).map_err(|e| Error::Asset(format!("failed to clear {}: {e}", path.display())))?;
    }
    fs::create_dir_all(path).map_err(|e| Error::Asset(format!("failed to create {}: {e}", path.display())))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Asset(format!("failed to start index runtime: {e}")))?;
    let uri = path.to_string_lossy().to_string();
    runtime
        .block_on(async {
            let db = connect(&uri).execute().await?;
            let reader = Box::new(RecordBatchIterator::new(vec![Ok(batch)].into_iter(), schema));
            db.create_table(table_name, reader).execute().await?;
            Ok::<_, lancedb::Error>(())
        })
        .map_err(|e| Error::Asset(format!("failed to write index {}/{table_name}: {e}", path.display())))?;
    tracing::info!(rows = vectors.len(), dim, path = %path.display(), "wrote vector index");
    Ok(vectors.len())
}
