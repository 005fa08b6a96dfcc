use std::path::Path;

use arrow_array::{Float32Array, Int64Array, RecordBatch};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, DistanceType, Table};
use tokio::runtime::Runtime;

use sanjaya_core::traits::NearestNeighbors;
use sanjaya_core::types::{Neighbor, QueryVector};
use sanjaya_core::{Error, Result};

use crate::schema::{vector_dim, DISTANCE_COLUMN, POSITION_COLUMN};

/// Read-only LanceDB table searched by L2 distance.
///
/// LanceDB is async; the index owns a current-thread runtime and blocks on it
/// so callers stay synchronous.
pub struct LanceIndex {
    table: Table,
    dim: usize,
    runtime: Runtime,
}

impl LanceIndex {
    pub fn open(path: &Path, table_name: &str) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!("index directory {}", path.display())));
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Asset(format!("failed to start index runtime: {e}")))?;
        let uri = path.to_string_lossy().to_string();
        let (table, schema) = runtime
            .block_on(async {
                let db = connect(&uri).execute().await?;
                let table = db.open_table(table_name).execute().await?;
                let schema = table.schema().await?;
                Ok::<_, lancedb::Error>((table, schema))
            })
            .map_err(|e| Error::Asset(format!("failed to open index {}/{table_name}: {e}", path.display())))?;
        let dim = vector_dim(&schema)?;
        tracing::debug!(path = %path.display(), table = table_name, dim, "opened vector index");
        Ok(Self { table, dim, runtime })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl NearestNeighbors for LanceIndex {
    fn search(&self, query: &QueryVector, k: usize) -> Result<Vec<Neighbor>> {
        if query.dim() != self.dim {
            return Err(Error::Index(format!(
                "query dimension {} does not match index dimension {}",
                query.dim(),
                self.dim
            )));
        }
        let batches: Vec<RecordBatch> = self
            .runtime
            .block_on(async {
                let stream = self
                    .table
                    .vector_search(query.as_slice().to_vec())?
                    .distance_type(DistanceType::L2)
                    .limit(k)
                    .execute()
                    .await?;
                Ok::<_, lancedb::Error>(stream.try_collect::<Vec<RecordBatch>>().await?)
            })
            .map_err(|e| Error::Index(e.to_string()))?;
        let mut neighbors = Vec::new();
        for batch in &batches {
            neighbors.extend(neighbors_from_batch(batch)?);
        }
        neighbors.truncate(k);
        Ok(neighbors)
    }
}

fn neighbors_from_batch(batch: &RecordBatch) -> Result<Vec<Neighbor>> {
    let positions = batch
        .column_by_name(POSITION_COLUMN)
        .and_then(|c| c.as_any().downcast_ref::<Int64Array>())
        .ok_or_else(|| Error::Index(format!("search result has no Int64 '{POSITION_COLUMN}' column")))?;
    let distances = batch
        .column_by_name(DISTANCE_COLUMN)
        .and_then(|c| c.as_any().downcast_ref::<Float32Array>())
        .ok_or_else(|| Error::Index(format!("search result has no Float32 '{DISTANCE_COLUMN}' column")))?;
    Ok((0..batch.num_rows())
        .map(|i| Neighbor { distance: distances.value(i), position: positions.value(i) })
        .collect())
}
