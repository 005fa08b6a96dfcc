use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;

use sanjaya_core::{Error, Result};

pub const POSITION_COLUMN: &str = "position";
pub const VECTOR_COLUMN: &str = "vector";
/// Column LanceDB appends to vector search results.
pub const DISTANCE_COLUMN: &str = "_distance";

pub fn vector_field_type(dim: i32) -> DataType {
	DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), dim)
}

pub fn build_index_schema(dim: i32) -> Arc<Schema> {
	Arc::new(Schema::new(vec![
		Field::new(POSITION_COLUMN, DataType::Int64, false),
		Field::new(VECTOR_COLUMN, vector_field_type(dim), true),
	]))
}

/// Dimension of the stored vectors, read from the table schema.
pub fn vector_dim(schema: &Schema) -> Result<usize> {
	let field = schema
		.field_with_name(VECTOR_COLUMN)
		.map_err(|_| Error::Asset(format!("index has no '{VECTOR_COLUMN}' column")))?;
	match field.data_type() {
		DataType::FixedSizeList(_, dim) if *dim > 0 => Ok(*dim as usize),
		other => Err(Error::Asset(format!("unexpected vector column type {other:?}"))),
	}
}
