//! Corpus assets: the separator-delimited chunk file, the LanceDB
//! nearest-neighbor index keyed by chunk position, and the retriever that
//! joins the two.

pub mod chunk_file;
pub mod index;
pub mod retriever;
pub mod schema;
pub mod store;
pub mod writer;

pub use index::LanceIndex;
pub use retriever::{retrieve, select_chunks};
pub use store::{Availability, Corpus, CorpusLoader, CorpusStore};
pub use writer::write_index;
