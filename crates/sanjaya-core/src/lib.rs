//! Shared domain types, configuration and the pure prompt assembler for the
//! Sanjaya question answering pipeline.

pub mod config;
pub mod data_processor;
pub mod error;
pub mod prompt;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
