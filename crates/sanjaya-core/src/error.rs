use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid credentials: {0}")]
    Credentials(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Asset load failed: {0}")]
    Asset(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Index query failed: {0}")]
    Index(String),

    #[error("Generation failed: {0}")]
    Generation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
