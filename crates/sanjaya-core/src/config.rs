//! Configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `GEMINI_API_KEY`
//! + `APP_*` env vars (`__` separates nested keys, e.g. `APP_RETRIEVAL__TOP_K`).
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::GenerationParams;

pub const CHUNK_SEPARATOR: &str = "\n---CHUNK_SEPARATOR---\n";
pub const DEFAULT_TOP_K: usize = 15;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub assets: AssetSettings,
    pub retrieval: RetrievalSettings,
    pub gemini: GeminiSettings,
    pub generation: GenerationParams,
    pub embedding: EmbeddingSettings,
    pub logging: LoggingSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    pub chunks_file: String,
    pub index_dir: String,
    pub table: String,
    pub separator: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            chunks_file: "scripture_chunks.txt".to_string(),
            index_dir: "scripture_index.lance".to_string(),
            table: "scripture_index".to_string(),
            separator: CHUNK_SEPARATOR.to_string(),
        }
    }
}

impl AssetSettings {
    pub fn chunks_path(&self, base: &Path) -> PathBuf {
        resolve_with_base(base, &self.chunks_file)
    }

    pub fn index_path(&self, base: &Path) -> PathBuf {
        resolve_with_base(base, &self.index_dir)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: DEFAULT_TOP_K }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub embedding_model: String,
    pub generation_model: String,
    pub timeout_secs: u64,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            embedding_model: "text-embedding-004".to_string(),
            generation_model: "gemini-2.5-flash-preview-09-2025".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Swap the remote embedder for the deterministic hashing embedder.
    pub use_fake: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "warn".to_string(), json: false }
    }
}

/// HTTP front end that runs one `sanjaya` process per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
    /// Query executable; defaults to `sanjaya` next to the server binary.
    pub query_bin: Option<String>,
    pub cors: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: "127.0.0.1:5000".to_string(), query_bin: None, cors: true }
    }
}

impl Settings {
    /// Loads settings for the environment named by `RUST_ENV` (default `dev`).
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::from_figment(&figment_for(&env_name))
    }

    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let settings: Settings = figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.retrieval.top_k == 0 {
            return Err(Error::InvalidConfig("retrieval.top_k must be positive".into()));
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(Error::InvalidConfig(format!(
                "generation.temperature {} is outside 0.0..=2.0",
                self.generation.temperature
            )));
        }
        if self.generation.max_output_tokens == 0 {
            return Err(Error::InvalidConfig("generation.max_output_tokens must be positive".into()));
        }
        if self.assets.separator.is_empty() {
            return Err(Error::InvalidConfig("assets.separator must not be empty".into()));
        }
        if self.gemini.timeout_secs == 0 {
            return Err(Error::InvalidConfig("gemini.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

/// Layered figment for `env_name`; later providers override earlier ones.
pub fn figment_for(env_name: &str) -> Figment {
    let mut figment = Figment::new().merge(Toml::file("config.toml"));
    match env_name {
        "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
        "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
        "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
        _ => {}
    }
    figment
        .merge(Env::raw().only(&["GEMINI_API_KEY"]).map(|_| "gemini.api_key".into()))
        .merge(Env::prefixed("APP_").split("__"))
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
