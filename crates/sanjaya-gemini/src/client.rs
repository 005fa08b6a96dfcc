use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use sanjaya_core::config::GeminiSettings;
use sanjaya_core::{Error, Result};

/// Value shipped in sample configs; never a usable key.
pub const PLACEHOLDER_API_KEY: &str = "API-KEY-HERE";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Shared Gemini access: one HTTP client, one key, the configured models.
/// Built once at process entry and borrowed by every remote call.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    pub(crate) embedding_model: String,
    pub(crate) generation_model: String,
}

impl GeminiClient {
    /// Fails with [`Error::Credentials`] before any request is made when the
    /// key is missing or unusable.
    pub fn new(settings: &GeminiSettings) -> Result<Self> {
        let api_key = validate_api_key(settings.api_key.as_deref())?;
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("failed to build Gemini HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            embedding_model: settings.embedding_model.clone(),
            generation_model: settings.generation_model.clone(),
        })
    }

    pub fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model.trim_start_matches("models/"), method)
    }

    /// POSTs `body` to `models/{model}:{method}`; the error string carries the
    /// HTTP status and the service's own message when there is one.
    pub(crate) fn call<B, R>(&self, model: &str, method: &str, body: &B) -> std::result::Result<R, String>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.endpoint(model, method);
        tracing::debug!(%model, %method, "calling Gemini");
        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| format!("request to {method} failed: {e}"))?;
        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| format!("failed to read {method} response: {e}"))?;
        if !status.is_success() {
            return Err(format!("Gemini returned {status}: {}", api_error_message(&text)));
        }
        serde_json::from_str(&text).map_err(|e| format!("failed to parse {method} response: {e}"))
    }
}

pub fn validate_api_key(key: Option<&str>) -> Result<HeaderValue> {
    let key = key.map(str::trim).filter(|k| !k.is_empty()).ok_or_else(|| {
        Error::Credentials("no API key configured; set GEMINI_API_KEY or APP_GEMINI__API_KEY".into())
    })?;
    if key == PLACEHOLDER_API_KEY {
        return Err(Error::Credentials("API key is still the placeholder value".into()));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(Error::Credentials("API key must not contain whitespace".into()));
    }
    let mut value = HeaderValue::from_str(key)
        .map_err(|_| Error::Credentials("API key contains characters not allowed in a header".into()))?;
    value.set_sensitive(true);
    Ok(value)
}

#[derive(Debug, Serialize)]
pub(crate) struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'a str>,
    pub parts: Vec<Part<'a>>,
}

impl<'a> Content<'a> {
    pub fn text(role: Option<&'a str>, text: &'a str) -> Self {
        Self { role, parts: vec![Part { text }] }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Part<'a> {
    pub text: &'a str,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody { error: ApiError { message, status: Some(status) } }) => format!("{status}: {message}"),
        Ok(ApiErrorBody { error }) => error.message,
        Err(_) if body.trim().is_empty() => "<empty body>".to_string(),
        Err(_) => body.chars().take(500).collect(),
    }
}
