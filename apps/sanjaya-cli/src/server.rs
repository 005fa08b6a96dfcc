//! HTTP front end for browser clients.
//!
//! `POST /api/query` with `{"query": "..."}` runs one `sanjaya` process per
//! request and relays its reply: `{"answer"}` on success, otherwise a 500 with
//! `{"error", "details"}`. A missing or blank query is a 400.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tower_http::cors::CorsLayer;

use sanjaya_rag::Reply;

pub const MISSING_QUERY: &str = "Missing query parameter.";
pub const PROCESS_FAILED: &str = "RAG Process Failed on Server.";
pub const MALFORMED_OUTPUT: &str = "Internal RAG error: Malformed query output.";
const DETAILS_LIMIT: usize = 200;
const FAILURE_HINT: &str = "Check GEMINI_API_KEY and the scripture index assets.";

pub struct AppState {
    query_bin: PathBuf,
    workdir: PathBuf,
}

impl AppState {
    /// `workdir` is where the query process looks for its config and assets.
    pub fn new(query_bin: PathBuf, workdir: PathBuf) -> Self {
        Self { query_bin, workdir }
    }
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerBody {
    pub answer: String,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

pub type ApiResult = Result<Json<AnswerBody>, (StatusCode, Json<ErrorBody>)>;

pub fn router(state: AppState, cors: bool) -> Router {
    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/query", post(query_handler))
        .with_state(Arc::new(state));
    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn query_handler(State(state): State<Arc<AppState>>, Json(request): Json<QueryRequest>) -> ApiResult {
    let query = request
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| error_response(StatusCode::BAD_REQUEST, MISSING_QUERY, None))?;
    tracing::info!(query_len = query.len(), bin = %state.query_bin.display(), "spawning query process");
    let output = Command::new(&state.query_bin)
        .arg(&query)
        .current_dir(&state.workdir)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to start query process");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                PROCESS_FAILED,
                Some(format!("failed to start {}: {e}", state.query_bin.display())),
            )
        })?;
    relay(
        output.status.success(),
        &String::from_utf8_lossy(&output.stdout),
        &String::from_utf8_lossy(&output.stderr),
    )
}

/// Maps a finished query process to the HTTP response.
///
/// A failed process reports the error from its JSON reply, falling back to
/// stderr. A successful process must have printed an answer.
pub fn relay(success: bool, stdout: &str, stderr: &str) -> ApiResult {
    let reply = Reply::from_json(stdout);
    if success {
        return match reply {
            Ok(Reply::Answer { answer }) => Ok(Json(AnswerBody { answer })),
            _ => {
                tracing::error!(output = %stdout, "query process printed malformed output");
                Err(error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    MALFORMED_OUTPUT,
                    Some(stdout.chars().take(DETAILS_LIMIT).collect()),
                ))
            }
        };
    }
    let details = match reply {
        Ok(Reply::Failure { error, .. }) => error,
        _ if !stderr.trim().is_empty() => stderr.trim().to_string(),
        _ => FAILURE_HINT.to_string(),
    };
    tracing::error!(%details, "query process failed");
    Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, PROCESS_FAILED, Some(details)))
}

fn error_response(status: StatusCode, error: &str, details: Option<String>) -> (StatusCode, Json<ErrorBody>) {
    (status, Json(ErrorBody { error: error.to_string(), details }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_is_relayed() {
        let Json(body) = relay(true, "{\"answer\":\"Dharma is duty.\"}\n", "").unwrap();
        assert_eq!(body.answer, "Dharma is duty.");
    }

    #[test]
    fn failed_process_carries_reply_error() {
        let stdout = r#"{"error":"Failed to initialize Gemini client: no key","trace":"Credentials(..)"}"#;
        let (status, Json(body)) = relay(false, stdout, "WARN noise").unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, PROCESS_FAILED);
        assert_eq!(body.details.as_deref(), Some("Failed to initialize Gemini client: no key"));
    }

    #[test]
    fn failed_process_falls_back_to_stderr_then_hint() {
        let (_, Json(body)) = relay(false, "", "  killed  \n").unwrap_err();
        assert_eq!(body.details.as_deref(), Some("killed"));
        let (_, Json(body)) = relay(false, "", "").unwrap_err();
        assert_eq!(body.details.as_deref(), Some(FAILURE_HINT));
    }

    #[test]
    fn malformed_output_is_truncated() {
        let garbage = "x".repeat(500);
        let (status, Json(body)) = relay(true, &garbage, "").unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, MALFORMED_OUTPUT);
        assert_eq!(body.details.map(|d| d.len()), Some(DETAILS_LIMIT));
    }

    #[test]
    fn successful_exit_with_error_reply_is_malformed() {
        let (_, Json(body)) = relay(true, r#"{"error":"e","trace":"t"}"#, "").unwrap_err();
        assert_eq!(body.error, MALFORMED_OUTPUT);
    }
}
