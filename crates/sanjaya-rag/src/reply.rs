use serde::{Deserialize, Serialize};

pub const READY_MESSAGE: &str = "System Ready. Please provide a query argument.";

/// The single JSON object written to stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Answer { answer: String },
    Failure { error: String, trace: String },
}

impl Reply {
    pub fn ready() -> Self {
        Self::answer(READY_MESSAGE)
    }

    pub fn answer(text: impl Into<String>) -> Self {
        Self::Answer { answer: text.into() }
    }

    pub fn failure(error: impl Into<String>, trace: impl Into<String>) -> Self {
        Self::Failure { error: error.into(), trace: trace.into() }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Answer { .. } => 0,
            Self::Failure { .. } => 1,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parses one reply line written by the query tool.
    pub fn from_json(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line.trim())
    }
}
