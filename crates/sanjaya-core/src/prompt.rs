//! Prompt assembly: persona, fixed instruction and the optional reference block.

use crate::types::{GenerationParams, GenerationRequest, RetrievedContext};

pub const PERSONA: &str = concat!(
    "You are Sanjaya, a wise and concise AI guide on the Gita, Ramayana, and Mahabharata. ",
    "Your goal is to answer the user's question directly and clearly. ",
    "1. Start with a simple, respectful greeting (e.g., 'Namaste, seeker'). ",
    "2. Immediately provide the direct answer to the question based on the scriptures. ",
    "3. Do NOT use markdown headers (like ## or ###). Do NOT use hashtags. ",
    "4. You may use bolding for key terms. ",
    "5. Keep the tone helpful and conversational, not like a long sermon or essay. ",
    "6. If you use the provided context, integrate it naturally without saying 'According to the context below'."
);

pub const INSTRUCTION: &str = concat!(
    "INSTRUCTION: Answer the user directly using your knowledge and the reference material below. ",
    "Avoid long introductions. Get straight to the point after a brief greeting."
);

pub const REFERENCE_HEADER: &str = "--- REFERENCE MATERIAL ---";

/// Joins consecutive reference chunks inside the block.
pub const REFERENCE_JOINER: &str = "\n---\n";

/// The system directive and user message for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system_instruction: &'static str,
    pub user_prompt: String,
}

impl Prompt {
    pub fn into_request(self, params: GenerationParams) -> GenerationRequest {
        GenerationRequest {
            system_instruction: self.system_instruction.to_string(),
            user_prompt: self.user_prompt,
            params,
        }
    }
}

/// Builds the prompt for `question`. The reference block is only present when
/// `context` holds at least one chunk; an empty context leaves no trace.
pub fn assemble(question: &str, context: &RetrievedContext) -> Prompt {
    let mut user_prompt = format!("USER QUESTION: {question}\n\n{INSTRUCTION}");
    if !context.is_empty() {
        user_prompt.push_str("\n\n");
        user_prompt.push_str(REFERENCE_HEADER);
        user_prompt.push('\n');
        user_prompt.push_str(&context.chunks().join(REFERENCE_JOINER));
    }
    Prompt { system_instruction: PERSONA, user_prompt }
}
