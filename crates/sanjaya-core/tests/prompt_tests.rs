use sanjaya_core::prompt::{assemble, INSTRUCTION, PERSONA, REFERENCE_HEADER};
use sanjaya_core::types::{GenerationParams, RetrievedContext};

#[test]
fn empty_context_omits_reference_block() {
    let prompt = assemble("What is dharma?", &RetrievedContext::empty());
    assert_eq!(
        prompt.user_prompt,
        format!("USER QUESTION: What is dharma?\n\n{INSTRUCTION}")
    );
    assert!(!prompt.user_prompt.contains("REFERENCE MATERIAL"));
    assert_eq!(prompt.system_instruction, PERSONA);
}

#[test]
fn context_is_joined_under_reference_header() {
    let context = RetrievedContext::from(vec!["Karma yoga".to_string(), "Bhakti".to_string()]);
    let prompt = assemble("Paths?", &context);
    let expected_tail = format!("\n\n{REFERENCE_HEADER}\nKarma yoga\n---\nBhakti");
    assert!(prompt.user_prompt.ends_with(&expected_tail), "{}", prompt.user_prompt);
    assert!(prompt.user_prompt.contains("REFERENCE MATERIAL"));
}

#[test]
fn reference_marker_present_iff_context_non_empty() {
    for n in 0..4 {
        let chunks: Vec<String> = (0..n).map(|i| format!("chunk {i}")).collect();
        let prompt = assemble("q", &RetrievedContext::from(chunks));
        assert_eq!(prompt.user_prompt.contains("REFERENCE MATERIAL"), n > 0);
    }
}

#[test]
fn persona_forbids_headers_and_names_the_guide() {
    assert!(PERSONA.starts_with("You are Sanjaya"));
    assert!(PERSONA.contains("Do NOT use markdown headers"));
    assert!(PERSONA.contains("According to the context below"));
}

#[test]
fn into_request_carries_params() {
    let request = assemble("q", &RetrievedContext::empty()).into_request(GenerationParams::default());
    assert_eq!(request.params.temperature, 0.3);
    assert_eq!(request.params.max_output_tokens, 2048);
    assert_eq!(request.system_instruction, PERSONA);
}
