use sanjaya_core::config::GeminiSettings;
use sanjaya_core::prompt::assemble;
use sanjaya_core::types::{GenerationParams, RetrievedContext};
use sanjaya_gemini::generate::GenerateContentRequest;
use sanjaya_gemini::{validate_api_key, GeminiClient, GenerateContentResponse, PLACEHOLDER_API_KEY};

#[test]
fn request_separates_system_instruction_from_user_message() {
    let request = assemble("What is dharma?", &RetrievedContext::empty())
        .into_request(GenerationParams::default());
    let body = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();

    assert_eq!(body["systemInstruction"]["parts"][0]["text"], request.system_instruction.as_str());
    assert!(body["systemInstruction"].get("role").is_none());
    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 1, "single-turn request");
    assert_eq!(contents[0]["role"], "user");
    assert_eq!(contents[0]["parts"][0]["text"], request.user_prompt.as_str());
    assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
    let temperature = body["generationConfig"]["temperature"].as_f64().unwrap();
    assert!((temperature - 0.3).abs() < 1e-6);
}

#[test]
fn response_text_is_joined_and_trimmed() {
    let resp: GenerateContentResponse = serde_json::from_str(
        r#"{"candidates":[{"content":{"role":"model","parts":[
            {"text":"thinking...","thought":true},
            {"text":"  Namaste, seeker. "},
            {"text":"**Dharma** is duty.\n"}
        ]},"finishReason":"STOP"}]}"#,
    )
    .unwrap();
    assert_eq!(resp.into_text().unwrap(), "Namaste, seeker. **Dharma** is duty.");
}

#[test]
fn blocked_prompt_reports_reason() {
    let resp: GenerateContentResponse =
        serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
    assert_eq!(resp.into_text().unwrap_err(), "prompt was blocked (SAFETY)");
}

#[test]
fn candidate_without_text_is_an_error() {
    let resp: GenerateContentResponse =
        serde_json::from_str(r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#).unwrap();
    assert!(resp.into_text().unwrap_err().contains("MAX_TOKENS"));
}

#[test]
fn credentials_are_checked_before_any_call() {
    assert!(validate_api_key(None).is_err());
    assert!(validate_api_key(Some("   ")).is_err());
    assert!(validate_api_key(Some(PLACEHOLDER_API_KEY)).is_err());
    assert!(validate_api_key(Some("abc def")).is_err());
    assert!(validate_api_key(Some("AIzaSyExampleKey_123")).is_ok());

    let settings = GeminiSettings::default();
    let err = GeminiClient::new(&settings).err().unwrap();
    assert!(err.to_string().starts_with("Invalid credentials"));
}
