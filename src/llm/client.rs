//! Gemini `generateContent` client.
//!
//! One POST per call, no retry: a failed submission is reported and the
//! user decides whether to try again.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Model used for repository analysis.
pub const GEMINI_MODEL: &str = "gemini-2.5-flash-preview-05-20";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub system_instruction: Content,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

pub struct GeminiClient {
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            GEMINI_API_BASE, GEMINI_MODEL, self.api_key
        )
    }

    /// Perform the single generation call for one submission.
    pub async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let client = reqwest::Client::new();

        let response = client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Keep the body detail in the error so diagnostics can show it,
            // while the UI presents its own generic message.
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                truncate_str(&text, 200)
            ));
        }

        serde_json::from_str(&text)
            .map_err(|e| anyhow::anyhow!("Failed to decode Gemini response: {}", e))
    }
}

/// Truncate a string for display (Unicode-safe)
pub(crate) fn truncate_str(s: &str, max_chars: usize) -> &str {
    if s.chars().count() <= max_chars {
        s
    } else {
        let byte_idx = s
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        &s[..byte_idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::prompt;

    #[test]
    fn test_endpoint_templates_model_and_key() {
        let client = GeminiClient::new("test-key".to_string());
        let endpoint = client.endpoint();
        assert!(endpoint.contains(GEMINI_MODEL));
        assert!(endpoint.ends_with("key=test-key"));
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = prompt::build_request("https://github.com/a/b", "", false);
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("systemInstruction").is_some());
        assert!(body.get("generationConfig").is_some());
        assert!(body["generationConfig"].get("responseMimeType").is_some());
    }

    #[test]
    fn test_response_deserializes_nested_candidates() {
        let raw = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": "[]" }], "role": "model" },
                "finishReason": "STOP"
            }]
        }"#;
        let response: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.candidates.len(), 1);
        let part = &response.candidates[0].content.as_ref().unwrap().parts[0];
        assert_eq!(part.text.as_deref(), Some("[]"));
    }

    #[test]
    fn test_response_tolerates_missing_candidates() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());
    }

    #[test]
    fn test_truncate_str_is_char_safe() {
        assert_eq!(truncate_str("héllo wörld", 5), "héllo");
        assert_eq!(truncate_str("short", 10), "short");
    }
}
