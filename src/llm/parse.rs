//! Response validation: from raw endpoint payload to suggestion records.
//!
//! Every step is a hard precondition. A response that fails any of them
//! aborts the submission; there are no partial results.

use super::client::GenerateResponse;
use crate::error::ResponseError;
use crate::suggest::Suggestion;
use serde_json::Value;

/// Extract the generated text from the first candidate's first part.
pub fn extract_text(response: &GenerateResponse) -> Result<&str, ResponseError> {
    let candidate = response
        .candidates
        .first()
        .ok_or(ResponseError::NoCandidates)?;

    let content = candidate
        .content
        .as_ref()
        .ok_or(ResponseError::NoContentParts)?;

    let part = content.parts.first().ok_or(ResponseError::NoContentParts)?;

    part.text.as_deref().ok_or(ResponseError::NoText)
}

/// Parse the generated text as a JSON array of suggestion records,
/// validating each element against the requested shape. A single bad
/// element fails the whole batch with its index, rather than letting an
/// off-schema record through to rendering.
pub fn parse_suggestions(text: &str) -> Result<Vec<Suggestion>, ResponseError> {
    let value: Value = serde_json::from_str(text).map_err(ResponseError::InvalidJson)?;

    let elements = match value {
        Value::Array(elements) => elements,
        _ => return Err(ResponseError::NotAnArray),
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            serde_json::from_value::<Suggestion>(element).map_err(|e| {
                ResponseError::MalformedSuggestion {
                    index,
                    reason: e.to_string(),
                }
            })
        })
        .collect()
}

/// Full validation pipeline for one response.
pub fn suggestions_from_response(
    response: &GenerateResponse,
) -> Result<Vec<Suggestion>, ResponseError> {
    let text = extract_text(response)?;
    parse_suggestions(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::SuggestionKind;

    fn wrap(text: &str) -> GenerateResponse {
        let raw = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }] }
            }]
        });
        serde_json::from_value(raw).unwrap()
    }

    const VALID: &str = r####"[
        {"title":"Add CI","description":"### Problem\nNo CI.","type":"improvement","tags":["Testing","Backend"]},
        {"title":"Fix XSS","description":"### Problem\nUnescaped input.","type":"vulnerability","tags":["Security"]}
    ]"####;

    #[test]
    fn test_valid_response_yields_ordered_records() {
        let suggestions = suggestions_from_response(&wrap(VALID)).unwrap();
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].title, "Add CI");
        assert_eq!(suggestions[1].kind, SuggestionKind::Vulnerability);
    }

    #[test]
    fn test_missing_candidates_is_typed_error() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        let err = suggestions_from_response(&response).unwrap_err();
        assert!(matches!(err, ResponseError::NoCandidates));
    }

    #[test]
    fn test_missing_parts_is_typed_error() {
        let raw = serde_json::json!({ "candidates": [{ "content": { "parts": [] } }] });
        let response: GenerateResponse = serde_json::from_value(raw).unwrap();
        let err = suggestions_from_response(&response).unwrap_err();
        assert!(matches!(err, ResponseError::NoContentParts));
    }

    #[test]
    fn test_missing_text_is_typed_error() {
        let raw = serde_json::json!({ "candidates": [{ "content": { "parts": [{}] } }] });
        let response: GenerateResponse = serde_json::from_value(raw).unwrap();
        let err = suggestions_from_response(&response).unwrap_err();
        assert!(matches!(err, ResponseError::NoText));
    }

    #[test]
    fn test_invalid_json_is_typed_error() {
        let err = parse_suggestions("not json at all").unwrap_err();
        assert!(matches!(err, ResponseError::InvalidJson(_)));
    }

    #[test]
    fn test_non_array_payload_is_rejected() {
        let err = parse_suggestions(r#"{"suggestions": []}"#).unwrap_err();
        assert!(matches!(err, ResponseError::NotAnArray));
    }

    #[test]
    fn test_malformed_record_names_its_index() {
        let mixed = r#"[
            {"title":"ok","description":"d","type":"feature","tags":["UI/UX"]},
            {"description":"missing title","type":"feature","tags":[]}
        ]"#;
        let err = parse_suggestions(mixed).unwrap_err();
        match err {
            ResponseError::MalformedSuggestion { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("title"));
            }
            other => panic!("expected MalformedSuggestion, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let bad = r#"[{"title":"t","description":"d","type":"chore","tags":[]}]"#;
        let err = parse_suggestions(bad).unwrap_err();
        assert!(matches!(
            err,
            ResponseError::MalformedSuggestion { index: 0, .. }
        ));
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(parse_suggestions("[]").unwrap().is_empty());
    }
}
