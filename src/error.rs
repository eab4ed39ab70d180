//! Typed errors for the generation endpoint's response contract.
//!
//! Transport failures stay `anyhow` at the call site; these variants cover
//! the shape of what came back once a 2xx body is in hand.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResponseError {
    /// The endpoint returned no candidates at all.
    #[error("response contained no candidates")]
    NoCandidates,

    /// The first candidate carried no content parts.
    #[error("candidate contained no content parts")]
    NoContentParts,

    /// The first content part had no text payload.
    #[error("candidate part contained no text")]
    NoText,

    /// The text payload was not syntactically valid JSON.
    #[error("suggestion payload is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The text payload parsed, but the top level was not an array.
    #[error("suggestion payload is not a JSON array")]
    NotAnArray,

    /// One element of the array did not match the requested record shape.
    #[error("suggestion {index} is malformed: {reason}")]
    MalformedSuggestion { index: usize, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_suggestion_names_index() {
        let err = ResponseError::MalformedSuggestion {
            index: 3,
            reason: "missing field `title`".to_string(),
        };
        assert!(err.to_string().contains("suggestion 3"));
    }
}
