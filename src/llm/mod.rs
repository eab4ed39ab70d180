//! Gemini-backed suggestion generation.
//!
//! One submission means one request: build the prompt and schema, call the
//! endpoint once, validate the shape of what came back. No retries; a
//! failed attempt surfaces to the user, who resubmits by hand.

pub mod client;
pub mod parse;
pub mod prompt;

use crate::config;
use crate::suggest::Suggestion;
use anyhow::Result;

pub use client::GeminiClient;

/// One submission's worth of inputs, assembled fresh each time the form is
/// submitted and discarded afterwards.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub repo_url: String,
    /// Optional free-text goal to bias suggestions toward.
    pub user_goal: String,
    pub scan_todos: bool,
}

/// Check whether suggestion generation is available (API key configured).
pub fn is_available() -> bool {
    config::has_api_key()
}

/// Run one analysis end to end: compose the request, call the endpoint,
/// validate and parse the suggestions.
pub async fn fetch_suggestions(request: &AnalysisRequest) -> Result<Vec<Suggestion>> {
    let api_key = config::api_key().ok_or_else(|| {
        anyhow::anyhow!("No API key configured. Run 'bountyscout --setup' to get started.")
    })?;

    let payload = prompt::build_request(&request.repo_url, &request.user_goal, request.scan_todos);
    let client = GeminiClient::new(api_key);
    let response = client.generate(&payload).await?;

    let suggestions = parse::suggestions_from_response(&response)?;
    Ok(suggestions)
}
