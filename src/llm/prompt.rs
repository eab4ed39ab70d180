//! Prompt and schema construction for the analysis request.
//!
//! Clause order matters: base analysis, then the optional TODO-scan and
//! goal-bias clauses, then the formatting directive. The response schema
//! is what keeps parsing simple downstream, so the request always asks for
//! strict JSON output.

use super::client::{Content, GenerateRequest, GenerationConfig, Part};
use serde_json::{json, Value};

pub const SYSTEM_PROMPT: &str = "You are an expert software developer creating a public bounty for an open-source project. Your tone should be professional, clear, and encouraging to attract contributors. \
Your task is to analyze a public GitHub repository and identify potential areas for improvement that can be turned into actionable tasks.";

const TODO_SCAN_CLAUSE: &str = "Additionally, scan the codebase for comments like \"// TODO:\" or \"// FIXME:\" and convert them into formal issues. Prioritize these TODO-based issues in the list.";

const FORMAT_DIRECTIVE: &str = r#"For each suggestion, provide a clear title and a detailed description. The description must be in Markdown and formatted exactly like this:

### Problem
A clear and concise explanation of the problem or the area for improvement.

### Proposed Solution
A detailed, step-by-step guide on how to implement the solution. Be specific.

### Required Technologies
A list of any specific libraries, frameworks, or technologies a developer might need to complete this task. If none, state "None".

Finally, provide a 'type' ('improvement', 'vulnerability', 'feature', 'todo') and an array of 2-3 relevant 'tags' (e.g., 'Refactor', 'Frontend', 'Security')."#;

/// Compose the user query. Each optional clause is appended only when its
/// input calls for it; the formatting directive always comes last.
pub fn build_user_query(repo_url: &str, user_goal: &str, scan_todos: bool) -> String {
    let mut query = format!(
        "Analyze the GitHub repository at this URL: {}. \
         Based on the repository's README, file structure, and overall purpose, \
         generate up to 5 concrete suggestions for improvement.",
        repo_url
    );

    if scan_todos {
        query.push_str("\n\n");
        query.push_str(TODO_SCAN_CLAUSE);
    }

    if !user_goal.is_empty() {
        query.push_str(&format!(
            "\n\nPay special attention to the following user goal: \"{}\". \
             The suggestions should be tailored to help achieve this goal.",
            user_goal
        ));
    }

    query.push_str("\n\n");
    query.push_str(FORMAT_DIRECTIVE);
    query
}

/// The strict output schema sent with the request: an array of objects
/// with required `title`, `description`, `tags`, and enumerated `type`.
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "description": { "type": "STRING" },
                "tags": { "type": "ARRAY", "items": { "type": "STRING" } },
                "type": {
                    "type": "STRING",
                    "enum": ["improvement", "vulnerability", "feature", "todo"]
                }
            },
            "required": ["title", "description", "tags", "type"]
        }
    })
}

/// Assemble the full request body for one submission.
pub fn build_request(repo_url: &str, user_goal: &str, scan_todos: bool) -> GenerateRequest {
    GenerateRequest {
        system_instruction: Content {
            parts: vec![Part {
                text: SYSTEM_PROMPT.to_string(),
            }],
        },
        contents: vec![Content {
            parts: vec![Part {
                text: build_user_query(repo_url, user_goal, scan_todos),
            }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: response_schema(),
        },
    }
}
