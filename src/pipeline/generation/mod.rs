//! Remote generation backend.
//!
//! The session only sees [`LlmGenerate`]; the OpenAI client is one
//! implementation, the mock and failing generators are the others.

pub mod openai;
pub mod prompt;

pub use openai::OpenAiClient;
pub use prompt::{build_user_summary, SYSTEM_PROMPT};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Cannot reach generation endpoint at {0}")]
    Connection(String),

    #[error("Generation endpoint returned error (status {status}): {body}")]
    Http { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("No API key configured")]
    MissingApiKey,

    #[error("Generation endpoint returned an empty reply")]
    EmptyReply,
}

/// Chat-style text generation (allows mocking).
pub trait LlmGenerate {
    fn generate(&self, system: &str, prompt: &str) -> Result<String, GenerationError>;

    /// Identifier written to the session log.
    fn model(&self) -> &str;
}

/// Trim the reply and drop a Markdown code fence wrapped around it.
pub fn clean_output(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    // Skip the info string (```markdown).
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim().to_string()
}

// ═══════════════════════════════════════════
// Test doubles
// ═══════════════════════════════════════════

/// Returns a fixed reply. Records nothing.
pub struct MockGenerator {
    response: String,
    model: String,
}

impl MockGenerator {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            model: "mock-model".to_string(),
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }
}

impl LlmGenerate for MockGenerator {
    fn generate(&self, _system: &str, _prompt: &str) -> Result<String, GenerationError> {
        Ok(self.response.clone())
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Always fails with a connection error.
pub struct FailingGenerator;

impl LlmGenerate for FailingGenerator {
    fn generate(&self, _system: &str, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Connection("http://unreachable.invalid".into()))
    }

    fn model(&self) -> &str {
        "failing-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_output_trims_plain_text() {
        assert_eq!(clean_output("  ## 避ける動き\n- a\n\n"), "## 避ける動き\n- a");
    }

    #[test]
    fn clean_output_strips_fence_with_info_string() {
        let raw = "```markdown\n## 受診の目安\n- 発熱\n```";
        assert_eq!(clean_output(raw), "## 受診の目安\n- 発熱");
    }

    #[test]
    fn clean_output_strips_bare_fence() {
        assert_eq!(clean_output("```\n- a\n```\n"), "- a");
    }

    #[test]
    fn clean_output_tolerates_unclosed_fence() {
        assert_eq!(clean_output("```md\n- a"), "- a");
    }

    #[test]
    fn mock_returns_fixed_reply() {
        let mock = MockGenerator::new("hello").with_model("gpt-test");
        assert_eq!(mock.generate("s", "p").unwrap(), "hello");
        assert_eq!(mock.model(), "gpt-test");
    }

    #[test]
    fn failing_generator_errors() {
        let err = FailingGenerator.generate("s", "p").unwrap_err();
        assert!(matches!(err, GenerationError::Connection(_)));
        assert!(err.to_string().contains("unreachable"));
    }
}
