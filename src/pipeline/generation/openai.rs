use serde::{Deserialize, Serialize};

use super::{GenerationError, LlmGenerate};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.6;

/// Blocking client for an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    timeout_secs: u64,
    client: reqwest::blocking::Client,
}

impl OpenAiClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, GenerationError> {
        if api_key.trim().is_empty() {
            return Err(GenerationError::MissingApiKey);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GenerationError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            model: model.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs,
            client,
        })
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Request body for /chat/completions
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body from /chat/completions
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Pull the first choice's content out of a response body.
fn parse_reply(body: &str) -> Result<String, GenerationError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::ResponseParsing(e.to_string()))?;
    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();
    if content.trim().is_empty() {
        return Err(GenerationError::EmptyReply);
    }
    Ok(content)
}

impl LlmGenerate for OpenAiClient {
    fn generate(&self, system: &str, prompt: &str) -> Result<String, GenerationError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    GenerationError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    GenerationError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    GenerationError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .map_err(|e| GenerationError::ResponseParsing(e.to_string()))?;
        let reply = parse_reply(&text)?;

        tracing::debug!(model = %self.model, reply_chars = reply.chars().count(), "Remote reply received");
        Ok(reply)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_rejected() {
        let result = OpenAiClient::new(DEFAULT_BASE_URL, "  ", DEFAULT_MODEL, 60);
        assert!(matches!(result, Err(GenerationError::MissingApiKey)));
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let client = OpenAiClient::new("http://localhost:8080/v1/", "sk-test", DEFAULT_MODEL, 5).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(client.model(), DEFAULT_MODEL);
    }

    #[test]
    fn request_body_shape() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: [
                ChatMessage { role: "system", content: "sys" },
                ChatMessage { role: "user", content: "usr" },
            ],
            temperature: 0.6,
        };
        let json: serde_json::Value = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "usr");
        assert!((json["temperature"].as_f64().unwrap() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn parse_reply_takes_first_choice() {
        let body = r###"{"choices":[{"message":{"role":"assistant","content":"## 避ける動き\n- a"}},{"message":{"content":"second"}}]}"###;
        assert_eq!(parse_reply(body).unwrap(), "## 避ける動き\n- a");
    }

    #[test]
    fn parse_reply_rejects_empty_content() {
        let body = r#"{"choices":[{"message":{"content":"   "}}]}"#;
        assert!(matches!(parse_reply(body), Err(GenerationError::EmptyReply)));
        let no_choices = r#"{"choices":[]}"#;
        assert!(matches!(parse_reply(no_choices), Err(GenerationError::EmptyReply)));
        let null_content = r#"{"choices":[{"message":{"content":null}}]}"#;
        assert!(matches!(parse_reply(null_content), Err(GenerationError::EmptyReply)));
    }

    #[test]
    fn parse_reply_rejects_malformed_json() {
        assert!(matches!(
            parse_reply("<html>bad gateway</html>"),
            Err(GenerationError::ResponseParsing(_))
        ));
    }

    #[test]
    fn unreachable_endpoint_is_an_error() {
        let client = OpenAiClient::new("http://127.0.0.1:1", "sk-test", DEFAULT_MODEL, 2).unwrap();
        assert!(client.generate("s", "p").is_err());
    }
}
