//! HttpReplyGenerator -- concrete [`ReplyGenerator`] implementation backed by
//! an external HTTP generation service.
//!
//! Sends one POST to `{base_url}/generate` per call with the persona, the
//! prior history, and the new user text. No retries: the turn coordinator
//! owns the timeout and the fallback reply.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use junochat_core::reply::generator::ReplyGenerator;
use junochat_types::chat::MessageRole;
use junochat_types::config::GeneratorConfig;
use junochat_types::reply::{GenerationError, HistoryEntry};

/// HTTP client for the reply generation service.
pub struct HttpReplyGenerator {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpReplyGenerator {
    /// Create a new generator targeting `base_url`.
    ///
    /// The timeout applies to the whole request including connect time.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Create a generator from the `[generator]` config section.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a generation call into the service's wire request.
    fn to_wire_request(
        &self,
        persona: &str,
        history: &[HistoryEntry],
        prompt: &str,
    ) -> GenerateRequest {
        let history = history
            .iter()
            .map(|entry| WireHistoryEntry {
                sender: sender_label(&entry.role).to_string(),
                text: entry.text.clone(),
            })
            .collect();

        GenerateRequest {
            bot_description: persona.to_string(),
            history,
            user_prompt: prompt.to_string(),
        }
    }
}

/// The sender label the generation service expects for each role.
fn sender_label(role: &MessageRole) -> &'static str {
    match role {
        MessageRole::User => "user",
        MessageRole::Assistant => "bot",
    }
}

/// Request body for the generation service.
#[derive(Debug, Clone, Serialize)]
struct GenerateRequest {
    bot_description: String,
    history: Vec<WireHistoryEntry>,
    user_prompt: String,
}

/// A single prior message on the wire.
#[derive(Debug, Clone, Serialize)]
struct WireHistoryEntry {
    sender: String,
    text: String,
}

/// Response body from the generation service.
#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    bot_reply: Option<String>,
}

impl ReplyGenerator for HttpReplyGenerator {
    fn name(&self) -> &str {
        "http"
    }

    async fn generate(
        &self,
        persona: &str,
        history: &[HistoryEntry],
        prompt: &str,
    ) -> Result<String, GenerationError> {
        let body = self.to_wire_request(persona, history, prompt);
        let url = self.url("/generate");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(self.timeout.as_secs())
                } else {
                    GenerationError::Unreachable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Http {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(format!("failed to parse response: {e}")))?;

        let reply = payload
            .bot_reply
            .ok_or_else(|| GenerationError::Malformed("response missing bot_reply".to_string()))?;

        if reply.trim().is_empty() {
            return Err(GenerationError::Malformed("empty bot_reply".to_string()));
        }

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_generator() -> HttpReplyGenerator {
        HttpReplyGenerator::new("http://localhost:5000", Duration::from_secs(60))
    }

    #[test]
    fn test_generator_name() {
        assert_eq!(make_generator().name(), "http");
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let generator = HttpReplyGenerator::new("http://localhost:5000/", Duration::from_secs(60));
        assert_eq!(generator.url("/generate"), "http://localhost:5000/generate");
    }

    #[test]
    fn test_from_config_defaults() {
        let generator = HttpReplyGenerator::from_config(&GeneratorConfig::default());
        assert_eq!(generator.url("/generate"), "http://localhost:5000/generate");
        assert_eq!(generator.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_wire_request_serialization() {
        let generator = make_generator();
        let history = vec![
            HistoryEntry::new(MessageRole::User, "Hello"),
            HistoryEntry::new(MessageRole::Assistant, "Hi, I'm Juno."),
        ];

        let request = generator.to_wire_request("A cheerful robot.", &history, "How are you?");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["bot_description"], "A cheerful robot.");
        assert_eq!(json["user_prompt"], "How are you?");
        assert_eq!(json["history"][0]["sender"], "user");
        assert_eq!(json["history"][0]["text"], "Hello");
        assert_eq!(json["history"][1]["sender"], "bot");
        assert_eq!(json["history"][1]["text"], "Hi, I'm Juno.");
        assert!(json.get("chat_id").is_none());
    }

    #[test]
    fn test_response_missing_reply_field() {
        let payload: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(payload.bot_reply.is_none());
    }

    #[test]
    fn test_response_with_reply() {
        let payload: GenerateResponse =
            serde_json::from_str(r#"{"bot_reply": "Hello there!"}"#).unwrap();
        assert_eq!(payload.bot_reply.as_deref(), Some("Hello there!"));
    }
}
