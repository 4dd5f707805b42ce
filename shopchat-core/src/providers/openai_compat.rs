//! OpenAI-compatible completion provider.
//!
//! Works with OpenAI and any endpoint that follows the chat completions API
//! format. One request per call: no streaming, no retry, no client timeout.

use crate::brain::LlmProvider;
use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::types::{CompletionRequest, CompletionResponse, Message, Role, TokenUsage};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

/// Default API root when no `base_url` is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible completion provider.
pub struct OpenAiCompatibleProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: Option<usize>,
}

impl std::fmt::Debug for OpenAiCompatibleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiCompatibleProvider {
    /// Create a provider with an already-resolved API key.
    pub fn new(config: &LlmConfig, api_key: String) -> Self {
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Self {
            client: Client::new(),
            base_url,
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    /// The chat completions endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Convert internal messages to OpenAI JSON format.
    fn messages_to_json(messages: &[Message]) -> Vec<Value> {
        messages
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role.to_string(),
                    "content": msg.content,
                })
            })
            .collect()
    }

    /// Build the JSON request body.
    fn request_body(&self, request: &CompletionRequest) -> Value {
        let mut body = json!({
            "model": request.model.as_deref().unwrap_or(&self.model),
            "messages": Self::messages_to_json(&request.messages),
            "temperature": request.temperature,
            "stream": false,
        });
        if let Some(max_tokens) = request.max_tokens.or(self.max_tokens) {
            body["max_tokens"] = json!(max_tokens);
        }
        body
    }

    /// Parse an OpenAI-format response body, keeping the first choice.
    fn parse_response(body: &Value, model: &str) -> Result<CompletionResponse, LlmError> {
        let choice =
            body.get("choices")
                .and_then(|c| c.get(0))
                .ok_or_else(|| LlmError::ResponseParse {
                    message: "No choices in response".to_string(),
                })?;

        let message = choice
            .get("message")
            .ok_or_else(|| LlmError::ResponseParse {
                message: "No message in choice".to_string(),
            })?;

        let content = message
            .get("content")
            .and_then(|c| c.as_str())
            .unwrap_or("");

        let finish_reason = choice
            .get("finish_reason")
            .and_then(|f| f.as_str())
            .map(|s| s.to_string());

        let usage_obj = body.get("usage");
        let usage = TokenUsage {
            input_tokens: usage_obj
                .and_then(|u| u.get("prompt_tokens"))
                .and_then(|t| t.as_u64())
                .unwrap_or(0) as usize,
            output_tokens: usage_obj
                .and_then(|u| u.get("completion_tokens"))
                .and_then(|t| t.as_u64())
                .unwrap_or(0) as usize,
        };

        let resp_model = body
            .get("model")
            .and_then(|m| m.as_str())
            .unwrap_or(model)
            .to_string();

        Ok(CompletionResponse {
            message: Message::new(Role::Assistant, content),
            usage,
            model: resp_model,
            finish_reason,
        })
    }

    fn map_http_error(status: reqwest::StatusCode, body: &str) -> LlmError {
        match status.as_u16() {
            401 => {
                debug!(body = %body, "Authentication failed (401)");
                LlmError::AuthFailed {
                    provider: "OpenAI-compatible".to_string(),
                }
            }
            429 => {
                // "Rate limit reached ... Please try again in 20s."
                let retry_secs = serde_json::from_str::<Value>(body)
                    .ok()
                    .and_then(|v| {
                        v.get("error")?
                            .get("message")?
                            .as_str()
                            .map(|s| s.to_string())
                    })
                    .and_then(|msg| {
                        msg.split("in ")
                            .last()
                            .and_then(|s| s.trim_end_matches('.').trim_end_matches('s').parse::<u64>().ok())
                    })
                    .unwrap_or(5);
                LlmError::RateLimited {
                    retry_after_secs: retry_secs,
                }
            }
            status if status >= 500 => LlmError::ApiRequest {
                message: format!("Server error ({}): {}", status, body),
            },
            _ => LlmError::ApiRequest {
                message: format!("HTTP {}: {}", status, body),
            },
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let url = self.endpoint();
        let body = self.request_body(&request);

        debug!(url = %url, model = %self.model, messages = request.messages.len(), "Sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest {
                message: format!("Request failed: {}", e),
            })?;

        let status = response.status();
        let response_body = response.text().await.map_err(|e| LlmError::ApiRequest {
            message: format!("Failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            return Err(Self::map_http_error(status, &response_body));
        }

        let json: Value =
            serde_json::from_str(&response_body).map_err(|e| LlmError::ResponseParse {
                message: format!("Invalid JSON: {}", e),
            })?;

        Self::parse_response(&json, &self.model)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> LlmConfig {
        LlmConfig {
            model: "gpt-4o-mini".to_string(),
            base_url: Some("http://127.0.0.1:9/v1/".to_string()),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let provider = OpenAiCompatibleProvider::new(&test_config(), "sk-test".into());
        assert_eq!(provider.endpoint(), "http://127.0.0.1:9/v1/chat/completions");
    }

    #[test]
    fn test_default_endpoint() {
        let provider = OpenAiCompatibleProvider::new(&LlmConfig::default(), "sk-test".into());
        assert_eq!(
            provider.endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let provider = OpenAiCompatibleProvider::new(&test_config(), "sk-secret".into());
        let shown = format!("{provider:?}");
        assert!(shown.contains("gpt-4o-mini"));
        assert!(!shown.contains("sk-secret"));
    }

    #[test]
    fn test_messages_to_json() {
        let messages = vec![Message::system("You are helpful"), Message::user("Hello")];
        let json = OpenAiCompatibleProvider::messages_to_json(&messages);
        assert_eq!(json.len(), 2);
        assert_eq!(json[0]["role"], "system");
        assert_eq!(json[0]["content"], "You are helpful");
        assert_eq!(json[1]["role"], "user");
        assert_eq!(json[1]["content"], "Hello");
    }

    #[test]
    fn test_request_body_shape() {
        let provider = OpenAiCompatibleProvider::new(&test_config(), "sk-test".into());
        let request = CompletionRequest {
            messages: vec![Message::user("Any tents?")],
            temperature: 0.4,
            ..Default::default()
        };
        let body = provider.request_body(&request);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["stream"], false);
        assert!((body["temperature"].as_f64().unwrap() - 0.4).abs() < 1e-6);
        assert_eq!(body["messages"][0]["content"], "Any tents?");
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_request_body_model_override_and_max_tokens() {
        let config = LlmConfig {
            max_tokens: Some(256),
            ..test_config()
        };
        let provider = OpenAiCompatibleProvider::new(&config, "sk-test".into());
        let request = CompletionRequest {
            model: Some("gpt-4o".to_string()),
            ..Default::default()
        };
        let body = provider.request_body(&request);
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 256);
    }

    #[test]
    fn test_parse_response_first_choice() {
        let body = json!({
            "model": "gpt-4o-mini-2024-07-18",
            "choices": [
                {"message": {"role": "assistant", "content": "The Backpack is $49.99."}, "finish_reason": "stop"},
                {"message": {"role": "assistant", "content": "ignored"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 120, "completion_tokens": 12}
        });
        let resp = OpenAiCompatibleProvider::parse_response(&body, "gpt-4o-mini").unwrap();
        assert_eq!(resp.message.role, Role::Assistant);
        assert_eq!(resp.message.content, "The Backpack is $49.99.");
        assert_eq!(resp.model, "gpt-4o-mini-2024-07-18");
        assert_eq!(resp.finish_reason.as_deref(), Some("stop"));
        assert_eq!(resp.usage.input_tokens, 120);
        assert_eq!(resp.usage.output_tokens, 12);
    }

    #[test]
    fn test_parse_response_null_content() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": null}}]});
        let resp = OpenAiCompatibleProvider::parse_response(&body, "m").unwrap();
        assert_eq!(resp.message.content, "");
        assert_eq!(resp.model, "m");
        assert_eq!(resp.usage, TokenUsage::default());
    }

    #[test]
    fn test_parse_response_no_choices() {
        let body = json!({"choices": []});
        let err = OpenAiCompatibleProvider::parse_response(&body, "m").unwrap_err();
        assert!(matches!(err, LlmError::ResponseParse { .. }));
    }

    #[test]
    fn test_map_http_error_auth() {
        let err = OpenAiCompatibleProvider::map_http_error(reqwest::StatusCode::UNAUTHORIZED, "{}");
        assert!(matches!(err, LlmError::AuthFailed { .. }));
    }

    #[test]
    fn test_map_http_error_rate_limited() {
        let body = r#"{"error": {"message": "Rate limit reached. Please try again in 20s."}}"#;
        let err =
            OpenAiCompatibleProvider::map_http_error(reqwest::StatusCode::TOO_MANY_REQUESTS, body);
        assert!(matches!(err, LlmError::RateLimited { retry_after_secs: 20 }));
    }

    #[test]
    fn test_map_http_error_rate_limited_default_backoff() {
        let err = OpenAiCompatibleProvider::map_http_error(
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            "not json",
        );
        assert!(matches!(err, LlmError::RateLimited { retry_after_secs: 5 }));
    }

    #[test]
    fn test_map_http_error_server() {
        let err = OpenAiCompatibleProvider::map_http_error(
            reqwest::StatusCode::BAD_GATEWAY,
            "upstream down",
        );
        match err {
            LlmError::ApiRequest { message } => {
                assert!(message.contains("Server error"));
                assert!(message.contains("upstream down"));
            }
            other => panic!("Expected ApiRequest, got {other:?}"),
        }
    }
}
