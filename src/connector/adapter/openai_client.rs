use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::CompletionService;
use crate::domain::{ChatLog, CompletionParams, DomainError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Chat completions request payload.
#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: Option<&'a str>,
}

/// Minimal subset of the chat completions response we care about.
#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// HTTP client for the OpenAI chat completions API and compatible servers.
///
/// The client is an explicitly constructed dependency: build one with
/// [`OpenAiClient::new`] or [`OpenAiClient::from_env`] and hand it to the
/// repository. The API key never lives in a process-wide static.
///
/// ```text
/// OPENAI_API_KEY=sk-...
/// OPENAI_BASE_URL=https://api.openai.com
/// OPENAI_MODEL=gpt-3.5-turbo
/// ```
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    /// Full endpoint URL (base + COMPLETIONS_PATH).
    url: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{}", base.trim_end_matches('/'), COMPLETIONS_PATH);
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            url,
        }
    }

    /// Construct from environment variables:
    ///
    /// | Variable          | Default                  | Purpose              |
    /// |-------------------|--------------------------|----------------------|
    /// | `OPENAI_API_KEY`  | required                 | Bearer credential    |
    /// | `OPENAI_BASE_URL` | `https://api.openai.com` | Any compatible server|
    ///
    /// Returns `None` when no key is configured.
    pub fn from_env() -> Option<Self> {
        let key = std::env::var("OPENAI_API_KEY").ok()?;
        let base = std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Some(Self::new(key, base))
    }

    /// Model override from `OPENAI_MODEL`, if set.
    pub fn model_from_env() -> Option<String> {
        std::env::var("OPENAI_MODEL").ok().filter(|m| !m.trim().is_empty())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn build_request<'a>(messages: &'a [ChatLog], params: &'a CompletionParams) -> ApiRequest<'a> {
        ApiRequest {
            model: params.model(),
            messages: messages
                .iter()
                .map(|log| ApiMessage {
                    role: log.role().as_str(),
                    content: log.content(),
                })
                .collect(),
            max_tokens: params.max_tokens(),
            top_p: params.top_p(),
            frequency_penalty: params.frequency_penalty(),
            presence_penalty: params.presence_penalty(),
        }
    }

    fn parse_response(body: &str) -> Result<Option<String>, DomainError> {
        let api_response: ApiResponse = serde_json::from_str(body).map_err(|e| {
            DomainError::invalid_response(format!("OpenAiClient: failed to parse response: {e}"))
        })?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| DomainError::invalid_response("OpenAiClient: response had no choices"))
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatLog],
        params: &CompletionParams,
    ) -> Result<Option<String>, DomainError> {
        let request = Self::build_request(messages, params);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                DomainError::service_unavailable(format!("OpenAiClient: request failed: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            DomainError::service_unavailable(format!("OpenAiClient: failed to read response: {e}"))
        })?;

        if !status.is_success() {
            warn!("OpenAiClient: API returned {status}: {body}");
            return Err(DomainError::service_unavailable(format!(
                "OpenAiClient: API returned {status}"
            )));
        }

        debug!("OpenAiClient raw response: {body}");
        Self::parse_response(&body)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_joins_base_url_and_path() {
        let client = OpenAiClient::new("key", "http://localhost:1234/");
        assert_eq!(client.url(), "http://localhost:1234/v1/chat/completions");
    }

    #[test]
    fn request_carries_full_log_and_sampling_params() {
        let log = vec![ChatLog::user("what?"), ChatLog::assistant("42"), ChatLog::user("why?")];
        let params = CompletionParams::default();
        let request = OpenAiClient::build_request(&log, &params);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["max_tokens"], 1024);
        assert_eq!(json["top_p"], 0.5);
        assert_eq!(json["frequency_penalty"], 0.5);
        assert_eq!(json["presence_penalty"], 0.5);

        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[1]["content"], "42");
        assert_eq!(messages[2]["content"], "why?");
    }

    #[test]
    fn parse_response_returns_first_choice_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"42"}},{"message":{"content":"other"}}]}"#;
        let content = OpenAiClient::parse_response(body).unwrap();
        assert_eq!(content.as_deref(), Some("42"));
    }

    #[test]
    fn parse_response_maps_null_content_to_none() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert_eq!(OpenAiClient::parse_response(body).unwrap(), None);
    }

    #[test]
    fn parse_response_rejects_empty_choices() {
        let err = OpenAiClient::parse_response(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, DomainError::InvalidResponse(_)));
    }

    #[test]
    fn parse_response_rejects_malformed_body() {
        let err = OpenAiClient::parse_response("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, DomainError::InvalidResponse(_)));
    }
}
