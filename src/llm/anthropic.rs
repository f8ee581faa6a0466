//! Anthropic messages provider.

use super::{credential_header, read_success, LlmConfig, LlmError, LlmProvider, ProviderKind};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
}

#[derive(Serialize)]
struct UserMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Blocking client for the Anthropic messages API.
pub struct AnthropicProvider {
    client: Client,
    config: LlmConfig,
}

impl AnthropicProvider {
    /// Builds the HTTP client with API key and version headers from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// client cannot be built.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        if let Some(key) = &config.api_key {
            headers.insert("x-api-key", credential_header(ProviderKind::Anthropic, key)?);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> &str {
        self.config.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }
}

impl LlmProvider for AnthropicProvider {
    fn send_message(&self, system_prompt: &str, user_message: &str) -> Result<String, LlmError> {
        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system: system_prompt,
            messages: [UserMessage {
                role: "user",
                content: user_message,
            }],
        };

        debug!("Sending messages request to {}", self.endpoint());
        let response = self.client.post(self.endpoint()).json(&request).send()?;
        let parsed: MessagesResponse = read_success(response)?.json()?;

        parsed
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .filter(|text| !text.is_empty())
            .ok_or(LlmError::EmptyResponse(ProviderKind::Anthropic))
    }
}
