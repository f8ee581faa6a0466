//! Language-model provider interface used by collaborator-assisted refinement.
//!
//! The refiner only needs a blocking `send_message(system, user)` exchange.
//! Providers for the OpenAI chat-completions API, the Anthropic messages API
//! and Amazon Bedrock are included; anything else can implement
//! [`LlmProvider`] directly.

pub mod anthropic;
pub mod bedrock;
pub mod openai;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub use anthropic::AnthropicProvider;
pub use bedrock::BedrockProvider;
pub use openai::OpenAiProvider;

/// Default completion budget for a single refinement request.
pub const DEFAULT_MAX_TOKENS: u32 = 800;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Bedrock region used when neither an argument nor `AWS_REGION` sets one.
pub const DEFAULT_REGION: &str = "ap-northeast-1";

#[derive(Debug, Error)]
/// Failure talking to a language-model provider.
pub enum LlmError {
    /// HTTP transport failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The provider answered without any text.
    #[error("{0} returned an empty response")]
    EmptyResponse(ProviderKind),

    /// A required credential is missing from the environment.
    #[error("{provider} provider requires the {variable} environment variable")]
    MissingCredential {
        /// Provider needing the credential.
        provider: ProviderKind,
        /// Environment variable that was looked up.
        variable: &'static str,
    },

    /// A credential holds bytes that cannot be sent in an HTTP header.
    #[error("{provider} credential from {variable} is not a valid header value")]
    InvalidCredential {
        /// Provider owning the credential.
        provider: ProviderKind,
        /// Environment variable the credential came from.
        variable: &'static str,
    },

    /// Bedrock runtime call failed.
    #[error("Bedrock request failed: {0}")]
    Bedrock(String),

    /// The async runtime driving the Bedrock client could not start.
    #[error("failed to start the Bedrock runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// Provider name not recognised.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}

/// Sends one prompt pair and returns the raw response text.
pub trait LlmProvider {
    /// Sends `user_message` under `system_prompt`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or an empty
    /// completion.
    fn send_message(&self, system_prompt: &str, user_message: &str) -> Result<String, LlmError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Supported hosted providers.
pub enum ProviderKind {
    /// OpenAI chat completions.
    OpenAi,
    /// Anthropic messages.
    Anthropic,
    #[default]
    /// Claude on Amazon Bedrock.
    Bedrock,
}

impl ProviderKind {
    #[must_use]
    /// Lower-case provider name as accepted on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Bedrock => "bedrock",
        }
    }

    fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Anthropic => "claude-haiku-4-5-20251001",
            Self::Bedrock => "global.anthropic.claude-haiku-4-5-20251001-v1:0",
        }
    }

    /// Environment variable holding the API key. Bedrock signs requests with
    /// the AWS credential chain instead.
    pub(crate) fn api_key_variable(self) -> Option<&'static str> {
        match self {
            Self::OpenAi => Some("OPENAI_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::Bedrock => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "bedrock" => Ok(Self::Bedrock),
            other => Err(LlmError::UnknownProvider(other.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
/// Connection settings for a hosted provider.
pub struct LlmConfig {
    /// Which API to talk to.
    pub provider: ProviderKind,
    /// Model identifier.
    pub model: String,
    /// API key sent with every request; unused by Bedrock.
    pub api_key: Option<String>,
    /// AWS region, Bedrock only.
    pub region: Option<String>,
    /// Maximum completion tokens.
    pub max_tokens: u32,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Endpoint override, mainly for compatible self-hosted servers.
    pub endpoint: Option<String>,
}

impl LlmConfig {
    #[must_use]
    /// Settings with the provider's default model and no credentials.
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            api_key: None,
            region: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
            endpoint: None,
        }
    }

    /// Resolves credentials, model and region from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingCredential`] if the provider's API key
    /// variable is unset or empty.
    pub fn from_env(
        provider: ProviderKind,
        model: Option<&str>,
        region: Option<&str>,
    ) -> Result<Self, LlmError> {
        Self::from_lookup(provider, model, region, |key| std::env::var(key).ok())
    }

    /// Resolves credentials, model and region through `lookup`.
    ///
    /// The model is taken from `model`, then `MD2MAP_AI_MODEL`, then
    /// (for OpenAI) `OPENAI_MODEL`, then the provider default. Bedrock takes
    /// its region from `region`, then `AWS_REGION`, then [`DEFAULT_REGION`].
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingCredential`] if the API key is missing.
    pub fn from_lookup<F>(
        provider: ProviderKind,
        model: Option<&str>,
        region: Option<&str>,
        lookup: F,
    ) -> Result<Self, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let given = |value: Option<&str>| {
            value
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
        };

        let mut config = Self::new(provider);

        if let Some(variable) = provider.api_key_variable() {
            let api_key =
                non_empty(variable).ok_or(LlmError::MissingCredential { provider, variable })?;
            config.api_key = Some(api_key);
        }

        let mut resolved = given(model).or_else(|| non_empty("MD2MAP_AI_MODEL"));
        if resolved.is_none() && provider == ProviderKind::OpenAi {
            resolved = non_empty("OPENAI_MODEL");
        }
        if let Some(model) = resolved {
            config.model = model;
        }

        if provider == ProviderKind::Bedrock {
            config.region = Some(
                given(region)
                    .or_else(|| non_empty("AWS_REGION"))
                    .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            );
        }
        Ok(config)
    }
}

/// Builds the provider described by `config`.
///
/// # Errors
///
/// Returns an error if the client cannot be constructed or a credential is
/// not a valid header value.
pub fn build_provider(config: &LlmConfig) -> Result<Box<dyn LlmProvider>, LlmError> {
    Ok(match config.provider {
        ProviderKind::OpenAi => Box::new(OpenAiProvider::new(config.clone())?),
        ProviderKind::Anthropic => Box::new(AnthropicProvider::new(config.clone())?),
        ProviderKind::Bedrock => Box::new(BedrockProvider::new(config.clone())?),
    })
}

/// Header value for `secret`, tagged with where it came from on failure.
pub(crate) fn credential_header(
    provider: ProviderKind,
    secret: &str,
) -> Result<reqwest::header::HeaderValue, LlmError> {
    let mut value = reqwest::header::HeaderValue::from_str(secret).map_err(|_| {
        LlmError::InvalidCredential {
            provider,
            variable: provider.api_key_variable().unwrap_or("api_key"),
        }
    })?;
    value.set_sensitive(true);
    Ok(value)
}

pub(crate) fn read_success(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(LlmError::Status {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
#[path = "tests/llm.rs"]
mod tests;
