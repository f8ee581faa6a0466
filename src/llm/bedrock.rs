//! Claude on Amazon Bedrock through the Converse API.
//!
//! Requests are signed with the default AWS credential chain
//! (`AWS_ACCESS_KEY_ID`/`AWS_SECRET_ACCESS_KEY`, `~/.aws/credentials`, or an
//! instance role). The SDK is async, so the provider owns a small
//! current-thread runtime and blocks on each call.

use super::{LlmConfig, LlmError, LlmProvider, ProviderKind, DEFAULT_REGION};
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message, SystemContentBlock,
};
use aws_sdk_bedrockruntime::Client;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// Blocking wrapper around the Bedrock runtime client.
pub struct BedrockProvider {
    runtime: Runtime,
    client: Client,
    config: LlmConfig,
}

impl BedrockProvider {
    /// Loads AWS settings for the configured region and builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Runtime`] if the async runtime cannot start.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(LlmError::Runtime)?;

        let region = config
            .region
            .clone()
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(config.timeout)
                    .build(),
            );
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = runtime.block_on(loader.load());
        let client = Client::new(&sdk_config);

        Ok(Self {
            runtime,
            client,
            config,
        })
    }

    async fn converse(&self, system_prompt: &str, user_message: &str) -> Result<String, LlmError> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(user_message.to_string()))
            .build()
            .map_err(|err| LlmError::Bedrock(err.to_string()))?;
        let inference = InferenceConfiguration::builder()
            .max_tokens(i32::try_from(self.config.max_tokens).unwrap_or(i32::MAX))
            .build();

        debug!("Sending converse request for {}", self.config.model);
        let response = self
            .client
            .converse()
            .model_id(&self.config.model)
            .system(SystemContentBlock::Text(system_prompt.to_string()))
            .messages(message)
            .inference_config(inference)
            .send()
            .await
            .map_err(|err| LlmError::Bedrock(DisplayErrorContext(&err).to_string()))?;

        response
            .output()
            .and_then(|output| output.as_message().ok())
            .and_then(|message| {
                message
                    .content()
                    .iter()
                    .find_map(|block| block.as_text().ok().cloned())
            })
            .filter(|text| !text.is_empty())
            .ok_or(LlmError::EmptyResponse(ProviderKind::Bedrock))
    }
}

impl LlmProvider for BedrockProvider {
    fn send_message(&self, system_prompt: &str, user_message: &str) -> Result<String, LlmError> {
        self.runtime
            .block_on(self.converse(system_prompt, user_message))
    }
}
