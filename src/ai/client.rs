use crate::error::AiError;
use openrouter_api::{
    models::provider_preferences::ProviderPreferences,
    models::provider_preferences::ProviderSort,
    types::chat::{ChatCompletionRequest, Message},
};
use serde::Serialize;

pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

#[derive(Debug)]
pub struct OpenRouterClient {
    client: openrouter_api::OpenRouterClient<openrouter_api::Ready>,
    config: ModelConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelConfig {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
        }
    }
}

impl OpenRouterClient {
    /// Reads `OPENROUTER_API_KEY` from the environment.
    pub fn new(config: ModelConfig) -> Result<Self, AiError> {
        let client = openrouter_api::OpenRouterClient::quick()
            .map_err(|e| AiError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Sends one system + user exchange and returns the text of the first
    /// choice.
    pub async fn complete(&self, system: &str, prompt: &str) -> Result<String, AiError> {
        let messages = vec![Message::text("system", system), Message::text("user", prompt)];

        let provider = ProviderPreferences::new().with_sort(ProviderSort::Throughput);

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            provider: Some(provider),
            stream: None,
            response_format: None,
            tools: None,
            tool_choice: None,
            models: None,
            transforms: None,
            route: None,
            user: None,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            top_p: None,
            top_k: None,
            frequency_penalty: None,
            presence_penalty: None,
            repetition_penalty: None,
            min_p: None,
            top_a: None,
            seed: None,
            stop: None,
            logit_bias: None,
            logprobs: None,
            top_logprobs: None,
            prediction: None,
            parallel_tool_calls: None,
            verbosity: None,
        };

        let response = self
            .client
            .chat()
            .map_err(|e| AiError::Api(e.to_string()))?
            .chat_completion(request)
            .await
            .map_err(|e| AiError::Api(e.to_string()))?;

        let choice = response.choices.first().ok_or(AiError::EmptyResponse)?;
        match &choice.message.content {
            openrouter_api::MessageContent::Text(text) => Ok(text.clone()),
            openrouter_api::MessageContent::Parts(parts) => {
                let text_parts: Vec<String> = parts
                    .iter()
                    .filter_map(|p| {
                        if let openrouter_api::ContentPart::Text(tc) = p {
                            Some(tc.text.clone())
                        } else {
                            None
                        }
                    })
                    .collect();
                Ok(text_parts.join("\n"))
            }
        }
    }
}
