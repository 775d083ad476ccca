use async_trait::async_trait;
use std::sync::Arc;

use crate::config::LLMConfig;
use crate::types::{AppError, AppResult, LLMMessage, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Configuration for an LLM provider
pub struct LLMProviderConfig {
    pub name: String,
    pub api_key: String,
    pub api_base: String,
}

impl From<&LLMConfig> for LLMProviderConfig {
    fn from(config: &LLMConfig) -> Self {
        Self {
            name: config.provider.clone(),
            api_key: config.api_key.clone(),
            api_base: config.resolved_api_base(),
        }
    }
}

#[derive(Clone)]
pub struct LLM {
    adapter: Arc<dyn LLMAdapter>,
    provider_name: String,
    model: String,
    temperature: f32,
}

impl LLM {
    pub fn new(provider: LLMProviderConfig, model: &str, temperature: f32) -> AppResult<Self> {
        if provider.api_key.is_empty() {
            return Err(AppError::Config(format!(
                "No API key configured for provider '{}'",
                provider.name
            )));
        }

        let adapter: Arc<dyn LLMAdapter> = match provider.name.as_str() {
            // Both speak the OpenAI chat completions protocol
            "deepseek" | "openai" => Arc::new(crate::llm::openai::OpenAIAdapter::new_with_api_base(
                &provider.api_key,
                &provider.api_base,
            )),
            other => {
                return Err(AppError::Config(format!("Unsupported provider: {}", other)));
            }
        };

        Ok(Self {
            adapter,
            provider_name: provider.name,
            model: model.to_string(),
            temperature,
        })
    }

    pub fn from_config(config: &LLMConfig) -> AppResult<Self> {
        Self::new(LLMProviderConfig::from(config), &config.model, config.temperature)
    }

    /// Wrap an existing adapter, e.g. a scripted one in tests
    pub fn with_adapter(adapter: Arc<dyn LLMAdapter>, model: &str) -> Self {
        Self {
            adapter,
            provider_name: "custom".to_string(),
            model: model.to_string(),
            temperature: 0.7,
        }
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }

    /// Single-turn completion with a system prompt; returns the raw text content.
    pub async fn complete(&self, system_prompt: &str, user_message: &str) -> AppResult<String> {
        let request = LLMRequest {
            model: self.model.clone(),
            messages: vec![LLMMessage::user(user_message)],
            max_tokens: None,
            temperature: Some(self.temperature),
            system_instruction: Some(system_prompt.to_string()),
        };
        let response = self.create_chat_completion(&request).await?;
        tracing::debug!(
            provider = %self.provider_name,
            completion_tokens = response.usage.completion_tokens,
            "LLM completion received"
        );
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(name: &str, key: &str) -> LLMProviderConfig {
        LLMProviderConfig {
            name: name.to_string(),
            api_key: key.to_string(),
            api_base: "http://localhost:9".to_string(),
        }
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let result = LLM::new(provider("deepseek", ""), "deepseek-chat", 0.7);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        let result = LLM::new(provider("mystery", "sk-test"), "m", 0.7);
        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("mystery")));
    }

    #[test]
    fn test_known_provider() {
        assert!(LLM::new(provider("openai", "sk-test"), "gpt-4o", 0.2).is_ok());
        assert!(LLM::new(provider("deepseek", "sk-test"), "deepseek-chat", 0.7).is_ok());
    }
}
