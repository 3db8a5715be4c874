use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use secrecy::ExposeSecret as _;

use crate::{
    config::Config,
    constants::quiz_prompt::SYSTEM_PROMPT,
    errors::{AppError, AppResult},
};

/// Text completion: one prompt in, one free-text reply out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> AppResult<String>;
}

/// Chat-completion client for any OpenAI-compatible endpoint.
pub struct OpenAiModelService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl OpenAiModelService {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.llm_api_key.expose_secret())
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[async_trait]
impl LanguageModel for OpenAiModelService {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        log::debug!(
            "Calling model {} with a {} character prompt",
            self.model_name,
            prompt.len()
        );

        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?,
            ),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.7)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            log::error!("Model request to {} failed: {}", self.model_name, e);
            AppError::from(e)
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AppError::ModelError("Model returned an empty reply".to_string()))?;

        log::debug!("Model replied with {} characters", content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_uses_configured_model() {
        let service = OpenAiModelService::new(&Config::test_config());
        assert_eq!(service.model_name(), "test-model");
    }

    #[tokio::test]
    async fn test_mock_model_returns_reply() {
        let mut model = MockLanguageModel::new();
        model
            .expect_complete()
            .withf(|prompt| prompt.contains("photosynthesis"))
            .times(1)
            .returning(|_| Ok("[]".to_string()));

        let reply = model.complete("Questions about photosynthesis").await.unwrap();
        assert_eq!(reply, "[]");
    }
}
