use async_trait::async_trait;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::ChatMessage;

use archgrade_core::JudgeSettings;

use crate::JudgeError;

/// Prompt text in, completion text out.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, system: &str, user_msg: &str) -> Result<String, JudgeError>;
}

fn map_backend(provider: &str) -> Result<LLMBackend, JudgeError> {
    match provider {
        "openai" => Ok(LLMBackend::OpenAI),
        "anthropic" => Ok(LLMBackend::Anthropic),
        "google" => Ok(LLMBackend::Google),
        "ollama" => Ok(LLMBackend::Ollama),
        "groq" => Ok(LLMBackend::Groq),
        "mistral" => Ok(LLMBackend::Mistral),
        "deepseek" => Ok(LLMBackend::DeepSeek),
        other => Err(JudgeError::UnknownProvider(other.to_string())),
    }
}

/// Hosted model reached through the `llm` crate.
#[derive(Debug, Clone)]
pub struct LlmClient {
    settings: JudgeSettings,
}

impl LlmClient {
    pub fn new(settings: JudgeSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl ModelClient for LlmClient {
    async fn complete(&self, system: &str, user_msg: &str) -> Result<String, JudgeError> {
        let backend = map_backend(self.settings.provider.trim())?;

        let mut builder = LLMBuilder::new()
            .backend(backend)
            .model(&self.settings.model)
            .system(system);

        if !self.settings.api_key.is_empty() {
            builder = builder.api_key(&self.settings.api_key);
        }

        let llm = builder
            .build()
            .map_err(|e| JudgeError::Build(e.to_string()))?;

        let messages = vec![ChatMessage::user().content(user_msg).build()];

        let response = llm
            .chat(&messages)
            .await
            .map_err(|e| JudgeError::Invocation(e.to_string()))?;

        match response.text() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(JudgeError::EmptyResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_providers_map() {
        for provider in ["openai", "anthropic", "google", "ollama", "groq", "mistral", "deepseek"] {
            assert!(map_backend(provider).is_ok(), "{provider}");
        }
    }

    #[test]
    fn unknown_provider_is_an_error() {
        assert!(matches!(
            map_backend("watson"),
            Err(JudgeError::UnknownProvider(p)) if p == "watson"
        ));
    }

    #[tokio::test]
    async fn unknown_provider_fails_before_any_request() {
        let client = LlmClient::new(JudgeSettings {
            provider: "watson".to_string(),
            api_key: "k".to_string(),
            ..JudgeSettings::default()
        });
        let err = client.complete("system", "user").await.unwrap_err();
        assert!(matches!(err, JudgeError::UnknownProvider(_)));
    }
}
