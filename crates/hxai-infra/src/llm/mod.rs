//! LLM provider implementations.
//!
//! Contains the concrete implementation of the [`LlmProvider`] trait defined
//! in `hxai-core`, plus a factory ([`create_provider`]) that builds the
//! configured provider and wraps it in the timeout/retry policy.

pub mod openai;

use secrecy::SecretString;

use hxai_core::llm::box_provider::BoxLlmProvider;
use hxai_core::llm::provider::LlmProvider;
use hxai_core::llm::retry::{RetryPolicy, RetryingProvider};
use hxai_types::config::LlmConfig;
use hxai_types::llm::LlmError;

use self::openai::OpenAiProvider;

/// Create a [`BoxLlmProvider`] from an [`LlmConfig`].
///
/// # Errors
///
/// Returns `AuthenticationFailed` when no API key was resolved.
pub fn create_provider(
    config: &LlmConfig,
    api_key: Option<SecretString>,
) -> Result<BoxLlmProvider, LlmError> {
    let key = api_key.ok_or(LlmError::AuthenticationFailed)?;
    let provider = OpenAiProvider::from_config(config, &key);
    tracing::debug!(
        provider = provider.name(),
        model = %config.model,
        base_url = %config.base_url,
        "LLM provider configured"
    );
    Ok(BoxLlmProvider::new(RetryingProvider::new(
        provider,
        RetryPolicy::from_config(config),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hxai_types::llm::{CompletionRequest, Message};

    #[test]
    fn test_create_provider_openai() {
        let config = LlmConfig {
            model: "gpt-4o".to_string(),
            ..LlmConfig::default()
        };
        let provider =
            create_provider(&config, Some(SecretString::from("sk-test".to_string()))).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.default_model(), "gpt-4o");
    }

    #[test]
    fn test_create_provider_missing_key() {
        match create_provider(&LlmConfig::default(), None) {
            Err(LlmError::AuthenticationFailed) => {}
            Err(other) => panic!("Expected AuthenticationFailed, got: {other}"),
            Ok(_) => panic!("Expected error but got Ok"),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_surfaces_after_retries() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = LlmConfig {
            base_url: format!("http://{addr}/v1"),
            retry_backoff_ms: 1,
            ..LlmConfig::default()
        };
        let provider =
            create_provider(&config, Some(SecretString::from("sk-test".to_string()))).unwrap();
        let request = CompletionRequest {
            model: String::new(),
            messages: vec![Message::user("Hello")],
            max_tokens: Some(10),
            temperature: None,
        };
        let err = provider.complete(&request).await.unwrap_err();
        assert!(matches!(err, LlmError::Transport(_)));
    }
}
