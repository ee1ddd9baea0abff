//! OpenAiProvider -- concrete [`LlmProvider`] for OpenAI-compatible APIs.
//!
//! Uses [`async_openai`] for the Chat Completions wire format. The response
//! is validated at the boundary: a payload without choices, or whose first
//! choice has no content, is an error rather than an empty fragment.
//!
//! Per-attempt timeouts are applied by the retry wrapper, not here.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
    CreateChatCompletionResponse, FinishReason,
};
use secrecy::{ExposeSecret, SecretString};

use hxai_core::llm::provider::LlmProvider;
use hxai_types::config::LlmConfig;
use hxai_types::llm::{CompletionRequest, CompletionResponse, LlmError, Message, MessageRole, Usage};

/// OpenAI-compatible chat-completion provider.
///
/// # API Key Security
///
/// Does NOT derive Debug: the key lives inside the `async_openai::Client`.
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiProvider {
    /// Create a provider for `model` at `base_url` (e.g. `https://api.openai.com/v1`).
    pub fn new(api_key: &SecretString, base_url: &str, model: impl Into<String>) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key.expose_secret())
            .with_api_base(base_url.trim_end_matches('/'));

        Self {
            client: Client::with_config(openai_config),
            model: model.into(),
        }
    }

    pub fn from_config(config: &LlmConfig, api_key: &SecretString) -> Self {
        Self::new(api_key, &config.base_url, config.model.clone())
    }

    fn to_message(message: &Message) -> ChatCompletionRequestMessage {
        match message.role {
            MessageRole::System => {
                ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(
                        message.content.clone(),
                    ),
                    name: None,
                })
            }
            MessageRole::User => {
                ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                    content: ChatCompletionRequestUserMessageContent::Text(message.content.clone()),
                    name: None,
                })
            }
            MessageRole::Assistant => {
                #[allow(deprecated)]
                ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                    content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                        message.content.clone(),
                    )),
                    refusal: None,
                    name: None,
                    audio: None,
                    tool_calls: None,
                    function_call: None,
                })
            }
        }
    }

    fn build_request(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        CreateChatCompletionRequest {
            model,
            messages: request.messages.iter().map(Self::to_message).collect(),
            max_completion_tokens: request.max_tokens,
            temperature: request.temperature.map(|t| t as f32),
            ..Default::default()
        }
    }

    /// Turn a parsed response into a [`CompletionResponse`].
    fn validate(response: CreateChatCompletionResponse) -> Result<CompletionResponse, LlmError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;
        let content = choice.message.content.ok_or(LlmError::EmptyResponse)?;

        let finish_reason = choice.finish_reason.map(|reason| {
            match reason {
                FinishReason::Stop => "stop",
                FinishReason::Length => "length",
                FinishReason::ToolCalls => "tool_calls",
                FinishReason::ContentFilter => "content_filter",
                FinishReason::FunctionCall => "function_call",
            }
            .to_string()
        });

        let usage = response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: response.id,
            content,
            model: response.model,
            finish_reason,
            usage,
        })
    }
}

impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let response = self
            .client
            .chat()
            .create(self.build_request(request))
            .await
            .map_err(map_openai_error)?;

        Self::validate(response)
    }
}

/// Map an `async_openai` error to an [`LlmError`].
///
/// API errors carry no HTTP status, so they are classified by their `code`
/// and `type` fields. Request-shape errors are not transient and must not be
/// retried.
fn map_openai_error(err: OpenAIError) -> LlmError {
    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "invalid_api_key"
                || code == "authentication_error"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
                || api_err.message.contains("Invalid API key")
            {
                LlmError::AuthenticationFailed
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                LlmError::RateLimited {
                    retry_after_ms: None,
                }
            } else if code == "server_error" || error_type == "overloaded_error" {
                LlmError::Overloaded(api_err.message.clone())
            } else if error_type == "invalid_request_error" {
                LlmError::InvalidRequest(api_err.message.clone())
            } else {
                LlmError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status().map(|s| s.as_u16()) {
            Some(401 | 403) => LlmError::AuthenticationFailed,
            Some(429) => LlmError::RateLimited {
                retry_after_ms: None,
            },
            Some(503 | 529) => LlmError::Overloaded(err.to_string()),
            Some(400..=499) => LlmError::InvalidRequest(err.to_string()),
            Some(_) => LlmError::Provider {
                message: err.to_string(),
            },
            None => LlmError::Transport(format!("HTTP request failed: {err}")),
        },
        OpenAIError::JSONDeserialize(_, content) => {
            LlmError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::InvalidArgument(msg) => LlmError::InvalidRequest(msg.clone()),
        _ => LlmError::Provider {
            message: err.to_string(),
        },
    }
}
