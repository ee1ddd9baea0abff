//! Generation service.
//!
//! Turns a [`GenerationRequest`] into a fragment: builds the prompt, calls
//! the model, extracts the fenced block, splices it into the persisted
//! document, and records the exchange when the caller asked for context.
//! Nothing is recorded and the document is left as it was unless every step
//! succeeds.

use tracing::{Instrument, debug, info, info_span, trace};

use hxai_types::config::DocumentMode;
use hxai_types::error::GenerationError;
use hxai_types::generation::{GenerationOutcome, GenerationRequest};
use hxai_types::llm::CompletionRequest;

use crate::conversation::ConversationRegistry;
use crate::document::DocumentStore;
use crate::extract::extract_fragment;
use crate::fs::FileSystem;
use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::provider::LlmProvider;
use crate::prompt::{PromptBuilder, normalize_prompt};

/// Coordinates prompt building, the model call, and document updates.
pub struct GenerationService<F: FileSystem> {
    provider: BoxLlmProvider,
    store: DocumentStore<F>,
    conversations: ConversationRegistry,
}

impl<F: FileSystem> GenerationService<F> {
    /// `provider` is expected to already carry the timeout/retry policy.
    pub fn new(
        provider: BoxLlmProvider,
        store: DocumentStore<F>,
        conversations: ConversationRegistry,
    ) -> Self {
        Self {
            provider,
            store,
            conversations,
        }
    }

    pub fn store(&self) -> &DocumentStore<F> {
        &self.store
    }

    pub fn conversations(&self) -> &ConversationRegistry {
        &self.conversations
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Generate a fragment for `request` and apply it to the document.
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationOutcome, GenerationError> {
        let prompt_text = normalize_prompt(&request.prompt_text);
        if prompt_text.trim().is_empty() {
            return Err(GenerationError::InvalidArgument(
                "Prompt is required".to_string(),
            ));
        }

        let mode = self.store.mode();
        let target = match mode {
            DocumentMode::Incremental => request.target_element_id.as_deref(),
            DocumentMode::Rebuild => None,
        };

        // Locate before the model call so a bad id costs nothing.
        let context_fragment = match target {
            Some(id) => Some(self.store.locate(id).await?.outer_html),
            None => None,
        };

        let pair = PromptBuilder::build(&prompt_text, context_fragment.as_deref())?;

        let conversation = request.use_conversation_context.then(|| {
            let session = ConversationRegistry::session_key(request.session_id.as_deref());
            self.conversations.get_or_create(session)
        });
        let history = conversation
            .as_ref()
            .map(|c| c.snapshot())
            .unwrap_or_default();

        let completion = CompletionRequest {
            model: self.provider.default_model().to_string(),
            messages: pair.to_messages(&history),
            max_tokens: None,
            temperature: None,
        };

        debug!(
            target_element_id = ?target,
            history_turns = history.len(),
            prompt = %prompt_text,
            "Calling model"
        );

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %completion.model,
            gen_ai.request.stream = false,
        );
        let response = self.provider.complete(&completion).instrument(span).await?;

        trace!(content = %response.content, "Raw model response");
        info!(
            gen_ai.response.model = %response.model,
            gen_ai.usage.input_tokens = response.usage.input_tokens,
            gen_ai.usage.output_tokens = response.usage.output_tokens,
            "Model call finished"
        );

        let fragment = extract_fragment(&response.content)?;

        let document_updated = match (mode, target) {
            (DocumentMode::Incremental, Some(id)) => {
                self.store.replace_content(id, &fragment).await?;
                true
            }
            (DocumentMode::Rebuild, _) => {
                self.store.rebuild(&fragment).await?;
                true
            }
            (DocumentMode::Incremental, None) => false,
        };

        if let Some(conversation) = conversation {
            conversation.append_exchange(pair.user_message, response.content);
        }

        Ok(GenerationOutcome {
            fragment,
            target_element_id: target.map(str::to_string),
            document_updated,
        })
    }

    /// Restore the document to the starting template.
    pub async fn reset_document(&self) -> Result<(), GenerationError> {
        Ok(self.store.reset().await?)
    }

    /// Document content ready to be served as a download.
    ///
    /// In rebuild mode the page is regenerated first. When `session_id` names
    /// a session with an assistant turn, that session's most recent fragment
    /// is used. Otherwise the page is re-rendered from the most recently
    /// rebuilt fragment, whether or not it was generated with context. With
    /// neither, the persisted document is served as it is.
    pub async fn prepare_download(
        &self,
        session_id: Option<&str>,
    ) -> Result<String, GenerationError> {
        if self.store.mode() == DocumentMode::Incremental {
            return Ok(self.store.read().await?);
        }

        let named = session_id.map(str::trim).filter(|id| !id.is_empty());
        let session_turn = named.and_then(|session| {
            self.conversations
                .get(session)
                .and_then(|conversation| conversation.latest_assistant())
        });

        match session_turn {
            Some(content) => {
                let fragment = extract_fragment(&content)?;
                self.store.rebuild(&fragment).await?;
                debug!(session = ?named, "Rebuilt document from session for download");
                Ok(self.store.read().await?)
            }
            None => Ok(self.store.render_latest().await?),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use hxai_types::llm::{CompletionResponse, LlmError, Message, MessageRole, Usage};

    use crate::document::shell::render_shell;
    use crate::fs::memory::MemoryFileSystem;

    use super::*;

    const TEMPLATE: &str = r#"<html><body><div id="hero"><h1>Old</h1></div><div id="a"></div></body></html>"#;
    const DOCUMENT: &str = "prototype.html";

    /// Mock provider that replays scripted results and records requests.
    #[derive(Clone, Default)]
    struct MockProvider {
        script: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
        requests: Arc<Mutex<Vec<Vec<Message>>>>,
    }

    impl MockProvider {
        fn replying(replies: Vec<Result<String, LlmError>>) -> Self {
            Self {
                script: Arc::new(Mutex::new(replies.into())),
                requests: Arc::default(),
            }
        }

        fn requests(&self) -> Vec<Vec<Message>> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        fn default_model(&self) -> &str {
            "mock-model"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(request.messages.clone());
            let next = self.script.lock().unwrap().pop_front();
            let content = next.unwrap_or_else(|| Err(LlmError::Provider {
                message: "script exhausted".to_string(),
            }))?;
            Ok(CompletionResponse {
                id: "mock-1".to_string(),
                content,
                model: "mock-model".to_string(),
                finish_reason: Some("stop".to_string()),
                usage: Usage::default(),
            })
        }
    }

    fn service(
        mode: DocumentMode,
        replies: Vec<Result<String, LlmError>>,
    ) -> (GenerationService<MemoryFileSystem>, MockProvider) {
        let fs = MemoryFileSystem::default().with_file("start.html", TEMPLATE);
        let store = DocumentStore::new(fs, DOCUMENT, "start.html", mode);
        let provider = MockProvider::replying(replies);
        let service = GenerationService::new(
            BoxLlmProvider::new(provider.clone()),
            store,
            ConversationRegistry::new(),
        );
        (service, provider)
    }

    fn fenced(html: &str) -> Result<String, LlmError> {
        Ok(format!("Here you go:\n```html\n{html}\n```\n"))
    }

    async fn document(service: &GenerationService<MemoryFileSystem>) -> String {
        service.store().read().await.unwrap()
    }

    #[tokio::test]
    async fn test_generate_with_target_updates_document() {
        let (service, provider) = service(DocumentMode::Incremental, vec![fenced("<p>New</p>")]);
        let outcome = service
            .generate(GenerationRequest::new("make a heading").with_target("hero"))
            .await
            .unwrap();

        assert_eq!(outcome.fragment, "<p>New</p>");
        assert_eq!(outcome.target_element_id.as_deref(), Some("hero"));
        assert!(outcome.document_updated);
        assert_eq!(
            service.store().locate("hero").await.unwrap().inner_html,
            "<p>New</p>"
        );

        let requests = provider.requests();
        let user_message = &requests[0].last().unwrap().content;
        assert!(user_message.contains(r#"<div id="hero"><h1>Old</h1></div>"#));
        assert!(user_message.contains("make a heading"));
    }

    #[tokio::test]
    async fn test_generate_without_target_leaves_document_alone() {
        let (service, _) = service(DocumentMode::Incremental, vec![fenced("<button>Go</button>")]);
        let outcome = service
            .generate(GenerationRequest::new("a button"))
            .await
            .unwrap();
        assert_eq!(outcome.fragment, "<button>Go</button>");
        assert!(!outcome.document_updated);
        assert_eq!(document(&service).await, TEMPLATE);
    }

    #[tokio::test]
    async fn test_missing_target_fails_before_model_call() {
        let (service, provider) = service(DocumentMode::Incremental, vec![fenced("<p>x</p>")]);
        let err = service
            .generate(GenerationRequest::new("x").with_target("missing-id"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::TargetNotFound(_)));
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_empty_prompt_is_rejected() {
        let (service, provider) = service(DocumentMode::Incremental, vec![]);
        let err = service
            .generate(GenerationRequest::new("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidArgument(_)));
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_context_grows_by_one_exchange() {
        let (service, provider) = service(
            DocumentMode::Incremental,
            vec![fenced("<p>one</p>"), fenced("<p>two</p>")],
        );
        let request = GenerationRequest::new("first").with_context(Some("s1".to_string()));
        service.generate(request).await.unwrap();
        let conversation = service.conversations().get("s1").unwrap();
        assert_eq!(conversation.len(), 2);

        let request = GenerationRequest::new("second").with_context(Some("s1".to_string()));
        service.generate(request).await.unwrap();
        assert_eq!(conversation.len(), 4);

        let requests = provider.requests();
        assert_eq!(requests[0].len(), 2);
        assert_eq!(requests[1].len(), 4);
        assert_eq!(requests[1][0].role, MessageRole::User);
        assert_eq!(requests[1][1].role, MessageRole::Assistant);
        assert!(requests[1][1].content.contains("<p>one</p>"));
    }

    #[tokio::test]
    async fn test_context_defaults_to_default_session() {
        let (service, _) = service(DocumentMode::Incremental, vec![fenced("<p>x</p>")]);
        service
            .generate(GenerationRequest::new("x").with_context(None))
            .await
            .unwrap();
        assert_eq!(service.conversations().session_ids(), vec!["default"]);
    }

    #[tokio::test]
    async fn test_no_context_records_nothing() {
        let (service, _) = service(DocumentMode::Incremental, vec![fenced("<p>x</p>")]);
        service.generate(GenerationRequest::new("x")).await.unwrap();
        assert!(service.conversations().session_ids().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_response_changes_nothing() {
        let (service, _) = service(
            DocumentMode::Incremental,
            vec![Ok("I cannot do that".to_string())],
        );
        let before = document(&service).await;
        let err = service
            .generate(
                GenerationRequest::new("x")
                    .with_target("a")
                    .with_context(None),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
        assert!(service.conversations().get("default").unwrap().is_empty());
        assert_eq!(document(&service).await, before);
    }

    #[tokio::test]
    async fn test_provider_failure_is_upstream_unavailable() {
        let (service, _) = service(
            DocumentMode::Incremental,
            vec![Err(LlmError::Transport("connection refused".into()))],
        );
        let err = service
            .generate(GenerationRequest::new("x").with_context(None))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::UpstreamUnavailable(_)));
        assert!(service.conversations().get("default").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rebuild_mode_ignores_target() {
        let (service, provider) = service(DocumentMode::Rebuild, vec![fenced("<main>page</main>")]);
        let outcome = service
            .generate(GenerationRequest::new("a page").with_target("missing-id"))
            .await
            .unwrap();
        assert!(outcome.document_updated);
        assert_eq!(outcome.target_element_id, None);
        assert_eq!(document(&service).await, render_shell("<main>page</main>"));
        assert!(!provider.requests()[0][1].content.contains("Here's what I have so far"));
    }

    #[tokio::test]
    async fn test_prepare_download_rebuilds_from_latest_turn() {
        let (service, _) = service(DocumentMode::Rebuild, vec![fenced("<p>latest</p>")]);
        service
            .generate(GenerationRequest::new("x").with_context(Some("s".to_string())))
            .await
            .unwrap();
        service.reset_document().await.unwrap();

        let html = service.prepare_download(Some("s")).await.unwrap();
        assert_eq!(html, render_shell("<p>latest</p>"));
    }

    #[tokio::test]
    async fn test_download_after_context_free_rebuild_keeps_newest_page() {
        let (service, _) = service(
            DocumentMode::Rebuild,
            vec![fenced("<p>A</p>"), fenced("<p>B</p>")],
        );
        service
            .generate(GenerationRequest::new("first").with_context(None))
            .await
            .unwrap();
        service.generate(GenerationRequest::new("second")).await.unwrap();
        assert_eq!(document(&service).await, render_shell("<p>B</p>"));

        let html = service.prepare_download(None).await.unwrap();
        assert_eq!(html, render_shell("<p>B</p>"));
        assert_eq!(document(&service).await, render_shell("<p>B</p>"));
    }

    #[tokio::test]
    async fn test_prepare_download_rebuild_without_history_serves_template() {
        let (service, _) = service(DocumentMode::Rebuild, vec![]);
        assert_eq!(service.prepare_download(Some("nobody")).await.unwrap(), TEMPLATE);
    }

    #[tokio::test]
    async fn test_injected_registry_is_used() {
        let conversations = ConversationRegistry::new();
        conversations.get_or_create("seeded").append_exchange("u", "a");
        let fs = MemoryFileSystem::default().with_file("start.html", TEMPLATE);
        let store = DocumentStore::new(fs, DOCUMENT, "start.html", DocumentMode::Incremental);
        let service = GenerationService::new(
            BoxLlmProvider::new(MockProvider::replying(vec![])),
            store,
            conversations,
        );
        assert_eq!(service.conversations().session_ids(), vec!["seeded"]);
    }

    #[tokio::test]
    async fn test_prepare_download_incremental_serves_document() {
        let (service, _) = service(DocumentMode::Incremental, vec![]);
        service.reset_document().await.unwrap();
        assert_eq!(service.prepare_download(None).await.unwrap(), TEMPLATE);
    }
}
