//! Application state wiring the generation service together.
//!
//! The service is generic over the filesystem port; AppState pins it to the
//! local filesystem adapter from hxai-infra.

use std::sync::Arc;

use anyhow::Context;

use hxai_core::conversation::ConversationRegistry;
use hxai_core::document::DocumentStore;
use hxai_core::llm::box_provider::BoxLlmProvider;
use hxai_core::service::GenerationService;
use hxai_infra::filesystem::LocalFileSystem;
use hxai_infra::llm::create_provider;
use hxai_infra::secret::{env_lookup, resolve_api_key};
use hxai_types::config::AppConfig;

/// Concrete service type pinned to infra implementations.
pub type ConcreteGenerationService = GenerationService<LocalFileSystem>;

/// Shared application state used by CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ConcreteGenerationService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Resolve the API key, build the provider, and wire the service.
    pub fn init(config: AppConfig) -> anyhow::Result<Self> {
        let api_key = resolve_api_key(&config.llm, env_lookup);
        let provider = create_provider(&config.llm, api_key).with_context(|| {
            format!(
                "cannot configure the model provider (is {} set?)",
                config.llm.api_key_env
            )
        })?;
        Ok(Self::with_provider(config, provider))
    }

    /// Wire the service around an already-built provider.
    pub fn with_provider(config: AppConfig, provider: BoxLlmProvider) -> Self {
        let store = document_store(&config);
        Self {
            service: Arc::new(GenerationService::new(
                provider,
                store,
                ConversationRegistry::new(),
            )),
            config: Arc::new(config),
        }
    }
}

/// Document store for `config`, usable without a model provider.
pub fn document_store(config: &AppConfig) -> DocumentStore<LocalFileSystem> {
    DocumentStore::from_config(LocalFileSystem::new(), &config.document)
}
