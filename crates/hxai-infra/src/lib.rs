//! Infrastructure layer for hxai.
//!
//! Contains implementations of the ports defined in `hxai-core`: the
//! OpenAI-compatible chat-completion provider and the local filesystem
//! adapter. Also loads `hxai.toml` and resolves the API key.

pub mod config;
pub mod filesystem;
pub mod llm;
pub mod secret;
