//! Core logic for hxai.
//!
//! Prompt construction, fenced-fragment extraction, the persisted document
//! store, session-scoped conversation state, and the generation service that
//! ties them to an LLM provider. Defines the "ports" (`LlmProvider`,
//! `FileSystem`) that `hxai-infra` implements; never depends on it.

pub mod conversation;
pub mod document;
pub mod extract;
pub mod fs;
pub mod llm;
pub mod prompt;
pub mod service;
