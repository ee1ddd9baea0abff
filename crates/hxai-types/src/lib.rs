//! Shared domain types for hxai.
//!
//! This crate contains the domain types used across the hxai workspace:
//! LLM request/response shapes, conversation turns, generation requests,
//! document lookup results, configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod conversation;
pub mod document;
pub mod error;
pub mod generation;
pub mod llm;
