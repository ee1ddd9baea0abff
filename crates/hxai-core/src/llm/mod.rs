//! LLM provider abstractions for hxai.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch
//! - `RetryingProvider`: per-attempt timeout plus bounded retry on transient errors

pub mod box_provider;
pub mod provider;
pub mod retry;
