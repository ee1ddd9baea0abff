//! OpenAI-compatible chat-completion provider.
//!
//! Works against any endpoint speaking the Chat Completions protocol
//! (OpenAI, Azure-style proxies, local gateways) via a configurable base URL.

pub mod client;

pub use client::OpenAiProvider;
