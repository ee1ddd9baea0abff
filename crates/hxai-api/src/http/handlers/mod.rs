//! HTTP request handlers.

pub mod document;
pub mod generate;
pub mod session;
