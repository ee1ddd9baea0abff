//! HTTP layer for hxai.
//!
//! Axum routes for fragment generation, document reset/download and
//! conversation inspection, plus static serving of the web directory.

pub mod error;
pub mod handlers;
pub mod router;
