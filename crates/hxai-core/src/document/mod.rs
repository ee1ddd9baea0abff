//! The persisted HTML document: element lookup, in-place replacement, and
//! whole-page rebuilds.

pub mod rewrite;
pub mod shell;
pub mod store;

pub use store::DocumentStore;
