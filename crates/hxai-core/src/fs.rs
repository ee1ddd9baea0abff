//! FileSystem trait for abstracting file I/O.
//!
//! Defined in hxai-core so the document store can read and rewrite files
//! without depending on any specific filesystem implementation. The
//! `LocalFileSystem` adapter lives in hxai-infra.

use std::path::Path;

/// Abstraction over the filesystem operations the document store needs.
pub trait FileSystem: Send + Sync {
    /// Replace a file's content, creating parent directories as needed.
    fn write_file(
        &self,
        path: &Path,
        content: &str,
    ) -> impl std::future::Future<Output = Result<(), std::io::Error>> + Send;

    /// Read a file's content as a string.
    fn read_file(
        &self,
        path: &Path,
    ) -> impl std::future::Future<Output = Result<String, std::io::Error>> + Send;

    /// Check whether a path exists.
    fn exists(&self, path: &Path) -> impl std::future::Future<Output = bool> + Send;
}
