//! Persisted document store.
//!
//! Owns the HTML document that generated fragments are spliced into. All
//! writes replace the whole file. Every operation takes the store's lock, so
//! a read-modify-write never interleaves with another one and readers never
//! observe a half-applied update.

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{debug, info};

use hxai_types::config::{DocumentConfig, DocumentMode};
use hxai_types::document::LocatedElement;
use hxai_types::error::DocumentError;

use crate::fs::FileSystem;

use super::rewrite;
use super::shell::render_shell;

/// The persisted document and its starting template.
pub struct DocumentStore<F: FileSystem> {
    fs: F,
    document_path: PathBuf,
    template_path: PathBuf,
    mode: DocumentMode,
    /// Guards the file. Holds the fragment of the most recent rebuild.
    latest: Mutex<Option<String>>,
}

impl<F: FileSystem> DocumentStore<F> {
    pub fn new(
        fs: F,
        document_path: impl Into<PathBuf>,
        template_path: impl Into<PathBuf>,
        mode: DocumentMode,
    ) -> Self {
        Self {
            fs,
            document_path: document_path.into(),
            template_path: template_path.into(),
            mode,
            latest: Mutex::new(None),
        }
    }

    pub fn from_config(fs: F, config: &DocumentConfig) -> Self {
        Self::new(fs, config.path.clone(), config.template.clone(), config.mode)
    }

    pub fn mode(&self) -> DocumentMode {
        self.mode
    }

    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    /// File name of the persisted document, as offered for download.
    pub fn file_name(&self) -> Option<&str> {
        self.document_path.file_name().and_then(|name| name.to_str())
    }

    /// Overwrite the persisted document with the starting template.
    pub async fn reset(&self) -> Result<(), DocumentError> {
        let mut latest = self.latest.lock().await;
        let template = self.read_template().await?;
        self.fs.write_file(&self.document_path, &template).await?;
        *latest = None;
        info!(
            document = %self.document_path.display(),
            template = %self.template_path.display(),
            "Document reset to starting template"
        );
        Ok(())
    }

    /// Current document content. Falls back to the starting template when
    /// nothing has been persisted yet.
    pub async fn read(&self) -> Result<String, DocumentError> {
        let _guard = self.latest.lock().await;
        self.read_current().await
    }

    /// Find the element whose `id` equals `element_id`.
    pub async fn locate(&self, element_id: &str) -> Result<LocatedElement, DocumentError> {
        let _guard = self.latest.lock().await;
        let html = self.read_current().await?;
        rewrite::locate(&html, element_id)
    }

    /// Replace the children of element `element_id` with `fragment` and
    /// persist the whole document.
    pub async fn replace_content(&self, element_id: &str, fragment: &str) -> Result<(), DocumentError> {
        let _guard = self.latest.lock().await;
        let html = self.read_current().await?;
        let updated = rewrite::replace_inner(&html, element_id, fragment)?;
        self.fs.write_file(&self.document_path, &updated).await?;
        debug!(
            element_id,
            bytes = updated.len(),
            "Document element replaced"
        );
        Ok(())
    }

    /// Overwrite the document with a minimal page whose body is `fragment`.
    pub async fn rebuild(&self, fragment: &str) -> Result<(), DocumentError> {
        let mut latest = self.latest.lock().await;
        let page = render_shell(fragment);
        self.fs.write_file(&self.document_path, &page).await?;
        *latest = Some(fragment.to_string());
        debug!(bytes = page.len(), "Document rebuilt");
        Ok(())
    }

    /// Re-render the page from the most recently rebuilt fragment, if any,
    /// and return the document content. Both happen under one lock, so a
    /// concurrent rebuild can never be overwritten by an older fragment.
    pub async fn render_latest(&self) -> Result<String, DocumentError> {
        let latest = self.latest.lock().await;
        match latest.as_deref() {
            Some(fragment) => {
                let page = render_shell(fragment);
                self.fs.write_file(&self.document_path, &page).await?;
                Ok(page)
            }
            None => self.read_current().await,
        }
    }

    async fn read_current(&self) -> Result<String, DocumentError> {
        if self.fs.exists(&self.document_path).await {
            return Ok(self.fs.read_file(&self.document_path).await?);
        }
        debug!(
            document = %self.document_path.display(),
            "Document not persisted yet, using starting template"
        );
        self.read_template().await
    }

    async fn read_template(&self) -> Result<String, DocumentError> {
        self.fs.read_file(&self.template_path).await.map_err(|e| {
            DocumentError::Storage(format!(
                "starting template {}: {e}",
                self.template_path.display()
            ))
        })
    }
}
