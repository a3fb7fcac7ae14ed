//! Persistence of the document as a single preference blob

use super::backend::PreferenceBackend;
use super::document::Document;
use super::error::{Error, Result};

/// Preference key the document blob is stored under
pub const DOCUMENT_KEY: &str = "GDDDocument";

/// Loads and saves a [`Document`] through a [`PreferenceBackend`]
#[derive(Debug)]
pub struct DocumentStore<B> {
    backend: B,
    key: String,
}

impl<B: PreferenceBackend> DocumentStore<B> {
    /// Create a store using the default document key
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, DOCUMENT_KEY)
    }

    /// Create a store reading and writing under a custom key
    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Load the document, falling back to a default one on any failure
    pub fn load(&self) -> Document {
        match self.try_load() {
            Ok(doc) => doc,
            Err(e @ Error::Parse(_)) => {
                tracing::warn!("Stored document under {} is unreadable, starting fresh: {}", self.key, e);
                Document::default()
            }
            Err(e) => {
                tracing::error!("Failed to read document under {}: {}", self.key, e);
                Document::default()
            }
        }
    }

    /// Load the document, reporting why it could not be read
    ///
    /// An absent or empty blob is not an error and yields a default document.
    pub fn try_load(&self) -> Result<Document> {
        let blob = match self.backend.get_string(&self.key)? {
            Some(blob) if !blob.trim().is_empty() => blob,
            _ => {
                tracing::debug!("No document stored under {}", self.key);
                return Ok(Document::default());
            }
        };

        let doc = Document::from_blob(&blob)?;
        tracing::debug!("Loaded document under {} ({} references)", self.key, doc.references.len());
        Ok(doc)
    }

    /// Read the raw blob without parsing it
    pub fn raw_blob(&self) -> Result<Option<String>> {
        Ok(self.backend.get_string(&self.key)?)
    }

    /// Save the document, overwriting the previous blob
    ///
    /// Nothing is written unless serialization succeeds.
    pub fn save(&mut self, doc: &Document) -> Result<()> {
        let blob = doc.to_blob()?;
        self.backend.set_string(&self.key, &blob)?;
        tracing::debug!("Saved document under {}", self.key);
        Ok(())
    }

    /// Append an empty reference to `doc`
    pub fn add_reference(&self, doc: &mut Document) {
        doc.push_reference();
    }

    /// Remove the reference at `index` from `doc`
    pub fn remove_reference(&self, doc: &mut Document, index: usize) -> Result<()> {
        doc.remove_reference(index).map(|_| ())
    }
}
