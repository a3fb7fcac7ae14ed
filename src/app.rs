//! Editing session with silent autosave

use crate::core::asset::AssetHandle;
use crate::core::backend::PreferenceBackend;
use crate::core::document::{Document, Field, ReferenceField};
use crate::core::error::Result;
use crate::core::store::DocumentStore;

/// An open document and the store it autosaves to
///
/// The document is loaded once when the session opens and every mutation
/// is written back immediately.
pub struct Session<B: PreferenceBackend> {
    store: DocumentStore<B>,
    document: Document,
}

impl<B: PreferenceBackend> Session<B> {
    /// Open a session, loading the stored document or starting a fresh one
    pub fn open(store: DocumentStore<B>) -> Self {
        let document = store.load();
        tracing::info!("Opened document: {}", document.display_title());
        Self { store, document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn store(&self) -> &DocumentStore<B> {
        &self.store
    }

    /// Update a scalar field
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<()> {
        self.document.set_field(field, value);
        self.autosave()
    }

    /// Append an empty reference and return its index
    pub fn add_reference(&mut self) -> Result<usize> {
        self.store.add_reference(&mut self.document);
        self.autosave()?;
        Ok(self.document.references.len() - 1)
    }

    /// Remove a reference; later references move up one index
    pub fn remove_reference(&mut self, index: usize) -> Result<()> {
        self.store.remove_reference(&mut self.document, index)?;
        self.autosave()
    }

    pub fn set_reference_field(
        &mut self,
        index: usize,
        field: ReferenceField,
        value: impl Into<String>,
    ) -> Result<()> {
        self.document.set_reference_field(index, field, value)?;
        self.autosave()
    }

    pub fn set_reference_image(&mut self, index: usize, handle: Option<AssetHandle>) -> Result<()> {
        self.document.set_reference_image(index, handle)?;
        self.autosave()
    }

    /// Save one last time and hand back the store
    pub fn close(mut self) -> Result<DocumentStore<B>> {
        self.autosave()?;
        Ok(self.store)
    }

    fn autosave(&mut self) -> Result<()> {
        self.store.save(&self.document).map_err(|e| {
            tracing::error!("Failed to save document: {}", e);
            e
        })
    }
}
