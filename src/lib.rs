//! GDD Tool - a game design document with silent autosave
//!
//! The document is a set of text fields plus an ordered list of image
//! references, persisted as one JSON blob in a key-value preference store.

pub mod app;
pub mod core;

pub use app::Session;
pub use crate::core::asset::{AssetHandle, AssetResolver, DirectoryResolver};
pub use crate::core::backend::{FileBackend, MemoryBackend, PreferenceBackend};
pub use crate::core::document::{Document, Field, ReferenceField, ReferenceItem, Section};
pub use crate::core::error::{Error, Result};
pub use crate::core::store::{DocumentStore, DOCUMENT_KEY};
