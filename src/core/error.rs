//! Error types for document persistence

/// Errors raised by the document store and model
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The persisted blob exists but is not a valid document
    #[error("Failed to parse document blob: {0}")]
    Parse(#[source] serde_json::Error),

    /// The document could not be turned into a blob
    #[error("Failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Reference index out of range
    #[error("Reference index {index} out of range (len {len})")]
    Index { index: usize, len: usize },

    /// The preference backend failed to read or write
    #[error("Preference backend error: {0}")]
    Backend(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
