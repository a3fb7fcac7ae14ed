//! External image references
//!
//! The document only stores an opaque [`AssetHandle`] per reference. Turning a
//! handle into something displayable is left to an [`AssetResolver`].

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Opaque identifier of an external image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetHandle(String);

impl AssetHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps handles to images and back
pub trait AssetResolver {
    /// The resolved image type
    type Image;

    /// Look up the image for a handle, if it still exists
    fn resolve(&self, handle: &AssetHandle) -> Option<Self::Image>;

    /// Get the handle for an image, if the resolver can address it
    fn handle_for(&self, image: &Self::Image) -> Option<AssetHandle>;
}

/// Resolves handles as `/`-separated paths below an asset root
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetResolver for DirectoryResolver {
    type Image = PathBuf;

    fn resolve(&self, handle: &AssetHandle) -> Option<PathBuf> {
        if handle.is_empty() {
            return None;
        }

        let mut path = self.root.clone();
        for part in handle.as_str().split('/') {
            // Handles never escape the root
            if part.is_empty() || part == "." || part == ".." {
                return None;
            }
            path.push(part);
        }

        if path.is_file() {
            Some(path)
        } else {
            tracing::debug!("Asset handle {} does not resolve under {}", handle, self.root.display());
            None
        }
    }

    fn handle_for(&self, image: &PathBuf) -> Option<AssetHandle> {
        let relative = image.strip_prefix(&self.root).ok()?;
        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_str()?.to_string()),
                _ => return None,
            }
        }
        if parts.is_empty() {
            return None;
        }
        Some(AssetHandle::new(parts.join("/")))
    }
}
