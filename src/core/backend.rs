//! Key-value preference backends

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A string key-value store holding preference blobs
pub trait PreferenceBackend {
    /// Read the value stored under `key`
    fn get_string(&self, key: &str) -> io::Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_string(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// In-memory backend, lost when dropped
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    values: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceBackend for MemoryBackend {
    fn get_string(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set_string(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Backend persisting all keys in one JSON object file
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> io::Result<BTreeMap<String, String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid preference file {}: {}", self.path.display(), e),
            )
        })
    }
}

impl PreferenceBackend for FileBackend {
    fn get_string(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_string(&mut self, key: &str, value: &str) -> io::Result<()> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&values)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        replace_file(&self.path, |file| file.write_all(content.as_bytes()))?;

        tracing::debug!("Wrote preference {} to {}", key, self.path.display());
        Ok(())
    }
}

/// Replace `path` with the output of `write`
///
/// The content goes to a staging file next to `path` and is renamed over it
/// once fully written. A failed write leaves the old file untouched.
fn replace_file<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    let result = File::create(&staging).and_then(|mut file| {
        write(&mut file)?;
        file.sync_all()
    });
    if let Err(e) = result.and_then(|_| std::fs::rename(&staging, path)) {
        std::fs::remove_file(&staging).ok();
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend() {
        let mut backend = MemoryBackend::new();
        assert_eq!(backend.get_string("k").unwrap(), None);
        backend.set_string("k", "v1").unwrap();
        backend.set_string("k", "v2").unwrap();
        assert_eq!(backend.get_string("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn test_file_backend_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");
        let mut backend = FileBackend::new(&path);

        assert_eq!(backend.get_string("a").unwrap(), None);
        backend.set_string("a", "1").unwrap();
        backend.set_string("b", "2").unwrap();

        let reopened = FileBackend::new(&path);
        assert_eq!(reopened.get_string("a").unwrap().as_deref(), Some("1"));
        assert_eq!(reopened.get_string("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_failed_write_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let mut backend = FileBackend::new(&path);
        backend.set_string("GDDDocument", "{\"workingTitle\": \"Sky\"}").unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let err = replace_file(&path, |file| {
            file.write_all(b"{\"GDDDocu")?;
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        })
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(
            backend.get_string("GDDDocument").unwrap().as_deref(),
            Some("{\"workingTitle\": \"Sky\"}")
        );
    }

    #[test]
    fn test_file_backend_rejects_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not a map").unwrap();

        let err = FileBackend::new(&path).get_string("a").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
