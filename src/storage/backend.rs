//! Storage backend trait and implementations.
//!
//! This module provides key-value blob backends for chronicle data:
//! - `FileBackend` - One file per key under the data directory (default)
//! - `MemoryBackend` - In-process map, for tests and embedding

use crate::Result;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Trait for storage backends that handle raw blob persistence.
///
/// A backend is a minimal key-value store: whole blobs are read and
/// written under fixed string keys. The degrade policy (load never
/// fails, save is best-effort) lives above this trait in `Storage`.
pub trait StorageBackend: Send + Sync {
    /// Read the blob stored under `key`, or None if absent.
    fn read_blob(&self, key: &str) -> Result<Option<String>>;

    /// Write `data` under `key`, replacing any existing blob.
    fn write_blob(&mut self, key: &str, data: &str) -> Result<()>;

    /// Get the storage location description (for display purposes).
    fn location(&self) -> String;

    /// Get the backend type name.
    fn backend_type(&self) -> &'static str;
}

/// File-based backend storing one file per key.
#[derive(Debug)]
pub struct FileBackend {
    /// Directory holding the blob files
    root: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at the given directory.
    ///
    /// The directory is created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the file backing `key`.
    fn blob_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl StorageBackend for FileBackend {
    fn read_blob(&self, key: &str) -> Result<Option<String>> {
        let path = self.blob_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn write_blob(&mut self, key: &str, data: &str) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.blob_path(key), data)?;
        Ok(())
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn backend_type(&self) -> &'static str {
        "file"
    }
}

/// In-memory backend backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    blobs: HashMap<String, String>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn read_blob(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn write_blob(&mut self, key: &str, data: &str) -> Result<()> {
        self.blobs.insert(key.to_string(), data.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }

    fn backend_type(&self) -> &'static str {
        "memory"
    }
}

/// Resolve the data directory for the file backend.
///
/// Priority: `CHRONICLE_DATA_DIR` env var > `~/.local/share/chronicle/`.
pub fn default_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CHRONICLE_DATA_DIR") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let data_dir = dirs::data_dir()
        .ok_or_else(|| crate::Error::Other("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("chronicle"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_backend_read_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path());
        assert!(backend.read_blob("nope.json").unwrap().is_none());
    }

    #[test]
    fn test_file_backend_write_then_read() {
        let dir = TempDir::new().unwrap();
        let mut backend = FileBackend::new(dir.path().join("nested"));
        backend.write_blob("data.json", "[1,2,3]").unwrap();
        assert_eq!(
            backend.read_blob("data.json").unwrap().as_deref(),
            Some("[1,2,3]")
        );
    }

    #[test]
    fn test_memory_backend_roundtrip() {
        let mut backend = MemoryBackend::new();
        assert!(backend.read_blob("k").unwrap().is_none());
        backend.write_blob("k", "v").unwrap();
        assert_eq!(backend.read_blob("k").unwrap().as_deref(), Some("v"));
        backend.write_blob("k", "v2").unwrap();
        assert_eq!(backend.read_blob("k").unwrap().as_deref(), Some("v2"));
    }
}
