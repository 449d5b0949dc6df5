//! Storage layer for Chronicle data.
//!
//! The full project collection is persisted as a single JSON blob under
//! one fixed key. Loading degrades to an empty collection when the blob
//! is missing or unreadable; saving is best-effort. In both cases the
//! in-memory state stays authoritative for the current session and a
//! warning goes to stderr; callers never see a persistence error.

pub mod backend;

pub use backend::{FileBackend, MemoryBackend, StorageBackend, default_data_dir};

use crate::Result;
use crate::models::Project;
use std::path::Path;

/// Fixed key the project collection blob is stored under.
pub const PROJECTS_KEY: &str = "projects.json";

/// Storage manager wrapping a blob backend with the degrade policy.
pub struct Storage {
    backend: Box<dyn StorageBackend>,
}

impl Storage {
    /// Open storage at the default data directory.
    ///
    /// Honors `CHRONICLE_DATA_DIR`; falls back to
    /// `~/.local/share/chronicle/`.
    pub fn open() -> Result<Self> {
        let root = default_data_dir()?;
        Ok(Self {
            backend: Box::new(FileBackend::new(root)),
        })
    }

    /// Open storage rooted at an explicit data directory.
    pub fn open_with_data_dir(data_dir: &Path) -> Self {
        Self {
            backend: Box::new(FileBackend::new(data_dir)),
        }
    }

    /// Wrap an arbitrary backend (used by tests and embedders).
    pub fn with_backend(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Storage location description.
    pub fn location(&self) -> String {
        self.backend.location()
    }

    /// Backend type name.
    pub fn backend_type(&self) -> &'static str {
        self.backend.backend_type()
    }

    /// Load the full project collection.
    ///
    /// Returns an empty collection when no data is stored or the blob is
    /// unreadable or corrupt. Never fails the caller.
    pub fn load_projects(&self) -> Vec<Project> {
        match self.try_load() {
            Ok(projects) => projects,
            Err(e) => {
                eprintln!("Warning: failed to load projects: {}", e);
                Vec::new()
            }
        }
    }

    /// Persist the full project collection.
    ///
    /// Best-effort: a failed write is logged to stderr and swallowed;
    /// the in-memory state is never rolled back.
    pub fn save_projects(&mut self, projects: &[Project]) {
        if let Err(e) = self.try_save(projects) {
            eprintln!("Warning: failed to save projects: {}", e);
        }
    }

    fn try_load(&self) -> Result<Vec<Project>> {
        match self.backend.read_blob(PROJECTS_KEY)? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(Vec::new()),
        }
    }

    fn try_save(&mut self, projects: &[Project]) -> Result<()> {
        let blob = serde_json::to_string(projects)?;
        self.backend.write_blob(PROJECTS_KEY, &blob)
    }
}
