//! Chronicle - a library for tracking experiment trees across projects.
//!
//! This library provides the core functionality for the `chron` CLI tool:
//! the project/node entity model, the pure tree-mutation engine, the
//! query layer, and blob persistence.

pub mod action_log;
pub mod cli;
pub mod commands;
pub mod models;
pub mod storage;


/// Library-level error type for Chronicle operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No project found: create one with `chron project create <name>`")]
    NoProject,

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Chronicle operations.
pub type Result<T> = std::result::Result<T, Error>;
