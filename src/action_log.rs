//! Action logging for Chronicle commands.
//!
//! This module provides logging of all chron commands to a structured
//! log file in JSONL format, alongside the project blob in the data
//! directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// File name of the action log inside the data directory.
pub const ACTION_LOG_FILE: &str = "actions.jsonl";

/// Represents a single action log entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionLog {
    /// ISO 8601 timestamp when the action occurred
    pub timestamp: DateTime<Utc>,

    /// Command name (e.g., "node add", "project list")
    pub command: String,

    /// Command arguments as JSON
    pub args: serde_json::Value,

    /// Whether the command succeeded
    pub success: bool,

    /// Error message if the command failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Command execution duration in milliseconds
    pub duration_ms: u64,

    /// User who executed the command
    pub user: String,
}

/// Log an action to the log file in the given data directory.
///
/// This function never fails the caller - write errors produce a stderr
/// warning and nothing else. Set `CHRONICLE_ACTION_LOG=0` to disable.
pub fn log_action(
    data_dir: &Path,
    command: &str,
    args: serde_json::Value,
    success: bool,
    error: Option<String>,
    duration_ms: u64,
) {
    if !enabled() {
        return;
    }

    let entry = ActionLog {
        timestamp: Utc::now(),
        command: command.to_string(),
        args,
        success,
        error,
        duration_ms,
        user: current_user(),
    };

    if let Err(e) = write_log_entry(&log_path(data_dir), &entry) {
        eprintln!("Warning: Failed to write action log: {}", e);
    }
}

/// Read the most recent `limit` entries from the action log.
///
/// Returns an empty list when the log does not exist.
pub fn read_recent(data_dir: &Path, limit: usize) -> crate::Result<Vec<ActionLog>> {
    let path = log_path(data_dir);
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = fs::File::open(&path)?;
    let reader = BufReader::new(file);

    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        // Skip unparseable lines rather than failing the whole read
        if let Ok(entry) = serde_json::from_str::<ActionLog>(&line) {
            entries.push(entry);
        }
    }

    if entries.len() > limit {
        entries.drain(..entries.len() - limit);
    }
    Ok(entries)
}

fn enabled() -> bool {
    !matches!(
        std::env::var("CHRONICLE_ACTION_LOG").as_deref(),
        Ok("0") | Ok("false")
    )
}

fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(ACTION_LOG_FILE)
}

fn current_user() -> String {
    std::env::var("USER").unwrap_or_else(|_| "unknown".to_string())
}

/// Write a log entry to the log file.
fn write_log_entry(path: &Path, entry: &ActionLog) -> Result<(), Box<dyn std::error::Error>> {
    // Create parent directories if needed
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string(entry)?;

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", json)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_then_read_recent() {
        let dir = TempDir::new().unwrap();
        log_action(
            dir.path(),
            "node add",
            serde_json::json!({ "title": "Root" }),
            true,
            None,
            3,
        );
        log_action(
            dir.path(),
            "node delete",
            serde_json::json!({ "id": "x" }),
            false,
            Some("Entity not found: x".to_string()),
            1,
        );

        let entries = read_recent(dir.path(), 10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].command, "node add");
        assert!(entries[0].success);
        assert_eq!(entries[1].command, "node delete");
        assert!(!entries[1].success);
        assert!(entries[1].error.is_some());
    }

    #[test]
    fn test_read_recent_respects_limit() {
        let dir = TempDir::new().unwrap();
        for i in 0..5 {
            log_action(
                dir.path(),
                "project list",
                serde_json::json!({ "i": i }),
                true,
                None,
                1,
            );
        }

        let entries = read_recent(dir.path(), 2).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].args["i"], 4);
    }

    #[test]
    fn test_read_recent_missing_log_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(read_recent(dir.path(), 10).unwrap().is_empty());
    }
}
