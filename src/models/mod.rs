//! Data models for Chronicle entities.
//!
//! This module defines the core data structures:
//! - `Project` - Top-level container owning a tree of experiment nodes
//! - `Node` - A single tracked experiment/attempt within a project
//! - `NodeStatus` - Outcome state of an experiment, with display metadata
//! - `NodeUpdate` - Partial field changes applied to an existing node
//! - `ProjectStats` - Aggregate node counts per status
//!
//! Projects own their nodes; parent/child relationships between nodes are
//! expressed as id references into the project's flat node collection,
//! not as nested structures.

pub mod tree;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Experiment status in the workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeStatus {
    /// Not yet attempted
    #[default]
    Untried,
    InProgress,
    Success,
    Failed,
    Abandoned,
    /// Waiting on something outside this experiment
    Blocked,
}

/// Display metadata for a status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusMeta {
    /// Human-readable label (e.g., "In Progress")
    pub label: &'static str,
    /// Color classification for rendering
    pub color: &'static str,
    /// Icon shown next to the node title
    pub icon: &'static str,
}

impl NodeStatus {
    /// Get all status values.
    pub fn all() -> &'static [NodeStatus] {
        &[
            NodeStatus::Untried,
            NodeStatus::InProgress,
            NodeStatus::Success,
            NodeStatus::Failed,
            NodeStatus::Abandoned,
            NodeStatus::Blocked,
        ]
    }

    /// Display metadata for this status.
    ///
    /// Total over all variants; lookups never fail.
    pub fn meta(&self) -> StatusMeta {
        match self {
            NodeStatus::Untried => StatusMeta {
                label: "Untried",
                color: "blue",
                icon: "🔵",
            },
            NodeStatus::InProgress => StatusMeta {
                label: "In Progress",
                color: "yellow",
                icon: "🔬",
            },
            NodeStatus::Success => StatusMeta {
                label: "Success",
                color: "green",
                icon: "✅",
            },
            NodeStatus::Failed => StatusMeta {
                label: "Failed",
                color: "red",
                icon: "❌",
            },
            NodeStatus::Abandoned => StatusMeta {
                label: "Abandoned",
                color: "gray",
                icon: "⚫",
            },
            NodeStatus::Blocked => StatusMeta {
                label: "Blocked",
                color: "orange",
                icon: "🚧",
            },
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeStatus::Untried => "untried",
            NodeStatus::InProgress => "in-progress",
            NodeStatus::Success => "success",
            NodeStatus::Failed => "failed",
            NodeStatus::Abandoned => "abandoned",
            NodeStatus::Blocked => "blocked",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for NodeStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "untried" => Ok(NodeStatus::Untried),
            "in-progress" | "in_progress" | "inprogress" => Ok(NodeStatus::InProgress),
            "success" => Ok(NodeStatus::Success),
            "failed" => Ok(NodeStatus::Failed),
            "abandoned" => Ok(NodeStatus::Abandoned),
            "blocked" => Ok(NodeStatus::Blocked),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// A single tracked experiment/attempt; unit of the hierarchical tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier (UUID v4)
    pub id: String,

    /// Experiment title
    pub title: String,

    /// Current status
    #[serde(default)]
    pub status: NodeStatus,

    /// What this experiment expects to show
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hypothesis: Option<String>,

    /// How the experiment is carried out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Observed outcome
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<String>,

    /// Interpretation of the outcome
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,

    /// Links or references consulted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,

    /// Follow-up work suggested by this experiment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,

    /// Parent node id; None means this is a root node
    pub parent_id: Option<String>,

    /// Ids of direct children, in insertion order
    #[serde(default)]
    pub child_ids: Vec<String>,

    /// Tags for categorization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Node {
    /// Create a new node with the given title and parent reference.
    ///
    /// The node gets a fresh id, status `Untried`, an empty child list,
    /// and both timestamps set to now. It is not attached to any project.
    pub fn new(title: impl Into<String>, parent_id: Option<String>) -> Self {
        Self::with_status(title, parent_id, NodeStatus::default())
    }

    /// Create a new node with an explicit initial status.
    pub fn with_status(
        title: impl Into<String>,
        parent_id: Option<String>,
        status: NodeStatus,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            status,
            hypothesis: None,
            method: None,
            results: None,
            analysis: None,
            resources: None,
            next_steps: None,
            created_at: now,
            updated_at: now,
            parent_id,
            child_ids: Vec::new(),
            tags: None,
        }
    }
}

/// Partial field changes for an existing node.
///
/// Only `Some` fields are applied; everything else is left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hypothesis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl NodeUpdate {
    /// Returns true if no field change is present.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.status.is_none()
            && self.hypothesis.is_none()
            && self.method.is_none()
            && self.results.is_none()
            && self.analysis.is_none()
            && self.resources.is_none()
            && self.next_steps.is_none()
            && self.tags.is_none()
    }

    /// Produce a copy of `node` with this update applied and its
    /// `updated_at` refreshed.
    pub fn apply_to(&self, node: &Node) -> Node {
        let mut updated = node.clone();
        if let Some(title) = &self.title {
            updated.title = title.clone();
        }
        if let Some(status) = self.status {
            updated.status = status;
        }
        if let Some(hypothesis) = &self.hypothesis {
            updated.hypothesis = Some(hypothesis.clone());
        }
        if let Some(method) = &self.method {
            updated.method = Some(method.clone());
        }
        if let Some(results) = &self.results {
            updated.results = Some(results.clone());
        }
        if let Some(analysis) = &self.analysis {
            updated.analysis = Some(analysis.clone());
        }
        if let Some(resources) = &self.resources {
            updated.resources = Some(resources.clone());
        }
        if let Some(next_steps) = &self.next_steps {
            updated.next_steps = Some(next_steps.clone());
        }
        if let Some(tags) = &self.tags {
            updated.tags = Some(tags.clone());
        }
        updated.updated_at = Utc::now();
        updated
    }
}

/// Top-level container owning a named tree of nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier (UUID v4)
    pub id: String,

    /// Project name
    pub name: String,

    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,

    /// Last time this project was opened
    pub last_accessed_at: DateTime<Utc>,

    /// All nodes in this project, in insertion order
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Project {
    /// Create a new project with an empty node collection.
    ///
    /// All three timestamps are set to now.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description,
            created_at: now,
            updated_at: now,
            last_accessed_at: now,
            nodes: Vec::new(),
        }
    }

    /// Return a copy with `last_accessed_at` set to now. No other field
    /// changes.
    pub fn touch_access(&self) -> Project {
        Project {
            last_accessed_at: Utc::now(),
            ..self.clone()
        }
    }

    /// Look up a node by id.
    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Aggregate node counts for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStats {
    /// Total number of nodes
    pub total: usize,
    /// Per-status counts; every status is present even when zero
    pub by_status: StatusCounts,
}

/// Node counts per status value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StatusCounts {
    pub untried: usize,
    pub in_progress: usize,
    pub success: usize,
    pub failed: usize,
    pub abandoned: usize,
    pub blocked: usize,
}

impl StatusCounts {
    /// Count of the given status.
    pub fn get(&self, status: NodeStatus) -> usize {
        match status {
            NodeStatus::Untried => self.untried,
            NodeStatus::InProgress => self.in_progress,
            NodeStatus::Success => self.success,
            NodeStatus::Failed => self.failed,
            NodeStatus::Abandoned => self.abandoned,
            NodeStatus::Blocked => self.blocked,
        }
    }

    /// Increment the count of the given status.
    pub fn bump(&mut self, status: NodeStatus) {
        match status {
            NodeStatus::Untried => self.untried += 1,
            NodeStatus::InProgress => self.in_progress += 1,
            NodeStatus::Success => self.success += 1,
            NodeStatus::Failed => self.failed += 1,
            NodeStatus::Abandoned => self.abandoned += 1,
            NodeStatus::Blocked => self.blocked += 1,
        }
    }

    /// Sum of all per-status counts.
    pub fn sum(&self) -> usize {
        self.untried + self.in_progress + self.success + self.failed + self.abandoned + self.blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_serialization_roundtrip() {
        let node = Node::new("Try approach A", None);
        let json = serde_json::to_string(&node).unwrap();
        let deserialized: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(node.id, deserialized.id);
        assert_eq!(node.title, deserialized.title);
        assert_eq!(deserialized.status, NodeStatus::Untried);
    }

    #[test]
    fn test_node_wire_field_names() {
        let node = Node::new("Wire check", Some("abc".to_string()));
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"parentId\":\"abc\""));
        assert!(json.contains("\"childIds\":[]"));
        assert!(json.contains("\"createdAt\""));
        // Absent optional fields are omitted entirely
        assert!(!json.contains("hypothesis"));
        assert!(!json.contains("nextSteps"));
    }

    #[test]
    fn test_node_status_serialization() {
        let status = NodeStatus::InProgress;
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#""in-progress""#);
    }

    #[test]
    fn test_node_status_default_on_missing_field() {
        let json = r#"{"id":"n1","title":"Bare","createdAt":"2026-01-01T00:00:00Z","updatedAt":"2026-01-01T00:00:00Z","parentId":null}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.status, NodeStatus::Untried);
        assert!(node.child_ids.is_empty());
    }

    #[test]
    fn test_node_status_from_str() {
        assert_eq!("untried".parse::<NodeStatus>().unwrap(), NodeStatus::Untried);
        assert_eq!(
            "in-progress".parse::<NodeStatus>().unwrap(),
            NodeStatus::InProgress
        );
        assert_eq!(
            "in_progress".parse::<NodeStatus>().unwrap(),
            NodeStatus::InProgress
        );
        assert_eq!("SUCCESS".parse::<NodeStatus>().unwrap(), NodeStatus::Success);
        assert_eq!("failed".parse::<NodeStatus>().unwrap(), NodeStatus::Failed);
        assert_eq!(
            "abandoned".parse::<NodeStatus>().unwrap(),
            NodeStatus::Abandoned
        );
        assert_eq!("blocked".parse::<NodeStatus>().unwrap(), NodeStatus::Blocked);
        assert!("invalid".parse::<NodeStatus>().is_err());
    }

    #[test]
    fn test_node_status_display() {
        assert_eq!(NodeStatus::Untried.to_string(), "untried");
        assert_eq!(NodeStatus::InProgress.to_string(), "in-progress");
        assert_eq!(NodeStatus::Blocked.to_string(), "blocked");
    }

    #[test]
    fn test_status_meta_total() {
        // Every status has a non-empty metadata entry
        for status in NodeStatus::all() {
            let meta = status.meta();
            assert!(!meta.label.is_empty());
            assert!(!meta.color.is_empty());
            assert!(!meta.icon.is_empty());
        }
        assert_eq!(NodeStatus::all().len(), 6);
    }

    #[test]
    fn test_project_new_empty() {
        let project = Project::new("Acid test", Some("notes".to_string()));
        assert!(project.nodes.is_empty());
        assert_eq!(project.created_at, project.updated_at);
        assert_eq!(project.created_at, project.last_accessed_at);
    }

    #[test]
    fn test_project_touch_access_only_changes_access_time() {
        let project = Project::new("Acid test", None);
        let touched = project.touch_access();
        assert_eq!(project.id, touched.id);
        assert_eq!(project.updated_at, touched.updated_at);
        assert!(touched.last_accessed_at >= project.last_accessed_at);
    }

    #[test]
    fn test_project_serialization_roundtrip() {
        let mut project = Project::new("Acid test", None);
        project.nodes.push(Node::new("Root", None));
        let json = serde_json::to_string(&project).unwrap();
        let deserialized: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(project.id, deserialized.id);
        assert_eq!(deserialized.nodes.len(), 1);
        assert!(json.contains("\"lastAccessedAt\""));
    }

    #[test]
    fn test_node_update_applies_only_present_fields() {
        let node = Node::new("Original", None);
        let update = NodeUpdate {
            status: Some(NodeStatus::Success),
            results: Some("it worked".to_string()),
            ..Default::default()
        };
        let updated = update.apply_to(&node);
        assert_eq!(updated.title, "Original");
        assert_eq!(updated.status, NodeStatus::Success);
        assert_eq!(updated.results.as_deref(), Some("it worked"));
        assert!(updated.hypothesis.is_none());
        assert!(updated.updated_at >= node.updated_at);
    }

    #[test]
    fn test_node_update_is_empty() {
        assert!(NodeUpdate::default().is_empty());
        let update = NodeUpdate {
            title: Some("t".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_status_counts_bump_and_sum() {
        let mut counts = StatusCounts::default();
        counts.bump(NodeStatus::Untried);
        counts.bump(NodeStatus::Untried);
        counts.bump(NodeStatus::Blocked);
        assert_eq!(counts.get(NodeStatus::Untried), 2);
        assert_eq!(counts.get(NodeStatus::Blocked), 1);
        assert_eq!(counts.get(NodeStatus::Success), 0);
        assert_eq!(counts.sum(), 3);
    }
}
