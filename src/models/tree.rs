//! Tree mutation engine and queries for project node trees.
//!
//! All mutation operations are pure: they take a `&Project` (plus
//! parameters) and return a new `Project` value; the input is never
//! mutated. Operations on missing ids, self-parenting moves, and
//! cycle-forming moves degrade to no-ops that return the input
//! unchanged, so callers never need exceptional control flow.
//!
//! Parent/child relationships are id references into the project's flat
//! node collection. Every mutation keeps them mutually consistent: if a
//! node's `parent_id` is set, the parent's `child_ids` contains the node
//! id, and vice versa.

use chrono::Utc;
use std::collections::HashSet;

use crate::models::{Node, NodeStatus, NodeUpdate, Project, ProjectStats, StatusCounts};

/// Append a node to the project's collection.
///
/// If the node names a parent and the parent exists, the node id is
/// appended to the parent's `child_ids`. A node naming a missing parent
/// is still added but stays unreachable from any root (an orphan); the
/// `doctor` check reports such nodes.
pub fn add_node(project: &Project, node: Node) -> Project {
    let mut nodes = project.nodes.clone();

    if let Some(parent_id) = node.parent_id.clone() {
        if let Some(parent) = nodes.iter_mut().find(|n| n.id == parent_id) {
            parent.child_ids.push(node.id.clone());
        }
    }
    nodes.push(node);

    Project {
        nodes,
        updated_at: Utc::now(),
        ..project.clone()
    }
}

/// Apply a partial update to the node matching `node_id` and refresh its
/// `updated_at`.
///
/// No-op if `node_id` is not found.
pub fn update_node(project: &Project, node_id: &str, update: &NodeUpdate) -> Project {
    let Some(index) = project.nodes.iter().position(|n| n.id == node_id) else {
        return project.clone();
    };

    let mut nodes = project.nodes.clone();
    nodes[index] = update.apply_to(&nodes[index]);

    Project {
        nodes,
        updated_at: Utc::now(),
        ..project.clone()
    }
}

/// Remove `node_id` and its full transitive descendant set.
///
/// The id is also removed from its former parent's `child_ids`. No-op if
/// `node_id` is not found.
pub fn delete_node(project: &Project, node_id: &str) -> Project {
    let Some(node) = project.find_node(node_id) else {
        return project.clone();
    };
    let parent_id = node.parent_id.clone();
    let doomed = collect_subtree(project, node_id);

    let mut nodes: Vec<Node> = project
        .nodes
        .iter()
        .filter(|n| !doomed.contains(&n.id))
        .cloned()
        .collect();

    if let Some(parent_id) = parent_id {
        if let Some(parent) = nodes.iter_mut().find(|n| n.id == parent_id) {
            parent.child_ids.retain(|id| id != node_id);
        }
    }

    Project {
        nodes,
        updated_at: Utc::now(),
        ..project.clone()
    }
}

/// Re-parent `node_id` under `new_parent_id` (None moves it to the root).
///
/// No-op when the node is missing, when the move would self-parent, or
/// when the new parent is a descendant of the node (which would create a
/// cycle). The cycle check runs before any state is touched.
pub fn move_node(project: &Project, node_id: &str, new_parent_id: Option<&str>) -> Project {
    let Some(node) = project.find_node(node_id) else {
        return project.clone();
    };
    if let Some(new_parent) = new_parent_id {
        if new_parent == node_id {
            return project.clone();
        }
        if is_descendant(project, node_id, new_parent) {
            return project.clone();
        }
    }

    let old_parent_id = node.parent_id.clone();
    let mut nodes = project.nodes.clone();

    if let Some(old_parent_id) = old_parent_id {
        if let Some(parent) = nodes.iter_mut().find(|n| n.id == old_parent_id) {
            parent.child_ids.retain(|id| id != node_id);
        }
    }

    if let Some(moved) = nodes.iter_mut().find(|n| n.id == node_id) {
        moved.parent_id = new_parent_id.map(String::from);
        moved.updated_at = Utc::now();
    }

    if let Some(new_parent_id) = new_parent_id {
        if let Some(parent) = nodes.iter_mut().find(|n| n.id == new_parent_id) {
            parent.child_ids.push(node_id.to_string());
        }
    }

    Project {
        nodes,
        updated_at: Utc::now(),
        ..project.clone()
    }
}

/// Collect `node_id` and all its transitive descendants.
///
/// Returns an empty set if the node does not exist.
pub fn collect_subtree(project: &Project, node_id: &str) -> HashSet<String> {
    let mut seen = HashSet::new();
    if project.find_node(node_id).is_none() {
        return seen;
    }

    let mut stack = vec![node_id.to_string()];
    while let Some(id) = stack.pop() {
        if !seen.insert(id.clone()) {
            continue;
        }
        if let Some(node) = project.find_node(&id) {
            stack.extend(node.child_ids.iter().cloned());
        }
    }
    seen
}

/// Check whether `target_id` is a descendant of `node_id`.
///
/// Depth-first descent through `child_ids`. A node is not its own
/// descendant. Returns `false` if `node_id` does not exist.
pub fn is_descendant(project: &Project, node_id: &str, target_id: &str) -> bool {
    let Some(node) = project.find_node(node_id) else {
        return false;
    };
    for child_id in &node.child_ids {
        if child_id == target_id || is_descendant(project, child_id, target_id) {
            return true;
        }
    }
    false
}

/// Nodes with no parent, in collection order.
pub fn root_nodes(project: &Project) -> Vec<&Node> {
    project
        .nodes
        .iter()
        .filter(|n| n.parent_id.is_none())
        .collect()
}

/// Case-insensitive substring search over title and the free-text fields
/// (hypothesis, method, results, analysis, next steps).
///
/// Absent fields never match. An empty query matches every node.
pub fn search_nodes<'a>(project: &'a Project, query: &str) -> Vec<&'a Node> {
    let query = query.to_lowercase();
    project
        .nodes
        .iter()
        .filter(|node| {
            [
                Some(node.title.as_str()),
                node.hypothesis.as_deref(),
                node.method.as_deref(),
                node.results.as_deref(),
                node.analysis.as_deref(),
                node.next_steps.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&query))
        })
        .collect()
}

/// Nodes whose status equals `status`, in collection order.
pub fn nodes_by_status(project: &Project, status: NodeStatus) -> Vec<&Node> {
    project
        .nodes
        .iter()
        .filter(|n| n.status == status)
        .collect()
}

/// Total node count and a complete per-status count mapping.
pub fn project_stats(project: &Project) -> ProjectStats {
    let mut by_status = StatusCounts::default();
    for node in &project.nodes {
        by_status.bump(node.status);
    }
    ProjectStats {
        total: project.nodes.len(),
        by_status,
    }
}
