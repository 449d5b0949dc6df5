//! Command implementations for the chron CLI.
//!
//! This module contains the business logic for each CLI command.
//! Every command loads the project collection, applies pure engine
//! operations from `models::tree`, persists the result, and returns a
//! typed result struct that renders as JSON or human-readable text.
//!
//! Commands are organized by entity type:
//! - `project_*` - Project CRUD and selection
//! - `node_*` - Node CRUD and re-parenting
//! - `tree` / `search` / `stats` - Read-only views
//! - `doctor` - Node-graph integrity check
//! - `log_show` / `system_info` - Introspection

use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

use crate::action_log::{self, ActionLog};
use crate::models::tree;
use crate::models::{Node, NodeStatus, NodeUpdate, Project, ProjectStats};
use crate::storage::Storage;
use crate::{Error, Result};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output: Serialize {
    /// Format for human-readable output.
    fn to_human(&self) -> String;

    /// Serialize to JSON string.
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"error":"serialization failed"}"#.into())
    }
}

// === Current-project resolution ===

/// Index of the project with the most recent access time.
///
/// Ties are broken by encounter order (the first one wins).
fn current_index(projects: &[Project]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, p) in projects.iter().enumerate() {
        match best {
            Some(b) if projects[b].last_accessed_at >= p.last_accessed_at => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Resolve the target project: an explicit id if given, the current
/// project otherwise.
fn resolve_project(projects: &[Project], explicit: Option<&str>) -> Result<usize> {
    match explicit {
        Some(id) => projects
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| Error::NotFound(format!("Project not found: {}", id))),
        None => current_index(projects).ok_or(Error::NoProject),
    }
}

// === Project commands ===

/// Result of `project create`.
#[derive(Debug, Serialize)]
pub struct ProjectCreated {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Output for ProjectCreated {
    fn to_human(&self) -> String {
        format!("Created project {}: \"{}\"", self.id, self.name)
    }
}

/// Create a new project and persist it. The fresh access timestamp makes
/// it the current project.
pub fn project_create(
    storage: &mut Storage,
    name: &str,
    description: Option<String>,
) -> Result<ProjectCreated> {
    let mut projects = storage.load_projects();
    let project = Project::new(name, description);
    let result = ProjectCreated {
        id: project.id.clone(),
        name: project.name.clone(),
        description: project.description.clone(),
    };
    projects.push(project);
    storage.save_projects(&projects);
    Ok(result)
}

/// One row of `project list`.
#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub nodes: usize,
    pub last_accessed_at: chrono::DateTime<chrono::Utc>,
    pub current: bool,
}

/// Result of `project list`.
#[derive(Debug, Serialize)]
pub struct ProjectList {
    pub projects: Vec<ProjectSummary>,
}

impl Output for ProjectList {
    fn to_human(&self) -> String {
        if self.projects.is_empty() {
            return "No projects. Create one with `chron project create <name>`.".to_string();
        }
        let mut lines = Vec::new();
        for p in &self.projects {
            let marker = if p.current { "*" } else { " " };
            lines.push(format!(
                "{} {}  \"{}\" ({} nodes)",
                marker, p.id, p.name, p.nodes
            ));
        }
        lines.join("\n")
    }
}

/// List all projects, most recently accessed first.
pub fn project_list(storage: &mut Storage) -> Result<ProjectList> {
    let projects = storage.load_projects();
    let current = current_index(&projects);

    let mut summaries: Vec<ProjectSummary> = projects
        .iter()
        .enumerate()
        .map(|(i, p)| ProjectSummary {
            id: p.id.clone(),
            name: p.name.clone(),
            description: p.description.clone(),
            nodes: p.nodes.len(),
            last_accessed_at: p.last_accessed_at,
            current: current == Some(i),
        })
        .collect();
    summaries.sort_by(|a, b| b.last_accessed_at.cmp(&a.last_accessed_at));

    Ok(ProjectList {
        projects: summaries,
    })
}

/// Result of `project select`.
#[derive(Debug, Serialize)]
pub struct ProjectSelected {
    pub id: String,
    pub name: String,
}

impl Output for ProjectSelected {
    fn to_human(&self) -> String {
        format!("Selected project {}: \"{}\"", self.id, self.name)
    }
}

/// Mark a project as the current one by refreshing its access time.
pub fn project_select(storage: &mut Storage, id: &str) -> Result<ProjectSelected> {
    let mut projects = storage.load_projects();
    let index = resolve_project(&projects, Some(id))?;

    projects[index] = projects[index].touch_access();
    let result = ProjectSelected {
        id: projects[index].id.clone(),
        name: projects[index].name.clone(),
    };
    storage.save_projects(&projects);
    Ok(result)
}

/// Result of `project show`.
#[derive(Debug, Serialize)]
pub struct ProjectDetails {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub last_accessed_at: chrono::DateTime<chrono::Utc>,
    pub stats: ProjectStats,
}

impl Output for ProjectDetails {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("Project {}: \"{}\"", self.id, self.name)];
        if let Some(description) = &self.description {
            lines.push(format!("  {}", description));
        }
        lines.push(format!("  created:  {}", self.created_at.to_rfc3339()));
        lines.push(format!("  updated:  {}", self.updated_at.to_rfc3339()));
        lines.push(format!("  accessed: {}", self.last_accessed_at.to_rfc3339()));
        lines.push(format!("  nodes:    {}", self.stats.total));
        lines.join("\n")
    }
}

/// Show details of a project (the current one when no id is given).
pub fn project_show(storage: &mut Storage, id: Option<&str>) -> Result<ProjectDetails> {
    let projects = storage.load_projects();
    let index = resolve_project(&projects, id)?;
    let project = &projects[index];

    Ok(ProjectDetails {
        id: project.id.clone(),
        name: project.name.clone(),
        description: project.description.clone(),
        created_at: project.created_at,
        updated_at: project.updated_at,
        last_accessed_at: project.last_accessed_at,
        stats: tree::project_stats(project),
    })
}

/// Result of `project delete`.
#[derive(Debug, Serialize)]
pub struct ProjectDeleted {
    pub id: String,
    pub name: String,
    pub nodes_deleted: usize,
}

impl Output for ProjectDeleted {
    fn to_human(&self) -> String {
        format!(
            "Deleted project {}: \"{}\" ({} nodes)",
            self.id, self.name, self.nodes_deleted
        )
    }
}

/// Remove a project from the collection; its nodes go with it.
pub fn project_delete(storage: &mut Storage, id: &str) -> Result<ProjectDeleted> {
    let mut projects = storage.load_projects();
    let index = resolve_project(&projects, Some(id))?;

    let removed = projects.remove(index);
    storage.save_projects(&projects);

    Ok(ProjectDeleted {
        id: removed.id,
        name: removed.name,
        nodes_deleted: removed.nodes.len(),
    })
}

// === Node commands ===

/// Result of `node add`.
#[derive(Debug, Serialize)]
pub struct NodeCreated {
    pub project_id: String,
    pub node: Node,
    /// True when the named parent does not exist in the project; the
    /// node was still added but is unreachable from any root.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub orphaned: bool,
}

impl Output for NodeCreated {
    fn to_human(&self) -> String {
        let mut line = format!("Created node {}: \"{}\"", self.node.id, self.node.title);
        if self.orphaned {
            line.push_str("\nWarning: parent not found; node is orphaned (see `chron doctor`)");
        }
        line
    }
}

/// Add a node to a project, as a root or under an existing parent.
pub fn node_add(
    storage: &mut Storage,
    title: &str,
    parent_id: Option<String>,
    status: Option<NodeStatus>,
    project_id: Option<&str>,
) -> Result<NodeCreated> {
    let mut projects = storage.load_projects();
    let index = resolve_project(&projects, project_id)?;

    let node = match status {
        Some(status) => Node::with_status(title, parent_id.clone(), status),
        None => Node::new(title, parent_id.clone()),
    };
    let orphaned = match &parent_id {
        Some(pid) => projects[index].find_node(pid).is_none(),
        None => false,
    };

    let result = NodeCreated {
        project_id: projects[index].id.clone(),
        node: node.clone(),
        orphaned,
    };
    projects[index] = tree::add_node(&projects[index], node);
    storage.save_projects(&projects);
    Ok(result)
}

/// Result of `node show`.
#[derive(Debug, Serialize)]
pub struct NodeDetails {
    pub project_id: String,
    pub node: Node,
}

impl Output for NodeDetails {
    fn to_human(&self) -> String {
        let n = &self.node;
        let meta = n.status.meta();
        let mut lines = vec![format!("{} {} [{}] ({})", meta.icon, n.title, n.status, n.id)];
        if let Some(parent) = &n.parent_id {
            lines.push(format!("  parent:   {}", parent));
        }
        for (label, value) in [
            ("hypothesis", &n.hypothesis),
            ("method", &n.method),
            ("results", &n.results),
            ("analysis", &n.analysis),
            ("next steps", &n.next_steps),
        ] {
            if let Some(value) = value {
                lines.push(format!("  {}: {}", label, value));
            }
        }
        if let Some(resources) = &n.resources {
            lines.push(format!("  resources: {}", resources.join(", ")));
        }
        if let Some(tags) = &n.tags {
            lines.push(format!("  tags: {}", tags.join(", ")));
        }
        if !n.child_ids.is_empty() {
            lines.push(format!("  children: {}", n.child_ids.join(", ")));
        }
        lines.join("\n")
    }
}

/// Show a single node.
pub fn node_show(storage: &mut Storage, id: &str, project_id: Option<&str>) -> Result<NodeDetails> {
    let projects = storage.load_projects();
    let index = resolve_project(&projects, project_id)?;
    let node = projects[index]
        .find_node(id)
        .ok_or_else(|| Error::NotFound(format!("Node not found: {}", id)))?;

    Ok(NodeDetails {
        project_id: projects[index].id.clone(),
        node: node.clone(),
    })
}

/// Result of `node update`.
#[derive(Debug, Serialize)]
pub struct NodeUpdated {
    pub project_id: String,
    pub node: Node,
}

impl Output for NodeUpdated {
    fn to_human(&self) -> String {
        format!("Updated node {}: \"{}\"", self.node.id, self.node.title)
    }
}

/// Apply a partial update to a node.
pub fn node_update(
    storage: &mut Storage,
    id: &str,
    update: &NodeUpdate,
    project_id: Option<&str>,
) -> Result<NodeUpdated> {
    if update.is_empty() {
        return Err(Error::InvalidInput("no fields to update".to_string()));
    }

    let mut projects = storage.load_projects();
    let index = resolve_project(&projects, project_id)?;
    if projects[index].find_node(id).is_none() {
        return Err(Error::NotFound(format!("Node not found: {}", id)));
    }

    projects[index] = tree::update_node(&projects[index], id, update);
    let result = NodeUpdated {
        project_id: projects[index].id.clone(),
        node: projects[index]
            .find_node(id)
            .cloned()
            .ok_or_else(|| Error::Other("node vanished during update".to_string()))?,
    };
    storage.save_projects(&projects);
    Ok(result)
}

/// Result of `node delete`.
#[derive(Debug, Serialize)]
pub struct NodeDeleted {
    pub project_id: String,
    pub id: String,
    /// Size of the removed subtree, the node itself included
    pub nodes_deleted: usize,
}

impl Output for NodeDeleted {
    fn to_human(&self) -> String {
        format!(
            "Deleted node {} and its descendants ({} nodes)",
            self.id, self.nodes_deleted
        )
    }
}

/// Delete a node and its whole subtree.
pub fn node_delete(storage: &mut Storage, id: &str, project_id: Option<&str>) -> Result<NodeDeleted> {
    let mut projects = storage.load_projects();
    let index = resolve_project(&projects, project_id)?;
    if projects[index].find_node(id).is_none() {
        return Err(Error::NotFound(format!("Node not found: {}", id)));
    }

    let doomed = tree::collect_subtree(&projects[index], id);
    projects[index] = tree::delete_node(&projects[index], id);
    let result = NodeDeleted {
        project_id: projects[index].id.clone(),
        id: id.to_string(),
        nodes_deleted: doomed.len(),
    };
    storage.save_projects(&projects);
    Ok(result)
}

/// Result of `node move`.
#[derive(Debug, Serialize)]
pub struct NodeMoved {
    pub project_id: String,
    pub id: String,
    /// New parent id; None means the node is now a root
    pub new_parent_id: Option<String>,
}

impl Output for NodeMoved {
    fn to_human(&self) -> String {
        match &self.new_parent_id {
            Some(parent) => format!("Moved node {} under {}", self.id, parent),
            None => format!("Moved node {} to the root", self.id),
        }
    }
}

/// Re-parent a node.
///
/// Self-parenting and cycle-forming moves are rejected here with
/// `InvalidInput`; the engine treats them as no-ops regardless.
pub fn node_move(
    storage: &mut Storage,
    id: &str,
    new_parent_id: Option<String>,
    project_id: Option<&str>,
) -> Result<NodeMoved> {
    let mut projects = storage.load_projects();
    let index = resolve_project(&projects, project_id)?;
    let project = &projects[index];

    if project.find_node(id).is_none() {
        return Err(Error::NotFound(format!("Node not found: {}", id)));
    }
    if let Some(parent) = &new_parent_id {
        if project.find_node(parent).is_none() {
            return Err(Error::NotFound(format!("Node not found: {}", parent)));
        }
        if parent == id {
            return Err(Error::InvalidInput(
                "cannot move a node under itself".to_string(),
            ));
        }
        if tree::is_descendant(project, id, parent) {
            return Err(Error::InvalidInput(
                "cannot move a node under its own descendant".to_string(),
            ));
        }
    }

    projects[index] = tree::move_node(&projects[index], id, new_parent_id.as_deref());
    let result = NodeMoved {
        project_id: projects[index].id.clone(),
        id: id.to_string(),
        new_parent_id,
    };
    storage.save_projects(&projects);
    Ok(result)
}

// === Read-only views ===

/// Result of `tree`.
#[derive(Debug, Serialize)]
pub struct TreeOutput {
    pub project_id: String,
    pub project_name: String,
    pub nodes: Vec<Node>,
}

impl Output for TreeOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Project: \"{}\" ({})",
            self.project_name, self.project_id
        )];
        if self.nodes.is_empty() {
            lines.push("  (no nodes)".to_string());
            return lines.join("\n");
        }

        let roots: Vec<&Node> = self.nodes.iter().filter(|n| n.parent_id.is_none()).collect();
        let mut reachable = HashSet::new();
        for (i, root) in roots.iter().enumerate() {
            render_subtree(
                &self.nodes,
                root,
                "",
                i + 1 == roots.len(),
                &mut lines,
                &mut reachable,
            );
        }

        let orphans: Vec<&Node> = self
            .nodes
            .iter()
            .filter(|n| !reachable.contains(&n.id))
            .collect();
        if !orphans.is_empty() {
            lines.push("Orphaned (unreachable from any root):".to_string());
            for orphan in orphans {
                let meta = orphan.status.meta();
                lines.push(format!("  {} {} ({})", meta.icon, orphan.title, orphan.id));
            }
        }
        lines.join("\n")
    }
}

/// Render `node` and its descendants as indented tree lines.
fn render_subtree(
    nodes: &[Node],
    node: &Node,
    prefix: &str,
    last: bool,
    lines: &mut Vec<String>,
    reachable: &mut HashSet<String>,
) {
    if !reachable.insert(node.id.clone()) {
        return;
    }

    let connector = if last { "└─" } else { "├─" };
    let meta = node.status.meta();
    lines.push(format!(
        "{}{} {} {} [{}] ({})",
        prefix, connector, meta.icon, node.title, node.status, node.id
    ));

    let child_prefix = format!("{}{}", prefix, if last { "   " } else { "│  " });
    let children: Vec<&Node> = node
        .child_ids
        .iter()
        .filter_map(|id| nodes.iter().find(|n| &n.id == id))
        .collect();
    for (i, child) in children.iter().enumerate() {
        render_subtree(
            nodes,
            child,
            &child_prefix,
            i + 1 == children.len(),
            lines,
            reachable,
        );
    }
}

/// Open the current project: refresh its access time, persist, and
/// return its tree.
///
/// This is the default command, mirroring the startup behavior of
/// selecting the most recently accessed project.
pub fn open_current(storage: &mut Storage) -> Result<TreeOutput> {
    let mut projects = storage.load_projects();
    let index = current_index(&projects).ok_or(Error::NoProject)?;

    projects[index] = projects[index].touch_access();
    let result = TreeOutput {
        project_id: projects[index].id.clone(),
        project_name: projects[index].name.clone(),
        nodes: projects[index].nodes.clone(),
    };
    storage.save_projects(&projects);
    Ok(result)
}

/// Show the node tree of a project.
pub fn tree(storage: &mut Storage, project_id: Option<&str>) -> Result<TreeOutput> {
    let projects = storage.load_projects();
    let index = resolve_project(&projects, project_id)?;
    let project = &projects[index];

    Ok(TreeOutput {
        project_id: project.id.clone(),
        project_name: project.name.clone(),
        nodes: project.nodes.clone(),
    })
}

/// Result of `search`.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub project_id: String,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
    pub matches: Vec<Node>,
}

impl Output for SearchResults {
    fn to_human(&self) -> String {
        if self.matches.is_empty() {
            return format!("No nodes matching \"{}\"", self.query);
        }
        let mut lines = vec![format!(
            "{} node(s) matching \"{}\":",
            self.matches.len(),
            self.query
        )];
        for node in &self.matches {
            let meta = node.status.meta();
            lines.push(format!(
                "  {} {} [{}] ({})",
                meta.icon, node.title, node.status, node.id
            ));
        }
        lines.join("\n")
    }
}

/// Search nodes by substring, optionally narrowed to one status.
pub fn search(
    storage: &mut Storage,
    query: &str,
    status: Option<NodeStatus>,
    project_id: Option<&str>,
) -> Result<SearchResults> {
    let projects = storage.load_projects();
    let index = resolve_project(&projects, project_id)?;
    let project = &projects[index];

    let matches: Vec<Node> = tree::search_nodes(project, query)
        .into_iter()
        .filter(|n| status.is_none_or(|s| n.status == s))
        .cloned()
        .collect();

    Ok(SearchResults {
        project_id: project.id.clone(),
        query: query.to_string(),
        status,
        matches,
    })
}

/// Result of `stats`.
#[derive(Debug, Serialize)]
pub struct StatsOutput {
    pub project_id: String,
    pub project_name: String,
    #[serde(flatten)]
    pub stats: ProjectStats,
}

impl Output for StatsOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Project: \"{}\" ({})", self.project_name, self.project_id),
            format!("Total nodes: {}", self.stats.total),
        ];
        for status in NodeStatus::all() {
            lines.push(format!(
                "  {} {}: {}",
                status.meta().icon,
                status,
                self.stats.by_status.get(*status)
            ));
        }
        lines.join("\n")
    }
}

/// Aggregate per-status node counts for a project.
pub fn stats(storage: &mut Storage, project_id: Option<&str>) -> Result<StatsOutput> {
    let projects = storage.load_projects();
    let index = resolve_project(&projects, project_id)?;
    let project = &projects[index];

    Ok(StatsOutput {
        project_id: project.id.clone(),
        project_name: project.name.clone(),
        stats: tree::project_stats(project),
    })
}

/// One row of `status list`.
#[derive(Debug, Serialize)]
pub struct StatusEntry {
    pub value: NodeStatus,
    pub label: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

/// Result of `status list`.
#[derive(Debug, Serialize)]
pub struct StatusList {
    pub statuses: Vec<StatusEntry>,
}

impl Output for StatusList {
    fn to_human(&self) -> String {
        self.statuses
            .iter()
            .map(|s| format!("{} {:<12} {:<12} ({})", s.icon, s.value.to_string(), s.label, s.color))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// List the status enumeration with its display metadata.
pub fn status_list() -> StatusList {
    StatusList {
        statuses: NodeStatus::all()
            .iter()
            .map(|status| {
                let meta = status.meta();
                StatusEntry {
                    value: *status,
                    label: meta.label,
                    color: meta.color,
                    icon: meta.icon,
                }
            })
            .collect(),
    }
}

// === Doctor ===

/// Kind of integrity issue found by `doctor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A child_ids entry names a node that does not exist
    DanglingChild,
    /// A node's parent exists but does not list it as a child
    ParentLinkMissing,
    /// A listed child exists but names a different parent
    ChildLinkMismatch,
    /// A node is present but unreachable from any root
    Orphaned,
    /// Two nodes share the same id
    DuplicateId,
}

/// One integrity issue.
#[derive(Debug, Serialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub project_id: String,
    pub node_id: String,
    pub detail: String,
}

/// Result of `doctor`.
#[derive(Debug, Serialize)]
pub struct DoctorReport {
    pub projects_checked: usize,
    pub ok: bool,
    pub issues: Vec<Issue>,
}

impl Output for DoctorReport {
    fn to_human(&self) -> String {
        if self.ok {
            return format!(
                "Checked {} project(s): no issues found",
                self.projects_checked
            );
        }
        let mut lines = vec![format!(
            "Checked {} project(s): {} issue(s) found",
            self.projects_checked,
            self.issues.len()
        )];
        for issue in &self.issues {
            lines.push(format!(
                "  [{}] node {}: {}",
                serde_json::to_string(&issue.kind)
                    .unwrap_or_default()
                    .trim_matches('"'),
                issue.node_id,
                issue.detail
            ));
        }
        lines.join("\n")
    }
}

/// Check node-graph integrity across all projects (or one).
///
/// Read-only: reports dangling child references, parent/child link
/// mismatches, duplicate ids, and orphaned nodes.
pub fn doctor(storage: &mut Storage, project_id: Option<&str>) -> Result<DoctorReport> {
    let projects = storage.load_projects();
    let targets: Vec<&Project> = match project_id {
        Some(id) => {
            let index = resolve_project(&projects, Some(id))?;
            vec![&projects[index]]
        }
        None => projects.iter().collect(),
    };

    let mut issues = Vec::new();
    for project in &targets {
        check_project(project, &mut issues);
    }

    Ok(DoctorReport {
        projects_checked: targets.len(),
        ok: issues.is_empty(),
        issues,
    })
}

/// Collect integrity issues for one project.
fn check_project(project: &Project, issues: &mut Vec<Issue>) {
    // Duplicate ids
    let mut seen = HashSet::new();
    for node in &project.nodes {
        if !seen.insert(node.id.as_str()) {
            issues.push(Issue {
                kind: IssueKind::DuplicateId,
                project_id: project.id.clone(),
                node_id: node.id.clone(),
                detail: format!("id {} appears more than once", node.id),
            });
        }
    }

    for node in &project.nodes {
        // parent -> child links
        if let Some(parent_id) = &node.parent_id {
            if let Some(parent) = project.find_node(parent_id) {
                if !parent.child_ids.contains(&node.id) {
                    issues.push(Issue {
                        kind: IssueKind::ParentLinkMissing,
                        project_id: project.id.clone(),
                        node_id: node.id.clone(),
                        detail: format!("parent {} does not list it as a child", parent_id),
                    });
                }
            }
        }

        // child -> parent links
        for child_id in &node.child_ids {
            match project.find_node(child_id) {
                None => issues.push(Issue {
                    kind: IssueKind::DanglingChild,
                    project_id: project.id.clone(),
                    node_id: node.id.clone(),
                    detail: format!("child id {} does not exist", child_id),
                }),
                Some(child) if child.parent_id.as_deref() != Some(node.id.as_str()) => {
                    issues.push(Issue {
                        kind: IssueKind::ChildLinkMismatch,
                        project_id: project.id.clone(),
                        node_id: child.id.clone(),
                        detail: format!(
                            "listed as a child of {} but names parent {:?}",
                            node.id, child.parent_id
                        ),
                    });
                }
                Some(_) => {}
            }
        }
    }

    // Reachability from roots
    let mut reachable = HashSet::new();
    let mut stack: Vec<&str> = tree::root_nodes(project)
        .iter()
        .map(|n| n.id.as_str())
        .collect();
    while let Some(id) = stack.pop() {
        if !reachable.insert(id.to_string()) {
            continue;
        }
        if let Some(node) = project.find_node(id) {
            stack.extend(node.child_ids.iter().map(String::as_str));
        }
    }
    for node in &project.nodes {
        if !reachable.contains(&node.id) {
            issues.push(Issue {
                kind: IssueKind::Orphaned,
                project_id: project.id.clone(),
                node_id: node.id.clone(),
                detail: "not reachable from any root".to_string(),
            });
        }
    }
}

// === Log and system ===

/// Result of `log`.
#[derive(Debug, Serialize)]
pub struct LogEntries {
    pub entries: Vec<ActionLog>,
}

impl Output for LogEntries {
    fn to_human(&self) -> String {
        if self.entries.is_empty() {
            return "No actions logged yet".to_string();
        }
        self.entries
            .iter()
            .map(|e| {
                let mark = if e.success { "ok " } else { "ERR" };
                format!(
                    "{} {} {} ({}ms)",
                    e.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    mark,
                    e.command,
                    e.duration_ms
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Show recent action-log entries.
pub fn log_show(data_dir: &Path, limit: usize) -> Result<LogEntries> {
    Ok(LogEntries {
        entries: action_log::read_recent(data_dir, limit)?,
    })
}

/// Result of `system info`.
#[derive(Debug, Serialize)]
pub struct SystemInfo {
    pub version: &'static str,
    pub build_timestamp: &'static str,
    pub git_commit: &'static str,
    pub storage_location: String,
    pub storage_backend: &'static str,
    pub projects: usize,
    pub nodes: usize,
}

impl Output for SystemInfo {
    fn to_human(&self) -> String {
        [
            format!("chronicle {} ({} {})", self.version, self.git_commit, self.build_timestamp),
            format!("storage: {} ({})", self.storage_location, self.storage_backend),
            format!("projects: {}, nodes: {}", self.projects, self.nodes),
        ]
        .join("\n")
    }
}

/// Show storage location and collection totals.
pub fn system_info(storage: &mut Storage) -> Result<SystemInfo> {
    let projects = storage.load_projects();
    Ok(SystemInfo {
        version: env!("CARGO_PKG_VERSION"),
        build_timestamp: env!("CHRONICLE_BUILD_TIMESTAMP"),
        git_commit: env!("CHRONICLE_GIT_COMMIT"),
        storage_location: storage.location(),
        storage_backend: storage.backend_type(),
        projects: projects.len(),
        nodes: projects.iter().map(|p| p.nodes.len()).sum(),
    })
}
