//! CLI argument definitions for Chronicle.

use clap::{Parser, Subcommand};

/// Chronicle - track experiment trees across projects.
///
/// Running `chron` with no command opens the current project (the most
/// recently accessed one) and shows its tree.
#[derive(Parser, Debug)]
#[command(name = "chron")]
#[command(author, version, about = "A CLI tool for tracking experiment trees across projects", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Data directory for the project blob and action log.
    /// Can also be set via CHRONICLE_DATA_DIR environment variable.
    #[arg(long = "data-dir", global = true, env = "CHRONICLE_DATA_DIR")]
    pub data_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Project management commands
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Node management commands (operate on the current project by default)
    Node {
        #[command(subcommand)]
        command: NodeCommands,
    },

    /// Show the node tree of a project
    Tree {
        /// Project id (default: current project)
        #[arg(short = 'P', long = "project")]
        project: Option<String>,
    },

    /// Search nodes by substring (title and free-text fields)
    Search {
        /// Query string; empty matches every node
        query: String,

        /// Only return nodes with this status
        #[arg(short, long)]
        status: Option<String>,

        /// Project id (default: current project)
        #[arg(short = 'P', long = "project")]
        project: Option<String>,
    },

    /// Show node counts per status for a project
    Stats {
        /// Project id (default: current project)
        #[arg(short = 'P', long = "project")]
        project: Option<String>,
    },

    /// Status enumeration commands
    Status {
        #[command(subcommand)]
        command: StatusCommands,
    },

    /// Check node-graph integrity (dangling links, orphans, duplicates)
    Doctor {
        /// Project id (default: all projects)
        #[arg(short = 'P', long = "project")]
        project: Option<String>,
    },

    /// Show recent entries from the action log
    Log {
        /// Maximum number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// System administration commands
    System {
        #[command(subcommand)]
        command: SystemCommands,
    },
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a new project (it becomes the current one)
    Create {
        /// Project name
        name: String,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List all projects, most recently accessed first
    List,

    /// Make a project the current one
    Select {
        /// Project id
        id: String,
    },

    /// Show project details
    Show {
        /// Project id (default: current project)
        id: Option<String>,
    },

    /// Delete a project and all of its nodes
    Delete {
        /// Project id
        id: String,
    },
}

/// Node subcommands
#[derive(Subcommand, Debug)]
pub enum NodeCommands {
    /// Create a new node, as a root or under a parent
    Add {
        /// Node title
        title: String,

        /// Parent node id (omit to create a root node)
        #[arg(short, long)]
        parent: Option<String>,

        /// Initial status (default: untried)
        #[arg(short, long)]
        status: Option<String>,

        /// Project id (default: current project)
        #[arg(short = 'P', long = "project")]
        project: Option<String>,
    },

    /// Show a single node
    Show {
        /// Node id
        id: String,

        /// Project id (default: current project)
        #[arg(short = 'P', long = "project")]
        project: Option<String>,
    },

    /// Update node fields; only the provided flags are applied
    Update {
        /// Node id
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New status
        #[arg(short, long)]
        status: Option<String>,

        /// What this experiment expects to show
        #[arg(long)]
        hypothesis: Option<String>,

        /// How the experiment is carried out
        #[arg(long)]
        method: Option<String>,

        /// Observed outcome
        #[arg(long)]
        results: Option<String>,

        /// Interpretation of the outcome
        #[arg(long)]
        analysis: Option<String>,

        /// Follow-up work suggested by this experiment
        #[arg(long = "next-steps")]
        next_steps: Option<String>,

        /// Resource link or reference (repeatable, replaces the list)
        #[arg(short = 'r', long = "resource")]
        resources: Vec<String>,

        /// Tag (repeatable, replaces the list)
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,

        /// Project id (default: current project)
        #[arg(short = 'P', long = "project")]
        project: Option<String>,
    },

    /// Delete a node and its whole subtree
    Delete {
        /// Node id
        id: String,

        /// Project id (default: current project)
        #[arg(short = 'P', long = "project")]
        project: Option<String>,
    },

    /// Re-parent a node
    Move {
        /// Node id
        id: String,

        /// New parent node id
        #[arg(short, long, conflicts_with = "root")]
        parent: Option<String>,

        /// Move the node to the root instead
        #[arg(long)]
        root: bool,

        /// Project id (default: current project)
        #[arg(short = 'P', long = "project")]
        project: Option<String>,
    },
}

/// Status subcommands
#[derive(Subcommand, Debug)]
pub enum StatusCommands {
    /// List the six status values with their display metadata
    List,
}

/// System subcommands
#[derive(Subcommand, Debug)]
pub enum SystemCommands {
    /// Show storage location, backend, and collection totals
    Info,
}
