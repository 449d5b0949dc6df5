//! Chronicle CLI - track experiment trees across projects.

use chronicle::action_log;
use chronicle::cli::{
    Cli, Commands, NodeCommands, ProjectCommands, StatusCommands, SystemCommands,
};
use chronicle::commands::{self, Output};
use chronicle::models::{NodeStatus, NodeUpdate};
use chronicle::storage::{Storage, default_data_dir};
use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    // Determine data directory: --data-dir flag > CHRONICLE_DATA_DIR env > XDG default
    let data_dir = resolve_data_dir(cli.data_dir, human);

    // Serialize command for logging
    let (cmd_name, args_json) = serialize_command(&cli.command);

    // Start timing
    let start = Instant::now();

    // Execute command
    let result = run_command(cli.command, &data_dir, human);

    // Calculate duration
    let duration = start.elapsed().as_millis() as u64;

    // Determine success/error
    let (success, error) = match &result {
        Ok(_) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    };

    // Log the action (best-effort; failures only warn)
    action_log::log_action(&data_dir, &cmd_name, args_json, success, error, duration);

    // Handle result
    if let Err(e) = result {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!(r#"{{"error": "{}"}}"#, e);
        }
        process::exit(1);
    }
}

/// Resolve the data directory from the explicit flag or the defaults.
fn resolve_data_dir(explicit: Option<PathBuf>, human: bool) -> PathBuf {
    match explicit {
        Some(path) => path,
        None => match default_data_dir() {
            Ok(path) => path,
            Err(e) => {
                if human {
                    eprintln!("Error: {}", e);
                } else {
                    eprintln!(r#"{{"error": "{}"}}"#, e);
                }
                process::exit(1);
            }
        },
    }
}

/// Parse an optional status string from the command line.
fn parse_status(status: Option<String>) -> Result<Option<NodeStatus>, chronicle::Error> {
    status
        .map(|s| s.parse::<NodeStatus>())
        .transpose()
        .map_err(chronicle::Error::InvalidInput)
}

fn run_command(
    command: Option<Commands>,
    data_dir: &std::path::Path,
    human: bool,
) -> Result<(), chronicle::Error> {
    let mut storage = Storage::open_with_data_dir(data_dir);

    match command {
        Some(Commands::Project { command }) => match command {
            ProjectCommands::Create { name, description } => {
                let result = commands::project_create(&mut storage, &name, description)?;
                output(&result, human);
            }
            ProjectCommands::List => {
                let result = commands::project_list(&mut storage)?;
                output(&result, human);
            }
            ProjectCommands::Select { id } => {
                let result = commands::project_select(&mut storage, &id)?;
                output(&result, human);
            }
            ProjectCommands::Show { id } => {
                let result = commands::project_show(&mut storage, id.as_deref())?;
                output(&result, human);
            }
            ProjectCommands::Delete { id } => {
                let result = commands::project_delete(&mut storage, &id)?;
                output(&result, human);
            }
        },

        Some(Commands::Node { command }) => match command {
            NodeCommands::Add {
                title,
                parent,
                status,
                project,
            } => {
                let status = parse_status(status)?;
                let result =
                    commands::node_add(&mut storage, &title, parent, status, project.as_deref())?;
                output(&result, human);
            }
            NodeCommands::Show { id, project } => {
                let result = commands::node_show(&mut storage, &id, project.as_deref())?;
                output(&result, human);
            }
            NodeCommands::Update {
                id,
                title,
                status,
                hypothesis,
                method,
                results,
                analysis,
                next_steps,
                resources,
                tags,
                project,
            } => {
                let update = NodeUpdate {
                    title,
                    status: parse_status(status)?,
                    hypothesis,
                    method,
                    results,
                    analysis,
                    resources: (!resources.is_empty()).then_some(resources),
                    next_steps,
                    tags: (!tags.is_empty()).then_some(tags),
                };
                let result =
                    commands::node_update(&mut storage, &id, &update, project.as_deref())?;
                output(&result, human);
            }
            NodeCommands::Delete { id, project } => {
                let result = commands::node_delete(&mut storage, &id, project.as_deref())?;
                output(&result, human);
            }
            NodeCommands::Move {
                id,
                parent,
                root,
                project,
            } => {
                if parent.is_none() && !root {
                    return Err(chronicle::Error::InvalidInput(
                        "specify --parent <id> or --root".to_string(),
                    ));
                }
                let result = commands::node_move(&mut storage, &id, parent, project.as_deref())?;
                output(&result, human);
            }
        },

        Some(Commands::Tree { project }) => {
            let result = commands::tree(&mut storage, project.as_deref())?;
            output(&result, human);
        }

        Some(Commands::Search {
            query,
            status,
            project,
        }) => {
            let status = parse_status(status)?;
            let result = commands::search(&mut storage, &query, status, project.as_deref())?;
            output(&result, human);
        }

        Some(Commands::Stats { project }) => {
            let result = commands::stats(&mut storage, project.as_deref())?;
            output(&result, human);
        }

        Some(Commands::Status { command }) => match command {
            StatusCommands::List => {
                let result = commands::status_list();
                output(&result, human);
            }
        },

        Some(Commands::Doctor { project }) => {
            let result = commands::doctor(&mut storage, project.as_deref())?;
            output(&result, human);
        }

        Some(Commands::Log { limit }) => {
            let result = commands::log_show(data_dir, limit)?;
            output(&result, human);
        }

        Some(Commands::System { command }) => match command {
            SystemCommands::Info => {
                let result = commands::system_info(&mut storage)?;
                output(&result, human);
            }
        },

        None => {
            // Default: open the current project and show its tree
            match commands::open_current(&mut storage) {
                Ok(result) => output(&result, human),
                Err(chronicle::Error::NoProject) => {
                    if human {
                        println!("Chronicle - no projects yet.");
                        println!("Run `chron project create <name>` to start one.");
                    } else {
                        println!(r#"{{"projects": []}}"#);
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    Ok(())
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}

/// Serialize a command and its arguments for action logging.
fn serialize_command(command: &Option<Commands>) -> (String, serde_json::Value) {
    match command {
        Some(Commands::Project { command }) => match command {
            ProjectCommands::Create { name, description } => (
                "project create".to_string(),
                serde_json::json!({ "name": name, "description": description }),
            ),
            ProjectCommands::List => ("project list".to_string(), serde_json::json!({})),
            ProjectCommands::Select { id } => (
                "project select".to_string(),
                serde_json::json!({ "id": id }),
            ),
            ProjectCommands::Show { id } => {
                ("project show".to_string(), serde_json::json!({ "id": id }))
            }
            ProjectCommands::Delete { id } => (
                "project delete".to_string(),
                serde_json::json!({ "id": id }),
            ),
        },

        Some(Commands::Node { command }) => match command {
            NodeCommands::Add {
                title,
                parent,
                status,
                project,
            } => (
                "node add".to_string(),
                serde_json::json!({
                    "title": title,
                    "parent": parent,
                    "status": status,
                    "project": project
                }),
            ),
            NodeCommands::Show { id, project } => (
                "node show".to_string(),
                serde_json::json!({ "id": id, "project": project }),
            ),
            NodeCommands::Update { id, project, .. } => (
                "node update".to_string(),
                serde_json::json!({ "id": id, "project": project }),
            ),
            NodeCommands::Delete { id, project } => (
                "node delete".to_string(),
                serde_json::json!({ "id": id, "project": project }),
            ),
            NodeCommands::Move {
                id,
                parent,
                root,
                project,
            } => (
                "node move".to_string(),
                serde_json::json!({
                    "id": id,
                    "parent": parent,
                    "root": root,
                    "project": project
                }),
            ),
        },

        Some(Commands::Tree { project }) => (
            "tree".to_string(),
            serde_json::json!({ "project": project }),
        ),

        Some(Commands::Search {
            query,
            status,
            project,
        }) => (
            "search".to_string(),
            serde_json::json!({ "query": query, "status": status, "project": project }),
        ),

        Some(Commands::Stats { project }) => (
            "stats".to_string(),
            serde_json::json!({ "project": project }),
        ),

        Some(Commands::Status { command }) => match command {
            StatusCommands::List => ("status list".to_string(), serde_json::json!({})),
        },

        Some(Commands::Doctor { project }) => (
            "doctor".to_string(),
            serde_json::json!({ "project": project }),
        ),

        Some(Commands::Log { limit }) => (
            "log".to_string(),
            serde_json::json!({ "limit": limit }),
        ),

        Some(Commands::System { command }) => match command {
            SystemCommands::Info => ("system info".to_string(), serde_json::json!({})),
        },

        None => ("open".to_string(), serde_json::json!({})),
    }
}
