//! Integration tests for Node CRUD operations via CLI.
//!
//! These tests verify that node commands work correctly through the CLI:
//! - `chron node add/show/update/delete/move` all work
//! - Status defaults and parsing behave as documented
//! - Cascade deletes and re-parenting keep the tree consistent

mod common;

use common::TestEnv;
use predicates::prelude::*;

// === Add Tests ===

#[test]
fn test_node_add_defaults_to_untried_root() {
    let env = TestEnv::new();
    env.create_project("P");

    env.chron()
        .args(["node", "add", "Try approach A"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\":\"Try approach A\""))
        .stdout(predicate::str::contains("\"status\":\"untried\""))
        .stdout(predicate::str::contains("\"parentId\":null"));
}

#[test]
fn test_node_add_human() {
    let env = TestEnv::new();
    env.create_project("P");

    env.chron()
        .args(["-H", "node", "add", "Try approach A"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created node"));
}

#[test]
fn test_node_add_with_status() {
    let env = TestEnv::new();
    env.create_project("P");

    env.chron()
        .args(["node", "add", "Ongoing", "-s", "in-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"in-progress\""));
}

#[test]
fn test_node_add_invalid_status_fails() {
    let env = TestEnv::new();
    env.create_project("P");

    env.chron()
        .args(["node", "add", "Bad", "-s", "unknown"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown status"));
}

#[test]
fn test_node_add_links_parent() {
    let env = TestEnv::new();
    env.create_project("P");
    let root = env.create_node("Root", None);
    let child = env.create_node("Child", Some(&root));

    let output = env
        .chron()
        .args(["node", "show", &root])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let child_ids = json["node"]["childIds"].as_array().unwrap();
    assert_eq!(child_ids.len(), 1);
    assert_eq!(child_ids[0], child);
}

#[test]
fn test_node_add_missing_parent_is_orphaned() {
    let env = TestEnv::new();
    env.create_project("P");

    env.chron()
        .args(["node", "add", "Orphan", "-p", "no-such-parent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"orphaned\":true"));
}

#[test]
fn test_node_add_without_project_fails() {
    let env = TestEnv::new();

    env.chron()
        .args(["node", "add", "Nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No project found"));
}

// === Show Tests ===

#[test]
fn test_node_show_human_includes_fields() {
    let env = TestEnv::new();
    env.create_project("P");
    let id = env.create_node("Root", None);
    env.chron()
        .args(["node", "update", &id, "--hypothesis", "It will work"])
        .assert()
        .success();

    env.chron()
        .args(["-H", "node", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Root"))
        .stdout(predicate::str::contains("hypothesis: It will work"));
}

#[test]
fn test_node_show_missing_fails() {
    let env = TestEnv::new();
    env.create_project("P");

    env.chron()
        .args(["node", "show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Node not found"));
}

// === Update Tests ===

#[test]
fn test_node_update_status_and_results() {
    let env = TestEnv::new();
    env.create_project("P");
    let id = env.create_node("Root", None);

    env.chron()
        .args([
            "node", "update", &id, "-s", "success", "--results", "10x speedup",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"success\""))
        .stdout(predicate::str::contains("\"results\":\"10x speedup\""));

    // Fields not mentioned stay untouched
    env.chron()
        .args(["node", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\":\"Root\""));
}

#[test]
fn test_node_update_tags_and_resources() {
    let env = TestEnv::new();
    env.create_project("P");
    let id = env.create_node("Root", None);

    env.chron()
        .args([
            "node", "update", &id, "-t", "perf", "-t", "cache", "-r", "https://example.com",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"tags\":[\"perf\",\"cache\"]"))
        .stdout(predicate::str::contains("https://example.com"));
}

#[test]
fn test_node_update_without_fields_fails() {
    let env = TestEnv::new();
    env.create_project("P");
    let id = env.create_node("Root", None);

    env.chron()
        .args(["node", "update", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no fields to update"));
}

#[test]
fn test_node_update_missing_fails() {
    let env = TestEnv::new();
    env.create_project("P");

    env.chron()
        .args(["node", "update", "nope", "--title", "New"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Node not found"));
}

// === Delete Tests ===

#[test]
fn test_node_delete_cascades() {
    let env = TestEnv::new();
    env.create_project("P");
    let root = env.create_node("Try approach A", None);
    let child = env.create_node("Sub-step", Some(&root));
    env.create_node("Sub-sub-step", Some(&child));

    env.chron()
        .args(["node", "delete", &root])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"nodes_deleted\":3"));

    env.chron()
        .args(["stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\":0"));
}

#[test]
fn test_node_delete_leaves_siblings() {
    let env = TestEnv::new();
    env.create_project("P");
    let root = env.create_node("Root", None);
    let doomed = env.create_node("Doomed", Some(&root));
    let kept = env.create_node("Kept", Some(&root));

    env.chron()
        .args(["node", "delete", &doomed])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"nodes_deleted\":1"));

    let output = env
        .chron()
        .args(["node", "show", &root])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let child_ids = json["node"]["childIds"].as_array().unwrap();
    assert_eq!(child_ids.len(), 1);
    assert_eq!(child_ids[0], kept);
}

#[test]
fn test_node_delete_missing_fails() {
    let env = TestEnv::new();
    env.create_project("P");

    env.chron()
        .args(["node", "delete", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Node not found"));
}

// === Move Tests ===

#[test]
fn test_node_move_under_sibling() {
    let env = TestEnv::new();
    env.create_project("P");
    let a = env.create_node("A", None);
    let b = env.create_node("B", None);

    env.chron()
        .args(["node", "move", &b, "-p", &a])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "\"new_parent_id\":\"{}\"",
            a
        )));

    let output = env.chron().args(["node", "show", &b]).output().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["node"]["parentId"], a);
}

#[test]
fn test_node_move_to_root() {
    let env = TestEnv::new();
    env.create_project("P");
    let root = env.create_node("Root", None);
    let child = env.create_node("Child", Some(&root));

    env.chron()
        .args(["node", "move", &child, "--root"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"new_parent_id\":null"));

    let output = env.chron().args(["node", "show", &root]).output().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["node"]["childIds"].as_array().unwrap().is_empty());
}

#[test]
fn test_node_move_onto_itself_fails() {
    let env = TestEnv::new();
    env.create_project("P");
    let a = env.create_node("A", None);

    env.chron()
        .args(["node", "move", &a, "-p", &a])
        .assert()
        .failure()
        .stderr(predicate::str::contains("under itself"));
}

#[test]
fn test_node_move_under_descendant_fails() {
    let env = TestEnv::new();
    env.create_project("P");
    let root = env.create_node("Root", None);
    let child = env.create_node("Child", Some(&root));
    let grandchild = env.create_node("Grandchild", Some(&child));

    env.chron()
        .args(["node", "move", &root, "-p", &grandchild])
        .assert()
        .failure()
        .stderr(predicate::str::contains("descendant"));
}

#[test]
fn test_node_move_requires_target() {
    let env = TestEnv::new();
    env.create_project("P");
    let a = env.create_node("A", None);

    env.chron()
        .args(["node", "move", &a])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--parent"));
}
