//! CLI integration tests for task-sched
//!
//! These tests drive the binary through stdin, covering the menu workflow
//! from adding tasks through ordering, history and status changes.

use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Home directory with no configuration, shared by every test
fn empty_home() -> PathBuf {
    let home = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("empty-home");
    fs::create_dir_all(&home).unwrap();
    home
}

/// Get a command instance for the task-sched binary, isolated from any
/// user configuration
fn sched_cmd() -> assert_cmd::Command {
    let home = empty_home();
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("task-sched"));
    cmd.env_remove("TASK_SCHED_CONFIG")
        .env_remove("TASK_SCHED_LOG")
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

/// Menu input that adds a task
fn add(title: &str, priority: i32) -> String {
    format!("1\n{}\n{} description\n{}\nnext week\n", title, title, priority)
}

fn add_abc() -> String {
    [add("A", 5), add("B", 9), add("C", 1)].concat()
}

// =============================================================================
// Menu Tests
// =============================================================================

#[test]
fn test_menu_and_exit() {
    sched_cmd()
        .write_stdin("9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Priority & Time Scheduler"))
        .stdout(predicate::str::contains("8. Add Dependency"))
        .stdout(predicate::str::contains("Exiting..."));
}

#[test]
fn test_no_menu_flag() {
    sched_cmd()
        .arg("--no-menu")
        .write_stdin("9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Add Task").not());
}

#[test]
fn test_end_of_input_exits_successfully() {
    sched_cmd().write_stdin("").assert().success();
}

#[test]
fn test_invalid_input_keeps_running() {
    sched_cmd()
        .arg("--no-menu")
        .write_stdin("hello\n0\n2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid input. Please enter a number."))
        .stdout(predicate::str::contains("Invalid choice. Please try again."))
        .stdout(predicate::str::contains("No tasks available."));
}

// =============================================================================
// Task Tests
// =============================================================================

#[test]
fn test_add_and_show_tasks() {
    let input = format!("{}2\n9\n", add("Write report", 3));

    sched_cmd()
        .arg("--no-menu")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Task added successfully."))
        .stdout(predicate::str::contains(concat!(
            "Task{title='Write report', description='Write report description', ",
            "priority=3, deadline='next week', status='pending'}",
        )));
}

#[test]
fn test_next_task_follows_priority() {
    let input = format!("{}3\n", add_abc());

    sched_cmd()
        .arg("--no-menu")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Next Task: Task{title='B'"));
}

#[test]
fn test_status_change_visible_in_details() {
    let input = format!("{}7\nwrite report\ndone\n4\nWRITE REPORT\n", add("Write report", 3));

    sched_cmd()
        .arg("--no-menu")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Task status updated successfully."))
        .stdout(predicate::str::contains("status='done'"));
}

#[test]
fn test_history_is_destructive() {
    let input = format!("{}6\n6\n", add_abc());

    let assert = sched_cmd()
        .arg("--no-menu")
        .write_stdin(input)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let history = stdout.split("Task History:").nth(1).unwrap();
    let c = history.find("title='C'").unwrap();
    let b = history.find("title='B'").unwrap();
    let a = history.find("title='A'").unwrap();
    assert!(c < b && b < a);
    assert!(stdout.contains("No task history available."));
}

// =============================================================================
// Ordering Tests
// =============================================================================

#[test]
fn test_sort_respects_dependencies() {
    let input = format!("{}8\nA\nB\n5\n", add_abc());

    let assert = sched_cmd()
        .arg("--no-menu")
        .write_stdin(input)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let sorted = stdout.split("Sorted Tasks:").nth(1).unwrap();
    assert!(sorted.find("title='B'").unwrap() < sorted.find("title='A'").unwrap());
}

#[test]
fn test_cycle_tolerated_by_default() {
    let input = format!("{}8\nA\nB\n8\nB\nA\n5\n", add_abc());

    sched_cmd()
        .arg("--no-menu")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Sorted Tasks:"));
}

#[test]
fn test_cycle_rejected_with_flag() {
    let input = format!("{}8\nA\nB\n8\nB\nA\n5\n", add_abc());

    sched_cmd()
        .args(["--no-menu", "--cycles", "reject"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Dependency cycle detected among: A, B"))
        .stdout(predicate::str::contains("Sorted Tasks:").not());
}

// =============================================================================
// Format and Config Tests
// =============================================================================

#[test]
fn test_json_output() {
    let input = format!("{}3\n", add("Solo", 4));

    let assert = sched_cmd()
        .args(["--format", "json"])
        .write_stdin(input)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let values: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(values.len(), 3);
    assert_eq!(values[0]["success"], true);
    assert_eq!(values[1]["task"]["title"], "Solo");
    assert_eq!(values[2]["next"]["priority"], 4);
}

#[test]
fn test_config_file_applies() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "cycle_policy = \"reject\"\nshow_menu = false\n").unwrap();

    let input = format!("{}8\nA\nA\n5\n", add("A", 1));

    sched_cmd()
        .arg("--config")
        .arg(&config)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Add Task").not())
        .stdout(predicate::str::contains("Dependency cycle detected among: A"));
}

#[test]
fn test_config_from_env() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "default_format = \"json\"\n").unwrap();

    sched_cmd()
        .env("TASK_SCHED_CONFIG", &config)
        .write_stdin("9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"message\":\"Exiting...\""));
}

#[cfg(target_os = "linux")]
#[test]
fn test_global_config_applies() {
    let dir = TempDir::new().unwrap();
    let config_dir = dir.path().join("task-sched");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "show_menu = false\n").unwrap();

    sched_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .write_stdin("9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Add Task").not())
        .stdout(predicate::str::contains("Exiting..."));
}

#[test]
fn test_missing_config_fails() {
    let dir = TempDir::new().unwrap();

    sched_cmd()
        .arg("--config")
        .arg(dir.path().join("nope.toml"))
        .write_stdin("9\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_broken_config_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "cycle_policy = [").unwrap();

    sched_cmd()
        .arg("--config")
        .arg(&config)
        .write_stdin("9\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    sched_cmd()
        .args(["--no-menu", "--verbose"])
        .write_stdin(add("Logged", 1))
        .assert()
        .success()
        .stdout(predicate::str::contains("task created").not())
        .stderr(predicate::str::contains("task created"));
}
