//! task-sched - an interactive priority and dependency scheduler
//!
//! Tasks carry a priority, a deadline and a status, and may depend on other
//! tasks. The [`Workspace`] registers every task with a dependency graph
//! (topological ordering), a priority queue (next task) and a history stack
//! (creation order, newest first).

pub mod domain;
pub mod config;
pub mod logging;
pub mod cli;

pub use domain::{CyclePolicy, Task, TaskRef, TaskStatus, Workspace, WorkspaceError};
