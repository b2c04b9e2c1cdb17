//! Domain models for the scheduler
//!
//! Contains the task-ordering engine without any I/O concerns.

mod task;
mod graph;
mod queue;
mod history;
mod workspace;

pub use task::{Task, TaskRef, TaskStatus, TaskView};
pub use graph::{CyclePolicy, DependencyGraph, GraphError};
pub use queue::PriorityQueue;
pub use history::{Drain, HistoryError, HistoryStack};
pub use workspace::{Workspace, WorkspaceError};
