//! The scheduling workspace
//!
//! One [`Workspace`] holds everything a session knows: the task list in
//! creation order, the dependency graph, the priority queue and the history
//! stack. Every new task is registered with all four; each answers a
//! different query.

use thiserror::Error;
use tracing::{debug, info};

use super::graph::{CyclePolicy, DependencyGraph, GraphError};
use super::history::HistoryStack;
use super::queue::PriorityQueue;
use super::task::{Task, TaskRef, TaskStatus};

#[derive(Debug, Error, PartialEq)]
pub enum WorkspaceError {
    #[error("No tasks left in the {0}")]
    Empty(&'static str),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Session state for the scheduler
#[derive(Debug, Default)]
pub struct Workspace {
    tasks: Vec<TaskRef>,
    graph: DependencyGraph,
    queue: PriorityQueue,
    history: HistoryStack,
}

impl Workspace {
    /// Creates an empty workspace that tolerates dependency cycles
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty workspace with the given cycle policy
    pub fn with_policy(policy: CyclePolicy) -> Self {
        Self {
            graph: DependencyGraph::with_policy(policy),
            ..Self::default()
        }
    }

    pub fn cycle_policy(&self) -> CyclePolicy {
        self.graph.policy()
    }

    /// Creates a task and registers it with every structure
    pub fn create_task(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: i32,
        deadline: impl Into<String>,
    ) -> TaskRef {
        let task = TaskRef::new(Task::new(title, description, priority, deadline));
        self.tasks.push(task.clone());
        self.queue.add_task(&task);
        self.graph.add_task(&task);
        self.history.push_task(&task);
        info!(title = %task.title(), priority, "task created");
        task
    }

    /// Declares that the task titled `dependent` depends on the task titled
    /// `prerequisite`
    ///
    /// Titles are resolved with [`Workspace::find_by_title`].
    pub fn add_dependency(
        &mut self,
        dependent: &str,
        prerequisite: &str,
    ) -> Result<(TaskRef, TaskRef), WorkspaceError> {
        let task = self
            .find_by_title(dependent)
            .ok_or_else(|| WorkspaceError::NotFound(dependent.to_string()))?;
        let depends_on = self
            .find_by_title(prerequisite)
            .ok_or_else(|| WorkspaceError::NotFound(prerequisite.to_string()))?;

        self.graph.add_dependency(&task, &depends_on);
        Ok((task, depends_on))
    }

    /// Returns every task in creation order
    pub fn tasks(&self) -> &[TaskRef] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Removes and returns the highest-priority task from the queue
    ///
    /// The task stays in the task list, the graph and the history.
    pub fn next_task(&mut self) -> Result<TaskRef, WorkspaceError> {
        let task = self
            .queue
            .next_task()
            .ok_or(WorkspaceError::Empty("priority queue"))?;
        debug!(title = %task.title(), "next task taken from queue");
        Ok(task)
    }

    /// Finds a task by title, ignoring case
    ///
    /// The first match in creation order wins.
    pub fn find_by_title(&self, title: &str) -> Option<TaskRef> {
        self.tasks.iter().find(|t| t.title_matches(title)).cloned()
    }

    /// Orders all known tasks so that dependencies come first
    pub fn topological_order(&mut self) -> Result<Vec<TaskRef>, WorkspaceError> {
        Ok(self.graph.topological_sort()?)
    }

    /// Pops the whole history, most recent first
    ///
    /// The history is empty afterwards.
    pub fn drain_history(&mut self) -> Vec<TaskRef> {
        let drained: Vec<_> = self.history.drain().collect();
        debug!(count = drained.len(), "history drained");
        drained
    }

    pub fn has_history(&self) -> bool {
        !self.history.is_empty()
    }

    /// Sets the status of the task with this title
    ///
    /// Returns the updated task, or `None` if no title matches.
    pub fn set_status(&self, title: &str, status: impl Into<TaskStatus>) -> Option<TaskRef> {
        let task = self.find_by_title(title)?;
        let status = status.into();
        info!(title = %task.title(), status = %status, "status changed");
        task.set_status(status);
        Some(task)
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn queue(&self) -> &PriorityQueue {
        &self.queue
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }
}
