//! Task domain model
//!
//! Tasks are the units of work the scheduler orders. A task is shared by the
//! workspace task list, the dependency graph, the priority queue and the
//! history stack at the same time, so it lives behind a [`TaskRef`] handle:
//! a status change made through one structure is visible through all others.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Status of a task
///
/// The known lifecycle states are closed variants; any other label is kept
/// verbatim in [`TaskStatus::Other`] so no status string is ever rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
    Other(String),
}

impl TaskStatus {
    /// Returns the display label for the status
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Other(label) => label,
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_lowercase().as_str() {
            "pending" => TaskStatus::Pending,
            "in progress" | "in_progress" | "in-progress" | "inprogress" => TaskStatus::InProgress,
            "done" => TaskStatus::Done,
            _ => TaskStatus::Other(trimmed.to_string()),
        }
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        TaskStatus::from(value.as_str())
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of work
#[derive(Debug)]
pub struct Task {
    title: String,
    description: String,
    priority: i32,
    deadline: String,
    status: TaskStatus,
    created_at: DateTime<Utc>,

    /// Tasks this one depends on, in the order they were attached
    dependencies: Vec<Weak<RefCell<Task>>>,
}

impl Task {
    /// Creates a new pending task with no dependencies
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: i32,
        deadline: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority,
            deadline: deadline.into(),
            status: TaskStatus::Pending,
            created_at: Utc::now(),
            dependencies: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Deadline as entered; it is never parsed
    pub fn deadline(&self) -> &str {
        &self.deadline
    }

    pub fn status(&self) -> &TaskStatus {
        &self.status
    }

    /// Replaces the status unconditionally
    pub fn set_status(&mut self, status: impl Into<TaskStatus>) {
        self.status = status.into();
    }

    /// Returns true if the title matches, ignoring case
    ///
    /// Compares per character, so a final sigma matches its medial form.
    pub fn title_matches(&self, title: &str) -> bool {
        let lower = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
        lower(&self.title) == lower(title)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Task{{title='{}', description='{}', priority={}, deadline='{}', status='{}'}}",
            self.title, self.description, self.priority, self.deadline, self.status
        )
    }
}

/// Shared handle to a [`Task`]
///
/// Cloning a `TaskRef` clones the handle, never the task. Equality is
/// reference identity: two distinct tasks with identical fields are not equal.
#[derive(Debug, Clone)]
pub struct TaskRef(Rc<RefCell<Task>>);

impl TaskRef {
    /// Wraps a task in a new shared handle
    pub fn new(task: Task) -> Self {
        Self(Rc::new(RefCell::new(task)))
    }

    /// Returns true if both handles point at the same task
    pub fn ptr_eq(&self, other: &TaskRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Stable identity key for the lifetime of the task
    pub(crate) fn key(&self) -> *const RefCell<Task> {
        Rc::as_ptr(&self.0)
    }

    pub fn title(&self) -> String {
        self.0.borrow().title.clone()
    }

    pub fn priority(&self) -> i32 {
        self.0.borrow().priority
    }

    pub fn status(&self) -> TaskStatus {
        self.0.borrow().status.clone()
    }

    /// Replaces the status; every holder of this handle sees the change
    pub fn set_status(&self, status: impl Into<TaskStatus>) {
        self.0.borrow_mut().set_status(status);
    }

    /// Records that this task depends on `other`
    ///
    /// No cycle or duplicate check is made here.
    pub fn add_dependency(&self, other: &TaskRef) {
        self.0.borrow_mut().dependencies.push(Rc::downgrade(&other.0));
    }

    /// Returns the tasks this one depends on, in attachment order
    ///
    /// Dependencies whose task has been dropped are skipped.
    pub fn dependencies(&self) -> Vec<TaskRef> {
        self.0
            .borrow()
            .dependencies
            .iter()
            .filter_map(Weak::upgrade)
            .map(TaskRef)
            .collect()
    }

    pub fn title_matches(&self, title: &str) -> bool {
        self.0.borrow().title_matches(title)
    }

    /// Takes a serializable read-only view of the task
    pub fn snapshot(&self) -> TaskView {
        let depends_on = self.dependencies().iter().map(TaskRef::title).collect();
        let task = self.0.borrow();
        TaskView {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            deadline: task.deadline.clone(),
            status: task.status.clone(),
            created_at: task.created_at,
            depends_on,
        }
    }
}

impl PartialEq for TaskRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for TaskRef {}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0.borrow(), f)
    }
}

/// Point-in-time copy of a task for output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskView {
    pub title: String,
    pub description: String,
    pub priority: i32,
    pub deadline: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}
