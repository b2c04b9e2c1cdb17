//! Last-in-first-out record of task creation
//!
//! Reading the history pops it: after [`HistoryStack::drain`] the stack is
//! empty until new tasks are pushed.

use thiserror::Error;

use super::task::TaskRef;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Task history is empty")]
    Empty,
}

/// A stack of tasks in insertion order
#[derive(Debug, Default)]
pub struct HistoryStack {
    stack: Vec<TaskRef>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_task(&mut self, task: &TaskRef) {
        self.stack.push(task.clone());
    }

    /// Removes and returns the most recently pushed task
    pub fn pop_task(&mut self) -> Result<TaskRef, HistoryError> {
        self.stack.pop().ok_or(HistoryError::Empty)
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Pops every task, most recent first
    pub fn drain(&mut self) -> Drain<'_> {
        Drain { history: self }
    }
}

/// Iterator returned by [`HistoryStack::drain`]
///
/// Each step pops one task, so dropping the iterator early leaves the
/// remaining tasks on the stack.
pub struct Drain<'a> {
    history: &'a mut HistoryStack,
}

impl Iterator for Drain<'_> {
    type Item = TaskRef;

    fn next(&mut self) -> Option<Self::Item> {
        self.history.pop_task().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.history.len();
        (len, Some(len))
    }
}
