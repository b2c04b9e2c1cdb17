//! Max-priority retrieval over tasks
//!
//! Independent of the dependency graph: a task's dependencies do not hold it
//! back here. Among equal priorities the release order is not part of the
//! contract. The heap currently releases ties in insertion order, but
//! callers must not rely on it.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::debug;

use super::task::TaskRef;

#[derive(Debug)]
struct Entry {
    priority: i32,
    seq: u64,
    task: TaskRef,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher priority first, then earlier insertion
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A max-priority queue of tasks
#[derive(Debug, Default)]
pub struct PriorityQueue {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a task, keyed by its priority at insertion time
    pub fn add_task(&mut self, task: &TaskRef) {
        let priority = task.priority();
        self.heap.push(Entry {
            priority,
            seq: self.next_seq,
            task: task.clone(),
        });
        self.next_seq += 1;
        debug!(title = %task.title(), priority, "queue: task added");
    }

    /// Removes and returns the highest-priority task, or `None` when empty
    pub fn next_task(&mut self) -> Option<TaskRef> {
        self.heap.pop().map(|entry| entry.task)
    }

    /// Returns the highest-priority task without removing it
    pub fn peek(&self) -> Option<&TaskRef> {
        self.heap.peek().map(|entry| &entry.task)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task;
    use proptest::prelude::*;

    fn make_task(title: &str, priority: i32) -> TaskRef {
        TaskRef::new(Task::new(title, "", priority, ""))
    }

    #[test]
    fn empty_queue_yields_none() {
        let mut queue = PriorityQueue::new();
        assert!(queue.is_empty());
        assert!(queue.next_task().is_none());
        assert!(queue.peek().is_none());
    }

    #[test]
    fn highest_priority_first() {
        let mut queue = PriorityQueue::new();
        let a = make_task("A", 5);
        let b = make_task("B", 9);
        let c = make_task("C", 1);
        queue.add_task(&a);
        queue.add_task(&b);
        queue.add_task(&c);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.peek(), Some(&b));
        assert_eq!(queue.next_task(), Some(b));
        assert_eq!(queue.next_task(), Some(a));
        assert_eq!(queue.next_task(), Some(c));
        assert!(queue.is_empty());
    }

    #[test]
    fn negative_priorities_rank_below_zero() {
        let mut queue = PriorityQueue::new();
        let low = make_task("Low", -3);
        let zero = make_task("Zero", 0);
        queue.add_task(&low);
        queue.add_task(&zero);

        assert_eq!(queue.next_task(), Some(zero));
        assert_eq!(queue.next_task(), Some(low));
    }

    #[test]
    fn same_task_can_be_queued_twice() {
        let mut queue = PriorityQueue::new();
        let a = make_task("A", 1);
        queue.add_task(&a);
        queue.add_task(&a);

        assert_eq!(queue.len(), 2);
    }

    proptest! {
        #[test]
        fn priorities_never_increase(priorities in prop::collection::vec(any::<i32>(), 0..100)) {
            let mut queue = PriorityQueue::new();
            for (i, &p) in priorities.iter().enumerate() {
                queue.add_task(&make_task(&i.to_string(), p));
            }

            let mut drained = Vec::new();
            while let Some(task) = queue.next_task() {
                drained.push(task.priority());
            }

            prop_assert_eq!(drained.len(), priorities.len());
            prop_assert!(drained.windows(2).all(|w| w[0] >= w[1]));
            prop_assert!(queue.is_empty());
        }
    }
}
