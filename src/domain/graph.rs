//! Dependency graph for tasks
//!
//! Holds the known tasks in insertion order and produces a topological
//! ordering in which every task appears after the tasks it depends on.
//! Cycle reporting uses petgraph's strongly-connected-component search.

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

use super::task::{Task, TaskRef};

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Dependency cycle detected among: {}", titles.join(", "))]
    CycleDetected { titles: Vec<String> },

    #[error("Unknown cycle policy: {0} (expected 'tolerate' or 'reject')")]
    UnknownPolicy(String),
}

/// What [`DependencyGraph::topological_sort`] does when the dependencies
/// contain a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Skip already-visited tasks and return a complete but, for the cyclic
    /// part, invalid order
    #[default]
    Tolerate,
    /// Fail with [`GraphError::CycleDetected`]
    Reject,
}

impl CyclePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CyclePolicy::Tolerate => "tolerate",
            CyclePolicy::Reject => "reject",
        }
    }
}

impl fmt::Display for CyclePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CyclePolicy {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tolerate" => Ok(CyclePolicy::Tolerate),
            "reject" => Ok(CyclePolicy::Reject),
            other => Err(GraphError::UnknownPolicy(other.to_string())),
        }
    }
}

/// One pending step of the depth-first traversal
struct Frame {
    node: usize,
    deps: Vec<usize>,
    next: usize,
}

/// A dependency graph for tasks
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Known tasks, each at most once, in insertion order
    tasks: Vec<TaskRef>,

    /// Identity keys of `tasks`
    known: HashSet<*const RefCell<Task>>,

    /// Result of the most recent sort
    sorted: Vec<TaskRef>,

    policy: CyclePolicy,
}

impl DependencyGraph {
    /// Creates an empty graph that tolerates cycles
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with the given cycle policy
    pub fn with_policy(policy: CyclePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> CyclePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: CyclePolicy) {
        self.policy = policy;
    }

    /// Adds a task unless the same task is already known
    ///
    /// Returns true if the task was inserted.
    pub fn add_task(&mut self, task: &TaskRef) -> bool {
        if !self.known.insert(task.key()) {
            return false;
        }
        debug!(title = %task.title(), "graph: task added");
        self.tasks.push(task.clone());
        true
    }

    /// Records that `task` depends on `depends_on`
    ///
    /// Both tasks are added to the graph first if needed. `depends_on` must
    /// come before `task` in any valid ordering.
    pub fn add_dependency(&mut self, task: &TaskRef, depends_on: &TaskRef) {
        self.add_task(task);
        self.add_task(depends_on);
        task.add_dependency(depends_on);
        debug!(
            task = %task.title(),
            depends_on = %depends_on.title(),
            "graph: dependency added"
        );
    }

    /// Returns all known tasks ordered so that dependencies precede dependents
    ///
    /// Depth-first traversal from each unvisited task in insertion order. A
    /// task is marked visited on entry and pushed onto the output buffer once
    /// all of its dependencies are finished. Visited tasks are never entered
    /// again, so a cycle cannot stop the traversal; under
    /// [`CyclePolicy::Reject`] a cycle is reported as an error instead.
    pub fn topological_sort(&mut self) -> Result<Vec<TaskRef>, GraphError> {
        if let Some(cycle) = self.find_cycle() {
            let titles: Vec<String> = cycle.iter().map(TaskRef::title).collect();
            match self.policy {
                CyclePolicy::Reject => return Err(GraphError::CycleDetected { titles }),
                CyclePolicy::Tolerate => {
                    warn!(cycle = %titles.join(", "), "graph: ordering a cyclic dependency set");
                }
            }
        }

        let index = self.index_map();
        let mut visited = vec![false; self.tasks.len()];
        let mut finished: Vec<usize> = Vec::with_capacity(self.tasks.len());
        let mut work: Vec<Frame> = Vec::new();

        for start in 0..self.tasks.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            work.push(Frame {
                node: start,
                deps: self.known_dependencies(start, &index),
                next: 0,
            });

            while let Some(frame) = work.last_mut() {
                if let Some(&dep) = frame.deps.get(frame.next) {
                    frame.next += 1;
                    if !visited[dep] {
                        visited[dep] = true;
                        work.push(Frame {
                            node: dep,
                            deps: self.known_dependencies(dep, &index),
                            next: 0,
                        });
                    }
                } else {
                    finished.push(frame.node);
                    work.pop();
                }
            }
        }

        // The buffer's bottom holds the first task finished, which has no
        // unfinished dependencies, so reading it bottom-up puts
        // prerequisites first.
        self.sorted = finished.into_iter().map(|i| self.tasks[i].clone()).collect();
        debug!(count = self.sorted.len(), "graph: topological sort complete");
        Ok(self.sorted.clone())
    }

    /// Returns the order produced by the most recent sort
    pub fn last_order(&self) -> &[TaskRef] {
        &self.sorted
    }

    /// Finds one dependency cycle among the known tasks, if any
    ///
    /// Tasks are returned in insertion order. A task that depends on itself
    /// is a cycle of one.
    pub fn find_cycle(&self) -> Option<Vec<TaskRef>> {
        let index = self.index_map();
        let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(self.tasks.len(), 0);
        let nodes: Vec<NodeIndex> = (0..self.tasks.len()).map(|i| graph.add_node(i)).collect();

        for (i, task) in self.tasks.iter().enumerate() {
            for dep in task.dependencies() {
                if let Some(&j) = index.get(&dep.key()) {
                    graph.update_edge(nodes[i], nodes[j], ());
                }
            }
        }

        kosaraju_scc(&graph)
            .into_iter()
            .find(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&n| graph.find_edge(n, n).is_some())
            })
            .map(|component| {
                let mut members: Vec<usize> = component.iter().map(|&n| graph[n]).collect();
                members.sort_unstable();
                members.into_iter().map(|i| self.tasks[i].clone()).collect()
            })
    }

    /// Returns true if the graph holds this exact task
    pub fn contains(&self, task: &TaskRef) -> bool {
        self.known.contains(&task.key())
    }

    /// Returns the number of known tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns all known tasks in insertion order
    pub fn tasks(&self) -> &[TaskRef] {
        &self.tasks
    }

    fn index_map(&self) -> HashMap<*const RefCell<Task>, usize> {
        self.tasks
            .iter()
            .enumerate()
            .map(|(i, task)| (task.key(), i))
            .collect()
    }

    /// Dependencies of the task at `node` as indices, skipping tasks the
    /// graph does not know about
    fn known_dependencies(
        &self,
        node: usize,
        index: &HashMap<*const RefCell<Task>, usize>,
    ) -> Vec<usize> {
        self.tasks[node]
            .dependencies()
            .iter()
            .filter_map(|dep| {
                let found = index.get(&dep.key()).copied();
                if found.is_none() {
                    warn!(
                        task = %self.tasks[node].title(),
                        dependency = %dep.title(),
                        "graph: dependency on a task outside the graph ignored"
                    );
                }
                found
            })
            .collect()
    }
}
