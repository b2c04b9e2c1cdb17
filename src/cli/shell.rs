//! Interactive menu loop
//!
//! Each menu choice performs exactly one [`Workspace`] operation and renders
//! the result. The shell is generic over its input and output so it can be
//! driven from tests as well as from stdin/stdout.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::debug;

use super::output::{Output, OutputFormat};
use crate::domain::{TaskRef, TaskView, Workspace, WorkspaceError};

const MENU: &[&str] = &[
    "Priority & Time Scheduler",
    "1. Add Task",
    "2. Show Tasks",
    "3. Show Next Task",
    "4. Show Task Details",
    "5. Sort Tasks",
    "6. Show Task History",
    "7. Change Task Status",
    "8. Add Dependency",
    "9. Exit",
];

/// Display settings for the shell
#[derive(Debug, Clone, Copy)]
pub struct ShellSettings {
    pub format: OutputFormat,
    pub show_menu: bool,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            show_menu: true,
        }
    }
}

/// A menu entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    AddTask,
    ShowTasks,
    NextTask,
    TaskDetails,
    SortTasks,
    History,
    ChangeStatus,
    AddDependency,
    Exit,
}

impl MenuChoice {
    fn from_number(n: i32) -> Option<Self> {
        match n {
            1 => Some(MenuChoice::AddTask),
            2 => Some(MenuChoice::ShowTasks),
            3 => Some(MenuChoice::NextTask),
            4 => Some(MenuChoice::TaskDetails),
            5 => Some(MenuChoice::SortTasks),
            6 => Some(MenuChoice::History),
            7 => Some(MenuChoice::ChangeStatus),
            8 => Some(MenuChoice::AddDependency),
            9 => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Whether the loop keeps going after an action
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// The interactive coordinator over a [`Workspace`]
pub struct Shell<R, W: Write> {
    workspace: Workspace,
    input: R,
    output: Output<W>,
    show_menu: bool,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(workspace: Workspace, input: R, writer: W, settings: ShellSettings) -> Self {
        Self {
            workspace,
            input,
            output: Output::new(writer, settings.format),
            show_menu: settings.show_menu,
        }
    }

    /// Runs until Exit is chosen or the input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            if self.show_menu {
                for line in MENU {
                    self.output.line(line)?;
                }
            }
            self.output.prompt("Enter your choice: ")?;

            let Some(line) = self.read_line()? else {
                debug!("end of input");
                break;
            };

            let choice = match line.trim().parse::<i32>() {
                Ok(n) => MenuChoice::from_number(n),
                Err(_) => {
                    self.output.failure("Invalid input. Please enter a number.")?;
                    continue;
                }
            };

            let flow = match choice {
                Some(choice) => self.dispatch(choice)?,
                None => {
                    self.output.failure("Invalid choice. Please try again.")?;
                    Flow::Continue
                }
            };

            if flow == Flow::Quit {
                break;
            }
        }

        self.output.flush()?;
        Ok(())
    }

    /// Consumes the shell, returning the workspace and the writer
    pub fn into_parts(self) -> (Workspace, W) {
        (self.workspace, self.output.into_inner())
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<Flow> {
        debug!(?choice, "menu choice");
        match choice {
            MenuChoice::AddTask => self.add_task(),
            MenuChoice::ShowTasks => self.show_tasks().map(|_| Flow::Continue),
            MenuChoice::NextTask => self.show_next_task().map(|_| Flow::Continue),
            MenuChoice::TaskDetails => self.show_task_details(),
            MenuChoice::SortTasks => self.sort_tasks().map(|_| Flow::Continue),
            MenuChoice::History => self.show_history().map(|_| Flow::Continue),
            MenuChoice::ChangeStatus => self.change_status(),
            MenuChoice::AddDependency => self.add_dependency(),
            MenuChoice::Exit => {
                self.output.success("Exiting...")?;
                Ok(Flow::Quit)
            }
        }
    }

    fn add_task(&mut self) -> Result<Flow> {
        let Some(title) = self.ask("Enter title: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(description) = self.ask("Enter description: ")? else {
            return Ok(Flow::Quit);
        };

        let priority = loop {
            let Some(raw) = self.ask("Enter priority (integer): ")? else {
                return Ok(Flow::Quit);
            };
            match raw.trim().parse::<i32>() {
                Ok(priority) => break priority,
                Err(_) => self
                    .output
                    .failure("Invalid input. Priority should be an integer.")?,
            }
        };

        let Some(deadline) = self.ask("Enter deadline: ")? else {
            return Ok(Flow::Quit);
        };

        let task = self
            .workspace
            .create_task(title, description, priority, deadline);
        self.output.success("Task added successfully.")?;
        self.output.data(&serde_json::json!({ "task": task.snapshot() }))?;
        Ok(Flow::Continue)
    }

    fn show_tasks(&mut self) -> Result<()> {
        if self.workspace.is_empty() {
            return Ok(self.output.failure("No tasks available.")?);
        }

        let tasks = self.workspace.tasks().to_vec();
        if self.output.is_json() {
            self.output.data(&serde_json::json!({ "tasks": views(&tasks) }))?;
        } else {
            self.print_tasks(&tasks)?;
        }
        Ok(())
    }

    fn show_next_task(&mut self) -> Result<()> {
        match self.workspace.next_task() {
            Ok(task) if self.output.is_json() => {
                self.output.data(&serde_json::json!({ "next": task.snapshot() }))?
            }
            Ok(task) => self.output.line(&format!("Next Task: {}", task))?,
            Err(WorkspaceError::Empty(_)) => self.output.failure("No tasks available.")?,
            Err(e) => self.output.failure(&e.to_string())?,
        }
        Ok(())
    }

    fn show_task_details(&mut self) -> Result<Flow> {
        let Some(title) = self.ask("Enter task title: ")? else {
            return Ok(Flow::Quit);
        };

        match self.workspace.find_by_title(&title) {
            Some(task) if self.output.is_json() => {
                self.output.data(&serde_json::json!({ "task": task.snapshot() }))?
            }
            Some(task) => {
                self.output.line(&task.to_string())?;
                let depends_on = task.snapshot().depends_on;
                if !depends_on.is_empty() {
                    self.output
                        .line(&format!("Depends on: {}", depends_on.join(", ")))?;
                }
            }
            None => self.output.failure("Task not found.")?,
        }
        Ok(Flow::Continue)
    }

    fn sort_tasks(&mut self) -> Result<()> {
        match self.workspace.topological_order() {
            Ok(sorted) if self.output.is_json() => {
                self.output.data(&serde_json::json!({ "sorted": views(&sorted) }))?
            }
            Ok(sorted) => {
                self.output.line("Sorted Tasks:")?;
                self.print_tasks(&sorted)?;
            }
            Err(e) => self.output.failure(&e.to_string())?,
        }
        Ok(())
    }

    fn show_history(&mut self) -> Result<()> {
        if !self.workspace.has_history() {
            return Ok(self.output.failure("No task history available.")?);
        }

        let history = self.workspace.drain_history();
        if self.output.is_json() {
            self.output.data(&serde_json::json!({ "history": views(&history) }))?;
        } else {
            self.output.line("Task History:")?;
            self.print_tasks(&history)?;
        }
        Ok(())
    }

    fn change_status(&mut self) -> Result<Flow> {
        if self.workspace.is_empty() {
            self.output.failure("No tasks available to change status.")?;
            return Ok(Flow::Continue);
        }

        let Some(title) = self.ask("Enter task title: ")? else {
            return Ok(Flow::Quit);
        };
        if self.workspace.find_by_title(&title).is_none() {
            self.output.failure("Task not found.")?;
            return Ok(Flow::Continue);
        }

        let Some(status) = self.ask("Enter new status: ")? else {
            return Ok(Flow::Quit);
        };
        if let Some(task) = self.workspace.set_status(&title, status.as_str()) {
            self.output.success("Task status updated successfully.")?;
            self.output.data(&serde_json::json!({ "task": task.snapshot() }))?;
        }
        Ok(Flow::Continue)
    }

    fn add_dependency(&mut self) -> Result<Flow> {
        let Some(dependent) = self.ask("Enter task title: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(prerequisite) = self.ask("Enter title of the task it depends on: ")? else {
            return Ok(Flow::Quit);
        };

        match self.workspace.add_dependency(&dependent, &prerequisite) {
            Ok((task, depends_on)) => self.output.success(&format!(
                "Dependency added: '{}' depends on '{}'.",
                task.title(),
                depends_on.title()
            ))?,
            Err(WorkspaceError::NotFound(title)) => {
                self.output.failure(&format!("Task not found: {}", title))?
            }
            Err(e) => self.output.failure(&e.to_string())?,
        }
        Ok(Flow::Continue)
    }

    fn print_tasks(&mut self, tasks: &[TaskRef]) -> Result<()> {
        for task in tasks {
            self.output.line(&task.to_string())?;
        }
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        self.output.prompt(prompt)?;
        self.read_line()
    }

    /// Reads one line without its terminator; `None` at end of input
    ///
    /// Bytes that are not valid UTF-8 become U+FFFD instead of ending the
    /// session.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        let read = self
            .input
            .read_until(b'\n', &mut buf)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

fn views(tasks: &[TaskRef]) -> Vec<TaskView> {
    tasks.iter().map(TaskRef::snapshot).collect()
}
