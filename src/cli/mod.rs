//! # Command-Line Interface
//!
//! The interactive shell around the scheduling [`Workspace`](crate::domain::Workspace).
//!
//! ## Menu
//!
//! | Choice | Action | Workspace operation |
//! |--------|--------|---------------------|
//! | 1 | Add Task | `create_task` |
//! | 2 | Show Tasks | `tasks` |
//! | 3 | Show Next Task | `next_task` |
//! | 4 | Show Task Details | `find_by_title` |
//! | 5 | Sort Tasks | `topological_order` |
//! | 6 | Show Task History | `drain_history` |
//! | 7 | Change Task Status | `set_status` |
//! | 8 | Add Dependency | `add_dependency` |
//! | 9 | Exit | |
//!
//! ## Output Formats
//!
//! `--format` selects:
//! - `text` (default) - menu, prompts and human-readable lines
//! - `json` - one JSON object per response, no menu or prompts
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and start the shell on stdin/stdout.

mod app;
mod output;
mod shell;

pub use app::{Cli, LogLevel, run};
pub use output::{Output, OutputFormat};
pub use shell::{Shell, ShellSettings};
