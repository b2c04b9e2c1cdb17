//! task-sched - interactive priority and dependency scheduler

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = task_sched::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
