//! Command handlers bridging the CLI to task execution.
pub mod install;
pub mod uninstall;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};

use crate::logging::Logger;
use crate::tasks::{self, Context, Task};

/// Resolve the user's home directory from the environment.
///
/// # Errors
///
/// Returns an error when `$HOME` is not set.
pub fn resolve_home() -> Result<PathBuf> {
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home)),
        _ => bail!("HOME is not set; cannot locate ~/.ssh"),
    }
}

/// Run tasks in order, stopping at the first failure.
///
/// The ordering is load-bearing (nothing may be overwritten before its
/// backup exists), so a failed or cancelled task must prevent everything
/// after it.
///
/// # Errors
///
/// Returns an error when any task failed.
pub fn run_tasks_to_completion(
    tasks: &[Box<dyn Task>],
    ctx: &Context,
    log: &Arc<Logger>,
) -> Result<()> {
    for task in tasks {
        tasks::execute(task.as_ref(), ctx);
        if log.failure_count() > 0 {
            break;
        }
    }
    Ok(())
}

/// Print the summary and convert recorded failures into an error.
///
/// # Errors
///
/// Returns an error when any task was recorded as failed.
pub fn finish(log: &Arc<Logger>) -> Result<()> {
    log.print_summary();
    let failures = log.failure_count();
    if failures > 0 {
        bail!("{failures} task(s) failed");
    }
    Ok(())
}
