//! The uninstall command: remove whatever a previous install placed.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::Cli;
use crate::logging::Logger;
use crate::platform::Platform;
use crate::tasks::{self, Context};

/// Run the uninstall flow.
///
/// # Errors
///
/// Returns an error when the home directory cannot be resolved or any
/// task fails.
pub fn run(args: &Cli, log: &Arc<Logger>) -> Result<()> {
    let home = super::resolve_home()?;
    let ctx = Context::new(
        home,
        Platform::detect(),
        Arc::clone(log),
        args.dry_run,
        args.force,
    );

    let uninstall_tasks = tasks::all_uninstall_tasks();
    super::run_tasks_to_completion(&uninstall_tasks, &ctx, log)?;

    super::finish(log)
}
