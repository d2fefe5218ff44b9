//! Creation of the target directory skeleton.
use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult, TaskStats};
use crate::manifest::Entry;

/// Create `~/.ssh`, `~/.ssh/config.d` and `~/.ssh/sockets`.
///
/// Only directories this task actually creates are recorded in the
/// manifest; pre-existing ones are left untracked so uninstall never
/// removes a directory the user had before.
pub struct CreateDirectories;

impl Task for CreateDirectories {
    fn name(&self) -> &str {
        "Create directories"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut stats = TaskStats::new();

        for dir in [ctx.ssh_dir(), ctx.config_d_dir(), ctx.sockets_dir()] {
            if dir.is_dir() {
                ctx.log.debug(&format!("exists: {}", dir.display()));
                stats.already_ok += 1;
                continue;
            }

            if ctx.dry_run {
                ctx.log.dry_run(&format!("would create {}", dir.display()));
                stats.changed += 1;
                continue;
            }

            std::fs::create_dir_all(&dir)
                .with_context(|| format!("create directory {}", dir.display()))?;
            ctx.log.debug(&format!("created {}", dir.display()));
            ctx.record(Entry::dir(dir));
            stats.changed += 1;
        }

        Ok(stats.finish(ctx))
    }
}
