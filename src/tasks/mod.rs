//! Named, sequentially executed tasks that orchestrate resource changes.
pub mod backup;
mod context;
pub mod directories;
pub mod install_files;
pub mod permissions;
pub mod remove;
pub mod validate;

pub use context::Context;

use anyhow::Result;

use crate::logging::TaskStatus;
use crate::plan::InstallPlan;

/// Outcome of a task run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task completed and the system matches the desired state.
    Ok,
    /// Task was applicable but skipped, with a reason.
    Skipped(String),
    /// Task previewed its changes without applying them.
    DryRun,
}

/// Per-task counters reported in the closing info line.
#[derive(Debug, Default)]
pub struct TaskStats {
    /// Paths created or updated (or that would be, under dry-run).
    pub changed: u32,
    /// Paths already in the desired state.
    pub already_ok: u32,
    /// Paths skipped (missing, kept, or failed non-fatally).
    pub skipped: u32,
}

impl TaskStats {
    /// Fresh zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log the counters and convert them into a [`TaskResult`].
    #[must_use]
    pub fn finish(self, ctx: &Context) -> TaskResult {
        if ctx.dry_run {
            ctx.log.info(&format!(
                "{} would change, {} already ok, {} skipped",
                self.changed, self.already_ok, self.skipped
            ));
            return TaskResult::DryRun;
        }

        ctx.log.info(&format!(
            "{} changed, {} already ok, {} skipped",
            self.changed, self.already_ok, self.skipped
        ));
        TaskResult::Ok
    }
}

/// A named, executable task.
pub trait Task {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task applies to the current run.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails to execute, such as when file
    /// operations are not permitted or the user declines a confirmation.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The complete ordered set of tasks run by an install.
#[must_use]
pub fn all_install_tasks(plan: &InstallPlan) -> Vec<Box<dyn Task>> {
    vec![
        Box::new(backup::BackupExisting::new(plan.source_root.clone())),
        Box::new(directories::CreateDirectories),
        Box::new(install_files::InstallConfigFiles::new(plan.clone())),
        Box::new(permissions::ApplyPermissions::new(plan.clone())),
        Box::new(validate::ValidateSshConfig),
    ]
}

/// The complete ordered set of tasks run by an uninstall.
#[must_use]
pub fn all_uninstall_tasks() -> Vec<Box<dyn Task>> {
    vec![Box::new(remove::RemoveInstalled)]
}

/// Execute a task, recording the result in the logger.
pub fn execute(task: &dyn Task, ctx: &Context) {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return;
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
        }
    }
}

/// Shared helpers for task unit tests.
#[cfg(test)]
pub mod test_helpers {
    use std::path::Path;
    use std::sync::Arc;

    use crate::logging::Logger;
    use crate::platform::{Os, Platform};

    use super::Context;

    /// Build a quiet [`Context`] rooted at `home` for the given OS.
    #[must_use]
    pub fn make_context(home: &Path, os: Os, dry_run: bool, force: bool) -> Context {
        Context::new(
            home.to_path_buf(),
            Platform::new(os),
            Arc::new(Logger::new(false, true)),
            dry_run,
            force,
        )
    }

    /// Build a quiet Linux [`Context`] rooted at `home`.
    #[must_use]
    pub fn make_linux_context(home: &Path) -> Context {
        make_context(home, Os::Linux, false, true)
    }

    /// Write a minimal source repository at `root` with the given fragments.
    pub fn setup_source(root: &Path, fragments: &[&str]) {
        std::fs::create_dir_all(root.join("config.d")).expect("create config.d");
        std::fs::write(root.join("config"), "Include ~/.ssh/config.d/*.conf\n")
            .expect("write config");
        for name in fragments {
            std::fs::write(root.join("config.d").join(name), format!("# {name}\n"))
                .expect("write fragment");
        }
    }
}
