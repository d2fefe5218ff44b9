//! Placement of the config file and fragments into the target tree.
use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats};
use crate::manifest::Entry;
use crate::plan::{InstallPlan, Method, PlannedFile};
use crate::resources::copy::CopyResource;
use crate::resources::symlink::SymlinkResource;
use crate::resources::{Resource, ResourceState};

/// Install every planned file by the selected method.
pub struct InstallConfigFiles {
    plan: InstallPlan,
}

impl InstallConfigFiles {
    /// Create the task from a computed install plan.
    #[must_use]
    pub const fn new(plan: InstallPlan) -> Self {
        Self { plan }
    }

    fn resource_for(&self, file: &PlannedFile) -> Box<dyn Resource> {
        match self.plan.method {
            Method::Copy => Box::new(CopyResource::new(file.source.clone(), file.target.clone())),
            Method::Symlink => Box::new(SymlinkResource::new(
                file.source.clone(),
                file.target.clone(),
            )),
        }
    }

    fn entry_for(&self, file: &PlannedFile) -> Entry {
        match self.plan.method {
            Method::Copy => Entry::file(file.target.clone(), file.source.clone()),
            Method::Symlink => Entry::symlink(file.target.clone(), file.source.clone()),
        }
    }
}

impl Task for InstallConfigFiles {
    fn name(&self) -> &str {
        "Install config files"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        !self.plan.files.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut stats = TaskStats::new();

        for file in &self.plan.files {
            let resource = self.resource_for(file);

            match resource.current_state()? {
                ResourceState::Invalid { reason } => {
                    anyhow::bail!("{}: {reason}", resource.description());
                }
                ResourceState::Correct => {
                    ctx.log
                        .debug(&format!("already ok: {}", file.target.display()));
                    stats.already_ok += 1;
                    if !ctx.dry_run {
                        ctx.record(self.entry_for(file));
                    }
                }
                ResourceState::Missing | ResourceState::Incorrect { .. } => {
                    if ctx.dry_run {
                        ctx.log
                            .dry_run(&format!("would install {}", resource.description()));
                        stats.changed += 1;
                        continue;
                    }

                    resource.apply()?;
                    ctx.log
                        .debug(&format!("installed {}", resource.description()));
                    ctx.record(self.entry_for(file));
                    stats.changed += 1;
                }
            }
        }

        Ok(stats.finish(ctx))
    }
}
