//! Permission tightening for the installed tree (Unix only).
use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats};
use crate::plan::{InstallPlan, Method};
use crate::resources::chmod::ChmodResource;
use crate::resources::{Resource, ResourceState};

/// Set `0700` on directories and `0600` on installed files.
///
/// Permission failures are reported as warnings rather than aborting the
/// install: ssh itself will refuse an over-permissive config, so the user
/// gets a second line of defense either way.
pub struct ApplyPermissions {
    plan: InstallPlan,
}

impl ApplyPermissions {
    /// Create the task from a computed install plan.
    #[must_use]
    pub const fn new(plan: InstallPlan) -> Self {
        Self { plan }
    }

    fn resources(&self, ctx: &Context) -> Vec<ChmodResource> {
        let mut resources = vec![
            ChmodResource::new(ctx.ssh_dir(), 0o700),
            ChmodResource::new(ctx.config_d_dir(), 0o700),
            ChmodResource::new(ctx.sockets_dir(), 0o700),
        ];

        match self.plan.method {
            Method::Copy => {
                for file in &self.plan.files {
                    resources.push(ChmodResource::new(file.target.clone(), 0o600));
                }
            }
            Method::Symlink => {
                // chmod on a symlink would follow it into the source
                // repository, so linked files keep the repository's modes.
                ctx.log
                    .debug("symlink mode: file permissions follow the source repository");
            }
        }

        resources
    }
}

impl Task for ApplyPermissions {
    fn name(&self) -> &str {
        "Apply file permissions"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        cfg!(unix)
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut stats = TaskStats::new();

        for resource in self.resources(ctx) {
            match resource.current_state()? {
                ResourceState::Invalid { reason } => {
                    ctx.log.debug(&format!("skipping chmod: {reason}"));
                    stats.skipped += 1;
                }
                ResourceState::Correct => {
                    stats.already_ok += 1;
                }
                ResourceState::Missing | ResourceState::Incorrect { .. } => {
                    if ctx.dry_run {
                        ctx.log
                            .dry_run(&format!("would chmod {}", resource.description()));
                        stats.changed += 1;
                        continue;
                    }

                    if let Err(e) = resource.apply() {
                        ctx.log
                            .warn(&format!("chmod {}: {e:#}", resource.description()));
                        stats.skipped += 1;
                    } else {
                        ctx.log.debug(&format!("chmod {}", resource.description()));
                        stats.changed += 1;
                    }
                }
            }
        }

        Ok(stats.finish(ctx))
    }
}
