//! Backup of pre-existing configuration before install overwrites it.
use anyhow::Result;
use std::path::PathBuf;

use super::{Context, Task, TaskResult};
use crate::manifest::Manifest;
use crate::resources::fs::{backup_timestamp, create_backup};

/// Back up an existing `~/.ssh/config` / `~/.ssh/config.d` before install.
///
/// Skipped when the existing tree was placed by a previous run against the
/// same source repository (re-installs stay idempotent instead of piling
/// up backups of our own output).
pub struct BackupExisting {
    source_root: PathBuf,
}

impl BackupExisting {
    /// Create the task for an install from `source_root`.
    #[must_use]
    pub const fn new(source_root: PathBuf) -> Self {
        Self { source_root }
    }

    fn backup_targets(ctx: &Context) -> Vec<PathBuf> {
        [ctx.config_target(), ctx.config_d_dir()]
            .into_iter()
            .filter(|p| p.exists())
            .collect()
    }
}

impl Task for BackupExisting {
    fn name(&self) -> &str {
        "Back up existing configuration"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !Self::backup_targets(ctx).is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if let Ok(manifest) = Manifest::load(&ctx.manifest_path())
            && manifest.source == self.source_root
        {
            return Ok(TaskResult::Skipped(
                "previous install from this source".to_string(),
            ));
        }

        let targets = Self::backup_targets(ctx);

        if ctx.dry_run {
            for target in &targets {
                ctx.log
                    .dry_run(&format!("would back up {}", target.display()));
            }
            return Ok(TaskResult::DryRun);
        }

        if !ctx.force {
            let confirmed = ctx.log.confirm(
                "Existing SSH configuration will be backed up and overwritten. Continue?",
            )?;
            if !confirmed {
                anyhow::bail!("cancelled by user");
            }
        }

        let timestamp = backup_timestamp();
        for target in &targets {
            let dest = create_backup(target, &timestamp)?;
            ctx.log
                .info(&format!("backed up {} -> {}", target.display(), dest.display()));
        }

        Ok(TaskResult::Ok)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::plan::Method;
    use crate::tasks::test_helpers::make_linux_context;

    #[test]
    fn not_applicable_without_existing_config() {
        let home = tempfile::tempdir().unwrap();
        let ctx = make_linux_context(home.path());
        let task = BackupExisting::new(PathBuf::from("/repo"));
        assert!(!task.should_run(&ctx));
    }

    #[test]
    fn applicable_when_config_exists() {
        let home = tempfile::tempdir().unwrap();
        let ctx = make_linux_context(home.path());
        std::fs::create_dir_all(ctx.ssh_dir()).unwrap();
        std::fs::write(ctx.config_target(), "Host old\n").unwrap();

        let task = BackupExisting::new(PathBuf::from("/repo"));
        assert!(task.should_run(&ctx));
    }

    #[test]
    fn backs_up_config_and_config_d_with_force() {
        let home = tempfile::tempdir().unwrap();
        let ctx = make_linux_context(home.path()); // force=true
        std::fs::create_dir_all(ctx.config_d_dir()).unwrap();
        std::fs::write(ctx.config_target(), "Host old\n").unwrap();
        std::fs::write(ctx.config_d_dir().join("old.conf"), "# old\n").unwrap();

        let task = BackupExisting::new(PathBuf::from("/repo"));
        let result = task.run(&ctx).unwrap();
        assert_eq!(result, TaskResult::Ok);

        let backups: Vec<_> = std::fs::read_dir(ctx.ssh_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|n| n.contains(".bak."))
            .collect();
        assert_eq!(backups.len(), 2, "expected config and config.d backups");
        // Originals stay in place for the install step to overwrite
        assert!(ctx.config_target().exists());
        assert!(ctx.config_d_dir().exists());
    }

    #[test]
    fn skips_when_manifest_matches_source() {
        let home = tempfile::tempdir().unwrap();
        let ctx = make_linux_context(home.path());
        std::fs::create_dir_all(ctx.ssh_dir()).unwrap();
        std::fs::write(ctx.config_target(), "Host ours\n").unwrap();
        Manifest::new(Method::Copy, PathBuf::from("/repo"))
            .save(&ctx.manifest_path())
            .unwrap();

        let task = BackupExisting::new(PathBuf::from("/repo"));
        let result = task.run(&ctx).unwrap();
        assert!(matches!(result, TaskResult::Skipped(_)));

        let backups = std::fs::read_dir(ctx.ssh_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|n| n.contains(".bak."))
            .count();
        assert_eq!(backups, 0);
    }

    #[test]
    fn backs_up_when_manifest_names_other_source() {
        let home = tempfile::tempdir().unwrap();
        let ctx = make_linux_context(home.path());
        std::fs::create_dir_all(ctx.ssh_dir()).unwrap();
        std::fs::write(ctx.config_target(), "Host other\n").unwrap();
        Manifest::new(Method::Copy, PathBuf::from("/other-repo"))
            .save(&ctx.manifest_path())
            .unwrap();

        let task = BackupExisting::new(PathBuf::from("/repo"));
        let result = task.run(&ctx).unwrap();
        assert_eq!(result, TaskResult::Ok);

        let backups = std::fs::read_dir(ctx.ssh_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|n| n.contains(".bak."))
            .count();
        assert_eq!(backups, 1);
    }

    #[test]
    fn dry_run_creates_no_backup() {
        let home = tempfile::tempdir().unwrap();
        let ctx =
            crate::tasks::test_helpers::make_context(home.path(), crate::platform::Os::Linux, true, false);
        std::fs::create_dir_all(ctx.ssh_dir()).unwrap();
        std::fs::write(ctx.config_target(), "Host old\n").unwrap();

        let task = BackupExisting::new(PathBuf::from("/repo"));
        let result = task.run(&ctx).unwrap();
        assert_eq!(result, TaskResult::DryRun);

        let backups = std::fs::read_dir(ctx.ssh_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|n| n.contains(".bak."))
            .count();
        assert_eq!(backups, 0);
    }
}
