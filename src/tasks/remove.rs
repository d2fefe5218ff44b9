//! Removal of an installed configuration tree.
use anyhow::Result;
use std::path::PathBuf;

use super::{Context, Task, TaskResult, TaskStats};
use crate::error::ManifestError;
use crate::manifest::{EntryKind, Manifest};
use crate::resources::fs::{
    backup_timestamp, create_backup, entry_exists, remove_dir_if_empty, remove_file_or_link,
};

/// Remove everything a previous install placed, guided by the manifest.
///
/// Without a manifest (pre-manifest installs, or a deleted file) falls back
/// to removing the well-known paths: `config`, `config.d/*.conf` and
/// `config.d/*.conf.disabled`. Either way the current tree is backed up
/// first, and directories are only removed when they end up empty.
pub struct RemoveInstalled;

fn backup_current(ctx: &Context) -> Result<()> {
    let timestamp = backup_timestamp();
    for target in [ctx.config_target(), ctx.config_d_dir()] {
        if target.exists() {
            let dest = create_backup(&target, &timestamp)?;
            ctx.log
                .info(&format!("backed up {} -> {}", target.display(), dest.display()));
        }
    }
    Ok(())
}

fn remove_from_manifest(ctx: &Context, manifest: &Manifest) -> Result<TaskResult> {
    if ctx.dry_run {
        for entry in &manifest.entries {
            if entry_exists(&entry.path) {
                ctx.log
                    .dry_run(&format!("would remove {}", entry.path.display()));
            }
        }
        ctx.log
            .dry_run(&format!("would remove {}", ctx.manifest_path().display()));
        return Ok(TaskResult::DryRun);
    }

    backup_current(ctx)?;

    let mut stats = TaskStats::new();

    for entry in &manifest.entries {
        if entry.kind == EntryKind::Dir {
            continue;
        }
        if !entry_exists(&entry.path) {
            ctx.log
                .debug(&format!("already gone: {}", entry.path.display()));
            stats.skipped += 1;
            continue;
        }
        remove_file_or_link(&entry.path)?;
        ctx.log.debug(&format!("removed {}", entry.path.display()));
        stats.changed += 1;
    }

    // The manifest itself must go before directory cleanup so that an
    // otherwise-empty ~/.ssh can actually be removed.
    if entry_exists(&ctx.manifest_path()) {
        remove_file_or_link(&ctx.manifest_path())?;
    }

    // Deepest paths first so nested directories empty out before their
    // parents are considered.
    let mut dirs: Vec<PathBuf> = manifest
        .entries
        .iter()
        .filter(|e| e.kind == EntryKind::Dir)
        .map(|e| e.path.clone())
        .collect();
    dirs.sort_by_key(|p| std::cmp::Reverse(p.components().count()));

    for dir in dirs {
        if !dir.is_dir() {
            stats.skipped += 1;
            continue;
        }
        if remove_dir_if_empty(&dir)? {
            ctx.log.debug(&format!("removed {}", dir.display()));
            stats.changed += 1;
        } else {
            ctx.log.debug(&format!("kept (not empty): {}", dir.display()));
            stats.skipped += 1;
        }
    }

    Ok(stats.finish(ctx))
}

fn remove_legacy(ctx: &Context) -> Result<TaskResult> {
    let config = ctx.config_target();
    let config_d = ctx.config_d_dir();

    if ctx.dry_run {
        if entry_exists(&config) {
            ctx.log
                .dry_run(&format!("would remove {}", config.display()));
        }
        if config_d.is_dir() {
            ctx.log
                .dry_run(&format!("would remove fragments under {}", config_d.display()));
        }
        if entry_exists(&ctx.manifest_path()) {
            ctx.log
                .dry_run(&format!("would remove {}", ctx.manifest_path().display()));
        }
        return Ok(TaskResult::DryRun);
    }

    backup_current(ctx)?;

    let mut stats = TaskStats::new();

    // A corrupt manifest still has to go, or the next install would
    // mistake it for a prior record.
    if entry_exists(&ctx.manifest_path()) {
        remove_file_or_link(&ctx.manifest_path())?;
        ctx.log
            .debug(&format!("removed {}", ctx.manifest_path().display()));
        stats.changed += 1;
    }

    if entry_exists(&config) {
        remove_file_or_link(&config)?;
        ctx.log.debug(&format!("removed {}", config.display()));
        stats.changed += 1;
    }

    if config_d.is_dir() {
        for entry in std::fs::read_dir(&config_d)? {
            let path = entry?.path();
            let name = path.file_name().map(|n| n.to_string_lossy().to_string());
            let is_fragment = name.is_some_and(|n| {
                n.ends_with(".conf") || n.ends_with(".conf.disabled")
            });
            if !is_fragment {
                stats.skipped += 1;
                continue;
            }
            if let Err(e) = remove_file_or_link(&path) {
                ctx.log.warn(&format!("{e:#}"));
                stats.skipped += 1;
            } else {
                ctx.log.debug(&format!("removed {}", path.display()));
                stats.changed += 1;
            }
        }
    }

    for dir in [config_d, ctx.sockets_dir()] {
        if dir.is_dir() && remove_dir_if_empty(&dir)? {
            ctx.log.debug(&format!("removed {}", dir.display()));
            stats.changed += 1;
        }
    }

    Ok(stats.finish(ctx))
}

impl Task for RemoveInstalled {
    fn name(&self) -> &str {
        "Remove installed configuration"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        entry_exists(&ctx.ssh_dir())
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        match Manifest::load(&ctx.manifest_path()) {
            Ok(manifest) => remove_from_manifest(ctx, &manifest),
            Err(ManifestError::Io { .. }) => {
                ctx.log
                    .warn("no manifest found; falling back to legacy removal");
                remove_legacy(ctx)
            }
            Err(e) => {
                ctx.log
                    .warn(&format!("unreadable manifest ({e}); falling back to legacy removal"));
                remove_legacy(ctx)
            }
        }
    }
}
