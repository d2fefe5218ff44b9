//! Shared fixtures for the end-to-end flow tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sshconf_cli::logging::Logger;
use sshconf_cli::manifest::Manifest;
use sshconf_cli::plan::{InstallPlan, Method};
use sshconf_cli::platform::{Os, Platform};
use sshconf_cli::tasks::{self, Context};

/// Write a source repository at `root` with a main config and fragments.
pub fn setup_source(root: &Path, fragments: &[&str]) {
    std::fs::create_dir_all(root.join("config.d")).expect("create config.d");
    std::fs::write(root.join("config"), "Include ~/.ssh/config.d/*.conf\n")
        .expect("write config");
    for name in fragments {
        std::fs::write(root.join("config.d").join(name), format!("# {name}\n"))
            .expect("write fragment");
    }
}

/// Build a quiet, forced context rooted at `home`.
pub fn make_context(home: &Path, dry_run: bool) -> Context {
    Context::new(
        home.to_path_buf(),
        Platform::new(Os::Linux),
        Arc::new(Logger::new(false, true)),
        dry_run,
        true,
    )
}

/// Run the full install pipeline the way the install command does:
/// all tasks in order, then the manifest write.
pub fn run_install(home: &Path, source: &Path, method: Method) -> Context {
    let ctx = make_context(home, false);
    let plan = InstallPlan::build(source, &ctx.ssh_dir(), method, &ctx.platform)
        .expect("build install plan");

    for task in tasks::all_install_tasks(&plan) {
        // Environments without an ssh binary skip the validation step
        if task.name() == "Validate configuration" && !ssh_available() {
            continue;
        }
        tasks::execute(task.as_ref(), &ctx);
    }
    assert_eq!(ctx.log.failure_count(), 0, "install tasks must not fail");

    let entries = ctx.take_recorded();
    assert!(!entries.is_empty(), "install must record manifest entries");
    let mut manifest = Manifest::new(method, source.to_path_buf());
    manifest.entries = entries;
    if let Ok(prior) = Manifest::load(&ctx.manifest_path()) {
        manifest.carry_dirs_from(&prior);
    }
    manifest
        .save(&ctx.manifest_path())
        .expect("write manifest");
    ctx
}

/// Run the uninstall pipeline against `home`.
pub fn run_uninstall(home: &Path) -> Context {
    let ctx = make_context(home, false);
    for task in tasks::all_uninstall_tasks() {
        tasks::execute(task.as_ref(), &ctx);
    }
    assert_eq!(ctx.log.failure_count(), 0, "uninstall tasks must not fail");
    ctx
}

/// Names of backup siblings (`*.bak.*`) directly under `dir`.
pub fn backup_names(dir: &Path) -> Vec<String> {
    if !dir.is_dir() {
        return Vec::new();
    }
    std::fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().to_string())
        .filter(|n| n.contains(".bak."))
        .collect()
}

/// Whether `ssh` is available for validation in this environment.
pub fn ssh_available() -> bool {
    sshconf_cli::exec::which("ssh")
}

/// Paths of the installed tree under `home`.
pub struct Tree {
    pub ssh_dir: PathBuf,
    pub config: PathBuf,
    pub config_d: PathBuf,
    pub sockets: PathBuf,
}

impl Tree {
    pub fn of(home: &Path) -> Self {
        let ssh_dir = home.join(".ssh");
        Self {
            config: ssh_dir.join("config"),
            config_d: ssh_dir.join("config.d"),
            sockets: ssh_dir.join("sockets"),
            ssh_dir,
        }
    }
}
