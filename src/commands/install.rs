//! The install command: plan, run the install tasks, write the manifest.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result, bail};

use crate::cli::Cli;
use crate::logging::Logger;
use crate::manifest::Manifest;
use crate::plan::InstallPlan;
use crate::platform::Platform;
use crate::tasks::{self, Context};

/// Environment variable overriding the source repository location.
pub const SOURCE_ENV: &str = "SSHCONF_ROOT";

/// Locate the source repository: `--source`, then `$SSHCONF_ROOT`, then
/// directories near the executable, then the current directory.
fn resolve_source(args: &Cli) -> Result<PathBuf> {
    if let Some(source) = &args.source {
        return Ok(source.clone());
    }

    if let Some(root) = std::env::var_os(SOURCE_ENV)
        && !root.is_empty()
    {
        return Ok(PathBuf::from(root));
    }

    let mut candidates = Vec::new();
    if let Ok(exe) = std::env::current_exe() {
        // Running from a checkout: target/<profile>/sshconf sits two
        // levels below the repository root.
        let mut dir = exe.parent().map(std::path::Path::to_path_buf);
        for _ in 0..3 {
            if let Some(d) = dir {
                candidates.push(d.clone());
                dir = d.parent().map(std::path::Path::to_path_buf);
            } else {
                break;
            }
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd);
    }

    for candidate in candidates {
        if candidate.join("config").is_file() && candidate.join("config.d").is_dir() {
            return Ok(candidate);
        }
    }

    bail!("cannot determine source directory. Use --source or set {SOURCE_ENV}")
}

/// Run the install flow end to end.
///
/// # Errors
///
/// Returns an error when the source repository cannot be located or any
/// task fails.
pub fn run(args: &Cli, log: &Arc<Logger>) -> Result<()> {
    let platform = Platform::detect();
    let home = super::resolve_home()?;

    let source = resolve_source(args)?;
    let source = source
        .canonicalize()
        .with_context(|| format!("resolve source directory {}", source.display()))?;
    let method = args.method();

    let ctx = Context::new(home, platform, Arc::clone(log), args.dry_run, args.force);

    log.stage("Planning");
    let plan = InstallPlan::build(&source, &ctx.ssh_dir(), method, &ctx.platform)?;
    log.info(&format!("source: {}", source.display()));
    log.info(&format!("method: {method}"));
    log.info(&format!(
        "config + {} fragment(s) -> {}",
        plan.fragment_count(),
        ctx.ssh_dir().display()
    ));

    let install_tasks = tasks::all_install_tasks(&plan);
    super::run_tasks_to_completion(&install_tasks, &ctx, log)?;

    let entries = ctx.take_recorded();
    if !ctx.dry_run && !entries.is_empty() {
        let mut manifest = Manifest::new(method, source);
        manifest.entries = entries;
        // A reinstall creates no directories, so directory ownership
        // comes from the manifest being replaced.
        if let Ok(prior) = Manifest::load(&ctx.manifest_path()) {
            manifest.carry_dirs_from(&prior);
        }
        manifest.save(&ctx.manifest_path())?;
        log.debug(&format!("wrote manifest {}", ctx.manifest_path().display()));
    }

    super::finish(log)
}
