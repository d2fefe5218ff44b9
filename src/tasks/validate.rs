//! Syntax validation of the installed configuration via `ssh -G`.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::error::ValidationError;
use crate::exec;

/// Ask ssh to resolve a probe host against the installed config.
///
/// `ssh -G` parses the whole config (including every `Include`) and exits
/// non-zero on syntax errors without opening any connection.
pub struct ValidateSshConfig;

const PROBE_HOST: &str = "sshconf-syntax-probe";

impl Task for ValidateSshConfig {
    fn name(&self) -> &str {
        "Validate configuration"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.dry_run {
            ctx.log.dry_run("would validate configuration with ssh -G");
            return Ok(TaskResult::DryRun);
        }

        if !exec::which("ssh") {
            return Err(ValidationError::SshNotFound.into());
        }

        let config = ctx.config_target();
        let config_arg = config.to_string_lossy();
        let result = exec::run_unchecked("ssh", &["-G", "-F", &config_arg, PROBE_HOST])?;

        if !result.success {
            return Err(ValidationError::SyntaxCheck(result.stderr.trim().to_string()).into());
        }

        ctx.log.info("configuration parses cleanly");
        Ok(TaskResult::Ok)
    }
}
