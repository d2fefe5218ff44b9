//! Installer for a modular SSH client configuration tree.
//!
//! Deploys `~/.ssh/config` plus `~/.ssh/config.d/*.conf` from a source
//! repository, either by copying files or by symlinking back to the source,
//! records everything it placed in a text manifest, and uninstalls exactly
//! that set.
//!
//! The public API is organised into four layers:
//!
//! - **[`plan`]** — compute the target state from the source repository
//! - **[`resources`]** — idempotent `check + apply` primitives (copy, symlink, chmod)
//! - **[`tasks`]** — named units of work wired to resources
//! - **[`commands`]** — top-level orchestration (`install`, `uninstall`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod exec;
pub mod logging;
pub mod manifest;
pub mod plan;
pub mod platform;
pub mod resources;
pub mod tasks;

/// Tool version: release tag when built by CI, crate version otherwise.
#[must_use]
pub fn version() -> &'static str {
    option_env!("SSHCONF_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}
