use clap::Parser;
use std::path::PathBuf;

use crate::plan::Method;

/// Command-line interface for the SSH configuration installer.
#[derive(Parser, Debug)]
#[command(
    name = "sshconf",
    about = "Install a modular SSH client configuration tree",
    version
)]
pub struct Cli {
    /// Preview changes without applying them
    #[arg(long)]
    pub dry_run: bool,

    /// Overwrite existing configuration without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Install by symlinking back to the source repository
    #[arg(short, long, conflicts_with = "method")]
    pub symlink: bool,

    /// Install method
    #[arg(short, long, value_enum)]
    pub method: Option<Method>,

    /// Remove a previous install recorded in the manifest
    #[arg(short, long)]
    pub uninstall: bool,

    /// Suppress informational output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Override source repository directory
    #[arg(long)]
    pub source: Option<PathBuf>,
}

impl Cli {
    /// Resolve the install method from `--symlink` and `--method`.
    #[must_use]
    pub fn method(&self) -> Method {
        if self.symlink {
            Method::Symlink
        } else {
            self.method.unwrap_or(Method::Copy)
        }
    }
}
