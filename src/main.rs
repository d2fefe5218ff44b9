use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use sshconf_cli::commands;
use sshconf_cli::logging::Logger;
use sshconf_cli::{cli, version};

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let log = Arc::new(Logger::new(args.verbose, args.quiet));
    log.info(&format!("sshconf {}", version()));

    if args.uninstall {
        commands::uninstall::run(&args, &log)
    } else {
        commands::install::run(&args, &log)
    }
}
