//! Domain-specific error types for the installer.
//!
//! Internal modules return typed errors (e.g., [`ManifestError`],
//! [`SourceError`]) while command handlers at the CLI boundary convert them
//! to [`anyhow::Error`] via the standard `?` operator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from reading or writing the install manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// An I/O error occurred while reading or writing the manifest file.
    #[error("IO error on manifest {path}: {source}")]
    Io {
        /// Path to the manifest file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A required section header is absent from the manifest.
    #[error("Missing required section [{0}]")]
    MissingSection(String),

    /// A line in the `[files]` section could not be parsed.
    #[error("Invalid manifest entry '{line}': {reason}")]
    InvalidEntry {
        /// The offending line.
        line: String,
        /// Why the line could not be parsed.
        reason: String,
    },

    /// An entry names a kind other than `file`, `dir` or `symlink`.
    #[error("Unknown entry kind '{0}'")]
    UnknownKind(String),

    /// The metadata names an install method other than `copy` or `symlink`.
    #[error("Invalid install method '{0}': must be copy or symlink")]
    InvalidMethod(String),
}

/// Errors that arise from an incomplete source repository.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The main `config` file is missing from the source repository.
    #[error("Source config file not found: {0}")]
    MissingConfig(PathBuf),

    /// The `config.d` directory is missing from the source repository.
    #[error("Source config.d directory not found: {0}")]
    MissingConfigDir(PathBuf),
}

/// Errors that arise from post-install validation via the SSH client.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The `ssh` binary could not be found on PATH.
    #[error("ssh not found on PATH; cannot validate configuration")]
    SshNotFound,

    /// `ssh -G` rejected the installed configuration.
    #[error("ssh rejected the installed configuration: {0}")]
    SyntaxCheck(String),
}
