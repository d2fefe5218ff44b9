//! Target-state computation: which files go where, by which method.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ManifestError, SourceError};
use crate::platform::Platform;

/// Install method for configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Method {
    /// Duplicate source files into the target tree.
    Copy,
    /// Place symbolic links pointing back at the source tree.
    Symlink,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Copy => write!(f, "copy"),
            Method::Symlink => write!(f, "symlink"),
        }
    }
}

impl FromStr for Method {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "copy" => Ok(Method::Copy),
            "symlink" => Ok(Method::Symlink),
            other => Err(ManifestError::InvalidMethod(other.to_string())),
        }
    }
}

/// A single config file to be placed in the target tree.
#[derive(Debug, Clone)]
pub struct PlannedFile {
    /// Absolute path of the file in the source repository.
    pub source: PathBuf,
    /// Absolute path where it will be installed.
    pub target: PathBuf,
    /// Whether the target carries a `.disabled` suffix (platform mismatch).
    pub disabled: bool,
}

/// The computed set of files to install.
#[derive(Debug, Clone)]
pub struct InstallPlan {
    /// Absolute path of the source repository.
    pub source_root: PathBuf,
    /// Selected install method.
    pub method: Method,
    /// Files to place, main config first, fragments in name order.
    pub files: Vec<PlannedFile>,
}

impl InstallPlan {
    /// Compute the install plan from the source repository.
    ///
    /// The main `config` file maps to `<ssh_dir>/config`; every
    /// `config.d/*.conf` fragment maps into `<ssh_dir>/config.d/`, with an
    /// extra `.disabled` suffix when the fragment is OS-specific and does
    /// not match the current platform.
    ///
    /// # Errors
    ///
    /// Returns an error if the source `config` file or `config.d` directory
    /// is missing, or if the fragment directory cannot be read.
    pub fn build(
        source_root: &Path,
        ssh_dir: &Path,
        method: Method,
        platform: &Platform,
    ) -> anyhow::Result<Self> {
        let config_src = source_root.join("config");
        if !config_src.is_file() {
            return Err(SourceError::MissingConfig(config_src).into());
        }

        let config_d_src = source_root.join("config.d");
        if !config_d_src.is_dir() {
            return Err(SourceError::MissingConfigDir(config_d_src).into());
        }

        let mut files = vec![PlannedFile {
            source: config_src,
            target: ssh_dir.join("config"),
            disabled: false,
        }];

        let mut fragments: Vec<PathBuf> = std::fs::read_dir(&config_d_src)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "conf"))
            .collect();
        fragments.sort();

        let config_d_target = ssh_dir.join("config.d");
        for fragment in fragments {
            let Some(name) = fragment.file_name().map(|n| n.to_string_lossy().to_string()) else {
                continue;
            };
            let stem = fragment
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let enabled = platform.fragment_enabled(&stem);
            let target_name = if enabled {
                name
            } else {
                format!("{name}.disabled")
            };
            files.push(PlannedFile {
                source: fragment,
                target: config_d_target.join(target_name),
                disabled: !enabled,
            });
        }

        Ok(Self {
            source_root: source_root.to_path_buf(),
            method,
            files,
        })
    }

    /// Number of fragments (everything except the main config file).
    #[must_use]
    pub fn fragment_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }
}
