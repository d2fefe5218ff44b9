//! File permission resource (Unix only).
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::{Resource, ResourceState};

/// A file permission resource that can be checked and applied.
#[derive(Debug, Clone)]
pub struct ChmodResource {
    /// Target path (absolute).
    pub target: PathBuf,
    /// Desired permission bits (e.g., `0o600`).
    pub mode: u32,
}

impl ChmodResource {
    /// Create a new chmod resource.
    #[must_use]
    pub const fn new(target: PathBuf, mode: u32) -> Self {
        Self { target, mode }
    }
}

impl Resource for ChmodResource {
    fn description(&self) -> String {
        format!("{:o} {}", self.mode, self.target.display())
    }

    fn current_state(&self) -> Result<ResourceState> {
        if !self.target.exists() {
            return Ok(ResourceState::Invalid {
                reason: format!("target does not exist: {}", self.target.display()),
            });
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let current = std::fs::metadata(&self.target)
                .with_context(|| format!("stat {}", self.target.display()))?
                .permissions()
                .mode()
                & 0o7777;

            if current == self.mode {
                Ok(ResourceState::Correct)
            } else {
                Ok(ResourceState::Incorrect {
                    current: format!("{current:o}"),
                })
            }
        }

        #[cfg(not(unix))]
        {
            Ok(ResourceState::Invalid {
                reason: "chmod not supported on this platform".to_string(),
            })
        }
    }

    fn apply(&self) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(self.mode);
            std::fs::set_permissions(&self.target, perms)
                .with_context(|| format!("set permissions: {}", self.target.display()))?;
        }
        Ok(())
    }
}
