//! Copied-file resource.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::{Resource, ResourceState};

/// A file installed by copying it from the source repository.
#[derive(Debug, Clone)]
pub struct CopyResource {
    /// The source file to copy from.
    pub source: PathBuf,
    /// The target path to copy to.
    pub target: PathBuf,
}

impl CopyResource {
    /// Create a new copy resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

impl Resource for CopyResource {
    fn description(&self) -> String {
        format!("{} <- {}", self.target.display(), self.source.display())
    }

    fn current_state(&self) -> Result<ResourceState> {
        if !self.source.is_file() {
            return Ok(ResourceState::Invalid {
                reason: format!("source does not exist: {}", self.source.display()),
            });
        }

        let Ok(meta) = self.target.symlink_metadata() else {
            return Ok(ResourceState::Missing);
        };

        if meta.is_symlink() {
            return Ok(ResourceState::Incorrect {
                current: "target is a symlink".to_string(),
            });
        }
        if meta.is_dir() {
            return Ok(ResourceState::Invalid {
                reason: "target is a directory".to_string(),
            });
        }

        let source_content =
            std::fs::read(&self.source).with_context(|| format!("read {}", self.source.display()))?;
        let target_content =
            std::fs::read(&self.target).with_context(|| format!("read {}", self.target.display()))?;
        if source_content == target_content {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: "contents differ".to_string(),
            })
        }
    }

    fn apply(&self) -> Result<()> {
        super::fs::ensure_parent_dir(&self.target)?;

        // A symlink at the target would redirect the copy into the source
        // repository, so replace it rather than writing through it.
        if let Ok(meta) = self.target.symlink_metadata()
            && meta.is_symlink()
        {
            std::fs::remove_file(&self.target)
                .with_context(|| format!("remove existing link: {}", self.target.display()))?;
        }

        std::fs::copy(&self.source, &self.target).with_context(|| {
            format!(
                "copy {} to {}",
                self.source.display(),
                self.target.display()
            )
        })?;
        Ok(())
    }
}
