//! Idempotent resource primitives (check + apply pattern).
pub mod chmod;
pub mod copy;
pub mod fs;
pub mod symlink;

use anyhow::Result;

/// State of a resource relative to its desired form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist yet.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// The current value of the resource.
        current: String,
    },
    /// Resource cannot be applied (e.g., the source file is gone).
    Invalid {
        /// Reason why the resource cannot be applied.
        reason: String,
    },
}

/// Unified interface for resources that can be checked and applied.
///
/// All installer resources follow the same pattern: inspect the current
/// filesystem state, then apply only when something needs to change.
pub trait Resource {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined due to I/O
    /// failures or other system errors.
    fn current_state(&self) -> Result<ResourceState>;

    /// Bring the resource to its desired state.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be applied due to I/O
    /// failures, permission issues, or invalid paths.
    fn apply(&self) -> Result<()>;

    /// Determine if the resource needs to be changed.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Resource::current_state`].
    fn needs_change(&self) -> Result<bool> {
        Ok(matches!(
            self.current_state()?,
            ResourceState::Missing | ResourceState::Incorrect { .. }
        ))
    }
}
