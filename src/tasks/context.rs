use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::logging::Logger;
use crate::manifest::{Entry, MANIFEST_FILE};
use crate::platform::Platform;

/// Shared context for task execution.
#[derive(Debug)]
pub struct Context {
    /// User's home directory path.
    pub home: PathBuf,
    /// Detected platform information.
    pub platform: Platform,
    /// Logger for output and task recording.
    pub log: Arc<Logger>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Whether to overwrite without confirmation.
    pub force: bool,
    /// Manifest entries recorded by install tasks as they place paths.
    recorded: Mutex<Vec<Entry>>,
}

impl Context {
    /// Creates a new context for task execution.
    #[must_use]
    pub fn new(
        home: PathBuf,
        platform: Platform,
        log: Arc<Logger>,
        dry_run: bool,
        force: bool,
    ) -> Self {
        Self {
            home,
            platform,
            log,
            dry_run,
            force,
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// The target SSH directory (`~/.ssh`).
    #[must_use]
    pub fn ssh_dir(&self) -> PathBuf {
        self.home.join(".ssh")
    }

    /// The installed main config file (`~/.ssh/config`).
    #[must_use]
    pub fn config_target(&self) -> PathBuf {
        self.ssh_dir().join("config")
    }

    /// The installed fragment directory (`~/.ssh/config.d`).
    #[must_use]
    pub fn config_d_dir(&self) -> PathBuf {
        self.ssh_dir().join("config.d")
    }

    /// The ControlPath sockets directory (`~/.ssh/sockets`).
    #[must_use]
    pub fn sockets_dir(&self) -> PathBuf {
        self.ssh_dir().join("sockets")
    }

    /// Path of the install manifest.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.ssh_dir().join(MANIFEST_FILE)
    }

    /// Record a placed path for the manifest.
    pub fn record(&self, entry: Entry) {
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.push(entry);
        }
    }

    /// Take all recorded entries, leaving the context empty.
    #[must_use]
    pub fn take_recorded(&self) -> Vec<Entry> {
        self.recorded
            .lock()
            .map_or_else(|_| Vec::new(), |mut recorded| std::mem::take(&mut *recorded))
    }
}
