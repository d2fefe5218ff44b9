//! The install manifest: a text record of every path the installer placed.
//!
//! Format:
//!
//! ```text
//! [metadata]
//! version=0.1.0
//! method=copy
//! timestamp=2024-05-01T12:00:00+00:00
//! source=/home/user/dotfiles/ssh
//!
//! [files]
//! dir:/home/user/.ssh:
//! file:/home/user/.ssh/config:/home/user/dotfiles/ssh/config
//! ```
//!
//! `\` and `:` inside a path or source field are escaped with a leading
//! backslash, so the three fields of a `[files]` line round-trip any path.
//!
//! The manifest is written fresh at each install, read at uninstall time,
//! and deleted after a successful uninstall.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ManifestError;
use crate::plan::Method;

/// File name of the manifest inside the target SSH directory.
pub const MANIFEST_FILE: &str = ".dotfiles_manifest";

/// Kind of an installed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file placed by copy.
    File,
    /// A directory created by the installer.
    Dir,
    /// A symbolic link into the source repository.
    Symlink,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Dir => write!(f, "dir"),
            EntryKind::Symlink => write!(f, "symlink"),
        }
    }
}

impl FromStr for EntryKind {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(EntryKind::File),
            "dir" => Ok(EntryKind::Dir),
            "symlink" => Ok(EntryKind::Symlink),
            other => Err(ManifestError::UnknownKind(other.to_string())),
        }
    }
}

/// One installed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// What was placed at `path`.
    pub kind: EntryKind,
    /// Absolute installed path.
    pub path: PathBuf,
    /// Source path the entry was copied from or links to (empty for dirs).
    pub source: Option<PathBuf>,
}

impl Entry {
    /// Entry for a directory the installer created.
    #[must_use]
    pub fn dir(path: PathBuf) -> Self {
        Self {
            kind: EntryKind::Dir,
            path,
            source: None,
        }
    }

    /// Entry for a copied file.
    #[must_use]
    pub fn file(path: PathBuf, source: PathBuf) -> Self {
        Self {
            kind: EntryKind::File,
            path,
            source: Some(source),
        }
    }

    /// Entry for a symlink into the source repository.
    #[must_use]
    pub fn symlink(path: PathBuf, source: PathBuf) -> Self {
        Self {
            kind: EntryKind::Symlink,
            path,
            source: Some(source),
        }
    }
}

/// Escape `\` and `:` so a field can hold any path.
fn escape_field(s: &str) -> String {
    s.replace('\\', "\\\\").replace(':', "\\:")
}

/// Split a `[files]` line into its three fields, honouring `\`-escapes.
///
/// Only the first two unescaped `:` act as separators; anything after
/// them belongs to the source field.
fn split_entry(line: &str) -> Option<(String, String, String)> {
    let mut fields = vec![String::new()];
    let mut escaped = false;
    for c in line.chars() {
        if escaped {
            if let Some(last) = fields.last_mut() {
                last.push(c);
            }
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == ':' && fields.len() < 3 {
            fields.push(String::new());
        } else if let Some(last) = fields.last_mut() {
            last.push(c);
        }
    }
    if fields.len() == 3 {
        let mut it = fields.into_iter();
        Some((it.next()?, it.next()?, it.next()?))
    } else {
        None
    }
}

/// The manifest: install metadata plus the list of placed paths.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Tool version that wrote the manifest.
    pub version: String,
    /// Install method used.
    pub method: Method,
    /// Local time of the install, RFC 3339.
    pub timestamp: String,
    /// Absolute path of the source repository.
    pub source: PathBuf,
    /// Every path the installer placed, in creation order.
    pub entries: Vec<Entry>,
}

impl Manifest {
    /// Create an empty manifest stamped with the current time.
    #[must_use]
    pub fn new(method: Method, source: PathBuf) -> Self {
        Self {
            version: crate::version().to_string(),
            method,
            timestamp: chrono::Local::now().to_rfc3339(),
            source,
            entries: Vec::new(),
        }
    }

    /// Render the manifest to its text form.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("[metadata]\n");
        out.push_str(&format!("version={}\n", self.version));
        out.push_str(&format!("method={}\n", self.method));
        out.push_str(&format!("timestamp={}\n", self.timestamp));
        out.push_str(&format!("source={}\n", self.source.display()));
        out.push_str("\n[files]\n");
        for entry in &self.entries {
            let source = entry
                .source
                .as_ref()
                .map(|p| escape_field(&p.display().to_string()))
                .unwrap_or_default();
            out.push_str(&format!(
                "{}:{}:{}\n",
                entry.kind,
                escape_field(&entry.path.display().to_string()),
                source
            ));
        }
        out
    }

    /// Carry forward directory entries recorded by an earlier install.
    ///
    /// A reinstall skips directory creation (the directories already
    /// exist), so ownership of a directory the tool created must survive
    /// the manifest rewrite for uninstall to remove it.
    pub fn carry_dirs_from(&mut self, prior: &Self) {
        let mut merged: Vec<Entry> = prior
            .entries
            .iter()
            .filter(|e| e.kind == EntryKind::Dir)
            .filter(|e| !self.entries.iter().any(|n| n.path == e.path))
            .cloned()
            .collect();
        merged.append(&mut self.entries);
        self.entries = merged;
    }

    /// Parse a manifest from its text form.
    ///
    /// # Errors
    ///
    /// Returns an error if a section header is missing, a `[files]` line is
    /// malformed, or the metadata names an unknown install method.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        #[derive(PartialEq)]
        enum Section {
            None,
            Metadata,
            Files,
        }

        let mut section = Section::None;
        let mut saw_metadata = false;
        let mut saw_files = false;

        let mut version = String::new();
        let mut method: Option<Method> = None;
        let mut timestamp = String::new();
        let mut source = PathBuf::new();
        let mut entries = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line {
                "[metadata]" => {
                    section = Section::Metadata;
                    saw_metadata = true;
                    continue;
                }
                "[files]" => {
                    section = Section::Files;
                    saw_files = true;
                    continue;
                }
                _ => {}
            }

            match section {
                Section::Metadata => {
                    let Some((key, value)) = line.split_once('=') else {
                        return Err(ManifestError::InvalidEntry {
                            line: line.to_string(),
                            reason: "expected key=value".to_string(),
                        });
                    };
                    match key {
                        "version" => version = value.to_string(),
                        "method" => method = Some(value.parse()?),
                        "timestamp" => timestamp = value.to_string(),
                        "source" => source = PathBuf::from(value),
                        // Unknown keys are ignored for forward compatibility
                        _ => {}
                    }
                }
                Section::Files => {
                    let Some((kind, path, entry_source)) = split_entry(line) else {
                        return Err(ManifestError::InvalidEntry {
                            line: line.to_string(),
                            reason: "expected kind:path:source".to_string(),
                        });
                    };
                    if path.is_empty() {
                        return Err(ManifestError::InvalidEntry {
                            line: line.to_string(),
                            reason: "empty path".to_string(),
                        });
                    }
                    entries.push(Entry {
                        kind: kind.parse()?,
                        path: PathBuf::from(path),
                        source: if entry_source.is_empty() {
                            None
                        } else {
                            Some(PathBuf::from(entry_source))
                        },
                    });
                }
                Section::None => {
                    return Err(ManifestError::InvalidEntry {
                        line: line.to_string(),
                        reason: "content before any section header".to_string(),
                    });
                }
            }
        }

        if !saw_metadata {
            return Err(ManifestError::MissingSection("metadata".to_string()));
        }
        if !saw_files {
            return Err(ManifestError::MissingSection("files".to_string()));
        }
        let Some(method) = method else {
            return Err(ManifestError::InvalidEntry {
                line: "[metadata]".to_string(),
                reason: "missing method key".to_string(),
            });
        };

        Ok(Self {
            version,
            method,
            timestamp,
            source,
            entries,
        })
    }

    /// Load and parse the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Write the manifest to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        std::fs::write(path, self.render()).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
