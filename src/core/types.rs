use std::fmt;
use std::path::{Path, PathBuf};

/// Priority/origin tag a backend is opened with ("local", "global", ...).
///
/// Opaque to the store: it is reported alongside every read result but never
/// used to dispatch storage. Each backend instance manages exactly one
/// level's worth of data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Level(String);

impl Level {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Level {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}

impl From<String> for Level {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single configuration reading: the entry name, one value, and the level
/// of the backend that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub name: String,
    pub value: String,
    pub level: Level,
}

/// Handle to the enclosing repository, supplying the metadata directory that
/// config backends persist under.
///
/// A handle without a directory makes `open` a no-op; the backend then has
/// no persistence and operates purely in memory.
#[derive(Debug, Clone, Default)]
pub struct RepoHandle {
    metadata_dir: Option<PathBuf>,
}

impl RepoHandle {
    /// Handle rooted at an on-disk repository metadata directory.
    pub fn at(metadata_dir: impl Into<PathBuf>) -> Self {
        Self {
            metadata_dir: Some(metadata_dir.into()),
        }
    }

    /// Handle with no backing location.
    pub fn in_memory() -> Self {
        Self { metadata_dir: None }
    }

    pub fn metadata_dir(&self) -> Option<&Path> {
        self.metadata_dir.as_deref()
    }
}
