//! File-backed config backend: one `config.<ext>` file per instance under
//! the repository metadata directory, rewritten wholesale on every flush.

use super::plugin::ConfigBackend;
use crate::core::{ConfigEntry, Level, RepoHandle, Result, StoreError};
use crate::store::entries::EntryMap;
use crate::store::multivar;
use crate::store::persistence::{self, Format, WriteGate};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct FileConfigBackend {
    level: Level,
    entries: EntryMap,
    format: Format,
    path: Option<PathBuf>,
    file: Option<File>,
    gate: WriteGate,
    readonly: bool,
    cursor: Option<std::vec::IntoIter<ConfigEntry>>,
}

impl FileConfigBackend {
    /// Backend persisting in the default format. Holds no data until
    /// [`open`](Self::open).
    pub fn new() -> Self {
        Self::with_format(Format::default())
    }

    pub fn with_format(format: Format) -> Self {
        Self {
            level: Level::default(),
            entries: EntryMap::new(),
            format,
            path: None,
            file: None,
            gate: WriteGate::new(),
            readonly: false,
            cursor: None,
        }
    }

    /// Binds the backend to the repository's metadata directory and loads
    /// the persisted store. Skipped entirely for read-only backends and for
    /// handles without a location — the backend then operates purely in
    /// memory.
    pub fn open(&mut self, level: Level, repo: &RepoHandle) -> Result<()> {
        if self.readonly {
            return Ok(());
        }
        let Some(dir) = repo.metadata_dir() else {
            self.level = level;
            return Ok(());
        };

        let path = dir.join(format!("config.{}", self.format.extension()));
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)
            .map_err(|e| {
                StoreError::Io(format!("Failed to open config file '{}': {}", path.display(), e))
            })?;

        self.level = level;
        self.file = Some(file);
        self.path = Some(path);
        self.read_in()
    }

    fn read_in(&mut self) -> Result<()> {
        self.entries = EntryMap::new();
        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };
        let bytes = persistence::read_all(file)?;
        if bytes.is_empty() {
            return Ok(());
        }
        match self.format.decode(&bytes) {
            Ok(entries) => {
                debug!(keys = entries.len(), "loaded config store");
                self.entries = entries;
            }
            // Recovered locally: a corrupt backing file yields an empty
            // store, not an error.
            Err(err) => warn!("Discarding malformed config store: {}", err),
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<ConfigEntry> {
        let value = self
            .entries
            .first(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        Ok(ConfigEntry {
            name: name.to_string(),
            value: value.to_string(),
            level: self.level.clone(),
        })
    }

    pub fn get_all(&self, name: &str) -> Result<Vec<String>> {
        self.entries
            .all(name)
            .map(<[String]>::to_vec)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        self.entries.set_all(name, vec![value.to_string()]);
        self.write_out()
    }

    pub fn set_multivar(&mut self, name: &str, pattern: Option<&str>, value: &str) -> Result<()> {
        self.check_writable()?;
        multivar::set_multivar(&mut self.entries, name, pattern, value)?;
        self.write_out()
    }

    pub fn del(&mut self, name: &str) -> Result<()> {
        self.check_writable()?;
        if self.entries.remove(name).is_none() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        self.write_out()
    }

    pub fn del_multivar(&mut self, name: &str, pattern: Option<&str>) -> Result<()> {
        self.check_writable()?;
        multivar::del_multivar(&mut self.entries, name, pattern)?;
        self.write_out()
    }

    /// Captures the current entries as the basis of a new iteration. The
    /// capture is by value: writes made after this call do not show up in
    /// the running iteration.
    pub fn iterator_new(&mut self) {
        let level = self.level.clone();
        let captured: Vec<ConfigEntry> = self
            .entries
            .iter()
            .filter_map(|(name, values)| {
                values.first().map(|value| ConfigEntry {
                    name: name.to_string(),
                    value: value.clone(),
                    level: level.clone(),
                })
            })
            .collect();
        self.cursor = Some(captured.into_iter());
    }

    pub fn iterator_next(&mut self) -> Option<ConfigEntry> {
        self.cursor.as_mut()?.next()
    }

    /// Read-only deep copy of the current store. The copy shares no mutable
    /// state with this backend: no file handle, no pending buffer, no
    /// cursor. Every mutation on it fails with `ReadOnlySnapshot`.
    pub fn snapshot(&self) -> FileConfigBackend {
        FileConfigBackend {
            level: self.level.clone(),
            entries: self.entries.clone(),
            format: self.format,
            path: None,
            file: None,
            gate: WriteGate::new(),
            readonly: true,
            cursor: None,
        }
    }

    /// Defers persistence of subsequent writes until `unlock`. Idempotent.
    pub fn lock(&mut self) {
        self.gate.lock();
    }

    /// Flushes the image buffered since `lock`, if any write happened, and
    /// resumes immediate persistence. Leaves the backing file untouched
    /// otherwise.
    pub fn unlock(&mut self) -> Result<()> {
        if let Some(image) = self.gate.unlock() {
            debug!(bytes = image.len(), "flushing writes buffered while locked");
            self.flush(&image)?;
        }
        Ok(())
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn is_locked(&self) -> bool {
        self.gate.is_locked()
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of keys currently in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_writable(&self) -> Result<()> {
        if self.readonly {
            return Err(StoreError::ReadOnlySnapshot);
        }
        Ok(())
    }

    // Serializes the full store after every mutation. The store itself is
    // already updated in memory at this point: a flush failure leaves store
    // and backing file divergent until the next successful write.
    fn write_out(&mut self) -> Result<()> {
        let image = self.format.encode(&self.entries)?;
        if let Some(image) = self.gate.submit(image) {
            self.flush(&image)?;
        }
        Ok(())
    }

    fn flush(&mut self, image: &[u8]) -> Result<()> {
        if let Some(file) = self.file.as_mut() {
            persistence::rewrite(file, image)?;
        }
        Ok(())
    }
}

impl Default for FileConfigBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBackend for FileConfigBackend {
    fn open(&mut self, level: Level, repo: &RepoHandle) -> Result<()> {
        FileConfigBackend::open(self, level, repo)
    }

    fn get(&self, name: &str) -> Result<ConfigEntry> {
        FileConfigBackend::get(self, name)
    }

    fn get_all(&self, name: &str) -> Result<Vec<String>> {
        FileConfigBackend::get_all(self, name)
    }

    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        FileConfigBackend::set(self, name, value)
    }

    fn set_multivar(&mut self, name: &str, pattern: Option<&str>, value: &str) -> Result<()> {
        FileConfigBackend::set_multivar(self, name, pattern, value)
    }

    fn del(&mut self, name: &str) -> Result<()> {
        FileConfigBackend::del(self, name)
    }

    fn del_multivar(&mut self, name: &str, pattern: Option<&str>) -> Result<()> {
        FileConfigBackend::del_multivar(self, name, pattern)
    }

    fn iterator_new(&mut self) {
        FileConfigBackend::iterator_new(self)
    }

    fn iterator_next(&mut self) -> Option<ConfigEntry> {
        FileConfigBackend::iterator_next(self)
    }

    fn snapshot(&self) -> Result<Box<dyn ConfigBackend>> {
        Ok(Box::new(FileConfigBackend::snapshot(self)))
    }

    fn lock(&mut self) {
        FileConfigBackend::lock(self)
    }

    fn unlock(&mut self) -> Result<()> {
        FileConfigBackend::unlock(self)
    }
}
