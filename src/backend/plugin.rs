use crate::core::{ConfigEntry, Level, RepoHandle, Result};

/// Config backend plugin contract — allows pluggable config storage engines.
///
/// This is the surface the enclosing configuration subsystem drives. All
/// operations are synchronous; mutations on a snapshot fail with
/// [`StoreError::ReadOnlySnapshot`](crate::StoreError::ReadOnlySnapshot).
pub trait ConfigBackend {
    /// Binds the backend to a repository at the given level and loads its
    /// persisted state. A no-op for read-only backends and for repository
    /// handles without a storage location.
    fn open(&mut self, level: Level, repo: &RepoHandle) -> Result<()>;

    /// First value of `name`, reported with the backend's level.
    fn get(&self, name: &str) -> Result<ConfigEntry>;

    /// Full ordered value sequence of `name`.
    fn get_all(&self, name: &str) -> Result<Vec<String>>;

    /// Replaces the entire value sequence of `name` with `[value]`.
    fn set(&mut self, name: &str, value: &str) -> Result<()>;

    /// Replaces every value matching `pattern` with `value`, appending when
    /// nothing matched. `None` matches every value.
    fn set_multivar(&mut self, name: &str, pattern: Option<&str>, value: &str) -> Result<()>;

    /// Removes `name` and its whole value sequence.
    fn del(&mut self, name: &str) -> Result<()>;

    /// Removes every value of `name` matching `pattern`; the key goes away
    /// when no value survives.
    fn del_multivar(&mut self, name: &str, pattern: Option<&str>) -> Result<()>;

    /// Captures the current entries as the basis of a new iteration.
    fn iterator_new(&mut self);

    /// Next entry of the captured basis, or `None` once exhausted — or
    /// immediately, if no iteration was started.
    fn iterator_next(&mut self) -> Option<ConfigEntry>;

    /// Read-only point-in-time copy sharing no mutable state with this
    /// backend.
    fn snapshot(&self) -> Result<Box<dyn ConfigBackend>>;

    /// Defers persistence of subsequent writes until `unlock`. Idempotent.
    fn lock(&mut self);

    /// Flushes writes buffered since `lock`, if any, and resumes immediate
    /// persistence.
    fn unlock(&mut self) -> Result<()>;
}
