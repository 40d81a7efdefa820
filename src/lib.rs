// ============================================================================
// ConfStore Library
// ============================================================================

//! Pluggable, persistent, multi-valued key-value configuration store.
//!
//! `confstore` implements a custom storage backend for a version-control
//! system's configuration subsystem: keys map to *ordered sequences* of
//! string values ("multivars"), selected and mutated by regular-expression
//! pattern, with read-only point-in-time snapshots and a lock/unlock
//! protocol that defers persistence until an explicit commit.
//!
//! # Examples
//!
//! ```
//! use confstore::{FileConfigBackend, Level, RepoHandle};
//!
//! # fn main() -> confstore::Result<()> {
//! let mut config = FileConfigBackend::new();
//! config.open(Level::from("local"), &RepoHandle::in_memory())?;
//!
//! config.set("core.bare", "false")?;
//! config.set_multivar("remote.origin.fetch", None, "+refs/heads/*")?;
//!
//! assert_eq!(config.get("core.bare")?.value, "false");
//! assert_eq!(config.get_all("remote.origin.fetch")?, vec!["+refs/heads/*"]);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod core;
pub mod odb;
pub mod store;

// Re-export main types for convenience
pub use backend::{ConfigBackend, FileConfigBackend};
pub use core::{ConfigEntry, Level, RepoHandle, Result, StoreError};
pub use odb::{
    BufferedWriteStream, MemoryOdb, ObjectDb, ObjectId, ObjectType, OdbBackend,
    StreamingOdbBackend, WriteStream,
};
pub use store::{EntryMap, Format, WriteGate};
