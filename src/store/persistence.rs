//! On-disk codec and deferred-flush coordination for the config store.

use super::entries::EntryMap;
use crate::core::{Result, StoreError};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

// ============================================================================
// Serialization Format
// ============================================================================

/// Serialization format of the backing file. Selects the codec and the
/// extension used in the `config.<ext>` path derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Compact MessagePack (default).
    #[default]
    MessagePack,
    /// Human-readable JSON.
    Json,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::MessagePack => "msgpack",
            Self::Json => "json",
        }
    }

    /// Serializes the full store into one contiguous image.
    pub fn encode(&self, entries: &EntryMap) -> Result<Vec<u8>> {
        match self {
            Self::MessagePack => rmp_serde::to_vec(entries)
                .map_err(|e| StoreError::Serialization(format!("Failed to serialize config: {}", e))),
            Self::Json => serde_json::to_vec(entries)
                .map_err(|e| StoreError::Serialization(format!("Failed to serialize config: {}", e))),
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<EntryMap> {
        match self {
            Self::MessagePack => rmp_serde::from_slice(bytes).map_err(|e| {
                StoreError::Serialization(format!("Failed to deserialize config: {}", e))
            }),
            Self::Json => serde_json::from_slice(bytes).map_err(|e| {
                StoreError::Serialization(format!("Failed to deserialize config: {}", e))
            }),
        }
    }
}

// ============================================================================
// Write Gate
// ============================================================================

/// Gates whether serialized store images reach the backing file immediately
/// or wait in a pending buffer until `unlock`.
///
/// While locked, each submitted image overwrites the previous one — the file
/// only ever sees a full, final image, never an intermediate one.
#[derive(Debug, Default)]
pub struct WriteGate {
    locked: bool,
    pending: Option<Vec<u8>>,
}

impl WriteGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts buffering writes. Idempotent.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Stops buffering and drains the pending image, if any write happened
    /// while locked. A no-op on an unlocked gate.
    pub fn unlock(&mut self) -> Option<Vec<u8>> {
        self.locked = false;
        self.pending.take()
    }

    /// Routes a freshly serialized image: buffered while locked, handed back
    /// for immediate flush otherwise.
    pub fn submit(&mut self, image: Vec<u8>) -> Option<Vec<u8>> {
        if self.locked {
            self.pending = Some(image);
            None
        } else {
            Some(image)
        }
    }
}

// ============================================================================
// Backing File Access
// ============================================================================

/// Rewrites `file` wholesale with `image`, truncating any stale tail left by
/// a longer previous payload.
pub(crate) fn rewrite(file: &mut File, image: &[u8]) -> Result<()> {
    file.seek(SeekFrom::Start(0))
        .map_err(|e| StoreError::Io(format!("Failed to seek config file: {}", e)))?;
    file.write_all(image)
        .map_err(|e| StoreError::Io(format!("Failed to write config file: {}", e)))?;
    file.set_len(image.len() as u64)
        .map_err(|e| StoreError::Io(format!("Failed to truncate config file: {}", e)))?;
    Ok(())
}

pub(crate) fn read_all(file: &mut File) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    file.seek(SeekFrom::Start(0))
        .map_err(|e| StoreError::Io(format!("Failed to seek config file: {}", e)))?;
    file.read_to_end(&mut bytes)
        .map_err(|e| StoreError::Io(format!("Failed to read config file: {}", e)))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EntryMap {
        let mut map = EntryMap::new();
        map.set_all("core.bare", vec!["false".to_string()]);
        map.set_all(
            "remote.origin.fetch",
            vec!["+refs/heads/*".to_string(), "+refs/tags/*".to_string()],
        );
        map
    }

    #[test]
    fn test_messagepack_round_trip() {
        let map = sample();
        let bytes = Format::MessagePack.encode(&map).unwrap();
        assert_eq!(Format::MessagePack.decode(&bytes).unwrap(), map);
    }

    #[test]
    fn test_json_round_trip() {
        let map = sample();
        let bytes = Format::Json.encode(&map).unwrap();
        assert_eq!(Format::Json.decode(&bytes).unwrap(), map);
    }

    #[test]
    fn test_decode_rejects_non_mapping_payload() {
        assert!(Format::MessagePack.decode(b"not a mapping").is_err());
        assert!(Format::Json.decode(b"{\"scalar\":true}").is_err());
    }

    #[test]
    fn test_gate_passes_through_while_unlocked() {
        let mut gate = WriteGate::new();
        assert_eq!(gate.submit(vec![1, 2]), Some(vec![1, 2]));
        assert!(!gate.has_pending());
    }

    #[test]
    fn test_gate_buffers_last_image_while_locked() {
        let mut gate = WriteGate::new();
        gate.lock();
        gate.lock(); // idempotent
        assert_eq!(gate.submit(vec![1]), None);
        assert_eq!(gate.submit(vec![2]), None);
        assert_eq!(gate.unlock(), Some(vec![2]));
        assert!(!gate.is_locked());
    }

    #[test]
    fn test_unlock_without_writes_drains_nothing() {
        let mut gate = WriteGate::new();
        gate.lock();
        assert_eq!(gate.unlock(), None);
        // unlocking an unlocked gate is a no-op
        assert_eq!(gate.unlock(), None);
    }

    #[test]
    fn test_rewrite_truncates_stale_tail() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("store.bin");
        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)
            .unwrap();

        rewrite(&mut file, b"a longer first payload").unwrap();
        rewrite(&mut file, b"short").unwrap();
        assert_eq!(read_all(&mut file).unwrap(), b"short");
    }
}
