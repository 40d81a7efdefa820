use super::object::{ObjectId, ObjectType};
use super::wstream::WriteStream;
use crate::core::{Result, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Object storage pluggable into the object database.
///
/// `write` is the single atomic commit point: an object either becomes fully
/// visible to `read`/`exists` or not at all. Streaming writes go through a
/// [`WriteStream`], which calls `write` exactly once on finalize.
pub trait OdbBackend {
    fn read(&self, id: &ObjectId) -> Result<(ObjectType, Vec<u8>)>;

    fn exists(&self, id: &ObjectId) -> bool;

    fn write(&mut self, id: &ObjectId, data: &[u8], otype: ObjectType) -> Result<()>;
}

/// Optional capability: backends with their own streaming-write
/// implementation receive raw chunks and assemble them themselves instead of
/// going through the generic buffering wrapper.
///
/// Whether a backend carries this capability is decided once, when it is
/// registered with [`ObjectDb`](super::wstream::ObjectDb) — not per call.
pub trait StreamingOdbBackend: OdbBackend + Sized {
    /// Opens this backend's own write stream over the shared handle.
    fn open_wstream(
        backend: &Arc<Mutex<Self>>,
        declared_size: usize,
        otype: ObjectType,
    ) -> Result<Box<dyn WriteStream>>;
}

/// In-memory object store keyed by content id.
///
/// An explicit handle owned (or shared) by its consumers; there is no
/// process-wide session store behind it.
#[derive(Debug, Default)]
pub struct MemoryOdb {
    objects: HashMap<ObjectId, (ObjectType, Vec<u8>)>,
}

impl MemoryOdb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.keys().copied().collect()
    }
}

impl OdbBackend for MemoryOdb {
    fn read(&self, id: &ObjectId) -> Result<(ObjectType, Vec<u8>)> {
        self.objects
            .get(id)
            .map(|(otype, data)| (*otype, data.clone()))
            .ok_or_else(|| StoreError::ObjectNotFound(id.to_hex()))
    }

    fn exists(&self, id: &ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    fn write(&mut self, id: &ObjectId, data: &[u8], otype: ObjectType) -> Result<()> {
        self.objects.insert(*id, (otype, data.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_odb_write_then_read() {
        let mut odb = MemoryOdb::new();
        let id = ObjectId::for_object(ObjectType::Blob, b"content");
        odb.write(&id, b"content", ObjectType::Blob).unwrap();

        assert!(odb.exists(&id));
        let (otype, data) = odb.read(&id).unwrap();
        assert_eq!(otype, ObjectType::Blob);
        assert_eq!(data, b"content");
    }

    #[test]
    fn test_memory_odb_missing_object() {
        let odb = MemoryOdb::new();
        let id = ObjectId::for_object(ObjectType::Blob, b"absent");
        assert!(!odb.exists(&id));
        assert!(matches!(
            odb.read(&id).unwrap_err(),
            StoreError::ObjectNotFound(_)
        ));
    }
}
