//! Streaming-write lifecycle shared by all pluggable object backends:
//! `open_wstream` → repeated `write` → `finalize_write` → `free`.

use super::backend::{OdbBackend, StreamingOdbBackend};
use super::object::{ObjectId, ObjectType};
use crate::core::{Result, StoreError};
use std::sync::{Arc, Mutex};

/// Streaming write handle into an object backend.
///
/// Chunks may be written repeatedly; `finalize_write` verifies the declared
/// size and the expected content id, then commits the object in a single
/// backend `write`. Nothing is observable via `read`/`exists` before
/// finalize returns. `free` consumes the stream — exactly once, after
/// finalize or on abandonment.
pub trait WriteStream {
    fn write(&mut self, chunk: &[u8]) -> Result<()>;

    fn finalize_write(&mut self, expected: &ObjectId) -> Result<()>;

    fn free(self: Box<Self>);
}

/// Generic write stream handed to backends without their own streaming
/// implementation: accumulates written bytes in memory and performs one
/// atomic backend `write` on finalize.
pub struct BufferedWriteStream {
    backend: Arc<Mutex<dyn OdbBackend>>,
    otype: ObjectType,
    declared_size: usize,
    buf: Vec<u8>,
    finalized: bool,
}

impl BufferedWriteStream {
    pub(crate) fn new(
        backend: Arc<Mutex<dyn OdbBackend>>,
        declared_size: usize,
        otype: ObjectType,
    ) -> Self {
        Self {
            backend,
            otype,
            declared_size,
            buf: Vec::with_capacity(declared_size),
            finalized: false,
        }
    }
}

impl WriteStream for BufferedWriteStream {
    fn write(&mut self, chunk: &[u8]) -> Result<()> {
        if self.finalized {
            return Err(StoreError::StreamFinalized);
        }
        self.buf.extend_from_slice(chunk);
        Ok(())
    }

    fn finalize_write(&mut self, expected: &ObjectId) -> Result<()> {
        if self.finalized {
            return Err(StoreError::StreamFinalized);
        }
        if self.buf.len() != self.declared_size {
            return Err(StoreError::SizeMismatch {
                declared: self.declared_size,
                actual: self.buf.len(),
            });
        }
        let actual = ObjectId::for_object(self.otype, &self.buf);
        if actual != *expected {
            return Err(StoreError::IdMismatch {
                expected: expected.to_hex(),
                actual: actual.to_hex(),
            });
        }
        self.backend.lock()?.write(&actual, &self.buf, self.otype)?;
        self.finalized = true;
        Ok(())
    }

    fn free(self: Box<Self>) {}
}

type StreamFactory = Box<dyn Fn(usize, ObjectType) -> Result<Box<dyn WriteStream>>>;

struct BackendSlot {
    backend: Arc<Mutex<dyn OdbBackend>>,
    open_stream: StreamFactory,
}

/// Object-database front: owns the registered backends and hands out write
/// streams.
///
/// Whether a backend gets the generic buffering wrapper or supplies its own
/// stream is decided once at registration, by which `add_*` method it came
/// in through. Streams open against the first registered backend; reads
/// consult backends in registration order.
pub struct ObjectDb {
    slots: Vec<BackendSlot>,
}

impl ObjectDb {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Registers a backend without streaming support. Its write streams are
    /// [`BufferedWriteStream`] wrappers. Returns the shared handle for
    /// direct access.
    pub fn add_backend<B: OdbBackend + 'static>(&mut self, backend: B) -> Arc<Mutex<B>> {
        let shared = Arc::new(Mutex::new(backend));
        let handle: Arc<Mutex<dyn OdbBackend>> = shared.clone();
        let stream_target = handle.clone();
        self.slots.push(BackendSlot {
            backend: handle,
            open_stream: Box::new(move |declared_size, otype| {
                Ok(Box::new(BufferedWriteStream::new(
                    stream_target.clone(),
                    declared_size,
                    otype,
                )))
            }),
        });
        shared
    }

    /// Registers a backend that supplies its own write streams; it receives
    /// raw chunks and assembles them itself.
    pub fn add_streaming_backend<B: StreamingOdbBackend + 'static>(
        &mut self,
        backend: B,
    ) -> Arc<Mutex<B>> {
        let shared = Arc::new(Mutex::new(backend));
        let handle: Arc<Mutex<dyn OdbBackend>> = shared.clone();
        let stream_source = shared.clone();
        self.slots.push(BackendSlot {
            backend: handle,
            open_stream: Box::new(move |declared_size, otype| {
                B::open_wstream(&stream_source, declared_size, otype)
            }),
        });
        shared
    }

    pub fn backend_count(&self) -> usize {
        self.slots.len()
    }

    /// Opens a write stream for an object of `declared_size` bytes.
    pub fn open_wstream(
        &self,
        declared_size: usize,
        otype: ObjectType,
    ) -> Result<Box<dyn WriteStream>> {
        let slot = self
            .slots
            .first()
            .ok_or_else(|| StoreError::Io("No object backend registered".to_string()))?;
        (slot.open_stream)(declared_size, otype)
    }

    pub fn read(&self, id: &ObjectId) -> Result<(ObjectType, Vec<u8>)> {
        for slot in &self.slots {
            match slot.backend.lock()?.read(id) {
                Ok(found) => return Ok(found),
                Err(StoreError::ObjectNotFound(_)) => continue,
                Err(err) => return Err(err),
            }
        }
        Err(StoreError::ObjectNotFound(id.to_hex()))
    }

    pub fn exists(&self, id: &ObjectId) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.backend.lock().map(|b| b.exists(id)).unwrap_or(false))
    }
}

impl Default for ObjectDb {
    fn default() -> Self {
        Self::new()
    }
}
