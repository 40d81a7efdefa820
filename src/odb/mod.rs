// ============================================================================
// Object-Store Write-Stream Contract
// ============================================================================
//
// The object-database layer hands every pluggable backend the same streaming
// write lifecycle. Backends that do not implement streaming themselves get a
// generic wrapper that buffers chunks and commits in a single atomic write;
// backends that do implement it assemble raw chunks on their own. Either
// way, no partial object is ever visible until finalize completes.

pub mod backend;
pub mod object;
pub mod wstream;

pub use backend::{MemoryOdb, OdbBackend, StreamingOdbBackend};
pub use object::{ObjectId, ObjectType};
pub use wstream::{BufferedWriteStream, ObjectDb, WriteStream};
