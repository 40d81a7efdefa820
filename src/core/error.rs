use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Config entry '{0}' not found")]
    NotFound(String),

    #[error("Cannot modify a snapshot config")]
    ReadOnlySnapshot,

    #[error("Invalid value pattern: {0}")]
    Pattern(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Lock error: {0}")]
    Lock(String),

    #[error("Object '{0}' not found")]
    ObjectNotFound(String),

    #[error("Object size mismatch: declared {declared}, wrote {actual}")]
    SizeMismatch { declared: usize, actual: usize },

    #[error("Object id mismatch: expected {expected}, computed {actual}")]
    IdMismatch { expected: String, actual: String },

    #[error("Write stream already finalized")]
    StreamFinalized,
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Lock(err.to_string())
    }
}
