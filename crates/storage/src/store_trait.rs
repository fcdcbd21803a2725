use std::fmt;

use filwatch_types::BlockObservation;

#[derive(Debug)]
pub enum StorageError {
    SerializationFailed,
    DeserializationFailed,
    DatabaseError(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::SerializationFailed => write!(f, "serialization failed"),
            StorageError::DeserializationFailed => write!(f, "deserialization failed"),
            StorageError::DatabaseError(msg) => write!(f, "database error: {}", msg),
        }
    }
}

/// Append-only sink for observation batches.
///
/// The core never reads history back; it only appends. A batch must be
/// written with a single bulk call so that it lands atomically-or-not-at-all
/// from the caller's perspective.
pub trait ObservationStore: Send + Sync {
    fn append_batch(&self, batch: &[BlockObservation]) -> Result<(), StorageError>;

    fn observation_count(&self) -> Result<u64, StorageError>;

    fn flush(&self) -> Result<(), StorageError>;
}
