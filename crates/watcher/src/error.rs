use filwatch_storage::StorageError;
use thiserror::Error;

/// Failure kinds of one observation cycle. Each maps to exactly one stage:
/// reaching the chain-state service, interpreting its answer, or persisting
/// the result.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("chain RPC unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("malformed chain head response: {0}")]
    MalformedResponse(String),

    #[error("observation store rejected write: {0}")]
    PersistenceUnavailable(StorageError),
}

impl WatchError {
    /// Stable kind name for error payloads on the HTTP surface.
    pub fn kind(&self) -> &'static str {
        match self {
            WatchError::RemoteUnavailable(_) => "RemoteUnavailable",
            WatchError::MalformedResponse(_) => "MalformedResponse",
            WatchError::PersistenceUnavailable(_) => "PersistenceUnavailable",
        }
    }
}

impl From<StorageError> for WatchError {
    fn from(err: StorageError) -> Self {
        WatchError::PersistenceUnavailable(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable_names() {
        assert_eq!(
            WatchError::RemoteUnavailable("down".to_string()).kind(),
            "RemoteUnavailable"
        );
        assert_eq!(
            WatchError::MalformedResponse("bad".to_string()).kind(),
            "MalformedResponse"
        );
        assert_eq!(
            WatchError::PersistenceUnavailable(StorageError::SerializationFailed).kind(),
            "PersistenceUnavailable"
        );
    }

    #[test]
    fn persistence_message_is_readable_not_debug() {
        let err = WatchError::from(StorageError::DatabaseError("sink offline".to_string()));

        let message = err.to_string();
        assert_eq!(
            message,
            "observation store rejected write: database error: sink offline"
        );
        assert!(!message.contains("DatabaseError"));
    }
}
