use std::sync::RwLock;

use filwatch_types::{BlockObservation, ObservationBatch};

use crate::store_trait::{ObservationStore, StorageError};

/// Keeps every appended batch in memory, one entry per `append_batch` call.
///
/// Used when no durable backend is configured, and by tests that need to
/// inspect exactly what the core persisted.
pub struct InMemoryStore {
    batches: RwLock<Vec<ObservationBatch>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            batches: RwLock::new(Vec::new()),
        }
    }

    /// All batches appended so far, in append order.
    pub fn batches(&self) -> Vec<ObservationBatch> {
        self.batches.read().unwrap().clone()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.read().unwrap().len()
    }
}

impl ObservationStore for InMemoryStore {
    fn append_batch(&self, batch: &[BlockObservation]) -> Result<(), StorageError> {
        let mut batches = self.batches.write().unwrap();
        batches.push(batch.to_vec());
        Ok(())
    }

    fn observation_count(&self) -> Result<u64, StorageError> {
        let batches = self.batches.read().unwrap();
        Ok(batches.iter().map(|b| b.len() as u64).sum())
    }

    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
