use std::path::Path;
use std::sync::{Arc, Mutex};

use filwatch_types::BlockObservation;
use rocksdb::{ColumnFamilyDescriptor, Options, WriteBatch, DB};

use crate::store_trait::{ObservationStore, StorageError};

const CF_OBSERVATIONS: &str = "observations";
const CF_METADATA: &str = "metadata";

const KEY_NEXT_SEQ: &[u8] = b"next_seq";

/// Durable observation history keyed by a monotonically increasing sequence
/// number, so iteration order equals append order.
///
/// Appends are serialized by the cursor lock: concurrent cycles may each
/// persist a batch, and the stored cursor never moves backwards. Every record
/// consumes exactly one sequence number, so the cursor doubles as the
/// observation count.
pub struct RocksDbStore {
    db: Arc<DB>,
    next_seq: Mutex<u64>,
}

impl RocksDbStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = vec![
            ColumnFamilyDescriptor::new(CF_OBSERVATIONS, Options::default()),
            ColumnFamilyDescriptor::new(CF_METADATA, Options::default()),
        ];

        let db = DB::open_cf_descriptors(&opts, path, cfs)
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        let next_seq = {
            let cf = db
                .cf_handle(CF_METADATA)
                .ok_or_else(|| StorageError::DatabaseError("CF_METADATA not found".to_string()))?;
            match db
                .get_cf(cf, KEY_NEXT_SEQ)
                .map_err(|e| StorageError::DatabaseError(e.to_string()))?
            {
                Some(bytes) => Self::decode_u64(&bytes)?,
                None => 0,
            }
        };

        Ok(Self {
            db: Arc::new(db),
            next_seq: Mutex::new(next_seq),
        })
    }

    fn encode_u64(value: u64) -> [u8; 8] {
        // Big-endian so lexicographic key order matches numeric order.
        value.to_be_bytes()
    }

    fn decode_u64(bytes: &[u8]) -> Result<u64, StorageError> {
        if bytes.len() != 8 {
            return Err(StorageError::DeserializationFailed);
        }
        let mut arr = [0u8; 8];
        arr.copy_from_slice(bytes);
        Ok(u64::from_be_bytes(arr))
    }
}

impl ObservationStore for RocksDbStore {
    fn append_batch(&self, batch: &[BlockObservation]) -> Result<(), StorageError> {
        let cf = self
            .db
            .cf_handle(CF_OBSERVATIONS)
            .ok_or_else(|| StorageError::DatabaseError("CF_OBSERVATIONS not found".to_string()))?;
        let metadata_cf = self
            .db
            .cf_handle(CF_METADATA)
            .ok_or_else(|| StorageError::DatabaseError("CF_METADATA not found".to_string()))?;

        let mut next_seq = self.next_seq.lock().unwrap();
        let first_seq = *next_seq;

        // One WriteBatch per observation batch: the records and the cursor
        // commit together or not at all.
        let mut write_batch = WriteBatch::default();
        for (index, observation) in batch.iter().enumerate() {
            let key = Self::encode_u64(first_seq + index as u64);
            let value =
                bincode::serialize(observation).map_err(|_| StorageError::SerializationFailed)?;
            write_batch.put_cf(cf, key, value);
        }
        write_batch.put_cf(
            metadata_cf,
            KEY_NEXT_SEQ,
            Self::encode_u64(first_seq + batch.len() as u64),
        );

        self.db
            .write(write_batch)
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        // Only advance the in-memory cursor once the write landed, so a
        // failed batch reuses its sequence range.
        *next_seq = first_seq + batch.len() as u64;

        Ok(())
    }

    fn observation_count(&self) -> Result<u64, StorageError> {
        let cf = self
            .db
            .cf_handle(CF_METADATA)
            .ok_or_else(|| StorageError::DatabaseError("CF_METADATA not found".to_string()))?;

        match self
            .db
            .get_cf(cf, KEY_NEXT_SEQ)
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?
        {
            Some(bytes) => Self::decode_u64(&bytes),
            None => Ok(0),
        }
    }

    fn flush(&self) -> Result<(), StorageError> {
        self.db
            .flush()
            .map_err(|e| StorageError::DatabaseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn observation(producer_id: &str, height: u64) -> BlockObservation {
        BlockObservation {
            producer_id: producer_id.to_string(),
            observed_at: Utc::now(),
            is_watched: false,
            height,
        }
    }

    #[test]
    fn append_advances_count_by_batch_size() {
        let dir = TempDir::new().unwrap();
        let store = RocksDbStore::open(dir.path()).unwrap();

        assert_eq!(store.observation_count().unwrap(), 0);

        store
            .append_batch(&[observation("f019806", 100), observation("f099999", 100)])
            .unwrap();
        store.append_batch(&[observation("f019806", 101)]).unwrap();

        assert_eq!(store.observation_count().unwrap(), 3);
    }

    #[test]
    fn concurrent_appends_never_lose_counted_records() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(RocksDbStore::open(dir.path()).unwrap());

        let mut handles = Vec::new();
        for _ in 0..4 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                for height in 0..25u64 {
                    store
                        .append_batch(&[
                            observation("f019806", height),
                            observation("f099999", height),
                        ])
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // 4 writers x 25 batches x 2 records.
        assert_eq!(store.observation_count().unwrap(), 200);
    }

    #[test]
    fn count_survives_reopen() {
        let dir = TempDir::new().unwrap();

        {
            let store = RocksDbStore::open(dir.path()).unwrap();
            store.append_batch(&[observation("f019806", 100)]).unwrap();
            store.flush().unwrap();
        }

        let reopened = RocksDbStore::open(dir.path()).unwrap();
        assert_eq!(reopened.observation_count().unwrap(), 1);
        reopened.append_batch(&[observation("f019806", 101)]).unwrap();
        assert_eq!(reopened.observation_count().unwrap(), 2);
    }
}
