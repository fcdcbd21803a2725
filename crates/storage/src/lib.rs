mod store_trait;
mod in_memory;

#[cfg(feature = "rocksdb")]
mod rocksdb_impl;

pub use store_trait::{ObservationStore, StorageError};
pub use in_memory::InMemoryStore;

#[cfg(feature = "rocksdb")]
pub use rocksdb_impl::RocksDbStore;
