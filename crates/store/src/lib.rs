//! Persistent point-of-sale store.
//!
//! Owns the two persisted collections (products, sales) as JSON blobs behind
//! an injectable [`StorageBackend`]. Every write replaces a whole collection
//! blob (last-writer-wins), so no torn state is observable in-process. After
//! each successful mutation the store publishes a [`StoreEvent`]; presentation
//! layers subscribe and re-pull snapshots.

pub mod backend;
pub mod event;
pub mod file_backend;
pub mod seed;
pub mod store;

pub use backend::{InMemoryBackend, StorageBackend, StorageError};
pub use event::StoreEvent;
pub use file_backend::FileBackend;
pub use store::{Store, StoreError};
