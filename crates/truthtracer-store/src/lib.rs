pub mod storage;
pub mod store;

pub use storage::{FileStorage, MemoryStorage, Storage, StorageError, UnavailableStorage};
pub use store::{LocalResultStore, ResultStore, MAX_SAVED_RESULTS, RESULTS_KEY};
