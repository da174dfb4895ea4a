mod pool;
mod sqlite_store;

pub use pool::{create_read_pool, create_write_pool};
pub use sqlite_store::SqliteStore;
