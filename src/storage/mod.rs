pub mod gateway;
pub mod kv;
pub mod repository;

pub use gateway::{PersistenceGateway, TODOS_KEY};
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use repository::{Latency, TodoRepository};
