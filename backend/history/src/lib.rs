pub mod persist;
pub mod store;

pub use persist::{HistoryPersistence, InMemoryStore, JsonFileStore};
pub use store::{HistoryStore, HISTORY_CAP};
