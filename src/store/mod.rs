//! Persistence layer: the remote table store the planner mirrors.

pub mod libsql_backend;
pub mod memory;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use memory::{MemoryStore, StoreCall};
pub use traits::RemoteStore;
