//! Product stores for the Lodestone inventory.

pub mod memory;
pub mod mysql;

pub use lodestone_core::{ReadRepository, Repository, StorageError};
pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
