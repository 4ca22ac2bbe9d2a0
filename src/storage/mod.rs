//! Storage implementations for different backends

pub mod in_memory;
pub mod json_file;
#[cfg(feature = "lmdb")]
pub mod lmdb;
pub mod repository;

pub use in_memory::InMemoryStorage;
pub use json_file::JsonFileStorage;
#[cfg(feature = "lmdb")]
pub use lmdb::LmdbStorage;
pub use repository::LocationRepository;
