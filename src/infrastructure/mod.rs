//! Adapters implementing the domain ports.

pub mod file_config;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod sandbox;
