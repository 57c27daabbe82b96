//! Adapters for the domain ports: payment stores and status listeners.

pub mod in_memory;
pub mod listeners;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
