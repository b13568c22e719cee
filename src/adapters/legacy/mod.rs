//! Read-only adapter over the legacy persistence format.

pub mod file_store;

pub use file_store::JsonFileLegacyStore;
