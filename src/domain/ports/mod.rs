//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces the persistence adapters implement:
//! - `UserDataRepository`: structured per-entity CRUD on the local store
//! - `InteractionRepository`: durable user-authored / pre-filled flags
//! - `LegacyStore`: read-only access to the pre-structured persistence format
//!
//! These traits keep the services independent of the concrete storage, and
//! let tests swap in fresh in-memory instances per case.

pub mod interaction_repository;
pub mod legacy_store;
pub mod user_data_repository;

pub use interaction_repository::InteractionRepository;
pub use legacy_store::LegacyStore;
pub use user_data_repository::UserDataRepository;
