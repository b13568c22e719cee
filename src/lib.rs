//! Tripkit - Local Traveler-Profile Data Service
//!
//! Tripkit persists, caches, migrates, and scores a traveler's profile data
//! on-device: passport, personal info, fund items, and per-destination travel
//! info. Screens read one consistent snapshot; edits flow back through
//! debounced or immediate write paths that keep the cache coherent.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure models, error taxonomy, and port traits
//! - **Adapters** (`adapters`): SQLite persistence, legacy-blob reader, cache
//! - **Service Layer** (`services`): User data façade, migration runner,
//!   interaction tracker, validation and completion engines
//! - **Infrastructure** (`infrastructure`): Configuration and logging setup

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{UserDataError, UserDataResult};
pub use domain::models::{
    CompletionSnapshot, Config, DestinationConfig, EntityKind, FieldKey, FundItem, FundItemType,
    PassportRecord, PersonalInfo, TravelInfo, UserDataSnapshot, UserId,
};
pub use domain::ports::{InteractionRepository, LegacyStore, UserDataRepository};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    AutosaveScheduler, InteractionTracker, MigrationOutcome, MigrationRunner, UserDataService,
};
