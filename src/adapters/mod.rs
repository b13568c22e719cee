//! Adapters for external collaborators of the user-data service.

pub mod cache;
pub mod legacy;
pub mod sqlite;
