//! Domain layer for the tripkit user-data service.
//!
//! This module contains core models, the error taxonomy, and the port traits
//! that persistence adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{UserDataError, UserDataResult};
