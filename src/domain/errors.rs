//! Domain errors for the tripkit user-data service.

use thiserror::Error;
use uuid::Uuid;

/// Domain-level errors that can occur in the tripkit system.
///
/// Only `StoreUnavailable` and `SchemaOutdated` interrupt a screen's
/// initialization flow; everything else degrades to empty/default values or
/// is returned as part of a normal validation result.
#[derive(Debug, Error)]
pub enum UserDataError {
    #[error("Local store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Stored schema version {found} is newer than supported version {expected}")]
    SchemaOutdated { found: i64, expected: i64 },

    #[error("Passport not found: {0}")]
    PassportNotFound(Uuid),

    #[error("Fund item not found: {0}")]
    FundItemNotFound(Uuid),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type UserDataResult<T> = Result<T, UserDataError>;

impl From<sqlx::Error> for UserDataError {
    fn from(err: sqlx::Error) -> Self {
        UserDataError::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for UserDataError {
    fn from(err: serde_json::Error) -> Self {
        UserDataError::SerializationError(err.to_string())
    }
}
