//! Repository trait for field interaction records.

use async_trait::async_trait;

use crate::domain::errors::UserDataResult;
use crate::domain::models::{FieldInteractionRecord, FieldKey, UserId};

/// Durable storage for per-field "user-authored vs pre-filled" flags.
///
/// Same durability guarantee as the main store: whether a value is the
/// user's or the system's is not re-derivable from the value alone, so it
/// must survive app restarts.
#[async_trait]
pub trait InteractionRepository: Send + Sync {
    async fn get(
        &self,
        user_id: &UserId,
        field_key: &FieldKey,
    ) -> UserDataResult<Option<FieldInteractionRecord>>;

    /// Insert or replace the record for (user, field).
    async fn upsert(&self, record: &FieldInteractionRecord) -> UserDataResult<()>;

    async fn list_for_user(&self, user_id: &UserId) -> UserDataResult<Vec<FieldInteractionRecord>>;

    /// Remove all records for the user (part of "clear saved data").
    async fn clear_user(&self, user_id: &UserId) -> UserDataResult<()>;
}
