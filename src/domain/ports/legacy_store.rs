//! Read-only port over the pre-structured persistence format.

use async_trait::async_trait;

use crate::domain::errors::UserDataResult;
use crate::domain::models::UserId;

/// Reader for the unstructured key-value persistence used by earlier app
/// versions. Migration is one-directional (legacy → structured), so there is
/// no write contract, and in normal operation the blob is read exactly once
/// per user before the migration marker is set.
#[async_trait]
pub trait LegacyStore: Send + Sync {
    /// The raw legacy payload for a user, or None if this install never had
    /// legacy data for them.
    async fn read_legacy_blob(&self, user_id: &UserId) -> UserDataResult<Option<serde_json::Value>>;
}
