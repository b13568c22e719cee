//! Field interaction tracking service.
//!
//! Centralizes the "pre-filled vs user-authored" flag behind a narrow
//! contract instead of ad hoc booleans at every call site. The correctness
//! property every default-population path must honor: once a field is
//! user-authored, an automated default may not overwrite it until the flag
//! is explicitly cleared.

use std::sync::Arc;

use crate::domain::errors::UserDataResult;
use crate::domain::models::{FieldInteractionRecord, FieldKey, UserId};
use crate::domain::ports::InteractionRepository;

pub struct InteractionTracker<I: InteractionRepository> {
    repo: Arc<I>,
}

impl<I: InteractionRepository> InteractionTracker<I> {
    pub fn new(repo: Arc<I>) -> Self {
        Self { repo }
    }

    /// Record a deliberate user edit. Called synchronously before any
    /// debounced write is scheduled, so default-population and a rapid user
    /// edit cannot race the field back into the pre-filled state.
    pub async fn mark_user_authored(&self, user_id: &UserId, field_key: &FieldKey) -> UserDataResult<()> {
        let record = FieldInteractionRecord::user_authored(user_id.clone(), field_key.clone());
        self.repo.upsert(&record).await
    }

    /// Record that the system proposed a default for this field. Never
    /// downgrades an existing user-authored flag.
    pub async fn record_pre_filled(&self, user_id: &UserId, field_key: &FieldKey) -> UserDataResult<()> {
        if self.is_user_authored(user_id, field_key).await? {
            return Ok(());
        }
        let record = FieldInteractionRecord::pre_filled(user_id.clone(), field_key.clone());
        self.repo.upsert(&record).await
    }

    /// Whether the current value was typed by the user. Missing records read
    /// as false (nothing has touched the field yet).
    pub async fn is_user_authored(&self, user_id: &UserId, field_key: &FieldKey) -> UserDataResult<bool> {
        Ok(self
            .repo
            .get(user_id, field_key)
            .await?
            .is_some_and(|r| r.is_user_authored))
    }

    /// Explicitly clear the user-authored flag, re-opening the field to
    /// default population. The only sanctioned way to do so.
    pub async fn clear_flag(&self, user_id: &UserId, field_key: &FieldKey) -> UserDataResult<()> {
        let record = FieldInteractionRecord::pre_filled(user_id.clone(), field_key.clone());
        self.repo.upsert(&record).await
    }

    /// Drop all interaction records for a user (part of "clear saved data").
    pub async fn clear_user(&self, user_id: &UserId) -> UserDataResult<()> {
        self.repo.clear_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteInteractionRepository};

    async fn tracker() -> InteractionTracker<SqliteInteractionRepository> {
        let pool = create_migrated_test_pool().await.unwrap();
        InteractionTracker::new(Arc::new(SqliteInteractionRepository::new(pool)))
    }

    #[tokio::test]
    async fn untouched_field_is_not_user_authored() {
        let tracker = tracker().await;
        let user = UserId::from("u1");
        let key = FieldKey::personal("occupation");

        assert!(!tracker.is_user_authored(&user, &key).await.unwrap());
    }

    #[tokio::test]
    async fn pre_fill_does_not_downgrade_user_edit() {
        let tracker = tracker().await;
        let user = UserId::from("u1");
        let key = FieldKey::personal("countryRegion");

        tracker.mark_user_authored(&user, &key).await.unwrap();
        tracker.record_pre_filled(&user, &key).await.unwrap();

        assert!(tracker.is_user_authored(&user, &key).await.unwrap());
    }

    #[tokio::test]
    async fn clear_flag_reopens_field() {
        let tracker = tracker().await;
        let user = UserId::from("u1");
        let key = FieldKey::personal("countryRegion");

        tracker.mark_user_authored(&user, &key).await.unwrap();
        tracker.clear_flag(&user, &key).await.unwrap();

        assert!(!tracker.is_user_authored(&user, &key).await.unwrap());
    }

    #[tokio::test]
    async fn flags_are_scoped_per_user_and_field() {
        let tracker = tracker().await;
        let user = UserId::from("u1");
        let other = UserId::from("u2");
        let key = FieldKey::personal("email");

        tracker.mark_user_authored(&user, &key).await.unwrap();

        assert!(!tracker.is_user_authored(&other, &key).await.unwrap());
        assert!(!tracker
            .is_user_authored(&user, &FieldKey::personal("occupation"))
            .await
            .unwrap());
    }
}
