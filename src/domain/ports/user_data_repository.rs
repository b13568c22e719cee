//! Repository trait for the structured local store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::UserDataResult;
use crate::domain::models::{FundItem, PassportRecord, PersonalInfo, TravelInfo, UserId};

/// Structured, schema-versioned local store keyed by user id and entity type.
///
/// Writes are atomic per record; multi-record consistency (e.g. keeping the
/// passport and personal-info mirror fields aligned) is the service's
/// responsibility. Any call may fail with
/// [`UserDataError::StoreUnavailable`](crate::domain::errors::UserDataError),
/// which is surfaced rather than retried: silent retry on a corrupt schema
/// can mask data loss.
#[async_trait]
pub trait UserDataRepository: Send + Sync {
    /// The user's single active passport record, if captured.
    async fn get_passport(&self, user_id: &UserId) -> UserDataResult<Option<PassportRecord>>;

    /// Look up a passport by record id, for id-addressed field updates.
    async fn get_passport_by_id(&self, id: Uuid) -> UserDataResult<Option<PassportRecord>>;

    /// Insert or replace the passport record (keyed by record id).
    async fn put_passport(&self, record: &PassportRecord) -> UserDataResult<()>;

    async fn get_personal_info(&self, user_id: &UserId) -> UserDataResult<Option<PersonalInfo>>;

    /// Upsert the single personal-info record for the user.
    async fn put_personal_info(&self, info: &PersonalInfo) -> UserDataResult<()>;

    /// Fund items in insertion order.
    async fn list_fund_items(&self, user_id: &UserId) -> UserDataResult<Vec<FundItem>>;

    async fn get_fund_item(&self, id: Uuid) -> UserDataResult<Option<FundItem>>;

    async fn put_fund_item(&self, item: &FundItem) -> UserDataResult<()>;

    /// Delete one fund item. Errors with `FundItemNotFound` if absent.
    async fn delete_fund_item(&self, id: Uuid) -> UserDataResult<()>;

    async fn get_travel_info(
        &self,
        user_id: &UserId,
        destination_id: &str,
    ) -> UserDataResult<Option<TravelInfo>>;

    /// All travel-info records for the user, across destinations.
    async fn list_travel_info(&self, user_id: &UserId) -> UserDataResult<Vec<TravelInfo>>;

    async fn put_travel_info(&self, info: &TravelInfo) -> UserDataResult<()>;

    /// One-shot legacy-migration marker. Written only after a successful
    /// migration so a failed run is retried on the next launch.
    async fn is_migration_complete(&self, user_id: &UserId) -> UserDataResult<bool>;

    async fn mark_migration_complete(&self, user_id: &UserId) -> UserDataResult<()>;

    /// Wipe every entity for the user ("clear saved data"). The migration
    /// marker is preserved so clearing cannot resurrect legacy data.
    async fn clear_user_data(&self, user_id: &UserId) -> UserDataResult<()>;

    /// Current structured-schema version, for `SchemaOutdated` detection.
    async fn schema_version(&self) -> UserDataResult<i64>;
}
