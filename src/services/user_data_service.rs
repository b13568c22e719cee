//! User data service façade consumed by screens.
//!
//! Owns the cache, the interaction tracker, the auto-save scheduler, and the
//! migration runner, and sequences the cross-entity writes (passport ↔
//! personal info mirror fields) that the store itself does not coordinate.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::adapters::cache::UserDataCache;
use crate::adapters::sqlite::EXPECTED_SCHEMA_VERSION;
use crate::domain::errors::{UserDataError, UserDataResult};
use crate::domain::models::{
    CompletionSnapshot, Config, DestinationConfig, EntityKind, FieldKey, FundItem, FundItemType,
    FundItemUpdate, PassportRecord, PassportUpdate, PersonalInfo, PersonalInfoUpdate,
    SerializablePassport, TravelInfo, UserDataSnapshot, UserId,
};
use crate::domain::ports::{InteractionRepository, LegacyStore, UserDataRepository};
use crate::services::autosave::AutosaveScheduler;
use crate::services::completion::compute_completion;
use crate::services::interaction_tracker::InteractionTracker;
use crate::services::migration_runner::{MigrationOutcome, MigrationRunner};
use crate::services::validation::{parse_strict_date, validate_date_of_birth, ValidationContext};

pub struct UserDataService<R, L, I>
where
    R: UserDataRepository + 'static,
    L: LegacyStore,
    I: InteractionRepository + 'static,
{
    repo: Arc<R>,
    cache: Arc<UserDataCache<R>>,
    tracker: Arc<InteractionTracker<I>>,
    autosave: AutosaveScheduler,
    migration: MigrationRunner<R, L, I>,
    immediate_fields: HashSet<String>,
}

impl<R, L, I> UserDataService<R, L, I>
where
    R: UserDataRepository + 'static,
    L: LegacyStore,
    I: InteractionRepository + 'static,
{
    pub fn new(repo: Arc<R>, legacy: Arc<L>, interactions: Arc<I>, config: &Config) -> Self {
        let cache = Arc::new(UserDataCache::new(Arc::clone(&repo)));
        let tracker = Arc::new(InteractionTracker::new(interactions));
        let migration = MigrationRunner::new(
            Arc::clone(&repo),
            legacy,
            Arc::clone(&tracker),
            Arc::clone(&cache),
        );

        Self {
            repo,
            cache,
            tracker,
            autosave: AutosaveScheduler::new(Duration::from_millis(config.autosave.debounce_ms)),
            migration,
            immediate_fields: config.autosave.immediate_fields.iter().cloned().collect(),
        }
    }

    /// Prepare the service for a user: check the schema is one this build
    /// understands, run the one-shot legacy migration, and warm the cache.
    ///
    /// Only `StoreUnavailable` and `SchemaOutdated` escape; a migration
    /// failure is logged and the user proceeds with whatever structured data
    /// already exists.
    pub async fn initialize(&self, user_id: &UserId) -> UserDataResult<UserDataSnapshot> {
        let found = self.repo.schema_version().await?;
        if found > EXPECTED_SCHEMA_VERSION {
            return Err(UserDataError::SchemaOutdated {
                found,
                expected: EXPECTED_SCHEMA_VERSION,
            });
        }

        match self.migration.migrate_from_legacy_store(user_id).await {
            Ok(MigrationOutcome { migrated: true }) => {
                tracing::info!(user_id = %user_id, "legacy data migrated during initialize");
            }
            Ok(MigrationOutcome { migrated: false }) => {}
            Err(err) => {
                tracing::warn!(
                    user_id = %user_id,
                    error = %err,
                    "legacy migration failed; continuing with structured data"
                );
            }
        }

        self.cache.get_all_user_data(user_id, true).await
    }

    pub async fn get_all_user_data(
        &self,
        user_id: &UserId,
        force_refresh: bool,
    ) -> UserDataResult<UserDataSnapshot> {
        self.cache.get_all_user_data(user_id, force_refresh).await
    }

    pub async fn get_fund_items(
        &self,
        user_id: &UserId,
        force_refresh: bool,
    ) -> UserDataResult<Vec<FundItem>> {
        self.cache.get_fund_items(user_id, force_refresh).await
    }

    pub async fn invalidate_cache(&self, entity: EntityKind, user_id: &UserId) {
        self.cache.invalidate(entity, user_id).await;
    }

    /// Merge a partial personal-info update, creating the record on first
    /// write. Date-of-birth and gender changes are mirrored into the
    /// passport record, sequenced after the personal write.
    pub async fn upsert_personal_info(
        &self,
        user_id: &UserId,
        update: PersonalInfoUpdate,
    ) -> UserDataResult<PersonalInfo> {
        persist_personal(
            Arc::clone(&self.repo),
            Arc::clone(&self.cache),
            user_id.clone(),
            update,
        )
        .await
    }

    /// Create the user's passport on first capture, or merge into the
    /// existing record. A user never accumulates a second passport.
    pub async fn capture_passport(
        &self,
        user_id: &UserId,
        update: PassportUpdate,
    ) -> UserDataResult<PassportRecord> {
        persist_passport(
            Arc::clone(&self.repo),
            Arc::clone(&self.cache),
            user_id.clone(),
            update,
        )
        .await
    }

    /// Field-level update of an existing passport, addressed by record id.
    ///
    /// Unless `skip_validation` is set, date fields are validated before the
    /// write and a violation is returned as `ValidationFailed`.
    pub async fn update_passport(
        &self,
        passport_id: Uuid,
        update: PassportUpdate,
        skip_validation: bool,
    ) -> UserDataResult<PassportRecord> {
        let existing = self
            .repo
            .get_passport_by_id(passport_id)
            .await?
            .ok_or(UserDataError::PassportNotFound(passport_id))?;

        if !skip_validation {
            let ctx = ValidationContext::default();
            if let Some(dob) = update.date_of_birth.as_deref() {
                validate_date_of_birth(dob, ctx.today)
                    .map_err(|e| UserDataError::ValidationFailed(e.to_string()))?;
            }
            if let Some(expiry) = update.expiry_date.as_deref() {
                parse_strict_date(expiry)
                    .map_err(|e| UserDataError::ValidationFailed(e.to_string()))?;
            }
        }

        persist_passport(
            Arc::clone(&self.repo),
            Arc::clone(&self.cache),
            existing.user_id.clone(),
            update,
        )
        .await
    }

    /// Apply a single personal-info field edit from a form.
    ///
    /// Marks the field user-authored synchronously, then routes the write:
    /// mirror-sensitive fields persist immediately, everything else goes
    /// through the debounce window.
    pub async fn edit_personal_field(
        &self,
        user_id: &UserId,
        field: &str,
        value: String,
    ) -> UserDataResult<()> {
        let key = FieldKey::personal(field);
        let update = PersonalInfoUpdate::for_field(field, value)
            .ok_or_else(|| UserDataError::ValidationFailed(format!("unknown field: {key}")))?;

        self.tracker.mark_user_authored(user_id, &key).await?;

        let repo = Arc::clone(&self.repo);
        let cache = Arc::clone(&self.cache);
        let user = user_id.clone();

        if self.immediate_fields.contains(key.as_str()) {
            self.autosave
                .write_immediately(user_id, &key, || async move {
                    persist_personal(repo, cache, user, update).await.map(|_| ())
                })
                .await
        } else {
            self.autosave.schedule_debounced(user_id.clone(), key, move || async move {
                persist_personal(repo, cache, user, update).await.map(|_| ())
            });
            Ok(())
        }
    }

    /// Apply a single passport field edit from a form. Same routing policy
    /// as [`Self::edit_personal_field`].
    pub async fn edit_passport_field(
        &self,
        user_id: &UserId,
        field: &str,
        value: String,
    ) -> UserDataResult<()> {
        let key = FieldKey::passport(field);
        let update = PassportUpdate::for_field(field, value)
            .ok_or_else(|| UserDataError::ValidationFailed(format!("unknown field: {key}")))?;

        self.tracker.mark_user_authored(user_id, &key).await?;

        let repo = Arc::clone(&self.repo);
        let cache = Arc::clone(&self.cache);
        let user = user_id.clone();

        if self.immediate_fields.contains(key.as_str()) {
            self.autosave
                .write_immediately(user_id, &key, || async move {
                    persist_passport(repo, cache, user, update).await.map(|_| ())
                })
                .await
        } else {
            self.autosave.schedule_debounced(user_id.clone(), key, move || async move {
                persist_passport(repo, cache, user, update).await.map(|_| ())
            });
            Ok(())
        }
    }

    /// Propose defaults for empty personal-info fields. Currently infers
    /// country of residence from passport nationality.
    ///
    /// A field the user has authored is never overwritten; returns true if
    /// any default was applied.
    pub async fn prefill_personal_defaults(&self, user_id: &UserId) -> UserDataResult<bool> {
        let snapshot = self.cache.get_all_user_data(user_id, false).await?;

        let country_empty = snapshot
            .personal_info
            .as_ref()
            .and_then(|p| p.country_region.as_deref())
            .is_none_or(|v| v.trim().is_empty());
        let Some(nationality) = snapshot.passport.as_ref().and_then(|p| p.nationality.clone())
        else {
            return Ok(false);
        };

        if !country_empty {
            return Ok(false);
        }

        let key = FieldKey::personal("countryRegion");
        if self.tracker.is_user_authored(user_id, &key).await? {
            // The user chose this value (possibly by clearing it); leave it.
            return Ok(false);
        }

        let update = PersonalInfoUpdate {
            country_region: Some(nationality),
            ..PersonalInfoUpdate::default()
        };
        persist_personal(
            Arc::clone(&self.repo),
            Arc::clone(&self.cache),
            user_id.clone(),
            update,
        )
        .await?;
        self.tracker.record_pre_filled(user_id, &key).await?;

        Ok(true)
    }

    pub async fn add_fund_item(
        &self,
        user_id: &UserId,
        item_type: FundItemType,
        update: FundItemUpdate,
    ) -> UserDataResult<FundItem> {
        let mut item = FundItem::new(user_id.clone(), item_type);
        item.apply(update);
        self.repo.put_fund_item(&item).await?;
        self.cache.invalidate(EntityKind::Funds, user_id).await;
        Ok(item)
    }

    pub async fn update_fund_item(&self, id: Uuid, update: FundItemUpdate) -> UserDataResult<FundItem> {
        let mut item = self
            .repo
            .get_fund_item(id)
            .await?
            .ok_or(UserDataError::FundItemNotFound(id))?;
        item.apply(update);
        self.repo.put_fund_item(&item).await?;
        self.cache.invalidate(EntityKind::Funds, &item.user_id).await;
        Ok(item)
    }

    pub async fn delete_fund_item(&self, id: Uuid) -> UserDataResult<()> {
        let item = self
            .repo
            .get_fund_item(id)
            .await?
            .ok_or(UserDataError::FundItemNotFound(id))?;
        self.repo.delete_fund_item(id).await?;
        self.cache.invalidate(EntityKind::Funds, &item.user_id).await;
        Ok(())
    }

    /// Merge travel-info field values for one destination, creating the
    /// record on first write.
    pub async fn update_travel_info(
        &self,
        user_id: &UserId,
        destination_id: &str,
        fields: HashMap<String, String>,
    ) -> UserDataResult<TravelInfo> {
        let mut info = self
            .repo
            .get_travel_info(user_id, destination_id)
            .await?
            .unwrap_or_else(|| TravelInfo::new(user_id.clone(), destination_id));

        for (name, value) in fields {
            info.fields.insert(name, value);
        }
        info.last_edited_at = chrono::Utc::now();

        self.repo.put_travel_info(&info).await?;
        self.cache.update_travel_slice(user_id, info.clone()).await;
        Ok(info)
    }

    /// Run (or re-check) the one-shot legacy migration for this user.
    pub async fn migrate_from_legacy_store(&self, user_id: &UserId) -> UserDataResult<MigrationOutcome> {
        self.migration.migrate_from_legacy_store(user_id).await
    }

    /// Wipe all saved entities and interaction flags for the user. The
    /// migration marker is kept: clearing saved data must not resurrect
    /// legacy data on the next launch.
    pub async fn clear_saved_data(&self, user_id: &UserId) -> UserDataResult<()> {
        self.repo.clear_user_data(user_id).await?;
        self.tracker.clear_user(user_id).await?;
        self.cache.invalidate_user(user_id).await;
        Ok(())
    }

    /// Completion scores for one destination, computed from the current
    /// snapshot.
    pub async fn compute_completion(
        &self,
        user_id: &UserId,
        config: &DestinationConfig,
    ) -> UserDataResult<CompletionSnapshot> {
        let snapshot = self.cache.get_all_user_data(user_id, false).await?;
        Ok(compute_completion(&snapshot, config))
    }

    /// Passport payload safe to embed in cross-screen navigation params.
    pub fn to_serializable_passport(passport: &PassportRecord) -> SerializablePassport {
        SerializablePassport::from(passport)
    }

    /// The configured debounce window, mostly useful to tests and callers
    /// that need to flush pending edits.
    pub fn debounce_window(&self) -> Duration {
        self.autosave.window()
    }
}

/// Shared personal-info write path: merge, persist, refresh the cache slice,
/// then mirror date-of-birth / gender into the passport record.
async fn persist_personal<R: UserDataRepository>(
    repo: Arc<R>,
    cache: Arc<UserDataCache<R>>,
    user_id: UserId,
    update: PersonalInfoUpdate,
) -> UserDataResult<PersonalInfo> {
    let mirror = PassportUpdate {
        date_of_birth: update.date_of_birth.clone(),
        gender: update.gender.clone(),
        ..PassportUpdate::default()
    };

    let mut info = repo
        .get_personal_info(&user_id)
        .await?
        .unwrap_or_else(|| PersonalInfo::new(user_id.clone()));
    info.apply(update);
    repo.put_personal_info(&info).await?;
    cache.replace_personal_info(&user_id, Some(info.clone())).await;

    if mirror.date_of_birth.is_some() || mirror.gender.is_some() {
        // Sequenced second; the mirror only touches an existing passport.
        if let Some(mut passport) = repo.get_passport(&user_id).await? {
            passport.apply(mirror);
            repo.put_passport(&passport).await?;
            cache.replace_passport(&user_id, Some(passport)).await;
        }
    }

    Ok(info)
}

/// Shared passport write path: merge into the single per-user record (or
/// create it on first capture), refresh the cache slice, then mirror
/// date-of-birth / gender into personal info.
async fn persist_passport<R: UserDataRepository>(
    repo: Arc<R>,
    cache: Arc<UserDataCache<R>>,
    user_id: UserId,
    update: PassportUpdate,
) -> UserDataResult<PassportRecord> {
    let mirror = PersonalInfoUpdate {
        date_of_birth: update.date_of_birth.clone(),
        gender: update.gender.clone(),
        ..PersonalInfoUpdate::default()
    };

    let mut record = repo
        .get_passport(&user_id)
        .await?
        .unwrap_or_else(|| PassportRecord::new(user_id.clone()));
    record.apply(update);
    repo.put_passport(&record).await?;
    cache.replace_passport(&user_id, Some(record.clone())).await;

    if !mirror.is_empty() {
        let mut info = repo
            .get_personal_info(&user_id)
            .await?
            .unwrap_or_else(|| PersonalInfo::new(user_id.clone()));
        info.apply(mirror);
        repo.put_personal_info(&info).await?;
        cache.replace_personal_info(&user_id, Some(info)).await;
    }

    Ok(record)
}
