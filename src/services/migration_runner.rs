//! One-shot legacy → structured migration.
//!
//! Detects legacy data, transforms it defensively into the structured
//! schema, writes it through the normal store path (so cache invalidation
//! and interaction-tracker rules apply uniformly), and records completion so
//! it never re-runs. Failure never blocks normal app usage: the marker is
//! only written after success, so a failed run is retried on a later launch.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::adapters::cache::UserDataCache;
use crate::domain::errors::UserDataResult;
use crate::domain::models::{
    EntityKind, FieldKey, FundItem, FundItemType, PassportRecord, PassportUpdate, PersonalInfo,
    PersonalInfoUpdate, TravelInfo, UserId,
};
use crate::domain::ports::{InteractionRepository, LegacyStore, UserDataRepository};
use crate::services::interaction_tracker::InteractionTracker;

/// Result of a migration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub migrated: bool,
}

pub struct MigrationRunner<R: UserDataRepository, L: LegacyStore, I: InteractionRepository> {
    repo: Arc<R>,
    legacy: Arc<L>,
    tracker: Arc<InteractionTracker<I>>,
    cache: Arc<UserDataCache<R>>,
}

impl<R, L, I> MigrationRunner<R, L, I>
where
    R: UserDataRepository,
    L: LegacyStore,
    I: InteractionRepository,
{
    pub fn new(
        repo: Arc<R>,
        legacy: Arc<L>,
        tracker: Arc<InteractionTracker<I>>,
        cache: Arc<UserDataCache<R>>,
    ) -> Self {
        Self { repo, legacy, tracker, cache }
    }

    /// Migrate the user's legacy blob into the structured store, exactly
    /// once. Idempotent: a second call is a no-op returning
    /// `migrated: false`.
    pub async fn migrate_from_legacy_store(&self, user_id: &UserId) -> UserDataResult<MigrationOutcome> {
        if self.repo.is_migration_complete(user_id).await? {
            return Ok(MigrationOutcome { migrated: false });
        }

        let Some(blob) = self.legacy.read_legacy_blob(user_id).await? else {
            // Nothing to migrate; remember that so we never re-read.
            self.repo.mark_migration_complete(user_id).await?;
            return Ok(MigrationOutcome { migrated: false });
        };

        tracing::info!(user_id = %user_id, "migrating legacy profile data");
        let profile = LegacyProfile::parse(&blob);

        // Merge into existing records: a retried migration (blob fixed after
        // a failed first run) may find structured data the user captured in
        // the meantime, which must not collide or be discarded wholesale.
        if let Some(update) = profile.passport_update() {
            let fields = passport_fields(&update);
            let mut record = self
                .repo
                .get_passport(user_id)
                .await?
                .unwrap_or_else(|| PassportRecord::new(user_id.clone()));
            record.apply(update);
            self.repo.put_passport(&record).await?;
            self.cache.invalidate(EntityKind::Passport, user_id).await;
            for field in fields {
                // Values the user typed into the old app stay theirs.
                self.tracker.mark_user_authored(user_id, &field).await?;
            }
        }

        if let Some(update) = profile.personal_update() {
            let fields = personal_fields(&update);
            let mut info = self
                .repo
                .get_personal_info(user_id)
                .await?
                .unwrap_or_else(|| PersonalInfo::new(user_id.clone()));
            info.apply(update);
            self.repo.put_personal_info(&info).await?;
            self.cache.invalidate(EntityKind::PersonalInfo, user_id).await;
            for field in fields {
                self.tracker.mark_user_authored(user_id, &field).await?;
            }
        }

        for item in profile.fund_items(user_id) {
            self.repo.put_fund_item(&item).await?;
        }
        self.cache.invalidate(EntityKind::Funds, user_id).await;

        for travel in profile.travel_info(user_id) {
            self.repo.put_travel_info(&travel).await?;
        }
        self.cache.invalidate(EntityKind::Travel, user_id).await;

        self.repo.mark_migration_complete(user_id).await?;
        tracing::info!(user_id = %user_id, "legacy migration complete");

        Ok(MigrationOutcome { migrated: true })
    }
}

fn passport_fields(update: &PassportUpdate) -> Vec<FieldKey> {
    [
        ("fullName", update.full_name.is_some()),
        ("passportNumber", update.passport_number.is_some()),
        ("nationality", update.nationality.is_some()),
        ("dateOfBirth", update.date_of_birth.is_some()),
        ("gender", update.gender.is_some()),
        ("expiryDate", update.expiry_date.is_some()),
    ]
    .into_iter()
    .filter_map(|(name, present)| present.then(|| FieldKey::passport(name)))
    .collect()
}

fn personal_fields(update: &PersonalInfoUpdate) -> Vec<FieldKey> {
    [
        ("occupation", update.occupation.is_some()),
        ("phoneNumber", update.phone_number.is_some()),
        ("email", update.email.is_some()),
        ("countryRegion", update.country_region.is_some()),
        ("provinceCity", update.province_city.is_some()),
        ("dateOfBirth", update.date_of_birth.is_some()),
        ("gender", update.gender.is_some()),
    ]
    .into_iter()
    .filter_map(|(name, present)| present.then(|| FieldKey::personal(name)))
    .collect()
}

/// Defensive view over the legacy blob. Missing or renamed fields never
/// fail; whatever is recognizable is mapped and the rest is dropped.
struct LegacyProfile<'a> {
    root: &'a Value,
}

impl<'a> LegacyProfile<'a> {
    fn parse(root: &'a Value) -> Self {
        Self { root }
    }

    /// A string field from `section`, trying each alias in order, falling
    /// back to the same aliases at the top level (the oldest format was
    /// flat).
    fn field(&self, section: &str, aliases: &[&str]) -> Option<String> {
        let lookup = |obj: &Value| {
            aliases.iter().find_map(|name| {
                obj.get(name)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
            })
        };

        self.root.get(section).and_then(&lookup).or_else(|| lookup(self.root))
    }

    fn passport_update(&self) -> Option<PassportUpdate> {
        let update = PassportUpdate {
            full_name: self.field("passport", &["fullName", "name"]),
            passport_number: self.field("passport", &["passportNumber", "passportNo"]),
            nationality: self.field("passport", &["nationality"]),
            date_of_birth: self.field("passport", &["dateOfBirth", "birthDate", "dob"]),
            gender: self.field("passport", &["gender", "sex"]),
            expiry_date: self.field("passport", &["expiryDate", "expiry", "validUntil"]),
        };
        (!update.is_empty()).then_some(update)
    }

    fn personal_update(&self) -> Option<PersonalInfoUpdate> {
        let section = if self.root.get("personalInfo").is_some() {
            "personalInfo"
        } else {
            "personal"
        };

        let update = PersonalInfoUpdate {
            occupation: self.field(section, &["occupation", "job"]),
            phone_number: self.field(section, &["phoneNumber", "phone", "mobile"]),
            email: self.field(section, &["email"]),
            country_region: self.field(section, &["countryRegion", "country"]),
            province_city: self.field(section, &["provinceCity", "city"]),
            date_of_birth: self.field(section, &["dateOfBirth", "birthDate", "dob"]),
            gender: self.field(section, &["gender", "sex"]),
        };
        (!update.is_empty()).then_some(update)
    }

    fn fund_items(&self, user_id: &UserId) -> Vec<FundItem> {
        let Some(entries) = self.root.get("funds").and_then(Value::as_array) else {
            return Vec::new();
        };

        entries
            .iter()
            .filter_map(|entry| {
                let obj = entry.as_object()?;
                let item_type = obj
                    .get("itemType")
                    .or_else(|| obj.get("type"))
                    .and_then(Value::as_str)
                    .and_then(FundItemType::from_str)
                    .unwrap_or_default();

                let mut item = FundItem::new(user_id.clone(), item_type);
                item.description = obj
                    .get("description")
                    .or_else(|| obj.get("note"))
                    .and_then(Value::as_str)
                    .map(ToString::to_string);
                item.amount = obj.get("amount").and_then(Value::as_f64);
                item.currency = obj.get("currency").and_then(Value::as_str).map(ToString::to_string);
                item.photo_ref = obj
                    .get("photoRef")
                    .or_else(|| obj.get("photo"))
                    .and_then(Value::as_str)
                    .map(ToString::to_string);
                Some(item)
            })
            .collect()
    }

    fn travel_info(&self, user_id: &UserId) -> Vec<TravelInfo> {
        let Some(destinations) = self.root.get("travel").and_then(Value::as_object) else {
            return Vec::new();
        };

        destinations
            .iter()
            .filter_map(|(destination_id, fields)| {
                let obj = fields.as_object()?;
                let mut info = TravelInfo::new(user_id.clone(), destination_id.clone());
                info.fields = obj
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect::<HashMap<_, _>>();
                (!info.fields.is_empty()).then_some(info)
            })
            .collect()
    }
}
