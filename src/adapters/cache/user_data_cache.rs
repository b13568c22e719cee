//! Per-user, per-entity-type cache over a `UserDataRepository`.
//!
//! Each entity type is a separate slice keyed by user, so invalidating one
//! slice never disturbs another user's data or a sibling entity type. The
//! cache is never the system of record: on any ambiguity it is rebuilt from
//! the store.

use moka::future::Cache;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::errors::UserDataResult;
use crate::domain::models::{
    EntityKind, FundItem, PassportRecord, PersonalInfo, TravelInfo, UserDataSnapshot, UserId,
};
use crate::domain::ports::UserDataRepository;

/// Maximum number of users worth of cached slices. On-device there is
/// usually one, but tests and shared devices can have a few.
const CACHE_MAX_USERS: u64 = 64;

pub struct UserDataCache<R: UserDataRepository> {
    repo: Arc<R>,
    passport: Cache<UserId, Option<PassportRecord>>,
    personal: Cache<UserId, Option<PersonalInfo>>,
    travel: Cache<UserId, Arc<HashMap<String, TravelInfo>>>,
    funds: Cache<UserId, Arc<Vec<FundItem>>>,
}

impl<R: UserDataRepository> UserDataCache<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            passport: Cache::builder().max_capacity(CACHE_MAX_USERS).build(),
            personal: Cache::builder().max_capacity(CACHE_MAX_USERS).build(),
            travel: Cache::builder().max_capacity(CACHE_MAX_USERS).build(),
            funds: Cache::builder().max_capacity(CACHE_MAX_USERS).build(),
        }
    }

    /// Full snapshot for a user.
    ///
    /// On cache hit and no `force_refresh`, assembles the snapshot from the
    /// cached slices. On miss or forced refresh, reloads every entity type
    /// from the store and repopulates all slices, so a forced snapshot can
    /// never mix a stale slice with a fresh one.
    pub async fn get_all_user_data(
        &self,
        user_id: &UserId,
        force_refresh: bool,
    ) -> UserDataResult<UserDataSnapshot> {
        if !force_refresh {
            let cached = (
                self.passport.get(user_id).await,
                self.personal.get(user_id).await,
                self.travel.get(user_id).await,
            );
            if let (Some(passport), Some(personal_info), Some(travel)) = cached {
                // Funds are an independently cached slice with its own
                // miss handling.
                let funds = self.get_fund_items(user_id, false).await?;
                return Ok(UserDataSnapshot {
                    passport,
                    personal_info,
                    funds,
                    travel: (*travel).clone(),
                });
            }
        }

        self.refresh_all(user_id).await
    }

    /// Fund items for a user, cached and invalidated independently from the
    /// snapshot slices because the fund CRUD flow must see fresh lists
    /// immediately after a mutation.
    pub async fn get_fund_items(
        &self,
        user_id: &UserId,
        force_refresh: bool,
    ) -> UserDataResult<Vec<FundItem>> {
        if !force_refresh {
            if let Some(funds) = self.funds.get(user_id).await {
                return Ok((*funds).clone());
            }
        }

        let funds = self.repo.list_fund_items(user_id).await?;
        self.funds.insert(user_id.clone(), Arc::new(funds.clone())).await;
        Ok(funds)
    }

    /// Drop exactly one entity type's cached slice for one user. Idempotent;
    /// other slices and other users are untouched.
    pub async fn invalidate(&self, entity: EntityKind, user_id: &UserId) {
        tracing::debug!(user_id = %user_id, entity = entity.as_str(), "invalidating cache slice");
        match entity {
            EntityKind::Passport => self.passport.invalidate(user_id).await,
            EntityKind::PersonalInfo => self.personal.invalidate(user_id).await,
            EntityKind::Travel => self.travel.invalidate(user_id).await,
            EntityKind::Funds => self.funds.invalidate(user_id).await,
        }
    }

    /// Drop every cached slice for one user.
    pub async fn invalidate_user(&self, user_id: &UserId) {
        for entity in [
            EntityKind::Passport,
            EntityKind::PersonalInfo,
            EntityKind::Travel,
            EntityKind::Funds,
        ] {
            self.invalidate(entity, user_id).await;
        }
    }

    /// Write-through replacement of the passport slice after a successful
    /// store write.
    pub async fn replace_passport(&self, user_id: &UserId, record: Option<PassportRecord>) {
        self.passport.insert(user_id.clone(), record).await;
    }

    /// Write-through replacement of the personal-info slice.
    pub async fn replace_personal_info(&self, user_id: &UserId, info: Option<PersonalInfo>) {
        self.personal.insert(user_id.clone(), info).await;
    }

    /// Fold an updated travel record into the cached travel slice. If the
    /// slice is not resident the update is dropped and the next read loads
    /// from the store.
    pub async fn update_travel_slice(&self, user_id: &UserId, info: TravelInfo) {
        if let Some(current) = self.travel.get(user_id).await {
            let mut updated = (*current).clone();
            updated.insert(info.destination_id.clone(), info);
            self.travel.insert(user_id.clone(), Arc::new(updated)).await;
        }
    }

    /// Reload every entity type from the store and repopulate all slices.
    async fn refresh_all(&self, user_id: &UserId) -> UserDataResult<UserDataSnapshot> {
        // Load everything before touching the cache so a failed load cannot
        // leave a half-refreshed user.
        let passport = self.repo.get_passport(user_id).await?;
        let personal_info = self.repo.get_personal_info(user_id).await?;
        let funds = self.repo.list_fund_items(user_id).await?;
        let travel: HashMap<String, TravelInfo> = self
            .repo
            .list_travel_info(user_id)
            .await?
            .into_iter()
            .map(|t| (t.destination_id.clone(), t))
            .collect();

        self.passport.insert(user_id.clone(), passport.clone()).await;
        self.personal.insert(user_id.clone(), personal_info.clone()).await;
        self.funds.insert(user_id.clone(), Arc::new(funds.clone())).await;
        self.travel.insert(user_id.clone(), Arc::new(travel.clone())).await;

        Ok(UserDataSnapshot {
            passport,
            personal_info,
            funds,
            travel,
        })
    }
}
