//! SQLite implementation of the UserDataRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{UserDataError, UserDataResult};
use crate::domain::models::{FundItem, FundItemType, PassportRecord, PersonalInfo, TravelInfo, UserId};
use crate::domain::ports::UserDataRepository;

use super::{parse_datetime, parse_uuid};

#[derive(Clone)]
pub struct SqliteUserDataRepository {
    pool: SqlitePool,
}

impl SqliteUserDataRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDataRepository for SqliteUserDataRepository {
    async fn get_passport(&self, user_id: &UserId) -> UserDataResult<Option<PassportRecord>> {
        let row: Option<PassportRow> = sqlx::query_as(
            "SELECT * FROM passports WHERE user_id = ?"
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn get_passport_by_id(&self, id: Uuid) -> UserDataResult<Option<PassportRecord>> {
        let row: Option<PassportRow> = sqlx::query_as(
            "SELECT * FROM passports WHERE id = ?"
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn put_passport(&self, record: &PassportRecord) -> UserDataResult<()> {
        sqlx::query(
            r#"INSERT INTO passports (id, user_id, full_name, passport_number, nationality,
               date_of_birth, gender, expiry_date, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                 full_name = excluded.full_name,
                 passport_number = excluded.passport_number,
                 nationality = excluded.nationality,
                 date_of_birth = excluded.date_of_birth,
                 gender = excluded.gender,
                 expiry_date = excluded.expiry_date,
                 updated_at = excluded.updated_at"#
        )
        .bind(record.id.to_string())
        .bind(record.user_id.as_str())
        .bind(&record.full_name)
        .bind(&record.passport_number)
        .bind(&record.nationality)
        .bind(&record.date_of_birth)
        .bind(&record.gender)
        .bind(&record.expiry_date)
        .bind(record.created_at.to_rfc3339())
        .bind(record.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_personal_info(&self, user_id: &UserId) -> UserDataResult<Option<PersonalInfo>> {
        let row: Option<PersonalInfoRow> = sqlx::query_as(
            "SELECT * FROM personal_info WHERE user_id = ?"
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn put_personal_info(&self, info: &PersonalInfo) -> UserDataResult<()> {
        sqlx::query(
            r#"INSERT INTO personal_info (user_id, occupation, phone_number, email,
               country_region, province_city, date_of_birth, gender, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(user_id) DO UPDATE SET
                 occupation = excluded.occupation,
                 phone_number = excluded.phone_number,
                 email = excluded.email,
                 country_region = excluded.country_region,
                 province_city = excluded.province_city,
                 date_of_birth = excluded.date_of_birth,
                 gender = excluded.gender,
                 updated_at = excluded.updated_at"#
        )
        .bind(info.user_id.as_str())
        .bind(&info.occupation)
        .bind(&info.phone_number)
        .bind(&info.email)
        .bind(&info.country_region)
        .bind(&info.province_city)
        .bind(&info.date_of_birth)
        .bind(&info.gender)
        .bind(info.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_fund_items(&self, user_id: &UserId) -> UserDataResult<Vec<FundItem>> {
        let rows: Vec<FundItemRow> = sqlx::query_as(
            "SELECT * FROM fund_items WHERE user_id = ? ORDER BY created_at, id"
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get_fund_item(&self, id: Uuid) -> UserDataResult<Option<FundItem>> {
        let row: Option<FundItemRow> = sqlx::query_as(
            "SELECT * FROM fund_items WHERE id = ?"
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn put_fund_item(&self, item: &FundItem) -> UserDataResult<()> {
        sqlx::query(
            r#"INSERT INTO fund_items (id, user_id, item_type, description, amount,
               currency, photo_ref, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                 item_type = excluded.item_type,
                 description = excluded.description,
                 amount = excluded.amount,
                 currency = excluded.currency,
                 photo_ref = excluded.photo_ref"#
        )
        .bind(item.id.to_string())
        .bind(item.user_id.as_str())
        .bind(item.item_type.as_str())
        .bind(&item.description)
        .bind(item.amount)
        .bind(&item.currency)
        .bind(&item.photo_ref)
        .bind(item.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_fund_item(&self, id: Uuid) -> UserDataResult<()> {
        let result = sqlx::query("DELETE FROM fund_items WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(UserDataError::FundItemNotFound(id));
        }

        Ok(())
    }

    async fn get_travel_info(
        &self,
        user_id: &UserId,
        destination_id: &str,
    ) -> UserDataResult<Option<TravelInfo>> {
        let row: Option<TravelInfoRow> = sqlx::query_as(
            "SELECT * FROM travel_info WHERE user_id = ? AND destination_id = ?"
        )
        .bind(user_id.as_str())
        .bind(destination_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_travel_info(&self, user_id: &UserId) -> UserDataResult<Vec<TravelInfo>> {
        let rows: Vec<TravelInfoRow> = sqlx::query_as(
            "SELECT * FROM travel_info WHERE user_id = ? ORDER BY destination_id"
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn put_travel_info(&self, info: &TravelInfo) -> UserDataResult<()> {
        let fields_json = serde_json::to_string(&info.fields)?;

        sqlx::query(
            r#"INSERT INTO travel_info (user_id, destination_id, fields, last_edited_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(user_id, destination_id) DO UPDATE SET
                 fields = excluded.fields,
                 last_edited_at = excluded.last_edited_at"#
        )
        .bind(info.user_id.as_str())
        .bind(&info.destination_id)
        .bind(fields_json)
        .bind(info.last_edited_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn is_migration_complete(&self, user_id: &UserId) -> UserDataResult<bool> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT completed_at FROM legacy_migrations WHERE user_id = ?"
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    async fn mark_migration_complete(&self, user_id: &UserId) -> UserDataResult<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO legacy_migrations (user_id, completed_at) VALUES (?, ?)"
        )
        .bind(user_id.as_str())
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn clear_user_data(&self, user_id: &UserId) -> UserDataResult<()> {
        let mut tx = self.pool.begin().await?;

        for table in ["passports", "personal_info", "fund_items", "travel_info", "field_interactions"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE user_id = ?"))
                .bind(user_id.as_str())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn schema_version(&self) -> UserDataResult<i64> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations"
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map_or(0, |(v,)| v))
    }
}

#[derive(sqlx::FromRow)]
struct PassportRow {
    id: String,
    user_id: String,
    full_name: Option<String>,
    passport_number: Option<String>,
    nationality: Option<String>,
    date_of_birth: Option<String>,
    gender: Option<String>,
    expiry_date: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<PassportRow> for PassportRecord {
    type Error = UserDataError;

    fn try_from(row: PassportRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            user_id: UserId::new(row.user_id),
            full_name: row.full_name,
            passport_number: row.passport_number,
            nationality: row.nationality,
            date_of_birth: row.date_of_birth,
            gender: row.gender,
            expiry_date: row.expiry_date,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PersonalInfoRow {
    user_id: String,
    occupation: Option<String>,
    phone_number: Option<String>,
    email: Option<String>,
    country_region: Option<String>,
    province_city: Option<String>,
    date_of_birth: Option<String>,
    gender: Option<String>,
    updated_at: String,
}

impl TryFrom<PersonalInfoRow> for PersonalInfo {
    type Error = UserDataError;

    fn try_from(row: PersonalInfoRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: UserId::new(row.user_id),
            occupation: row.occupation,
            phone_number: row.phone_number,
            email: row.email,
            country_region: row.country_region,
            province_city: row.province_city,
            date_of_birth: row.date_of_birth,
            gender: row.gender,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct FundItemRow {
    id: String,
    user_id: String,
    item_type: String,
    description: Option<String>,
    amount: Option<f64>,
    currency: Option<String>,
    photo_ref: Option<String>,
    created_at: String,
}

impl TryFrom<FundItemRow> for FundItem {
    type Error = UserDataError;

    fn try_from(row: FundItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            user_id: UserId::new(row.user_id),
            item_type: FundItemType::from_str(&row.item_type).unwrap_or_default(),
            description: row.description,
            amount: row.amount,
            currency: row.currency,
            photo_ref: row.photo_ref,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TravelInfoRow {
    user_id: String,
    destination_id: String,
    fields: String,
    last_edited_at: String,
}

impl TryFrom<TravelInfoRow> for TravelInfo {
    type Error = UserDataError;

    fn try_from(row: TravelInfoRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: UserId::new(row.user_id),
            destination_id: row.destination_id,
            fields: serde_json::from_str(&row.fields)?,
            last_edited_at: parse_datetime(&row.last_edited_at)?,
        })
    }
}
