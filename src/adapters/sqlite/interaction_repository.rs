//! SQLite implementation of the InteractionRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::errors::{UserDataError, UserDataResult};
use crate::domain::models::{FieldInteractionRecord, FieldKey, UserId};
use crate::domain::ports::InteractionRepository;

use super::parse_datetime;

#[derive(Clone)]
pub struct SqliteInteractionRepository {
    pool: SqlitePool,
}

impl SqliteInteractionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InteractionRepository for SqliteInteractionRepository {
    async fn get(
        &self,
        user_id: &UserId,
        field_key: &FieldKey,
    ) -> UserDataResult<Option<FieldInteractionRecord>> {
        let row: Option<InteractionRow> = sqlx::query_as(
            "SELECT * FROM field_interactions WHERE user_id = ? AND field_key = ?"
        )
        .bind(user_id.as_str())
        .bind(field_key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn upsert(&self, record: &FieldInteractionRecord) -> UserDataResult<()> {
        sqlx::query(
            r#"INSERT INTO field_interactions (user_id, field_key, is_user_authored, last_touched_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(user_id, field_key) DO UPDATE SET
                 is_user_authored = excluded.is_user_authored,
                 last_touched_at = excluded.last_touched_at"#
        )
        .bind(record.user_id.as_str())
        .bind(record.field_key.as_str())
        .bind(i32::from(record.is_user_authored))
        .bind(record.last_touched_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> UserDataResult<Vec<FieldInteractionRecord>> {
        let rows: Vec<InteractionRow> = sqlx::query_as(
            "SELECT * FROM field_interactions WHERE user_id = ? ORDER BY field_key"
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn clear_user(&self, user_id: &UserId) -> UserDataResult<()> {
        sqlx::query("DELETE FROM field_interactions WHERE user_id = ?")
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct InteractionRow {
    user_id: String,
    field_key: String,
    is_user_authored: i64,
    last_touched_at: String,
}

impl TryFrom<InteractionRow> for FieldInteractionRecord {
    type Error = UserDataError;

    fn try_from(row: InteractionRow) -> Result<Self, Self::Error> {
        let field_key = FieldKey::parse(&row.field_key).ok_or_else(|| {
            UserDataError::SerializationError(format!("bad field key: {}", row.field_key))
        })?;

        Ok(Self {
            user_id: UserId::new(row.user_id),
            field_key,
            is_user_authored: row.is_user_authored != 0,
            last_touched_at: parse_datetime(&row.last_touched_at)?,
        })
    }
}
