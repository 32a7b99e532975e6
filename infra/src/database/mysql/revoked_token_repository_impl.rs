//! MySQL implementation of the RevokedTokenRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;

use tl_core::domain::entities::revoked_token::RevokedTokenRecord;
use tl_core::errors::DomainError;
use tl_core::repositories::RevokedTokenRepository;

use super::error::{column, store_error, uuid_column};

/// MySQL implementation of RevokedTokenRepository
///
/// `token_id` is the primary key, so revoking the same token twice leaves
/// the first record untouched.
pub struct MySqlRevokedTokenRepository {
    pool: MySqlPool,
}

impl MySqlRevokedTokenRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &MySqlRow) -> Result<RevokedTokenRecord, DomainError> {
        Ok(RevokedTokenRecord {
            token_id: column(row, "token_id")?,
            user_id: uuid_column(row, "user_id")?,
            token_version: column(row, "token_version")?,
            issued_at: column(row, "issued_at")?,
            expires_at: column(row, "expires_at")?,
            revoked_at: column(row, "revoked_at")?,
        })
    }
}

#[async_trait]
impl RevokedTokenRepository for MySqlRevokedTokenRepository {
    async fn insert(&self, record: RevokedTokenRecord) -> Result<bool, DomainError> {
        // MySQL reports 0 affected rows for a no-op duplicate update
        let query = r#"
            INSERT INTO revoked_tokens (
                token_id, user_id, token_version, issued_at, expires_at, revoked_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE token_id = token_id
        "#;

        let result = sqlx::query(query)
            .bind(&record.token_id)
            .bind(record.user_id.to_string())
            .bind(record.token_version)
            .bind(record.issued_at)
            .bind(record.expires_at)
            .bind(record.revoked_at)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("insert revoked token", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_unexpired(&self, now: DateTime<Utc>) -> Result<Vec<RevokedTokenRecord>, DomainError> {
        let query = r#"
            SELECT token_id, user_id, token_version, issued_at, expires_at, revoked_at
            FROM revoked_tokens
            WHERE expires_at > ?
            ORDER BY revoked_at
        "#;

        let rows = sqlx::query(query)
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("list revoked tokens", e))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("delete expired revoked tokens", e))?;

        Ok(result.rows_affected() as usize)
    }
}
