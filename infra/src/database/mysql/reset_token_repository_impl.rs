//! MySQL implementation of the ResetTokenRepository trait.
//!
//! Only the SHA-256 digest of each reset token reaches the database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use tl_core::domain::entities::reset_token::ResetToken;
use tl_core::errors::DomainError;
use tl_core::repositories::ResetTokenRepository;

use super::error::{column, store_error, uuid_column};

/// MySQL implementation of ResetTokenRepository
pub struct MySqlResetTokenRepository {
    pool: MySqlPool,
}

impl MySqlResetTokenRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_token(row: &MySqlRow) -> Result<ResetToken, DomainError> {
        Ok(ResetToken {
            token_hash: column(row, "token_hash")?,
            user_id: uuid_column(row, "user_id")?,
            email: column(row, "email")?,
            issued_at: column(row, "issued_at")?,
            expires_at: column(row, "expires_at")?,
        })
    }
}

#[async_trait]
impl ResetTokenRepository for MySqlResetTokenRepository {
    async fn insert(&self, token: ResetToken) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO password_reset_tokens (
                token_hash, user_id, email, issued_at, expires_at
            ) VALUES (?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(&token.token_hash)
            .bind(token.user_id.to_string())
            .bind(&token.email)
            .bind(token.issued_at)
            .bind(token.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("insert reset token", e))?;

        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<ResetToken>, DomainError> {
        let query = r#"
            SELECT token_hash, user_id, email, issued_at, expires_at
            FROM password_reset_tokens
            WHERE token_hash = ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("find reset token", e))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("delete reset tokens", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM password_reset_tokens WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("delete expired reset tokens", e))?;

        Ok(result.rows_affected() as usize)
    }
}
