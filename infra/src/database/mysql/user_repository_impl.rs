//! MySQL implementation of the UserRepository trait.
//!
//! The `users` row holds the authoritative token version. Increments are a
//! single `token_version = token_version + 1` update so concurrent bumps
//! never lose a write.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use tl_core::domain::entities::user::{normalize_email, User};
use tl_core::errors::{AuthError, DomainError};
use tl_core::repositories::UserRepository;

use super::error::{column, is_unique_violation, store_error, uuid_column};

const USER_COLUMNS: &str = r#"
    id, email, password_hash, roles, token_version,
    is_active, deleted_at, created_at, updated_at
"#;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to User entity
    ///
    /// Roles are stored as a JSON array in a TEXT column.
    fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
        let roles_json: String = column(row, "roles")?;
        let roles: Vec<String> =
            serde_json::from_str(&roles_json).map_err(|e| DomainError::Internal {
                message: format!("Invalid roles column: {}", e),
            })?;

        Ok(User {
            id: uuid_column(row, "id")?,
            email: column(row, "email")?,
            password_hash: column(row, "password_hash")?,
            roles,
            token_version: column(row, "token_version")?,
            is_active: column(row, "is_active")?,
            deleted_at: column(row, "deleted_at")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
        })
    }

    async fn find_one(&self, filter: &str, value: String) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE {} = ? LIMIT 1", USER_COLUMNS, filter);

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("find user", e))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.find_one("id", id.to_string()).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_one("email", normalize_email(email)).await
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let roles = serde_json::to_string(&user.roles).map_err(|e| DomainError::Internal {
            message: format!("Failed to encode roles: {}", e),
        })?;

        let query = r#"
            INSERT INTO users (
                id, email, password_hash, roles, token_version,
                is_active, deleted_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(roles)
            .bind(user.token_version)
            .bind(user.is_active)
            .bind(user.deleted_at)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(user),
            Err(e) if is_unique_violation(&e) => Err(AuthError::UserAlreadyExists.into()),
            Err(e) => Err(store_error("create user", e)),
        }
    }

    async fn get_token_version(&self, id: Uuid) -> Result<Option<i64>, DomainError> {
        sqlx::query_scalar::<_, i64>("SELECT token_version FROM users WHERE id = ? LIMIT 1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("read token version", e))
    }

    async fn increment_token_version(&self, id: Uuid) -> Result<Option<i64>, DomainError> {
        // The row lock taken by the update is held until commit, so the
        // following read observes exactly this increment.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_error("begin transaction", e))?;

        let updated = sqlx::query(
            "UPDATE users SET token_version = token_version + 1, updated_at = ? WHERE id = ?",
        )
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| store_error("increment token version", e))?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        let version =
            sqlx::query_scalar::<_, i64>("SELECT token_version FROM users WHERE id = ?")
                .bind(id.to_string())
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| store_error("read incremented token version", e))?;

        tx.commit()
            .await
            .map_err(|e| store_error("commit token version increment", e))?;

        Ok(Some(version))
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("update password hash", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_active = FALSE, deleted_at = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("soft delete user", e))?;

        Ok(result.rows_affected() > 0)
    }
}
