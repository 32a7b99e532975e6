//! Mapping of SQLx errors into domain errors

use sqlx::mysql::MySqlRow;
use sqlx::Row;
use tl_core::errors::DomainError;
use uuid::Uuid;

/// Every query failure is reported as the store being unavailable.
pub(super) fn store_error(action: &str, error: sqlx::Error) -> DomainError {
    tracing::error!("Failed to {}: {}", action, error);
    DomainError::StoreUnavailable {
        message: format!("Failed to {}: {}", action, error),
    }
}

/// A row that does not decode is corrupt data, not an outage.
pub(super) fn column<'r, T>(row: &'r MySqlRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
{
    row.try_get(name).map_err(|e| DomainError::Internal {
        message: format!("Failed to get {}: {}", name, e),
    })
}

pub(super) fn uuid_column(row: &MySqlRow, name: &str) -> Result<Uuid, DomainError> {
    let raw: String = column(row, name)?;
    Uuid::parse_str(&raw).map_err(|e| DomainError::Internal {
        message: format!("Invalid UUID in {}: {}", name, e),
    })
}

pub(super) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}
