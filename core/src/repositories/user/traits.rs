//! User repository trait defining the interface for account persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// The user row is the authoritative home of the token version. Every
/// mutation of the version must be a single atomic update at the storage
/// layer so concurrent logout-everywhere and password changes never lose an
/// increment.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found (including soft-deleted users)
    /// * `Ok(None)` - No user with the given ID
    /// * `Err(DomainError)` - Store error
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by their normalized email address
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user
    ///
    /// # Returns
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError)` - `UserAlreadyExists` on duplicate email, or a store error
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Read the current token version of a user
    ///
    /// # Returns
    /// * `Ok(Some(version))` - Current version
    /// * `Ok(None)` - No user with the given ID
    async fn get_token_version(&self, id: Uuid) -> Result<Option<i64>, DomainError>;

    /// Atomically increment the token version and return the new value
    ///
    /// Implementations must perform `token_version = token_version + 1` as a
    /// single storage-level update, never read-modify-write.
    ///
    /// # Returns
    /// * `Ok(Some(version))` - The version after the increment
    /// * `Ok(None)` - No user with the given ID
    async fn increment_token_version(&self, id: Uuid) -> Result<Option<i64>, DomainError>;

    /// Replace the password hash
    ///
    /// # Returns
    /// * `Ok(true)` - Password updated
    /// * `Ok(false)` - User not found
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool, DomainError>;

    /// Mark a user deleted and inactive
    ///
    /// # Returns
    /// * `Ok(true)` - User soft-deleted
    /// * `Ok(false)` - User not found or already deleted
    async fn soft_delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
