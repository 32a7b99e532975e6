//! Mock implementation of UserRepository for testing

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::{normalize_email, User};
use crate::errors::{AuthError, DomainError};

use super::traits::UserRepository;

/// Mock user repository for testing
///
/// Increments happen under the write lock, which makes them atomic the same
/// way a single `UPDATE ... SET token_version = token_version + 1` is.
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    unavailable: AtomicBool,
    version_reads: AtomicUsize,
}

impl MockUserRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            unavailable: AtomicBool::new(false),
            version_reads: AtomicUsize::new(0),
        }
    }

    /// Seed a user directly, bypassing duplicate checks
    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Make every subsequent call fail with `StoreUnavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of times `get_token_version` reached the store
    pub fn version_reads(&self) -> usize {
        self.version_reads.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::StoreUnavailable {
                message: "mock user store offline".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.check_available()?;
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.check_available()?;
        let email = normalize_email(email);
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        self.check_available()?;
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::UserAlreadyExists.into());
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_token_version(&self, id: Uuid) -> Result<Option<i64>, DomainError> {
        self.check_available()?;
        self.version_reads.fetch_add(1, Ordering::SeqCst);
        let users = self.users.read().await;
        Ok(users.get(&id).map(|u| u.token_version))
    }

    async fn increment_token_version(&self, id: Uuid) -> Result<Option<i64>, DomainError> {
        self.check_available()?;
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|u| {
            u.token_version += 1;
            u.updated_at = Utc::now();
            u.token_version
        }))
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool, DomainError> {
        self.check_available()?;
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, DomainError> {
        self.check_available()?;
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) if user.deleted_at.is_none() => {
                user.soft_delete();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
