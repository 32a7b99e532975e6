//! Business services containing domain logic and use cases.

pub mod auth;
pub mod key_store;
pub mod password_reset;
pub mod revocation;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig};
pub use key_store::{KeyStore, SigningKey};
pub use password_reset::{PasswordResetService, ResetDelivery};
pub use revocation::RevocationCache;
pub use token::{
    CleanupResult, IssuedToken, RehydrateReport, TokenAuthority, TokenAuthorityConfig,
    TokenCleanupService,
};

#[cfg(any(test, feature = "mock-services"))]
pub use password_reset::RecordingResetDelivery;
#[cfg(any(test, feature = "mock-services"))]
pub use revocation::InMemoryRevocationCache;
