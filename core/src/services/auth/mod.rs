//! Account flows: login, logout, logout everywhere, password change and
//! account deletion

mod password;
mod service;

#[cfg(test)]
mod tests;

pub use password::{hash_password, validate_password, verify_password, MAX_PASSWORD_BYTES, MIN_PASSWORD_LEN};
pub use service::{AuthService, AuthServiceConfig};
