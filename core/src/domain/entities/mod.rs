//! Domain entities representing core business objects.

pub mod claims;
pub mod reset_token;
pub mod revoked_token;
pub mod user;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use claims::Claims;
pub use reset_token::ResetToken;
pub use revoked_token::RevokedTokenRecord;
pub use user::User;
