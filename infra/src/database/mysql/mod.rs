//! MySQL repository implementations

mod error;
mod reset_token_repository_impl;
mod revoked_token_repository_impl;
mod user_repository_impl;

pub use reset_token_repository_impl::MySqlResetTokenRepository;
pub use revoked_token_repository_impl::MySqlRevokedTokenRepository;
pub use user_repository_impl::MySqlUserRepository;
