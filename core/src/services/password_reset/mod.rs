//! Password reset flow
//!
//! Reset tokens are opaque random values, not signed tokens. They are
//! single-use: a successful submission deletes every outstanding reset token
//! of the user and bumps the user's token version.

mod delivery;
mod service;

#[cfg(test)]
mod tests;

pub use delivery::ResetDelivery;
pub use service::PasswordResetService;

#[cfg(any(test, feature = "mock-services"))]
pub use delivery::RecordingResetDelivery;
