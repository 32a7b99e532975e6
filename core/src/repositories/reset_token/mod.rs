mod traits;

pub use traits::ResetTokenRepository;

#[cfg(any(test, feature = "mock-services"))]
mod mock;
#[cfg(any(test, feature = "mock-services"))]
pub use mock::MockResetTokenRepository;
