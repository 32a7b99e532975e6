mod traits;

pub use traits::RevokedTokenRepository;

#[cfg(any(test, feature = "mock-services"))]
mod mock;
#[cfg(any(test, feature = "mock-services"))]
pub use mock::MockRevokedTokenRepository;

#[cfg(test)]
mod tests;
