mod traits;

pub use traits::UserRepository;

#[cfg(any(test, feature = "mock-services"))]
mod mock;
#[cfg(any(test, feature = "mock-services"))]
pub use mock::MockUserRepository;

#[cfg(test)]
mod tests;
