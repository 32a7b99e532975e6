//! Domain layer containing business entities and value objects.

pub mod entities;
pub mod value_objects;

// Re-export commonly used domain types
pub use entities::{Claims, ResetToken, RevokedTokenRecord, User};
pub use value_objects::RequestContext;
