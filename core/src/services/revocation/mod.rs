//! Revocation cache contract
//!
//! A low-latency key/value store holding two kinds of entries: deny-list
//! markers for individually revoked tokens, and the mirrored token version of
//! each user. The durable store stays authoritative for both.

mod traits;

#[cfg(any(test, feature = "mock-services"))]
mod memory;


pub use traits::{deny_list_key, token_version_key, RevocationCache};

#[cfg(any(test, feature = "mock-services"))]
pub use memory::InMemoryRevocationCache;
