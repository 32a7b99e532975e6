//! RSA signing key store
//!
//! Keys are loaded from a directory holding one PEM-encoded private key per
//! file. The file name without extension becomes the key id (`kid`) that is
//! embedded in every token header, so verification resolves exactly one key
//! and old keys keep verifying until they are removed.

mod store;

#[cfg(test)]
mod tests;

pub use store::{KeyStore, SigningKey, MAX_KEY_FILE_BYTES};
