//! Tests for the signing key store
