//! Tests for the token authority and cleanup service

mod revocation_tests;
