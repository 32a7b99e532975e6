//! Authentication route handlers
//!
//! This module contains the session endpoints:
//! - Registration and login
//! - Logout of the current token and of every token
//! - Password change and account deletion
//! - Password reset request and submission

pub mod account;
pub mod login;
pub mod logout;
pub mod password;
pub mod password_reset;
pub mod register;
