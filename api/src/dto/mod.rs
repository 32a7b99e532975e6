//! Request and response bodies

pub mod auth;

pub use auth::{
    CredentialsRequest, ChangePasswordRequest, MessageResponse, RegisterResponse,
    ResetRequest, ResetSubmitRequest, TokenResponse,
};
