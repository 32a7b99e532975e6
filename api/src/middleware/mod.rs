pub mod auth;

pub use auth::{request_context, Authenticated, RequestScope, SessionAuth, REQUEST_ID_HEADER};
