//! Reset token delivery collaborator

use async_trait::async_trait;

use crate::domain::value_objects::RequestContext;
use crate::errors::DomainError;

/// Hands a freshly issued reset token to the user out of band
#[async_trait]
pub trait ResetDelivery: Send + Sync {
    async fn deliver(&self, ctx: &RequestContext, email: &str, token: &str) -> Result<(), DomainError>;
}

#[cfg(any(test, feature = "mock-services"))]
pub use recording::RecordingResetDelivery;

#[cfg(any(test, feature = "mock-services"))]
mod recording {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use tokio::sync::RwLock;

    use super::ResetDelivery;
    use crate::domain::value_objects::RequestContext;
    use crate::errors::DomainError;

    /// Keeps every delivered token in memory
    #[derive(Default)]
    pub struct RecordingResetDelivery {
        sent: RwLock<Vec<(String, String)>>,
        failing: AtomicBool,
    }

    impl RecordingResetDelivery {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        /// Every `(email, token)` pair delivered so far
        pub async fn sent(&self) -> Vec<(String, String)> {
            self.sent.read().await.clone()
        }

        pub async fn last_token_for(&self, email: &str) -> Option<String> {
            self.sent
                .read()
                .await
                .iter()
                .rev()
                .find(|(to, _)| to == email)
                .map(|(_, token)| token.clone())
        }
    }

    #[async_trait]
    impl ResetDelivery for RecordingResetDelivery {
        async fn deliver(&self, _ctx: &RequestContext, email: &str, token: &str) -> Result<(), DomainError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(DomainError::Internal {
                    message: "delivery failed".to_string(),
                });
            }
            self.sent
                .write()
                .await
                .push((email.to_string(), token.to_string()));
            Ok(())
        }
    }
}
