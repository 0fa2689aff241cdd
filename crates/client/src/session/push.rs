//! Notification permission and push-token acquisition.
//!
//! The OS side lives behind [`PushTokenProvider`]. Acquisition is
//! best-effort: any failure leaves the device without a token.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

/// Notification permission as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// Notifications allowed.
    Granted,
    /// Notifications refused.
    Denied,
    /// The user has not been asked yet.
    Undetermined,
}

/// Errors raised by a push provider.
#[derive(Debug, Error)]
pub enum PushError {
    /// The platform has no token to hand out.
    #[error("push token unavailable")]
    Unavailable,

    /// The platform call failed.
    #[error("push provider error: {0}")]
    Provider(String),
}

/// Platform notification service.
#[async_trait]
pub trait PushTokenProvider: Send + Sync {
    /// Current permission, without prompting.
    async fn permission_status(&self) -> Result<PermissionStatus, PushError>;

    /// Prompt for permission and return the answer.
    async fn request_permission(&self) -> Result<PermissionStatus, PushError>;

    /// Token identifying this device to the push service.
    async fn push_token(&self) -> Result<String, PushError>;
}

/// Obtain a push token, asking for permission only if not already granted.
///
/// Returns `None` when permission is refused or the provider fails.
pub async fn acquire_push_token(provider: &dyn PushTokenProvider) -> Option<String> {
    match try_acquire(provider).await {
        Ok(token) => token,
        Err(e) => {
            warn!(error = %e, "Failed to obtain push token");
            None
        }
    }
}

async fn try_acquire(provider: &dyn PushTokenProvider) -> Result<Option<String>, PushError> {
    let mut status = provider.permission_status().await?;
    if status != PermissionStatus::Granted {
        status = provider.request_permission().await?;
    }

    if status != PermissionStatus::Granted {
        debug!(?status, "Notification permission not granted");
        return Ok(None);
    }

    provider.push_token().await.map(Some)
}

/// Provider backed by a token from configuration.
///
/// Permission counts as granted exactly when a token is configured.
#[derive(Clone, Default)]
pub struct ConfiguredPushTokens {
    token: Option<String>,
}

impl ConfiguredPushTokens {
    /// Wrap an optional configured token.
    #[must_use]
    pub const fn new(token: Option<String>) -> Self {
        Self { token }
    }

    const fn status(&self) -> PermissionStatus {
        if self.token.is_some() {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }
}

impl std::fmt::Debug for ConfiguredPushTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredPushTokens")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[async_trait]
impl PushTokenProvider for ConfiguredPushTokens {
    async fn permission_status(&self) -> Result<PermissionStatus, PushError> {
        Ok(self.status())
    }

    async fn request_permission(&self) -> Result<PermissionStatus, PushError> {
        Ok(self.status())
    }

    async fn push_token(&self) -> Result<String, PushError> {
        self.token.clone().ok_or(PushError::Unavailable)
    }
}
