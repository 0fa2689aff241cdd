//! Request lifetimes tied to a view.
//!
//! A [`ViewScope`] is created when a view starts and dropped when it goes
//! away. Requests run through the scope stop as soon as it is cancelled and
//! their results are discarded.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::api::ApiError;

/// Cancellation scope for the requests of one view.
#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    /// New, uncancelled scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope cancelled together with this one, but which can also be
    /// cancelled on its own.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    /// Token that cancels this scope, e.g. for a signal handler.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Cancel every request running in this scope and its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns `true` once the scope is cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Run `fut` until it completes or the scope is cancelled.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Cancelled` (converted into `E`) if the scope is
    /// cancelled first, otherwise whatever `fut` returns.
    pub async fn run<T, E, F>(&self, fut: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<ApiError>,
    {
        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(ApiError::Cancelled.into()),
            result = fut => result,
        }
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
