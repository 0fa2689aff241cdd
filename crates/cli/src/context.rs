//! Shared state for one command run.

use std::future::Future;
use std::io::{BufRead, Write};
use std::sync::Arc;

use cartaozinho_client::{
    ApiClient, ApiError, ClientConfig, ConfiguredPushTokens, FileSessionStore, SessionController,
    SessionError, ViewScope,
};
use cartaozinho_core::{Store, User, UserRole};

use crate::error::CliError;

/// Session plus the cancellation scope of the running view.
pub struct App {
    session: SessionController,
    scope: ViewScope,
}

impl App {
    /// Build the session from configuration and restore the saved login.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub async fn start(config: &ClientConfig) -> Result<Self, CliError> {
        let session = SessionController::new(
            ApiClient::new(config)?,
            Arc::new(FileSessionStore::new(&config.data_dir)),
            Arc::new(ConfiguredPushTokens::new(config.push_token.clone())),
        );
        Ok(Self::with_session(session).await)
    }

    /// Wrap an existing controller and restore it.
    pub async fn with_session(session: SessionController) -> Self {
        session.restore().await;
        Self {
            session,
            scope: ViewScope::new(),
        }
    }

    pub const fn session(&self) -> &SessionController {
        &self.session
    }

    pub const fn api(&self) -> &ApiClient {
        self.session.api()
    }

    pub const fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Run a request in the view scope.
    pub async fn run<T, F>(&self, request: F) -> Result<T, CliError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        self.scope
            .run(async { request.await.map_err(CliError::from) })
            .await
    }

    /// The logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAuthenticated` when logged out.
    pub fn require_user(&self) -> Result<User, CliError> {
        self.session
            .current_user()
            .ok_or(CliError::Session(SessionError::NotAuthenticated))
    }

    /// The logged-in user, who must have `role`.
    ///
    /// # Errors
    ///
    /// Returns `CliError::WrongRole` for the other role.
    pub fn require_role(&self, role: UserRole) -> Result<User, CliError> {
        let user = self.require_user()?;
        if user.user_type == role {
            Ok(user)
        } else {
            Err(CliError::WrongRole { required: role })
        }
    }

    /// The merchant's store.
    ///
    /// # Errors
    ///
    /// Returns `CliError::NoStore` if none has been created.
    pub async fn require_store(&self, merchant: &User) -> Result<Store, CliError> {
        self.run(self.api().merchant_store(merchant.id))
            .await?
            .ok_or(CliError::NoStore)
    }
}

/// Terminal input and output.
pub struct Console<R, W> {
    input: R,
    /// Where command output goes.
    pub out: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub const fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// Ask a yes/no question unless `assume_yes` is set.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Aborted` unless the answer starts with `y` or `s`.
    pub fn confirm(&mut self, prompt: &str, assume_yes: bool) -> Result<(), CliError> {
        if assume_yes {
            return Ok(());
        }

        write!(self.out, "{prompt} [y/N] ")?;
        self.out.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;

        match answer.trim().chars().next() {
            Some('y' | 'Y' | 's' | 'S') => Ok(()),
            _ => Err(CliError::Aborted),
        }
    }
}
