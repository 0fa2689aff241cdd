//! Session state machine.
//!
//! ```text
//! Uninitialized -> Restoring -> Authenticated | Anonymous
//! Anonymous -> Authenticating -> Authenticated | Anonymous
//! Authenticated -> LoggingOut -> Anonymous
//! ```
//!
//! The controller is the only writer of [`SessionState`]. Views read it
//! through [`SessionController::subscribe`].
//!
//! `logout` may run from any state. A login or restore still in flight when
//! it starts finishes without publishing or saving its user.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tracing::{info, instrument, warn};

use cartaozinho_core::{Phone, User, UserRole, ValidationError};

use super::push::{PushTokenProvider, acquire_push_token};
use super::store::SessionStore;
use crate::api::{ApiClient, ApiError, RegisterRequest, TestPushOutcome};

/// Title of the self-test push.
const TEST_PUSH_TITLE: &str = "🧪 Teste de notificação";

/// How long `restore` waits for the platform to hand out a push token.
pub const DEFAULT_PUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur during session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Input rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No account uses this phone and no name was given to create one.
    #[error("no account for this phone; a name is required to register")]
    NotRegistered,

    /// The operation is not allowed in the current state.
    #[error("cannot {action} while {state}")]
    InvalidState {
        /// Operation attempted.
        action: &'static str,
        /// State at the time.
        state: &'static str,
    },

    /// The operation needs a logged-in user.
    #[error("not logged in")]
    NotAuthenticated,

    /// Notification permission was not granted on this device.
    #[error("no push token on this device")]
    NoPushToken,

    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// `restore` has not run.
    #[default]
    Uninitialized,
    /// Reading the saved session.
    Restoring,
    /// Nobody is logged in.
    Anonymous,
    /// A login is in flight.
    Authenticating,
    /// A user is logged in.
    Authenticated(User),
    /// Clearing the saved session.
    LoggingOut,
}

impl SessionState {
    /// The logged-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Returns `true` while a user is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Returns `true` for the transient states a view shows as loading.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(
            self,
            Self::Uninitialized | Self::Restoring | Self::Authenticating | Self::LoggingOut
        )
    }

    /// Short lowercase name, for logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Restoring => "restoring",
            Self::Anonymous => "logged out",
            Self::Authenticating => "logging in",
            Self::Authenticated(_) => "logged in",
            Self::LoggingOut => "logging out",
        }
    }
}

/// Input to [`SessionController::login`].
#[derive(Debug, Clone)]
pub struct LoginRequest {
    phone: String,
    name: Option<String>,
    role: UserRole,
}

impl LoginRequest {
    /// Log in with the phone as typed (masked or raw).
    #[must_use]
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            name: None,
            role: UserRole::default(),
        }
    }

    /// Name to register with if the phone is unknown. Blank names are
    /// ignored.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        self.name = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Role to register with if the phone is unknown.
    #[must_use]
    pub const fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }
}

/// Owns the session and publishes its state.
pub struct SessionController {
    api: ApiClient,
    store: Arc<dyn SessionStore>,
    push: Arc<dyn PushTokenProvider>,
    state: watch::Sender<SessionState>,
    push_token: RwLock<Option<String>>,
    push_timeout: Duration,
    restored: AtomicBool,
    /// Held across every write to `store`, so a save and a clear never
    /// interleave.
    persist: Mutex<()>,
}

impl SessionController {
    /// Create a controller in the `Uninitialized` state.
    #[must_use]
    pub fn new(
        api: ApiClient,
        store: Arc<dyn SessionStore>,
        push: Arc<dyn PushTokenProvider>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        Self {
            api,
            store,
            push,
            state,
            push_token: RwLock::new(None),
            push_timeout: DEFAULT_PUSH_TIMEOUT,
            restored: AtomicBool::new(false),
            persist: Mutex::new(()),
        }
    }

    /// Override how long `restore` waits for a push token.
    #[must_use]
    pub const fn with_push_timeout(mut self, timeout: Duration) -> Self {
        self.push_timeout = timeout;
        self
    }

    /// The API client requests go through.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// The logged-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    /// The push token obtained during `restore`, if any.
    #[must_use]
    pub fn push_token(&self) -> Option<String> {
        self.push_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_push_token(&self, token: Option<String>) {
        *self
            .push_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// Move from `from` to `to` if the state is currently `from`.
    fn transition(&self, from: &SessionState, to: SessionState) -> bool {
        self.state.send_if_modified(|state| {
            if state == from {
                *state = to;
                true
            } else {
                false
            }
        })
    }

    /// Load the saved session and the push token.
    ///
    /// Only the first call does anything; later calls return the current
    /// state. Storage and push failures are logged and leave the session
    /// logged out or without a token respectively. If `logout` ran first, the
    /// saved session is not read and only the push token is acquired.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> SessionState {
        if self.restored.swap(true, Ordering::AcqRel) {
            return self.state();
        }

        if !self.transition(&SessionState::Uninitialized, SessionState::Restoring) {
            let token = self.fetch_push_token().await;
            self.set_push_token(token);
            return self.state();
        }

        let (saved, token) = tokio::join!(self.store.load(), self.fetch_push_token());

        self.set_push_token(token);

        let next = match saved {
            Ok(Some(user)) => {
                info!(user_id = %user.id, "Session restored");
                SessionState::Authenticated(user)
            }
            Ok(None) => SessionState::Anonymous,
            Err(e) => {
                warn!(error = %e, "Saved session unreadable, starting logged out");
                SessionState::Anonymous
            }
        };

        if !self.transition(&SessionState::Restoring, next) {
            info!("Logged out during restore, discarding saved session");
        }
        self.state()
    }

    async fn fetch_push_token(&self) -> Option<String> {
        tokio::time::timeout(self.push_timeout, acquire_push_token(self.push.as_ref()))
            .await
            .unwrap_or_else(|_| {
                warn!(timeout = ?self.push_timeout, "Timed out waiting for push token");
                None
            })
    }

    /// Log in by phone, registering when the phone is unknown and a name is
    /// given.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidState` unless logged out, or if `logout` ran
    ///   before the backend answered; the user is then neither published nor
    ///   saved
    /// - `SessionError::Validation` for a malformed phone; nothing is sent
    /// - `SessionError::NotRegistered` for an unknown phone without a name
    /// - `SessionError::Api` for any other backend failure
    #[instrument(skip(self, request), fields(role = %request.role))]
    pub async fn login(&self, request: LoginRequest) -> Result<User, SessionError> {
        let current = self.state.borrow().name();
        if !matches!(*self.state.borrow(), SessionState::Anonymous) {
            return Err(SessionError::InvalidState {
                action: "log in",
                state: current,
            });
        }

        let phone = Phone::parse(&request.phone).map_err(ValidationError::from)?;

        if !self.transition(&SessionState::Anonymous, SessionState::Authenticating) {
            return Err(SessionError::InvalidState {
                action: "log in",
                state: self.state.borrow().name(),
            });
        }
        let _guard = AuthenticatingGuard(&self.state);

        let user = self
            .authenticate(&phone, request.name, request.role)
            .await?;

        let _persist = self.persist.lock().await;
        if !self.transition(
            &SessionState::Authenticating,
            SessionState::Authenticated(user.clone()),
        ) {
            info!(user_id = %user.id, "Logged out before login finished, discarding user");
            return Err(SessionError::InvalidState {
                action: "finish logging in",
                state: self.state.borrow().name(),
            });
        }

        if let Err(e) = self.store.save(&user).await {
            warn!(error = %e, "Failed to persist session");
        }

        info!(user_id = %user.id, "Logged in");
        Ok(user)
    }

    async fn authenticate(
        &self,
        phone: &Phone,
        name: Option<String>,
        role: UserRole,
    ) -> Result<User, SessionError> {
        match self.api.login(phone).await {
            Ok(user) => Ok(user),
            Err(e) if e.is_not_found() => {
                let Some(name) = name else {
                    return Err(SessionError::NotRegistered);
                };

                info!("Phone not registered, creating account");
                let request = RegisterRequest {
                    phone: phone.clone(),
                    name,
                    user_type: role,
                    expo_push_token: self.push_token(),
                };
                Ok(self.api.register(&request).await?)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Log out. Always ends logged out; a failure to clear the saved session
    /// is logged.
    ///
    /// Waits for a save already in progress, then clears after it.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let previous = self.state.send_replace(SessionState::LoggingOut);

        let _persist = self.persist.lock().await;
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Failed to clear saved session");
        }

        self.state.send_replace(SessionState::Anonymous);
        info!(from = previous.name(), "Logged out");
    }

    /// Ask the backend to push a greeting to this device.
    ///
    /// # Errors
    ///
    /// - `SessionError::NotAuthenticated` when logged out
    /// - `SessionError::NoPushToken` when this device has no token
    /// - `SessionError::Api` if the request does not get a response
    #[instrument(skip(self))]
    pub async fn test_push_notification(&self) -> Result<TestPushOutcome, SessionError> {
        let user = self.current_user().ok_or(SessionError::NotAuthenticated)?;
        let token = self.push_token().ok_or(SessionError::NoPushToken)?;

        let message = format!("Olá {}! Esta é uma notificação de teste. 🎉", user.name);
        Ok(self.api.test_push(&token, TEST_PUSH_TITLE, &message).await?)
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("api", &self.api)
            .field("state", &self.state.borrow().name())
            .finish_non_exhaustive()
    }
}

/// Returns the session to `Anonymous` if a login ends without reaching
/// `Authenticated`, including when the login future is dropped.
struct AuthenticatingGuard<'a>(&'a watch::Sender<SessionState>);

impl Drop for AuthenticatingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_if_modified(|state| {
            if *state == SessionState::Authenticating {
                *state = SessionState::Anonymous;
                true
            } else {
                false
            }
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use cartaozinho_core::{PhoneError, UserId};

    use super::*;
    use crate::api::tests::client_for;
    use crate::session::push::{ConfiguredPushTokens, PermissionStatus, PushError};
    use crate::session::store::{MemorySessionStore, StorageError};

    fn user_json(id: i32, role: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": "Ana",
            "phone": "+5511987654321",
            "user_type": role
        })
    }

    fn ana() -> User {
        serde_json::from_value(user_json(1, "customer")).unwrap()
    }

    fn controller(
        server: &MockServer,
        store: Arc<dyn SessionStore>,
        token: Option<&str>,
    ) -> SessionController {
        SessionController::new(
            client_for(server),
            store,
            Arc::new(ConfiguredPushTokens::new(token.map(str::to_string))),
        )
    }

    struct UnreadableStore;

    #[async_trait]
    impl SessionStore for UnreadableStore {
        async fn load(&self) -> Result<Option<User>, StorageError> {
            Err(serde_json::from_str::<User>("{").unwrap_err().into())
        }

        async fn save(&self, _user: &User) -> Result<(), StorageError> {
            Err(std::io::Error::other("read-only").into())
        }

        async fn clear(&self) -> Result<(), StorageError> {
            Err(std::io::Error::other("read-only").into())
        }
    }

    /// Store whose `load` reads right away but answers late.
    struct SlowStore {
        inner: MemorySessionStore,
        delay: Duration,
    }

    #[async_trait]
    impl SessionStore for SlowStore {
        async fn load(&self) -> Result<Option<User>, StorageError> {
            let saved = self.inner.load().await;
            tokio::time::sleep(self.delay).await;
            saved
        }

        async fn save(&self, user: &User) -> Result<(), StorageError> {
            self.inner.save(user).await
        }

        async fn clear(&self) -> Result<(), StorageError> {
            self.inner.clear().await
        }
    }

    /// Push provider that fails, or never answers when `stall` is set.
    struct FaultyPush {
        stall: bool,
    }

    #[async_trait]
    impl PushTokenProvider for FaultyPush {
        async fn permission_status(&self) -> Result<PermissionStatus, PushError> {
            if self.stall {
                std::future::pending::<()>().await;
            }
            Err(PushError::Provider("platform service down".to_string()))
        }

        async fn request_permission(&self) -> Result<PermissionStatus, PushError> {
            Ok(PermissionStatus::Granted)
        }

        async fn push_token(&self) -> Result<String, PushError> {
            Ok("ExponentPushToken[never]".to_string())
        }
    }

    fn controller_with_push(
        server: &MockServer,
        store: Arc<dyn SessionStore>,
        push: FaultyPush,
    ) -> SessionController {
        SessionController::new(client_for(server), store, Arc::new(push))
            .with_push_timeout(Duration::from_millis(50))
    }

    #[tokio::test]
    async fn test_restore_with_saved_user() {
        let server = MockServer::start().await;
        let session = controller(
            &server,
            Arc::new(MemorySessionStore::with_user(ana())),
            Some("ExponentPushToken[abc]"),
        );

        assert_eq!(session.state(), SessionState::Uninitialized);
        let state = session.restore().await;
        assert_eq!(state, SessionState::Authenticated(ana()));
        assert_eq!(session.push_token().as_deref(), Some("ExponentPushToken[abc]"));
    }

    #[tokio::test]
    async fn test_restore_runs_once() {
        let server = MockServer::start().await;
        let store = Arc::new(MemorySessionStore::new());
        let session = controller(&server, store.clone(), None);

        assert_eq!(session.restore().await, SessionState::Anonymous);
        store.save(&ana()).await.unwrap();
        assert_eq!(session.restore().await, SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_restore_unreadable_store_is_anonymous() {
        let server = MockServer::start().await;
        let session = controller(&server, Arc::new(UnreadableStore), None);

        assert_eq!(session.restore().await, SessionState::Anonymous);
        assert_eq!(session.push_token(), None);
    }

    #[tokio::test]
    async fn test_login_existing_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json(1, "customer")))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemorySessionStore::new());
        let session = controller(&server, store.clone(), None);
        session.restore().await;

        let user = session
            .login(LoginRequest::new("(11) 98765-4321"))
            .await
            .unwrap();
        assert_eq!(user.id, UserId::new(1));
        assert!(session.state().is_authenticated());
        assert_eq!(store.load().await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn test_login_unknown_phone_registers_with_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"error": "Usuário não encontrado"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .and(body_partial_json(serde_json::json!({
                "phone": "+5511987654321",
                "name": "Ana",
                "user_type": "merchant",
                "expo_push_token": "ExponentPushToken[abc]"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(user_json(9, "merchant")))
            .expect(1)
            .mount(&server)
            .await;

        let session = controller(
            &server,
            Arc::new(MemorySessionStore::new()),
            Some("ExponentPushToken[abc]"),
        );
        session.restore().await;

        let user = session
            .login(
                LoginRequest::new("11987654321")
                    .with_name(" Ana ")
                    .with_role(UserRole::Merchant),
            )
            .await
            .unwrap();
        assert!(user.user_type.is_merchant());
    }

    #[tokio::test]
    async fn test_login_unknown_phone_without_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let session = controller(&server, Arc::new(MemorySessionStore::new()), None);
        session.restore().await;

        let err = session
            .login(LoginRequest::new("11987654321").with_name("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NotRegistered));
        assert_eq!(session.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_login_short_phone_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let session = controller(&server, Arc::new(MemorySessionStore::new()), None);
        session.restore().await;

        let err = session
            .login(LoginRequest::new("(11) 9999-999"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::Phone(PhoneError::TooShort { .. }))
        ));
        assert_eq!(session.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_login_server_error_returns_to_anonymous() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let session = controller(&server, Arc::new(MemorySessionStore::new()), None);
        session.restore().await;

        let err = session
            .login(LoginRequest::new("11987654321"))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Api(ApiError::Api { status: 500, .. })));
        assert_eq!(session.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_login_before_restore_rejected() {
        let server = MockServer::start().await;
        let session = controller(&server, Arc::new(MemorySessionStore::new()), None);

        let err = session
            .login(LoginRequest::new("11987654321"))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_login_persist_failure_still_authenticates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json(1, "customer")))
            .mount(&server)
            .await;

        let session = controller(&server, Arc::new(UnreadableStore), None);
        session.restore().await;

        session
            .login(LoginRequest::new("11987654321"))
            .await
            .unwrap();
        assert!(session.state().is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_store_fails() {
        let server = MockServer::start().await;
        let session = controller(&server, Arc::new(UnreadableStore), None);
        session.restore().await;

        session.logout().await;
        assert_eq!(session.state(), SessionState::Anonymous);
        assert_eq!(session.current_user(), None);
    }

    #[tokio::test]
    async fn test_logout_publishes_to_subscribers() {
        let server = MockServer::start().await;
        let store = Arc::new(MemorySessionStore::with_user(ana()));
        let session = controller(&server, store.clone(), None);
        session.restore().await;

        let mut rx = session.subscribe();
        assert!(rx.borrow_and_update().is_authenticated());

        session.logout().await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), SessionState::Anonymous);
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_push_without_token() {
        let server = MockServer::start().await;
        let session = controller(
            &server,
            Arc::new(MemorySessionStore::with_user(ana())),
            None,
        );
        session.restore().await;

        let err = session.test_push_notification().await.unwrap_err();
        assert!(matches!(err, SessionError::NoPushToken));
    }

    #[tokio::test]
    async fn test_push_greets_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/test/push"))
            .and(body_partial_json(serde_json::json!({
                "expo_push_token": "ExponentPushToken[abc]"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let session = controller(
            &server,
            Arc::new(MemorySessionStore::with_user(ana())),
            Some("ExponentPushToken[abc]"),
        );
        session.restore().await;

        let outcome = session.test_push_notification().await.unwrap();
        assert!(outcome.success);

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body["message"].as_str().unwrap().contains("Ana"));
    }

    #[tokio::test]
    async fn test_restore_survives_failing_push_provider() {
        let server = MockServer::start().await;
        let session = controller_with_push(
            &server,
            Arc::new(MemorySessionStore::with_user(ana())),
            FaultyPush { stall: false },
        );

        assert_eq!(session.restore().await, SessionState::Authenticated(ana()));
        assert_eq!(session.push_token(), None);
    }

    #[tokio::test]
    async fn test_restore_gives_up_on_stalled_push_provider() {
        let server = MockServer::start().await;
        let session = controller_with_push(
            &server,
            Arc::new(MemorySessionStore::new()),
            FaultyPush { stall: true },
        );

        let state = tokio::time::timeout(Duration::from_secs(5), session.restore())
            .await
            .unwrap();
        assert_eq!(state, SessionState::Anonymous);
        assert_eq!(session.push_token(), None);
    }

    #[tokio::test]
    async fn test_logout_during_login_discards_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(user_json(1, "customer"))
                    .set_delay(Duration::from_millis(300)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemorySessionStore::new());
        let session = controller(&server, store.clone(), None);
        session.restore().await;

        let (result, ()) = tokio::join!(session.login(LoginRequest::new("11987654321")), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            assert_eq!(session.state(), SessionState::Authenticating);
            session.logout().await;
        });

        assert!(matches!(result, Err(SessionError::InvalidState { .. })));
        assert_eq!(session.state(), SessionState::Anonymous);
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_during_restore_discards_saved_user() {
        let server = MockServer::start().await;
        let store = Arc::new(SlowStore {
            inner: MemorySessionStore::with_user(ana()),
            delay: Duration::from_millis(200),
        });
        let session = controller(&server, store.clone(), None);

        let (state, ()) = tokio::join!(session.restore(), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            session.logout().await;
        });

        assert_eq!(state, SessionState::Anonymous);
        assert_eq!(session.state(), SessionState::Anonymous);
        assert_eq!(store.inner.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_before_restore_still_acquires_token() {
        let server = MockServer::start().await;
        let store = Arc::new(MemorySessionStore::with_user(ana()));
        let session = controller(&server, store.clone(), Some("ExponentPushToken[abc]"));

        session.logout().await;
        assert_eq!(session.state(), SessionState::Anonymous);

        assert_eq!(session.restore().await, SessionState::Anonymous);
        assert_eq!(session.push_token().as_deref(), Some("ExponentPushToken[abc]"));
        assert_eq!(store.load().await.unwrap(), None);
    }
}
