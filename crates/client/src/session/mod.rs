//! Session management.
//!
//! - [`store`] - persistence of the logged-in user
//! - [`push`] - notification permission and push tokens
//! - [`controller`] - the login/logout state machine

pub mod controller;
pub mod push;
pub mod store;

pub use controller::{LoginRequest, SessionController, SessionError, SessionState};
pub use push::{
    ConfiguredPushTokens, PermissionStatus, PushError, PushTokenProvider, acquire_push_token,
};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StorageError};
