//! Cartãozinho Client - API client and session controller.
//!
//! Talks to the loyalty backend on behalf of a customer or a merchant:
//!
//! - [`api`] - one typed method per backend endpoint
//! - [`session`] - login, logout and session persistence
//! - [`scope`] - cancellation of a view's in-flight requests
//! - [`alert`] - user-facing failure messages
//! - [`config`] - configuration from the environment
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use cartaozinho_client::{
//!     ApiClient, ClientConfig, ConfiguredPushTokens, FileSessionStore, LoginRequest,
//!     SessionController,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let session = SessionController::new(
//!     ApiClient::new(&config)?,
//!     Arc::new(FileSessionStore::new(&config.data_dir)),
//!     Arc::new(ConfiguredPushTokens::new(config.push_token.clone())),
//! );
//!
//! session.restore().await;
//! let user = session.login(LoginRequest::new("(11) 98765-4321")).await?;
//! let cards = session.api().customer_cards(user.id).await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod alert;
pub mod api;
pub mod config;
pub mod scope;
pub mod session;

pub use alert::Alert;
pub use api::{ApiClient, ApiError};
pub use config::{ClientConfig, ConfigError};
pub use scope::ViewScope;
pub use session::{
    ConfiguredPushTokens, FileSessionStore, LoginRequest, MemorySessionStore, SessionController,
    SessionError, SessionState, SessionStore, StorageError,
};
