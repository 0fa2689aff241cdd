//! Integration tests for the Cartãozinho client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cartaozinho-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session_flow` - Login, registration, restore and logout
//! - `customer_flow` - Cards, progress and redemption
//! - `merchant_flow` - Store setup, stamping and notifications
//!
//! Each test owns a [`TestBackend`]: a mock server answering under `/api`
//! like the real backend does.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;
use std::sync::Arc;

use cartaozinho_client::{
    ApiClient, ClientConfig, ConfiguredPushTokens, FileSessionStore, SessionController,
    SessionStore,
};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Push token handed to sessions that have notifications enabled.
pub const PUSH_TOKEN: &str = "ExponentPushToken[integration]";

/// Mock loyalty backend.
pub struct TestBackend {
    pub server: MockServer,
}

impl TestBackend {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL including `/api`.
    pub fn api_url(&self) -> String {
        format!("{}/api", self.server.uri())
    }

    /// Client configuration pointing at this backend.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URL is not a valid base URL.
    pub fn config(&self, data_dir: &Path, push_token: Option<&str>) -> ClientConfig {
        let mut config = ClientConfig::for_api_url(&self.api_url(), data_dir.to_path_buf())
            .unwrap_or_else(|e| panic!("mock server URL rejected: {e}"));
        config.push_token = push_token.map(str::to_string);
        config
    }

    /// API client for this backend.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    pub fn client(&self, data_dir: &Path) -> ApiClient {
        ApiClient::new(&self.config(data_dir, None))
            .unwrap_or_else(|e| panic!("client build failed: {e}"))
    }

    /// Session persisted in `data_dir`, as the CLI builds it.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    pub fn file_session(&self, data_dir: &Path, push_token: Option<&str>) -> SessionController {
        let config = self.config(data_dir, push_token);
        SessionController::new(
            ApiClient::new(&config).unwrap_or_else(|e| panic!("client build failed: {e}")),
            Arc::new(FileSessionStore::new(&config.data_dir)),
            Arc::new(ConfiguredPushTokens::new(config.push_token.clone())),
        )
    }

    /// Session over an arbitrary store.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    pub fn session_with_store(&self, store: Arc<dyn SessionStore>) -> SessionController {
        SessionController::new(
            self.client(Path::new("unused")),
            store,
            Arc::new(ConfiguredPushTokens::default()),
        )
    }

    /// `POST /auth/login` answers with `user`.
    pub async fn mount_login(&self, user: &Value) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user))
            .mount(&self.server)
            .await;
    }

    /// `POST /auth/login` answers 404 for every phone.
    pub async fn mount_unknown_phone(&self) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"error": "Usuário não encontrado"})),
            )
            .mount(&self.server)
            .await;
    }

    /// `POST /auth/register` expects `expected` fields and answers with `user`.
    pub async fn mount_register(&self, expected: Value, user: &Value) {
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .and(body_partial_json(expected))
            .respond_with(ResponseTemplate::new(201).set_body_json(user))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// `GET /stores/merchant/:id` answers with `store`, or 404 when `None`.
    pub async fn mount_merchant_store(&self, merchant_id: i32, store: Option<&Value>) {
        let response = store.map_or_else(
            || {
                ResponseTemplate::new(404)
                    .set_body_json(json!({"error": "Loja não encontrada"}))
            },
            |store| ResponseTemplate::new(200).set_body_json(store),
        );
        Mock::given(method("GET"))
            .and(path(format!("/api/stores/merchant/{merchant_id}")))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Number of requests the backend has received.
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn user_json(id: i32, name: &str, phone: &str, role: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "phone": phone,
        "user_type": role,
        "expo_push_token": null
    })
}

pub fn ana() -> Value {
    user_json(1, "Ana", "+5511987654321", "customer")
}

pub fn carlos() -> Value {
    user_json(3, "Carlos", "+5511912345678", "merchant")
}

pub fn store_json(id: i32, merchant_id: i32, stamps_required: u32, active: bool) -> Value {
    json!({
        "id": id,
        "merchant_id": merchant_id,
        "name": "Padaria Central",
        "description": "Pães e doces",
        "stamps_required": stamps_required,
        "reward_description": "Um pão de queijo",
        "is_active": active,
        "created_at": "2024-04-01T08:00:00.000Z"
    })
}

pub fn card_json(id: i32, stamps: u32, required: u32) -> Value {
    let completed = stamps >= required;
    let completed_at = if completed {
        json!("2024-05-10T10:00:00Z")
    } else {
        Value::Null
    };
    json!({
        "id": id,
        "store": {
            "id": 4,
            "name": "Padaria Central",
            "description": "Pães e doces",
            "stamps_required": required,
            "reward_description": "Um pão de queijo"
        },
        "stamps_count": stamps,
        "is_completed": completed,
        "completed_at": completed_at,
        "created_at": "2024-05-01T12:00:00Z"
    })
}
