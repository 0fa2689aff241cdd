//! Loyalty backend API client.
//!
//! One method per backend endpoint, grouped by area:
//!
//! - [`auth`](self::auth) - login and registration by phone
//! - [`cards`](self::cards) - a customer's loyalty cards and their history
//! - [`stores`](self::stores) - a merchant's store and its customers
//! - [`stamps`](self::stamps) - customer search and stamp issuing
//! - [`notifications`](self::notifications) - push notifications to customers
//! - [`diagnostics`](self::diagnostics) - health check and connectivity probes
//!
//! # API Reference
//!
//! - Base URL: configurable, production is `https://<host>/api`
//! - Authentication: none; the backend trusts the IDs the client sends
//! - Bodies: JSON in both directions
//!
//! Every call is a single round trip. Nothing is retried.

mod auth;
mod cards;
mod diagnostics;
mod error;
mod notifications;
mod stamps;
mod stores;

pub use auth::RegisterRequest;
pub use diagnostics::{AuthProbe, Ping, TestPushOutcome};
pub use error::ApiError;
pub use stamps::StampReceipt;

use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::debug;

use crate::config::ClientConfig;

/// Loyalty backend API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

/// Error body shape used by the backend: `{"error": "..."}`, sometimes
/// `{"message": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL cannot carry paths or the HTTP client
    /// fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        if config.api_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.api_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client: builder.build()?,
                base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
            }),
        })
    }

    /// The backend base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Execute a GET request and parse the JSON response.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = self.inner.client.get(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a POST request with a JSON body and parse the JSON response.
    pub(crate) async fn post<T: serde::de::DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Execute a PUT request with a JSON body and parse the JSON response.
    pub(crate) async fn put<T: serde::de::DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Execute a bodiless POST whose response body is ignored.
    pub(crate) async fn post_ack(&self, path: &str) -> Result<(), ApiError> {
        let response = self.inner.client.post(self.url(path)).send().await?;
        Self::handle_ack(response).await
    }

    /// Execute a bodiless PUT whose response body is ignored.
    pub(crate) async fn put_ack(&self, path: &str) -> Result<(), ApiError> {
        let response = self.inner.client.put(self.url(path)).send().await?;
        Self::handle_ack(response).await
    }

    /// Access to the underlying HTTP client for requests that need the raw
    /// response (status probes).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.client
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        self.url(path)
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            return serde_json::from_str(&body)
                .map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    async fn handle_ack(response: reqwest::Response) -> Result<(), ApiError> {
        if response.status().is_success() {
            return Ok(());
        }

        Err(Self::parse_error(response).await)
    }

    /// Parse an error response from the backend.
    async fn parse_error(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = error_message(&body);

        debug!(status, message = %message, "Backend returned an error");

        if status == 404 {
            return ApiError::NotFound(message);
        }

        ApiError::Api { status, message }
    }
}

/// Extract the server-provided message from an error body, falling back to
/// the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error.or(parsed.message))
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "Unknown error".to_string()
            } else {
                body.trim().to_string()
            }
        })
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}
