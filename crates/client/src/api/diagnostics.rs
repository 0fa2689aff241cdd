//! Health check and connectivity probes.
//!
//! These calls report what the backend answered instead of failing on
//! non-success statuses, so they can be shown side by side in a
//! diagnostics view.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use cartaozinho_core::HealthReport;

use super::{ApiClient, ApiError};

/// Phone used to exercise the login route without a real account.
const PROBE_PHONE: &str = "+5511999999999";

/// Result of a `HEAD /health` round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ping {
    /// HTTP status returned.
    pub status: u16,
    /// Time from send to response headers.
    pub latency: Duration,
}

impl Ping {
    /// Returns `true` if the backend answered with a success status.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Result of posting a throwaway phone to the login route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthProbe {
    /// HTTP status returned.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl AuthProbe {
    /// Returns `true` if the login route is wired up.
    ///
    /// 404 (unknown phone) and 400 (rejected input) both prove the route
    /// answered.
    #[must_use]
    pub const fn endpoint_works(&self) -> bool {
        matches!(self.status, 200..=299 | 400 | 404)
    }
}

/// Result of `POST /test/push`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPushOutcome {
    /// Whether the backend reported the push as sent.
    pub success: bool,
    /// HTTP status returned.
    pub status: u16,
    /// Backend message or error text.
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
struct TestPushRequest<'a> {
    expo_push_token: &'a str,
    title: &'a str,
    message: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct TestPushBody {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct ProbeRequest<'a> {
    phone: &'a str,
}

impl ApiClient {
    /// Fetch the backend health report.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the report is malformed.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthReport, ApiError> {
        self.get("/health").await
    }

    /// Time a `HEAD /health` request.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if no response arrives.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<Ping, ApiError> {
        let started = Instant::now();
        let response = self.http().head(self.endpoint("/health")).send().await?;
        let ping = Ping {
            status: response.status().as_u16(),
            latency: started.elapsed(),
        };

        debug!(status = ping.status, latency_ms = ping.latency.as_millis(), "Ping");
        Ok(ping)
    }

    /// Post a throwaway phone to `/auth/login` and report the raw answer.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if no response arrives.
    #[instrument(skip(self))]
    pub async fn probe_auth(&self) -> Result<AuthProbe, ApiError> {
        let response = self
            .http()
            .post(self.endpoint("/auth/login"))
            .json(&ProbeRequest { phone: PROBE_PHONE })
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(status, "Auth probe answered");
        Ok(AuthProbe { status, body })
    }

    /// Ask the backend to send a push to `push_token`.
    ///
    /// The body is read whatever the status; `success` reflects the body's
    /// own flag.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if no response arrives.
    #[instrument(skip(self, push_token))]
    pub async fn test_push(
        &self,
        push_token: &str,
        title: &str,
        message: &str,
    ) -> Result<TestPushOutcome, ApiError> {
        let response = self
            .http()
            .post(self.endpoint("/test/push"))
            .json(&TestPushRequest {
                expo_push_token: push_token,
                title,
                message,
            })
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body: TestPushBody = serde_json::from_str(&text).unwrap_or_default();

        Ok(TestPushOutcome {
            success: body.success,
            status,
            message: body.error.or(body.message).or_else(|| {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }),
        })
    }
}
