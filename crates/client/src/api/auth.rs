//! Login and registration.

use serde::Serialize;
use tracing::instrument;

use cartaozinho_core::{Phone, User, UserRole};

use super::{ApiClient, ApiError};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    phone: &'a str,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Phone in wire format.
    pub phone: Phone,
    /// Trimmed display name.
    pub name: String,
    /// Account role.
    pub user_type: UserRole,
    /// Push token to register with the account.
    pub expo_push_token: Option<String>,
}

impl ApiClient {
    /// Log in by phone number.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no account uses this phone, or any
    /// other `ApiError` if the request fails.
    #[instrument(skip(self, phone), fields(phone = %phone))]
    pub async fn login(&self, phone: &Phone) -> Result<User, ApiError> {
        self.post(
            "/auth/login",
            &LoginRequest {
                phone: phone.as_str(),
            },
        )
        .await
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self, request), fields(phone = %request.phone, role = %request.user_type))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        self.post("/auth/register", request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use cartaozinho_core::UserId;

    use super::*;
    use crate::api::tests::client_for;

    #[tokio::test]
    async fn test_login_sends_phone() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(serde_json::json!({"phone": "+5511987654321"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 1,
                "name": "Ana",
                "phone": "+5511987654321",
                "user_type": "customer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let phone = Phone::parse("(11) 98765-4321").unwrap();
        let user = client_for(&server).login(&phone).await.unwrap();
        assert_eq!(user.id, UserId::new(1));
    }

    #[tokio::test]
    async fn test_register_body_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .and(body_json(serde_json::json!({
                "phone": "+5511987654321",
                "name": "Ana",
                "user_type": "merchant",
                "expo_push_token": null
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 2,
                "name": "Ana",
                "phone": "+5511987654321",
                "user_type": "merchant"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = RegisterRequest {
            phone: Phone::parse("11987654321").unwrap(),
            name: "Ana".to_string(),
            user_type: UserRole::Merchant,
            expo_push_token: None,
        };
        let user = client_for(&server).register(&request).await.unwrap();
        assert_eq!(user.user_type, UserRole::Merchant);
    }
}
