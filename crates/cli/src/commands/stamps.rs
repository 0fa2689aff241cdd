//! Stamp issuing.
//!
//! # Usage
//!
//! ```bash
//! cartaozinho stamp add --phone "(21) 99876-5432"
//! ```

use std::io::{BufRead, Write};

use cartaozinho_core::{Phone, UserRole, ValidationError};

use crate::context::{App, Console};
use crate::error::CliError;
use crate::render;

/// Find a customer by phone and add one stamp to their card at the
/// merchant's store.
pub async fn add<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    phone: &str,
    yes: bool,
) -> Result<(), CliError> {
    let user = app.require_role(UserRole::Merchant)?;
    let phone = Phone::parse(phone).map_err(ValidationError::from)?;
    let store = app.require_store(&user).await?;

    let customer = app
        .run(app.api().search_customer(&phone, store.id))
        .await?;

    writeln!(
        console.out,
        "{} {}  {} {}/{}",
        customer.name,
        customer.display_phone(),
        render::progress_bar(customer.stamps_count, store.stamps_required),
        customer.stamps_count,
        store.stamps_required
    )?;

    console.confirm(&format!("Add a stamp for {}?", customer.name), yes)?;

    let receipt = app
        .run(app.api().add_stamp(customer.id, store.id, user.id))
        .await?;

    writeln!(
        console.out,
        "{}",
        receipt.message.as_deref().unwrap_or("Stamp added.")
    )?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cartaozinho_client::ApiError;
    use cartaozinho_core::PhoneError;
    use wiremock::matchers::{any, body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::context::tests::{app_for, console, customer, merchant, output, store_json};

    async fn mount_store_and_customer(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/stores/merchant/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(store_json()))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/customers/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 5,
                "name": "Bia",
                "phone": "+5521998765432",
                "stamps_count": 4
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_add_stamp() {
        let server = MockServer::start().await;
        mount_store_and_customer(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/stamps/add"))
            .and(body_json(serde_json::json!({
                "customer_id": 5,
                "store_id": 4,
                "stamped_by": 3
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "message": "Carimbo adicionado! 5/10"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let app = app_for(&server, Some(merchant())).await;
        let mut console = console("");
        add(&app, &mut console, "(21) 99876-5432", true)
            .await
            .unwrap();

        let text = output(&console);
        assert!(text.contains("Bia (21) 99876-5432"));
        assert!(text.contains("4/10"));
        assert!(text.contains("Carimbo adicionado! 5/10"));
    }

    #[tokio::test]
    async fn test_add_stamp_declined_sends_no_stamp() {
        let server = MockServer::start().await;
        mount_store_and_customer(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/stamps/add"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let app = app_for(&server, Some(merchant())).await;
        let err = add(&app, &mut console("n\n"), "21998765432", false)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Aborted));
    }

    #[tokio::test]
    async fn test_unknown_customer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/stores/merchant/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(store_json()))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/customers/search"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"error": "Cliente não encontrado"})),
            )
            .mount(&server)
            .await;

        let app = app_for(&server, Some(merchant())).await;
        let err = add(&app, &mut console(""), "21998765432", true)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Api(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_short_phone_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let app = app_for(&server, Some(merchant())).await;
        let err = add(&app, &mut console(""), "(11) 9999-999", true)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Validation(ValidationError::Phone(PhoneError::TooShort { .. }))
        ));
    }

    #[tokio::test]
    async fn test_customers_cannot_stamp() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let app = app_for(&server, Some(customer())).await;
        let err = add(&app, &mut console(""), "21998765432", true)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::WrongRole { .. }));
    }
}
