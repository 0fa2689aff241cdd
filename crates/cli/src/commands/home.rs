//! Home view, parameterized by the logged-in user's role.
//!
//! Customers see their cards; merchants see their store and its customers.

use std::io::{BufRead, Write};

use cartaozinho_core::{User, UserRole};

use crate::context::{App, Console};
use crate::error::CliError;
use crate::render;

/// Show the home view for the logged-in user.
pub async fn show<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
) -> Result<(), CliError> {
    let user = app.require_user()?;
    writeln!(console.out, "Hello, {}!", user.name)?;
    writeln!(console.out)?;

    match user.user_type {
        UserRole::Customer => customer(app, console, &user).await,
        UserRole::Merchant => merchant(app, console, &user).await,
    }
}

async fn customer<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    user: &User,
) -> Result<(), CliError> {
    let cards = app.run(app.api().customer_cards(user.id)).await?;

    if cards.is_empty() {
        writeln!(console.out, "You have no loyalty cards yet.")?;
        writeln!(
            console.out,
            "Give your phone number at a partner store to collect your first stamp."
        )?;
        return Ok(());
    }

    for card in &cards {
        writeln!(console.out, "{}", render::card(card))?;
        writeln!(console.out)?;
    }

    let completed = cards.iter().filter(|card| card.is_completed).count();
    writeln!(
        console.out,
        "{} card(s), {completed} ready to redeem.",
        cards.len()
    )?;
    Ok(())
}

async fn merchant<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    user: &User,
) -> Result<(), CliError> {
    let Some(store) = app.run(app.api().merchant_store(user.id)).await? else {
        writeln!(console.out, "You have not set up your store yet.")?;
        writeln!(
            console.out,
            "Create it with: cartaozinho store save --name <name> --description <text> --stamps <3-20> --reward <text>"
        )?;
        return Ok(());
    };

    writeln!(console.out, "{}", render::store(&store))?;
    writeln!(console.out)?;

    let customers = app.run(app.api().store_customers(store.id)).await?;
    if customers.is_empty() {
        writeln!(console.out, "No customers yet.")?;
        return Ok(());
    }

    writeln!(console.out, "Customers ({}):", customers.len())?;
    for customer in &customers {
        writeln!(
            console.out,
            "  {}",
            render::customer_row(customer, store.stamps_required)
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::context::tests::{app_for, console, customer, merchant, output, store_json};

    #[tokio::test]
    async fn test_customer_home_lists_cards() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cards/customer/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "id": 1,
                "store": {
                    "id": 4,
                    "name": "Padaria Central",
                    "stamps_required": 10,
                    "reward_description": "Um pão de queijo"
                },
                "stamps_count": 7,
                "is_completed": false,
                "created_at": "2024-05-01T12:00:00Z"
            }])))
            .mount(&server)
            .await;

        let app = app_for(&server, Some(customer())).await;
        let mut console = console("");
        show(&app, &mut console).await.unwrap();

        let text = output(&console);
        assert!(text.contains("Padaria Central"));
        assert!(text.contains(" 70%"));
        assert!(text.contains("1 card(s), 0 ready to redeem."));
    }

    #[tokio::test]
    async fn test_customer_home_without_cards() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cards/customer/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let app = app_for(&server, Some(customer())).await;
        let mut console = console("");
        show(&app, &mut console).await.unwrap();
        assert!(output(&console).contains("no loyalty cards yet"));
    }

    #[tokio::test]
    async fn test_merchant_home_without_store() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/stores/merchant/3"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let app = app_for(&server, Some(merchant())).await;
        let mut console = console("");
        show(&app, &mut console).await.unwrap();
        assert!(output(&console).contains("not set up your store yet"));
    }

    #[tokio::test]
    async fn test_merchant_home_lists_customers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/stores/merchant/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(store_json()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/stores/4/customers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "id": 5,
                "name": "Bia",
                "phone": "+5521998765432",
                "stamps_count": 10,
                "is_completed": true,
                "card_id": 12,
                "card_created_at": "2024-04-10T09:00:00Z"
            }])))
            .mount(&server)
            .await;

        let app = app_for(&server, Some(merchant())).await;
        let mut console = console("");
        show(&app, &mut console).await.unwrap();

        let text = output(&console);
        assert!(text.contains("Padaria Central (active)"));
        assert!(text.contains("Customers (1):"));
        assert!(text.contains("(21) 99876-5432"));
    }

    #[tokio::test]
    async fn test_home_requires_login() {
        let server = MockServer::start().await;
        let app = app_for(&server, None).await;
        assert!(show(&app, &mut console("")).await.is_err());
    }
}
