//! Merchant store management.
//!
//! # Usage
//!
//! ```bash
//! cartaozinho store show
//!
//! # Create the store, or update it if it exists
//! cartaozinho store save --name "Padaria Central" --description "Pães e doces" \
//!     --stamps 10 --reward "Um pão de queijo"
//!
//! cartaozinho store toggle
//! ```

use std::io::{BufRead, Write};

use cartaozinho_core::{StoreDraft, UserRole};
use tracing::info;

use crate::context::{App, Console};
use crate::error::CliError;
use crate::render;

/// Store form as given on the command line.
#[derive(Debug, Clone)]
pub struct StoreForm {
    pub name: String,
    pub description: String,
    pub stamps: String,
    pub reward: String,
}

/// Show the merchant's store.
pub async fn show<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
) -> Result<(), CliError> {
    let user = app.require_role(UserRole::Merchant)?;
    let store = app.require_store(&user).await?;

    writeln!(console.out, "{}", render::store(&store))?;
    if let Some(created_at) = &store.created_at {
        writeln!(console.out, "  Open since {}", render::date(created_at))?;
    }
    Ok(())
}

/// Create the merchant's store, or update it if one exists.
pub async fn save<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    form: &StoreForm,
) -> Result<(), CliError> {
    let user = app.require_role(UserRole::Merchant)?;
    let draft = StoreDraft::new(&form.name, &form.description, &form.stamps, &form.reward)?;

    let saved = match app.run(app.api().merchant_store(user.id)).await? {
        Some(existing) => {
            app.run(app.api().update_store(existing.id, user.id, &draft))
                .await?
        }
        None => {
            let store = app.run(app.api().create_store(user.id, &draft)).await?;
            info!(store_id = %store.id, "Store created");
            store
        }
    };

    writeln!(console.out, "Store saved.")?;
    writeln!(console.out, "{}", render::store(&saved))?;
    Ok(())
}

/// Activate or deactivate the store after confirmation.
pub async fn toggle<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    yes: bool,
) -> Result<(), CliError> {
    let user = app.require_role(UserRole::Merchant)?;
    let store = app.require_store(&user).await?;

    let (verb, now) = if store.is_active {
        ("Deactivate", "inactive")
    } else {
        ("Activate", "active")
    };
    console.confirm(&format!("{verb} {}?", store.name), yes)?;

    app.run(app.api().toggle_store(store.id)).await?;

    writeln!(console.out, "{} is now {now}.", store.name)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cartaozinho_core::ValidationError;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::context::tests::{app_for, console, merchant, output, store_json};

    fn form(stamps: &str) -> StoreForm {
        StoreForm {
            name: "Padaria Central".to_string(),
            description: "Pães e doces".to_string(),
            stamps: stamps.to_string(),
            reward: "Um pão de queijo".to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_out_of_range_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let app = app_for(&server, Some(merchant())).await;
        let err = save(&app, &mut console(""), &form("25")).await.unwrap_err();
        assert!(matches!(
            err,
            CliError::Validation(ValidationError::OutOfRange { value: 25, .. })
        ));
    }

    #[tokio::test]
    async fn test_save_creates_when_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/stores/merchant/3"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/stores"))
            .and(body_partial_json(serde_json::json!({
                "merchant_id": 3,
                "stamps_required": 10
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(store_json()))
            .expect(1)
            .mount(&server)
            .await;

        let app = app_for(&server, Some(merchant())).await;
        let mut console = console("");
        save(&app, &mut console, &form("10")).await.unwrap();
        assert!(output(&console).contains("Store saved."));
    }

    #[tokio::test]
    async fn test_save_updates_existing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/stores/merchant/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(store_json()))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/stores/4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(store_json()))
            .expect(1)
            .mount(&server)
            .await;

        let app = app_for(&server, Some(merchant())).await;
        save(&app, &mut console(""), &form("10")).await.unwrap();
    }

    #[tokio::test]
    async fn test_toggle_declined() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/stores/merchant/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(store_json()))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/stores/4/toggle"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let app = app_for(&server, Some(merchant())).await;
        let mut console = console("no\n");
        let err = toggle(&app, &mut console, false).await.unwrap_err();
        assert!(matches!(err, CliError::Aborted));
        assert!(output(&console).contains("Deactivate Padaria Central?"));
    }

    #[tokio::test]
    async fn test_show_without_store() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/stores/merchant/3"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let app = app_for(&server, Some(merchant())).await;
        let err = show(&app, &mut console("")).await.unwrap_err();
        assert!(matches!(err, CliError::NoStore));
    }
}
