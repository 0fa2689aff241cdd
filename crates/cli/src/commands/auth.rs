//! Login, logout and profile.
//!
//! # Usage
//!
//! ```bash
//! # Log in, registering as a customer if the phone is new
//! cartaozinho login --phone "(11) 98765-4321" --name "Ana"
//!
//! # Register a merchant account
//! cartaozinho login --phone 11987654321 --name "Padaria Central" --merchant
//!
//! cartaozinho profile
//! cartaozinho logout --yes
//! ```

use std::io::{BufRead, Write};

use cartaozinho_client::LoginRequest;
use cartaozinho_core::UserRole;

use crate::context::{App, Console};
use crate::error::CliError;
use crate::render;

/// Log in by phone.
pub async fn login<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    phone: &str,
    name: Option<&str>,
    merchant: bool,
) -> Result<(), CliError> {
    let role = if merchant {
        UserRole::Merchant
    } else {
        UserRole::Customer
    };

    let mut request = LoginRequest::new(phone).with_role(role);
    if let Some(name) = name {
        request = request.with_name(name);
    }

    let user = app.scope().run(app.session().login(request)).await?;

    writeln!(
        console.out,
        "Welcome, {}! Logged in as {} ({}).",
        user.name,
        user.display_phone(),
        user.user_type
    )?;
    Ok(())
}

/// Log out after confirmation.
pub async fn logout<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    yes: bool,
) -> Result<(), CliError> {
    let Some(user) = app.session().current_user() else {
        writeln!(console.out, "Not logged in.")?;
        return Ok(());
    };

    console.confirm(&format!("Log out of {}?", user.name), yes)?;
    app.session().logout().await;

    writeln!(console.out, "Logged out.")?;
    Ok(())
}

/// Show the logged-in user.
pub fn profile<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
) -> Result<(), CliError> {
    let user = app.require_user()?;
    let account = match user.user_type {
        UserRole::Customer => "Customer",
        UserRole::Merchant => "Merchant",
    };
    let push = app.session().push_token().map_or_else(
        || "disabled".to_string(),
        |token| format!("enabled ({})", render::token_preview(&token)),
    );

    writeln!(console.out, "[{}] {}", user.initial(), user.name)?;
    writeln!(console.out, "  Phone:         {}", user.display_phone())?;
    writeln!(console.out, "  Account:       {account}")?;
    writeln!(console.out, "  Notifications: {push}")?;
    Ok(())
}
