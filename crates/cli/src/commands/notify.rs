//! Push notifications to a store's customers.
//!
//! # Usage
//!
//! ```bash
//! # Every customer of the store
//! cartaozinho notify --title "Promo" --message "Carimbo em dobro hoje"
//!
//! # One customer
//! cartaozinho notify --title "Oi" --message "Falta pouco!" --customer 5
//! ```

use std::io::{BufRead, Write};

use cartaozinho_core::{NotificationDraft, UserId, UserRole};

use crate::context::{App, Console};
use crate::error::CliError;
use crate::render;

/// Send a notification to one customer or to all of them.
pub async fn send<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    title: &str,
    message: &str,
    customer_id: Option<UserId>,
) -> Result<(), CliError> {
    let user = app.require_role(UserRole::Merchant)?;
    let draft = NotificationDraft::new(title, message)?;
    let store = app.require_store(&user).await?;

    let receipt = app
        .run(app.api().send_notification(store.id, &draft, customer_id))
        .await?;

    if receipt.success {
        writeln!(
            console.out,
            "Notification sent to {}.",
            render::plural(receipt.sent_count, "customer")
        )?;
    } else {
        writeln!(
            console.out,
            "{}",
            receipt
                .message
                .as_deref()
                .unwrap_or("No notification was sent.")
        )?;
    }
    Ok(())
}
