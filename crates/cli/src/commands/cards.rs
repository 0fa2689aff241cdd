//! Card details and redemption.
//!
//! # Usage
//!
//! ```bash
//! cartaozinho card show 12
//! cartaozinho card redeem 12
//! ```

use std::io::{BufRead, Write};

use cartaozinho_core::{CardId, UserRole};

use crate::context::{App, Console};
use crate::error::CliError;
use crate::render;

/// Show a card with its stamp history.
pub async fn show<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    card_id: CardId,
) -> Result<(), CliError> {
    app.require_user()?;

    let (card, history) = tokio::try_join!(
        app.run(app.api().card(card_id)),
        app.run(app.api().card_history(card_id)),
    )?;

    writeln!(console.out, "{}", render::card(&card))?;
    writeln!(console.out, "  Started on {}", render::date(&card.created_at))?;
    writeln!(console.out)?;

    if history.is_empty() {
        writeln!(console.out, "No stamps yet.")?;
        return Ok(());
    }

    writeln!(console.out, "History:")?;
    for (number, event) in history.iter().enumerate() {
        writeln!(
            console.out,
            "  {:>2}. {}",
            number + 1,
            render::date_time(&event.stamped_at)
        )?;
    }
    Ok(())
}

/// Redeem a completed card, resetting it to zero stamps.
pub async fn redeem<R: BufRead, W: Write>(
    app: &App,
    console: &mut Console<R, W>,
    card_id: CardId,
    yes: bool,
) -> Result<(), CliError> {
    app.require_role(UserRole::Customer)?;

    let card = app.run(app.api().card(card_id)).await?;
    if !card.can_redeem() {
        return Err(CliError::CardNotCompleted {
            card_id,
            remaining: card.stamps_remaining(),
        });
    }

    console.confirm(
        &format!(
            "Redeem \"{}\" at {}? Show this to the merchant; the card starts over.",
            card.store.reward_description, card.store.name
        ),
        yes,
    )?;

    app.run(app.api().reset_card(card_id)).await?;

    writeln!(
        console.out,
        "Reward redeemed: {}. Your card at {} starts over.",
        card.store.reward_description, card.store.name
    )?;
    Ok(())
}
