//! Text rendering for cards, stores and customers.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use cartaozinho_core::{
    LoyaltyCard, StampSlot, Store, StoreCustomer, progress_percentage, stamp_slots,
};

/// Cells in a progress bar.
const BAR_WIDTH: u32 = 10;

/// Stamps per row in a stamp grid.
const GRID_COLUMNS: usize = 5;

/// `[███████░░░]  70%`
#[must_use]
pub fn progress_bar(stamps: u32, required: u32) -> String {
    let percent = progress_percentage(stamps, required);
    // percent is clamped to 0..=100, so filled is at most BAR_WIDTH
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = ((percent / 100.0) * f64::from(BAR_WIDTH)).round() as u32;
    let filled = filled.min(BAR_WIDTH);

    format!(
        "[{}{}] {percent:>3.0}%",
        "█".repeat(filled as usize),
        "░".repeat((BAR_WIDTH - filled) as usize)
    )
}

/// Stamp grid, five per row: `●` for a stamp, `○` for a free slot.
#[must_use]
pub fn stamp_grid(stamps: u32, required: u32) -> String {
    stamp_slots(stamps, required)
        .chunks(GRID_COLUMNS)
        .map(|row| {
            row.iter()
                .map(|slot| match slot {
                    StampSlot::Filled => "●",
                    StampSlot::Empty => "○",
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `dd/mm/yyyy`
#[must_use]
pub fn date(at: &DateTime<Utc>) -> String {
    at.format("%d/%m/%Y").to_string()
}

/// `dd/mm/yyyy hh:mm`
#[must_use]
pub fn date_time(at: &DateTime<Utc>) -> String {
    at.format("%d/%m/%Y %H:%M").to_string()
}

/// Shorten a push token for display.
#[must_use]
pub fn token_preview(token: &str) -> String {
    const SHOWN: usize = 24;
    if token.chars().count() <= SHOWN {
        token.to_owned()
    } else {
        format!("{}…", token.chars().take(SHOWN).collect::<String>())
    }
}

/// Card block used by the customer home view and `card show`.
#[must_use]
pub fn card(card: &LoyaltyCard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", card.id, card.store.name);
    let _ = writeln!(
        out,
        "  {}  {}/{}",
        progress_bar(card.stamps_count, card.store.stamps_required),
        card.stamps_count,
        card.store.stamps_required
    );
    for row in stamp_grid(card.stamps_count, card.store.stamps_required).lines() {
        let _ = writeln!(out, "  {row}");
    }

    if card.is_completed {
        let _ = write!(out, "  Complete! Reward: {}", card.store.reward_description);
        if let Some(at) = &card.completed_at {
            let _ = write!(out, " (since {})", date(at));
        }
    } else {
        let _ = write!(
            out,
            "  {} to go for: {}",
            plural(card.stamps_remaining(), "stamp"),
            card.store.reward_description
        );
    }
    out
}

/// Store summary for the merchant views.
#[must_use]
pub fn store(store: &Store) -> String {
    let mut out = String::new();
    let status = if store.is_active { "active" } else { "inactive" };
    let _ = writeln!(out, "{} ({status})", store.name);
    if let Some(description) = store.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "  {description}");
    }
    let _ = write!(
        out,
        "  Reward after {}: {}",
        plural(store.stamps_required, "stamp"),
        store.reward_description
    );
    out
}

/// One line per customer in a store's customer list.
#[must_use]
pub fn customer_row(customer: &StoreCustomer, required: u32) -> String {
    let done = if customer.is_completed { " ✓" } else { "" };
    format!(
        "{:<20} {:<16} {} {}/{required}{done}",
        customer.name,
        customer.display_phone(),
        progress_bar(customer.stamps_count, required),
        customer.stamps_count
    )
}

/// `1 stamp`, `3 stamps`
#[must_use]
pub fn plural(count: u32, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
