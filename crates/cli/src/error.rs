//! CLI error type.

use cartaozinho_client::{Alert, ApiError, ConfigError, SessionError};
use cartaozinho_core::{CardId, UserRole, ValidationError};
use thiserror::Error;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A session operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Input rejected before any request.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Reading the confirmation or writing output failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The command needs a different role.
    #[error("this command is only available to {required} accounts")]
    WrongRole {
        /// Role the command needs.
        required: UserRole,
    },

    /// The merchant has not created a store yet.
    #[error("you have not set up your store yet; run `cartaozinho store save` first")]
    NoStore,

    /// The card cannot be redeemed yet.
    #[error("card {card_id} is not complete ({remaining} stamps to go)")]
    CardNotCompleted {
        /// Card asked for.
        card_id: CardId,
        /// Stamps still missing.
        remaining: u32,
    },

    /// The user declined a confirmation.
    #[error("cancelled")]
    Aborted,
}

impl CliError {
    /// Render as a blocking alert.
    #[must_use]
    pub fn alert(&self) -> Alert {
        match self {
            Self::Api(e) => e.into(),
            Self::Session(e) => e.into(),
            Self::Validation(e) => e.into(),
            Self::Config(_) => Alert::new("Configuration error", self.to_string()),
            Self::Io(_) => Alert::new("Terminal error", self.to_string()),
            Self::WrongRole { .. } => Alert::new("Not available", self.to_string()),
            Self::NoStore => Alert::new("No store", self.to_string()),
            Self::CardNotCompleted { .. } => Alert::new("Card not complete", self.to_string()),
            Self::Aborted => Alert::new("Cancelled", "Nothing was changed."),
        }
    }
}
