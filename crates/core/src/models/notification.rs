//! Push notifications sent by merchants.

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, required_text};

/// Validated title and message of a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationDraft {
    title: String,
    message: String,
}

impl NotificationDraft {
    /// Validate a notification form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] if the title or message is blank.
    pub fn new(title: &str, message: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            title: required_text("title", title)?,
            message: required_text("message", message)?,
        })
    }

    /// Notification title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Notification body.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Backend acknowledgement of a notification send.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotificationReceipt {
    /// Whether anything was sent.
    pub success: bool,
    /// How many customers were notified.
    #[serde(default)]
    pub sent_count: u32,
    /// Explanation when nothing was sent.
    #[serde(default)]
    pub message: Option<String>,
}
