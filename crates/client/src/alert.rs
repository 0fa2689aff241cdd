//! User-facing failure messages.
//!
//! Every failure a view can hit is turned into an [`Alert`]: a title and a
//! body to show in a blocking dialog. Network failures name the URL and the
//! usual causes; backend failures carry the server's own message;
//! validation failures name the field.

use core::fmt;
use std::error::Error as _;

use cartaozinho_core::{PhoneError, ValidationError};

use crate::api::ApiError;
use crate::session::SessionError;

/// A blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Short heading.
    pub title: String,
    /// Details, possibly several lines.
    pub body: String,
}

impl Alert {
    /// Build an alert from parts.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Alert for a request that never reached the backend.
    #[must_use]
    pub fn network(url: Option<&str>, cause: &str) -> Self {
        let url = url.unwrap_or("(unknown)");
        Self::new(
            "Network error",
            format!(
                "Could not connect to the server.\n\n\
                 URL: {url}\n\n\
                 Possible causes:\n\
                 • Server offline\n\
                 • Wrong URL\n\
                 • Firewall blocking the connection\n\n\
                 Error: {cause}"
            ),
        )
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.title, self.body)
    }
}

impl From<&ApiError> for Alert {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::Network(e) => {
                let mut cause = e.to_string();
                let mut source = e.source();
                while let Some(inner) = source {
                    cause = format!("{cause}: {inner}");
                    source = inner.source();
                }
                Self::network(e.url().map(url::Url::as_str), &cause)
            }
            ApiError::NotFound(message) => Self::new("Not found", message.clone()),
            ApiError::Api { status, message } => {
                Self::new("Error", format!("{message}\n\nStatus: {status}"))
            }
            ApiError::Parse(message) => Self::new("Unexpected response", message.clone()),
            ApiError::Cancelled => Self::new("Cancelled", "The request was cancelled."),
            ApiError::InvalidUrl(url) => Self::new("Configuration error", format!("Invalid URL: {url}")),
        }
    }
}

impl From<&ValidationError> for Alert {
    fn from(err: &ValidationError) -> Self {
        let title = match err {
            ValidationError::Phone(_) => "Invalid phone",
            ValidationError::EmptyField { .. } => "Missing field",
            ValidationError::NotANumber { .. } | ValidationError::OutOfRange { .. } => {
                "Invalid value"
            }
        };
        Self::new(title, err.to_string())
    }
}

impl From<&PhoneError> for Alert {
    fn from(err: &PhoneError) -> Self {
        Self::from(&ValidationError::Phone(err.clone()))
    }
}

impl From<&SessionError> for Alert {
    fn from(err: &SessionError) -> Self {
        match err {
            SessionError::Validation(e) => e.into(),
            SessionError::Api(e) => e.into(),
            SessionError::NotRegistered => Self::new(
                "Registration required",
                "No account uses this phone. Provide a name to create one.",
            ),
            SessionError::InvalidState { .. } => Self::new("Please wait", err.to_string()),
            SessionError::NotAuthenticated => Self::new("Not logged in", "Log in first."),
            SessionError::NoPushToken => Self::new(
                "Notifications disabled",
                "This device has no push token. Allow notifications and try again.",
            ),
        }
    }
}
