//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered into the `#alert-container` element of the base page,
//! either as the target of an HTMX error response or as an out-of-band swap
//! alongside a successful response.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::transaction::{Notification, NotificationLevel};

/// An alert message with success or error styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// A success message.
    SuccessSimple { message: String },
    /// An error message with extra details.
    Error { message: String, details: String },
    /// An error message.
    ErrorSimple { message: String },
}

impl Alert {
    fn is_success(&self) -> bool {
        matches!(self, Alert::SuccessSimple { .. })
    }

    fn message_and_details(&self) -> (&str, Option<&str>) {
        match self {
            Alert::Error { message, details } => (message, Some(details)),
            Alert::SuccessSimple { message } | Alert::ErrorSimple { message } => (message, None),
        }
    }

    /// Render the alert on its own, e.g. for swapping into the alert container.
    pub fn into_html(self) -> Markup {
        let (container_style, icon) = if self.is_success() {
            (
                "flex items-start gap-3 p-4 mb-4 rounded-lg border \
                text-green-800 bg-green-50 border-green-300 \
                dark:bg-gray-800 dark:text-green-400 dark:border-green-800",
                "✓",
            )
        } else {
            (
                "flex items-start gap-3 p-4 mb-4 rounded-lg border \
                text-red-800 bg-red-50 border-red-300 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800",
                "!",
            )
        };
        let alert_type = if self.is_success() { "success" } else { "error" };
        let (message, details) = self.message_and_details();

        html!(
            div role="alert" data-alert-type=(alert_type) class=(container_style)
            {
                span aria-hidden="true" class="font-bold" { (icon) }

                div class="flex-1"
                {
                    p class="font-medium" { (message) }

                    @if let Some(details) = details {
                        p class="text-sm" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="ms-auto"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        )
    }

    /// Render the alert wrapped in an out-of-band swap of the alert container,
    /// so that it can be sent along with other content.
    pub fn into_oob_html(self) -> Markup {
        html!(
            div id="alert-container" hx-swap-oob="innerHTML"
            {
                (self.into_html())
            }
        )
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

impl From<Notification> for Alert {
    fn from(notification: Notification) -> Self {
        match notification.level {
            NotificationLevel::Success => Alert::SuccessSimple {
                message: notification.message,
            },
            NotificationLevel::Error => Alert::ErrorSimple {
                message: notification.message,
            },
        }
    }
}
