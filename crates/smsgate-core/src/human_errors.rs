// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain-language error messages for the UI layer.
//
// Every bridge error is mapped to a short heading and a suggestion. Nothing
// here retries; `retry_after_user_action` only tells the UI whether offering
// a "try again" button makes sense once the user has done something.

use crate::error::SmsGateError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user chose this (e.g. closed the composer). Nothing went wrong.
    Informational,
    /// User must do something (grant access, insert a SIM, fix the number).
    ActionRequired,
    /// This device cannot send text messages from this app.
    Permanent,
    /// The app itself is misconfigured or wired up wrongly.
    Integration,
}

/// A human-readable error with heading and suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether sending again makes sense after the user acts.
    pub retry_after_user_action: bool,
    /// Drives icon/colour in UI.
    pub severity: Severity,
}

/// Convert an [`SmsGateError`] into a [`HumanError`].
pub fn humanize_error(err: &SmsGateError) -> HumanError {
    match err {
        SmsGateError::InvalidArgument(_) => HumanError {
            message: "The message couldn't be prepared.".into(),
            suggestion: "Enter a phone number and a message, then try again.".into(),
            retry_after_user_action: true,
            severity: Severity::ActionRequired,
        },

        SmsGateError::PermissionDenied => HumanError {
            message: "This app isn't allowed to send text messages yet.".into(),
            suggestion: "Tap \"Allow\" when asked (or enable SMS in the app's settings), then send again.".into(),
            retry_after_user_action: true,
            severity: Severity::ActionRequired,
        },

        SmsGateError::SendError(detail) => humanize_send_detail(detail),

        SmsGateError::NotAvailable => HumanError {
            message: "This device can't send text messages.".into(),
            suggestion: "Use a phone with a SIM card, or enable Messages on this device.".into(),
            retry_after_user_action: false,
            severity: Severity::Permanent,
        },

        SmsGateError::NoRootController => HumanError {
            message: "The message window couldn't be opened.".into(),
            suggestion: "Close and reopen the app, then try again.".into(),
            retry_after_user_action: true,
            severity: Severity::Integration,
        },

        SmsGateError::Cancelled => HumanError {
            message: "The message was not sent.".into(),
            suggestion: "You closed the message window. Send again whenever you're ready.".into(),
            retry_after_user_action: true,
            severity: Severity::Informational,
        },

        SmsGateError::SendFailed => HumanError {
            message: "The message couldn't be sent.".into(),
            suggestion: "Check that you have signal, then try again.".into(),
            retry_after_user_action: true,
            severity: Severity::ActionRequired,
        },

        SmsGateError::Unknown => HumanError {
            message: "Something unexpected happened while sending.".into(),
            suggestion: "Check the Messages app to see whether the message went out before sending again.".into(),
            retry_after_user_action: false,
            severity: Severity::Permanent,
        },

        SmsGateError::RequestInFlight => HumanError {
            message: "A message is already being written.".into(),
            suggestion: "Finish or close the open message window first.".into(),
            retry_after_user_action: true,
            severity: Severity::ActionRequired,
        },

        SmsGateError::Config(_) | SmsGateError::Io(_) | SmsGateError::Serialization(_) => {
            HumanError {
                message: "The app's settings couldn't be read.".into(),
                suggestion: format!("Reinstalling the app usually fixes this. ({err})"),
                retry_after_user_action: false,
                severity: Severity::Integration,
            }
        }
    }
}

/// Classify the native detail string of a direct-send failure.
fn humanize_send_detail(detail: &str) -> HumanError {
    // SmsManager reports result codes such as `RESULT_ERROR_NO_SERVICE`.
    let lower = detail.to_ascii_lowercase().replace('_', " ");

    if lower.contains("radio off")
        || lower.contains("airplane")
        || lower.contains("no service")
    {
        return HumanError {
            message: "Your phone has no mobile signal.".into(),
            suggestion: "Turn off airplane mode or move somewhere with signal, then try again.".into(),
            retry_after_user_action: true,
            severity: Severity::ActionRequired,
        };
    }

    if lower.contains("sim") {
        return HumanError {
            message: "No SIM card was found.".into(),
            suggestion: "Insert a SIM card, then try again.".into(),
            retry_after_user_action: true,
            severity: Severity::ActionRequired,
        };
    }

    if lower.contains("destination") || lower.contains("address") || lower.contains("number") {
        return HumanError {
            message: "That phone number doesn't look right.".into(),
            suggestion: "Check the number, including the country code, and try again.".into(),
            retry_after_user_action: true,
            severity: Severity::ActionRequired,
        };
    }

    HumanError {
        message: "The message couldn't be sent.".into(),
        suggestion: format!("Try again in a moment. ({detail})"),
        retry_after_user_action: true,
        severity: Severity::ActionRequired,
    }
}
