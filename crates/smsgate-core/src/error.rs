// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the SMS gate.

use thiserror::Error;

/// Top-level error type for every bridge call.
///
/// Each variant corresponds to exactly one wire code returned across the
/// bridge (see [`SmsGateError::code`]). The `Display` text is sent back as
/// the error message.
#[derive(Debug, Error)]
pub enum SmsGateError {
    // -- Request validation --
    #[error("{0}")]
    InvalidArgument(String),

    // -- Direct send --
    #[error("SMS permission not granted")]
    PermissionDenied,

    #[error("Failed to send SMS: {0}")]
    SendError(String),

    // -- Mediated compose --
    #[error("SMS services are not available on this device")]
    NotAvailable,

    #[error("Could not find root view controller")]
    NoRootController,

    #[error("SMS was cancelled by user")]
    Cancelled,

    #[error("Failed to send SMS")]
    SendFailed,

    #[error("Unknown SMS error occurred")]
    Unknown,

    #[error("another SMS request is still awaiting the composer")]
    RequestInFlight,

    // -- Configuration --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SmsGateError {
    /// Wire code reported to the caller alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::SendError(_) => "SMS_SEND_ERROR",
            Self::NotAvailable => "SMS_NOT_AVAILABLE",
            Self::NoRootController => "NO_ROOT_CONTROLLER",
            Self::Cancelled => "SMS_CANCELLED",
            Self::SendFailed => "SMS_SEND_FAILED",
            Self::Unknown => "SMS_UNKNOWN_ERROR",
            Self::RequestInFlight => "SMS_IN_PROGRESS",
            Self::Config(_) | Self::Io(_) | Self::Serialization(_) => "CONFIG_ERROR",
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SmsGateError>;
