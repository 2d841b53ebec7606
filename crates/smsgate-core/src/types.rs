// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the SMS gate bridge.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{Result, SmsGateError};

/// The only call name the bridge recognises.
pub const SEND_SMS_METHOD: &str = "sendSMS";

/// Unique identifier for a send request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single "send this text to this number" request.
///
/// Constructed per bridge call and owned by that call until it completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub id: RequestId,
    pub phone_number: String,
    pub message: String,
}

impl SendRequest {
    /// Build a request, rejecting empty recipient or body.
    pub fn new(phone_number: impl Into<String>, message: impl Into<String>) -> Result<Self> {
        let phone_number = phone_number.into();
        let message = message.into();
        if phone_number.trim().is_empty() || message.is_empty() {
            return Err(SmsGateError::InvalidArgument(
                "Phone number or message is empty".into(),
            ));
        }
        Ok(Self {
            id: RequestId::new(),
            phone_number,
            message,
        })
    }
}

/// Runtime authorization to transmit without user mediation.
///
/// Read from the platform on every request; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionState {
    Granted,
    /// The user has refused at least once.
    Denied,
    /// Never asked, or the platform cannot tell.
    Undetermined,
}

/// Character encoding the transport will use for a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentEncoding {
    /// GSM 03.38 default alphabet, 7 bits per character.
    Gsm7,
    /// UCS-2, 16 bits per UTF-16 unit.
    Ucs2,
}

/// Ordered transport-sized parts of one message body.
///
/// Always holds at least one part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSegments(Vec<String>);

impl MessageSegments {
    /// Wrap parts produced by a segmentation primitive. An empty list
    /// becomes a single empty part so the invariant holds.
    pub fn from_parts(parts: Vec<String>) -> Self {
        if parts.is_empty() {
            Self(vec![String::new()])
        } else {
            Self(parts)
        }
    }

    pub fn single(message: impl Into<String>) -> Self {
        Self(vec![message.into()])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_single(&self) -> bool {
        self.0.len() == 1
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

/// Which dispatch model the platform uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchStrategy {
    /// Transmit immediately once authorized; no UI.
    DirectSend,
    /// Hand the message to an OS composer and await the user.
    MediatedCompose,
}

/// Terminal event of a mediated compose flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComposeResult {
    Cancelled,
    Sent,
    Failed,
    /// A value the OS added after this code was written.
    Unrecognized(i64),
}

impl ComposeResult {
    /// Map the native `MessageComposeResult` integer.
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            0 => Self::Cancelled,
            1 => Self::Sent,
            2 => Self::Failed,
            other => Self::Unrecognized(other),
        }
    }

    /// The outcome delivered to the waiting caller.
    pub fn into_outcome(self) -> DispatchOutcome {
        match self {
            Self::Sent => Ok("SMS sent successfully".into()),
            Self::Cancelled => Err(SmsGateError::Cancelled),
            Self::Failed => Err(SmsGateError::SendFailed),
            Self::Unrecognized(_) => Err(SmsGateError::Unknown),
        }
    }
}

/// Produced exactly once per [`SendRequest`]: a confirmation text or a
/// failure carrying kind and detail.
pub type DispatchOutcome = Result<String>;

/// A named call arriving over the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    /// Convenience constructor for a `sendSMS` call.
    pub fn send_sms(phone_number: &str, message: &str) -> Self {
        Self::new(
            SEND_SMS_METHOD,
            serde_json::json!({ "phoneNumber": phone_number, "message": message }),
        )
    }
}

/// What the bridge hands back for a [`MethodCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodResponse {
    Success {
        result: Value,
    },
    Error {
        code: String,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
    },
    /// The call name is not supported. Distinct from an error.
    NotImplemented,
}

impl MethodResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The error code, if this is an error response.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Error { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<SmsGateError> for MethodResponse {
    fn from(err: SmsGateError) -> Self {
        Self::Error {
            code: err.code().to_string(),
            message: err.to_string(),
            details: None,
        }
    }
}

impl From<DispatchOutcome> for MethodResponse {
    fn from(outcome: DispatchOutcome) -> Self {
        match outcome {
            Ok(confirmation) => Self::Success {
                result: Value::String(confirmation),
            },
            Err(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_rejected() {
        assert!(matches!(
            SendRequest::new("", "hi"),
            Err(SmsGateError::InvalidArgument(_))
        ));
        assert!(matches!(
            SendRequest::new("+15550100", ""),
            Err(SmsGateError::InvalidArgument(_))
        ));
    }

    #[test]
    fn each_request_gets_its_own_id() {
        let a = SendRequest::new("+15550100", "hi").unwrap();
        let b = SendRequest::new("+15550100", "hi").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn compose_result_mapping() {
        assert_eq!(ComposeResult::from_raw(0), ComposeResult::Cancelled);
        assert_eq!(ComposeResult::from_raw(1), ComposeResult::Sent);
        assert_eq!(ComposeResult::from_raw(2), ComposeResult::Failed);
        assert_eq!(ComposeResult::from_raw(7), ComposeResult::Unrecognized(7));

        assert!(ComposeResult::Sent.into_outcome().is_ok());
        assert!(matches!(
            ComposeResult::Cancelled.into_outcome(),
            Err(SmsGateError::Cancelled)
        ));
        assert!(matches!(
            ComposeResult::Failed.into_outcome(),
            Err(SmsGateError::SendFailed)
        ));
        assert!(matches!(
            ComposeResult::Unrecognized(9).into_outcome(),
            Err(SmsGateError::Unknown)
        ));
    }

    #[test]
    fn segments_never_empty() {
        let segs = MessageSegments::from_parts(Vec::new());
        assert_eq!(segs.len(), 1);
        assert!(segs.is_single());
        assert!(!segs.is_empty());
    }

    #[test]
    fn error_becomes_code_and_message() {
        let resp = MethodResponse::from(SmsGateError::NoRootController);
        assert_eq!(resp.error_code(), Some("NO_ROOT_CONTROLLER"));
        match resp {
            MethodResponse::Error { message, details, .. } => {
                assert_eq!(message, "Could not find root view controller");
                assert!(details.is_none());
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn response_wire_shape() {
        let json = serde_json::to_value(MethodResponse::NotImplemented).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "not_implemented" }));

        let call: MethodCall =
            serde_json::from_str(r#"{"method":"sendSMS","arguments":{"phoneNumber":"1","message":"m"}}"#)
                .unwrap();
        assert_eq!(call, MethodCall::send_sms("1", "m"));
    }
}
