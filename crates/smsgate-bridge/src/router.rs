// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single entry point of the bridge: validate a named call, then dispatch.

use serde_json::Value;
use smsgate_core::config::BridgeConfig;
use smsgate_core::error::{Result, SmsGateError};
use smsgate_core::human_errors::humanize_error;
use smsgate_core::types::{MethodCall, MethodResponse, SEND_SMS_METHOD, SendRequest};
use tracing::{debug, info, instrument, warn};

use crate::dispatch::DispatchEngine;

/// Routes bridge calls to a dispatch engine.
pub struct RequestRouter<E> {
    engine: E,
    channel_name: String,
}

impl<E: DispatchEngine> RequestRouter<E> {
    pub fn new(engine: E, config: &BridgeConfig) -> Self {
        Self {
            engine,
            channel_name: config.channel_name.clone(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    /// Handle one call. Unknown names get [`MethodResponse::NotImplemented`];
    /// bad arguments fail before any permission check or dispatch.
    #[instrument(skip_all, fields(channel = %self.channel_name, method = %call.method))]
    pub async fn handle(&self, call: MethodCall) -> MethodResponse {
        if call.method != SEND_SMS_METHOD {
            debug!("unrecognised method");
            return MethodResponse::NotImplemented;
        }

        let request = match send_request_from(&call.arguments) {
            Ok(request) => request,
            Err(e) => {
                warn!(code = e.code(), hint = %failure_hint(&e), "rejected malformed call");
                return e.into();
            }
        };

        let strategy = self.engine.strategy();
        let outcome = self.engine.dispatch(request).await;
        match &outcome {
            Ok(_) => info!(?strategy, "SMS dispatched"),
            Err(e) => warn!(
                ?strategy,
                code = e.code(),
                error = %e,
                hint = %failure_hint(e),
                "SMS dispatch failed"
            ),
        }
        outcome.into()
    }

    /// Host entry point for the answer to a permission prompt.
    ///
    /// Nothing is resent; the caller issues `sendSMS` again.
    pub fn authorization_result(&self, request_code: i32, granted: bool) -> bool {
        let owned = self.engine.authorization_result(request_code, granted);
        if !owned {
            debug!(request_code, "permission result for another component");
        }
        owned
    }
}

/// What the user can do about `err`, for the log line.
fn failure_hint(err: &SmsGateError) -> String {
    humanize_error(err).suggestion
}

fn string_arg<'a>(arguments: &'a Value, name: &str) -> Option<&'a str> {
    arguments.get(name).and_then(Value::as_str)
}

fn send_request_from(arguments: &Value) -> Result<SendRequest> {
    match (
        string_arg(arguments, "phoneNumber"),
        string_arg(arguments, "message"),
    ) {
        (Some(phone_number), Some(message)) => SendRequest::new(phone_number, message),
        _ => Err(SmsGateError::InvalidArgument(
            "Phone number or message is missing".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use smsgate_core::types::PermissionState;

    use crate::dispatch::{DirectSend, MediatedCompose};
    use crate::fakes::{FakeComposer, FakePhone};

    fn router(state: PermissionState) -> RequestRouter<DirectSend<FakePhone>> {
        let config = BridgeConfig::default();
        RequestRouter::new(DirectSend::new(FakePhone::with_permission(state), &config), &config)
    }

    fn untouched(router: &RequestRouter<DirectSend<FakePhone>>) -> bool {
        let phone = router.engine().platform();
        phone.calls().is_empty() && phone.permission_requests().is_empty()
    }

    #[tokio::test]
    async fn unknown_method_is_not_implemented() {
        let router = router(PermissionState::Denied);
        let resp = router
            .handle(MethodCall::new("sendMMS", json!({ "phoneNumber": "1", "message": "m" })))
            .await;
        assert_eq!(resp, MethodResponse::NotImplemented);
        assert!(untouched(&router));
    }

    #[tokio::test]
    async fn missing_phone_number_is_invalid_argument() {
        let router = router(PermissionState::Denied);
        let resp = router
            .handle(MethodCall::new(SEND_SMS_METHOD, json!({ "message": "hi" })))
            .await;
        assert_eq!(resp.error_code(), Some("INVALID_ARGUMENT"));
        assert!(untouched(&router));
    }

    #[tokio::test]
    async fn missing_message_is_invalid_argument() {
        let router = router(PermissionState::Granted);
        let resp = router
            .handle(MethodCall::new(SEND_SMS_METHOD, json!({ "phoneNumber": "+15550100" })))
            .await;
        assert_eq!(resp.error_code(), Some("INVALID_ARGUMENT"));
        assert!(untouched(&router));
    }

    #[tokio::test]
    async fn non_string_arguments_are_invalid() {
        let router = router(PermissionState::Granted);
        for args in [
            json!({ "phoneNumber": 15550100, "message": "hi" }),
            json!({ "phoneNumber": "+15550100", "message": null }),
            json!(["+15550100", "hi"]),
            Value::Null,
        ] {
            let resp = router.handle(MethodCall::new(SEND_SMS_METHOD, args)).await;
            assert_eq!(resp.error_code(), Some("INVALID_ARGUMENT"));
        }
        assert!(untouched(&router));
    }

    #[tokio::test]
    async fn valid_call_returns_confirmation() {
        let router = router(PermissionState::Granted);
        let resp = router.handle(MethodCall::send_sms("+15550100", "hello")).await;
        assert_eq!(
            resp,
            MethodResponse::Success {
                result: json!("SMS sent successfully to +15550100"),
            }
        );
    }

    #[tokio::test]
    async fn permission_denied_surfaces_as_error_payload() {
        let router = router(PermissionState::Denied);
        let resp = router.handle(MethodCall::send_sms("+15550100", "hello")).await;
        assert_eq!(resp.error_code(), Some("PERMISSION_DENIED"));
        assert!(router.engine().platform().calls().is_empty());
    }

    #[test]
    fn permission_result_reaches_the_gate() {
        let router = router(PermissionState::Denied);
        assert!(router.authorization_result(123, true));
        assert!(!router.authorization_result(7, true));
        assert!(untouched(&router));
    }

    #[test]
    fn compose_engine_owns_no_permission_prompts() {
        let config = BridgeConfig::default();
        let router = RequestRouter::new(MediatedCompose::new(FakeComposer::available()), &config);
        assert!(!router.authorization_result(config.permission_request_code, true));
    }

    #[test]
    fn hint_keeps_native_detail() {
        let hint = failure_hint(&SmsGateError::SendError("RESULT_ERROR_NO_SERVICE".into()));
        assert!(hint.contains("airplane"));
        assert!(failure_hint(&SmsGateError::PermissionDenied).contains("Allow"));
    }
}
