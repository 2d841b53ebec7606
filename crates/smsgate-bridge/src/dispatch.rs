// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dispatch engines: the two ways a platform can get a text message out.
//
// `DirectSend` transmits immediately once authorized and never suspends.
// `MediatedCompose` presents the OS composer and suspends until its terminal
// event resolves the request context. Which one a build uses is decided by
// `cfg(target_os)` in `lib.rs`, never by runtime inspection.

use smsgate_core::config::BridgeConfig;
use smsgate_core::error::SmsGateError;
use smsgate_core::types::{DispatchOutcome, DispatchStrategy, SendRequest};
use tracing::{info, instrument, warn};

use crate::correlator::ResultCorrelator;
use crate::permission::PermissionGate;
use crate::traits::{NativeMessageComposer, NativePermissions, NativeSmsTransport, PlatformBridge};

/// One uniform contract over both dispatch models.
///
/// Every call produces exactly one outcome.
#[allow(async_fn_in_trait)]
pub trait DispatchEngine {
    fn strategy(&self) -> DispatchStrategy;

    async fn dispatch(&self, request: SendRequest) -> DispatchOutcome;

    /// The OS's answer to a permission prompt this engine issued.
    ///
    /// Returns `false` when the engine issued no prompt under `request_code`.
    fn authorization_result(&self, request_code: i32, granted: bool) -> bool {
        let _ = (request_code, granted);
        false
    }
}

// ---------------------------------------------------------------------------
// Direct send
// ---------------------------------------------------------------------------

/// Authorized → Segmented → Sent | Failed, all before returning.
pub struct DirectSend<P> {
    platform: P,
    gate: PermissionGate,
}

impl<P> DirectSend<P>
where
    P: PlatformBridge + NativePermissions + NativeSmsTransport,
{
    pub fn new(platform: P, config: &BridgeConfig) -> Self {
        Self {
            platform,
            gate: PermissionGate::new(config.permission_request_code),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    fn transmit(&self, request: &SendRequest) -> DispatchOutcome {
        let segments = self.platform.divide_message(&request.message);
        info!(
            parts = segments.len(),
            chars = request.message.chars().count(),
            platform = self.platform.platform_name(),
            "handing SMS to transport"
        );

        let sent = if segments.is_single() {
            self.platform
                .send_text_message(&request.phone_number, &request.message)
        } else {
            self.platform
                .send_multipart_text_message(&request.phone_number, &segments)
        };

        sent.map_err(|e| match e {
            SmsGateError::SendError(_) => e,
            other => SmsGateError::SendError(other.to_string()),
        })?;

        Ok(format!("SMS sent successfully to {}", request.phone_number))
    }
}

impl<P> DispatchEngine for DirectSend<P>
where
    P: PlatformBridge + NativePermissions + NativeSmsTransport,
{
    fn strategy(&self) -> DispatchStrategy {
        DispatchStrategy::DirectSend
    }

    #[instrument(skip_all, fields(request = %request.id, strategy = "direct"))]
    async fn dispatch(&self, request: SendRequest) -> DispatchOutcome {
        self.gate.ensure_authorized(&self.platform)?;
        self.transmit(&request)
    }

    fn authorization_result(&self, request_code: i32, granted: bool) -> bool {
        self.gate.on_authorization_result(request_code, granted)
    }
}

// ---------------------------------------------------------------------------
// Mediated compose
// ---------------------------------------------------------------------------

/// Presented → AwaitingUserAction → {Sent, Cancelled, SendFailed, Unknown}.
pub struct MediatedCompose<C> {
    composer: C,
    correlator: ResultCorrelator,
}

impl<C> MediatedCompose<C>
where
    C: PlatformBridge + NativeMessageComposer,
{
    pub fn new(composer: C) -> Self {
        Self {
            composer,
            correlator: ResultCorrelator::new(),
        }
    }

    pub fn composer(&self) -> &C {
        &self.composer
    }

    pub fn correlator(&self) -> &ResultCorrelator {
        &self.correlator
    }
}

impl<C> DispatchEngine for MediatedCompose<C>
where
    C: PlatformBridge + NativeMessageComposer,
{
    fn strategy(&self) -> DispatchStrategy {
        DispatchStrategy::MediatedCompose
    }

    #[instrument(skip_all, fields(request = %request.id, strategy = "compose"))]
    async fn dispatch(&self, request: SendRequest) -> DispatchOutcome {
        if !self.composer.can_send_text() {
            return Err(SmsGateError::NotAvailable);
        }

        let (pending, outcome) = self.correlator.bind(request.id)?;

        // `present_composer` drops `pending` on failure, releasing the slot;
        // the receiver is abandoned so only this error reaches the caller.
        self.composer.present_composer(&request, pending)?;
        info!(
            platform = self.composer.platform_name(),
            "composer presented; awaiting user"
        );

        match outcome.await {
            Ok(result) => result,
            Err(_) => {
                warn!("composer went away without a terminal event");
                Err(SmsGateError::Unknown)
            }
        }
    }
}
