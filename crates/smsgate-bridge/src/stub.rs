// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where no SMS transport exists.
//
// Behaves as a direct-send platform with no runtime permission model. Sends
// fail with `SendError` unless dry-run is enabled, in which case they are
// logged and accepted.

use smsgate_core::error::{Result, SmsGateError};
use smsgate_core::types::{MessageSegments, PermissionState};

use crate::traits::*;

/// Direct-send bridge returned on non-mobile platforms.
pub struct StubBridge {
    dry_run: bool,
}

impl StubBridge {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    fn transmit(&self, parts: usize, chars: usize) -> Result<()> {
        if self.dry_run {
            tracing::info!(parts, chars, "dry run: SMS accepted by stub bridge");
            Ok(())
        } else {
            tracing::warn!("SMS send called on stub bridge");
            Err(SmsGateError::SendError(
                "no SMS transport on this platform".into(),
            ))
        }
    }
}

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl NativePermissions for StubBridge {
    fn sms_permission_state(&self) -> PermissionState {
        PermissionState::Granted
    }

    fn request_sms_permission(&self, _request_code: i32) -> Result<()> {
        Ok(())
    }
}

impl NativeSmsTransport for StubBridge {
    fn send_text_message(&self, _destination: &str, text: &str) -> Result<()> {
        self.transmit(1, text.chars().count())
    }

    fn send_multipart_text_message(
        &self,
        _destination: &str,
        parts: &MessageSegments,
    ) -> Result<()> {
        let chars = parts.parts().iter().map(|p| p.chars().count()).sum();
        self.transmit(parts.len(), chars)
    }
}
