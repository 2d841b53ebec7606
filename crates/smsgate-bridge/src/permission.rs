// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Runtime authorization gate for the direct-send platform.
//
// The gate never waits for the user's answer. If authorization is missing it
// asks the OS to prompt, fails the current request with `PermissionDenied`,
// and leaves it to the caller to send again once access is granted.

use smsgate_core::error::{Result, SmsGateError};
use smsgate_core::types::PermissionState;
use tracing::{debug, info, warn};

use crate::traits::NativePermissions;

/// Checks, and if needed requests, the SMS send permission.
#[derive(Debug, Clone)]
pub struct PermissionGate {
    request_code: i32,
}

impl PermissionGate {
    pub fn new(request_code: i32) -> Self {
        Self { request_code }
    }

    pub fn request_code(&self) -> i32 {
        self.request_code
    }

    pub fn check_authorization<P: NativePermissions + ?Sized>(&self, platform: &P) -> PermissionState {
        platform.sms_permission_state()
    }

    /// Succeeds only when the permission is already granted.
    ///
    /// Otherwise an authorization prompt is issued (fire-and-forget) and the
    /// call fails with [`SmsGateError::PermissionDenied`].
    pub fn ensure_authorized<P: NativePermissions + ?Sized>(&self, platform: &P) -> Result<()> {
        let state = self.check_authorization(platform);
        debug!(?state, "SMS permission state");

        if state == PermissionState::Granted {
            return Ok(());
        }

        match platform.request_sms_permission(self.request_code) {
            Ok(()) => info!(?state, code = self.request_code, "SMS permission requested"),
            Err(e) => warn!(?state, error = %e, "could not issue SMS permission request"),
        }
        Err(SmsGateError::PermissionDenied)
    }

    /// Out-of-band hook for the OS's answer to a permission prompt.
    ///
    /// Only records the answer; a failed send is never resumed from here.
    /// Returns `false` if `request_code` belongs to someone else.
    pub fn on_authorization_result(&self, request_code: i32, granted: bool) -> bool {
        if request_code != self.request_code {
            return false;
        }
        if granted {
            info!("SMS permission granted; caller may send again");
        } else {
            warn!("SMS permission refused by user");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakePhone;

    #[test]
    fn granted_passes_without_prompt() {
        let phone = FakePhone::with_permission(PermissionState::Granted);
        let gate = PermissionGate::new(123);
        assert!(gate.ensure_authorized(&phone).is_ok());
        assert_eq!(phone.permission_requests(), Vec::<i32>::new());
    }

    #[test]
    fn denied_prompts_and_fails() {
        let phone = FakePhone::with_permission(PermissionState::Denied);
        let gate = PermissionGate::new(123);
        let err = gate.ensure_authorized(&phone).unwrap_err();
        assert!(matches!(err, SmsGateError::PermissionDenied));
        assert_eq!(phone.permission_requests(), vec![123]);
    }

    #[test]
    fn undetermined_prompts_and_fails() {
        let phone = FakePhone::with_permission(PermissionState::Undetermined);
        let gate = PermissionGate::new(9);
        assert!(gate.ensure_authorized(&phone).is_err());
        assert_eq!(phone.permission_requests(), vec![9]);
    }

    #[test]
    fn failed_prompt_still_reports_permission_denied() {
        let phone = FakePhone::with_permission(PermissionState::Denied);
        phone.fail_permission_request();
        let err = PermissionGate::new(1).ensure_authorized(&phone).unwrap_err();
        assert_eq!(err.code(), "PERMISSION_DENIED");
    }

    #[test]
    fn state_is_read_every_time() {
        let phone = FakePhone::with_permission(PermissionState::Denied);
        let gate = PermissionGate::new(123);
        assert!(gate.ensure_authorized(&phone).is_err());
        phone.set_permission(PermissionState::Granted);
        assert!(gate.ensure_authorized(&phone).is_ok());
    }

    #[test]
    fn foreign_request_codes_ignored() {
        let gate = PermissionGate::new(123);
        assert!(!gate.on_authorization_result(7, true));
        assert!(gate.on_authorization_result(123, true));
    }
}
