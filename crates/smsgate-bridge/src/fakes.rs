// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recording doubles for the native primitives, used by unit tests.

use std::cell::{Cell, RefCell};

use smsgate_core::error::{Result, SmsGateError};
use smsgate_core::types::{MessageSegments, PermissionState, SendRequest};

use crate::correlator::PendingCorrelation;
use crate::traits::{NativeMessageComposer, NativePermissions, NativeSmsTransport, PlatformBridge};

/// A transmission primitive invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Single { destination: String, text: String },
    Multipart { destination: String, parts: Vec<String> },
}

/// Direct-send handset.
pub struct FakePhone {
    permission: Cell<PermissionState>,
    permission_requests: RefCell<Vec<i32>>,
    permission_request_fails: Cell<bool>,
    send_failure: RefCell<Option<String>>,
    calls: RefCell<Vec<TransportCall>>,
}

impl FakePhone {
    pub fn with_permission(state: PermissionState) -> Self {
        Self {
            permission: Cell::new(state),
            permission_requests: RefCell::new(Vec::new()),
            permission_request_fails: Cell::new(false),
            send_failure: RefCell::new(None),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn set_permission(&self, state: PermissionState) {
        self.permission.set(state);
    }

    pub fn fail_permission_request(&self) {
        self.permission_request_fails.set(true);
    }

    pub fn fail_sends_with(&self, detail: &str) {
        *self.send_failure.borrow_mut() = Some(detail.to_string());
    }

    pub fn permission_requests(&self) -> Vec<i32> {
        self.permission_requests.borrow().clone()
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: TransportCall) -> Result<()> {
        if let Some(detail) = self.send_failure.borrow().as_ref() {
            return Err(SmsGateError::SendError(detail.clone()));
        }
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

impl PlatformBridge for FakePhone {
    fn platform_name(&self) -> &str {
        "Fake phone"
    }
}

impl NativePermissions for FakePhone {
    fn sms_permission_state(&self) -> PermissionState {
        self.permission.get()
    }

    fn request_sms_permission(&self, request_code: i32) -> Result<()> {
        self.permission_requests.borrow_mut().push(request_code);
        if self.permission_request_fails.get() {
            return Err(SmsGateError::SendError("no foreground activity".into()));
        }
        Ok(())
    }
}

impl NativeSmsTransport for FakePhone {
    fn send_text_message(&self, destination: &str, text: &str) -> Result<()> {
        self.record(TransportCall::Single {
            destination: destination.into(),
            text: text.into(),
        })
    }

    fn send_multipart_text_message(
        &self,
        destination: &str,
        parts: &MessageSegments,
    ) -> Result<()> {
        self.record(TransportCall::Multipart {
            destination: destination.into(),
            parts: parts.parts().to_vec(),
        })
    }
}

/// Mediated-compose device. Holds the presented request context until the
/// test plays the terminal event.
pub struct FakeComposer {
    can_send: bool,
    has_root: bool,
    covered: Cell<bool>,
    pending: RefCell<Option<PendingCorrelation>>,
    last_request: RefCell<Option<SendRequest>>,
    presentations: Cell<usize>,
}

impl FakeComposer {
    fn new(can_send: bool, has_root: bool) -> Self {
        Self {
            can_send,
            has_root,
            covered: Cell::new(false),
            pending: RefCell::new(None),
            last_request: RefCell::new(None),
            presentations: Cell::new(0),
        }
    }

    pub fn available() -> Self {
        Self::new(true, true)
    }

    pub fn unavailable() -> Self {
        Self::new(false, true)
    }

    pub fn without_root() -> Self {
        Self::new(true, false)
    }

    /// Another modal sits on the root and swallows presentations until
    /// [`FakeComposer::uncover`].
    pub fn covered() -> Self {
        let composer = Self::available();
        composer.covered.set(true);
        composer
    }

    pub fn uncover(&self) {
        self.covered.set(false);
    }

    pub fn take_pending(&self) -> Option<PendingCorrelation> {
        self.pending.borrow_mut().take()
    }

    pub fn last_request(&self) -> Option<SendRequest> {
        self.last_request.borrow().clone()
    }

    pub fn presentations(&self) -> usize {
        self.presentations.get()
    }
}

impl PlatformBridge for FakeComposer {
    fn platform_name(&self) -> &str {
        "Fake composer"
    }
}

impl NativeMessageComposer for FakeComposer {
    fn can_send_text(&self) -> bool {
        self.can_send
    }

    fn present_composer(&self, request: &SendRequest, pending: PendingCorrelation) -> Result<()> {
        if !self.has_root {
            return Err(SmsGateError::NoRootController);
        }
        self.presentations.set(self.presentations.get() + 1);
        *self.last_request.borrow_mut() = Some(request.clone());
        if self.covered.get() {
            assert_eq!(pending.request_id(), request.id);
            return Err(SmsGateError::NoRootController);
        }
        *self.pending.borrow_mut() = Some(pending);
        Ok(())
    }
}
