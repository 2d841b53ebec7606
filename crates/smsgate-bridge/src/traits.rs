// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the native messaging primitives.
//
// A platform implements either the direct-send pair (`NativePermissions` +
// `NativeSmsTransport`) or `NativeMessageComposer`. The dispatch engine for
// the target is chosen at build time in `lib.rs`.

use smsgate_core::error::Result;
use smsgate_core::types::{MessageSegments, PermissionState, SendRequest};

use crate::correlator::PendingCorrelation;
use crate::segment::MessageSegmenter;

/// Common identity of every platform bridge.
pub trait PlatformBridge {
    /// Human-readable platform name (e.g. "iOS", "Android").
    fn platform_name(&self) -> &str;
}

/// Runtime authorization to send SMS without user mediation.
pub trait NativePermissions {
    /// Current state, read from the OS on every call.
    fn sms_permission_state(&self) -> PermissionState;

    /// Ask the OS to prompt the user. Returns once the prompt is issued;
    /// the user's answer arrives out of band.
    fn request_sms_permission(&self, request_code: i32) -> Result<()>;
}

/// Fire-and-confirm SMS transmission.
pub trait NativeSmsTransport {
    /// Split a body the way the transport will. Platforms with a native
    /// primitive override this; the default is the 3GPP reference rule.
    fn divide_message(&self, message: &str) -> MessageSegments {
        MessageSegmenter.segment(message)
    }

    /// Hand a single-part message to the OS for transmission.
    fn send_text_message(&self, destination: &str, text: &str) -> Result<()>;

    /// Hand an ordered multi-part message to the OS for transmission.
    fn send_multipart_text_message(&self, destination: &str, parts: &MessageSegments)
    -> Result<()>;
}

/// OS-owned interactive composer.
pub trait NativeMessageComposer {
    /// Whether the device can present a text composer at all.
    fn can_send_text(&self) -> bool;

    /// Present a composer pre-filled from `request` and hand it `pending`,
    /// which must be resolved from the composer's terminal event.
    ///
    /// On error the implementation must drop `pending` before returning so
    /// the correlation slot is released.
    fn present_composer(&self, request: &SendRequest, pending: PendingCorrelation) -> Result<()>;
}
