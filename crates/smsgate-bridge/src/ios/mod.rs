// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// iOS platform bridge via objc2.
//
// Requires compilation with the iOS SDK (Xcode). iOS offers no direct-send
// API, so this bridge implements `NativeMessageComposer` over
// `MFMessageComposeViewController` (MessageUI.framework). All UIKit
// interaction requires the main thread.
//
// ## Flow
//
// `present_composer` builds the composer, hands the request context to a
// `ComposeDelegate`, and presents modally on the topmost view controller
// (the root, or whatever modal it is already showing). When
// the user finishes, `messageComposeViewController:didFinishWithResult:`
// dismisses the sheet and resolves the context. Nothing blocks: the caller's
// future is woken through the context's one-shot channel while the main run
// loop keeps pumping.
//
// UIKit refuses a presentation it cannot perform by logging, not by
// failing. After presenting, the composer's `presentingViewController` is
// checked; if it is nil the delegate will never fire, so the request context
// is dropped and the call fails with `NoRootController`.
//
// ## Unsafe code
//
// 1. **ObjC message sends** (msg_send!, define_class! #[unsafe(...)]):
//    Required by the objc2 runtime. Selectors are those documented in the
//    MessageUI and UIKit SDK headers.
// 2. **Main-thread affinity**: every send below happens after a
//    `MainThreadMarker` has been obtained, and the delegate class is
//    `MainThreadOnly`.

#![cfg(target_os = "ios")]

use std::cell::RefCell;
use std::ffi::c_void;

use objc2::rc::Retained;
use objc2::runtime::{AnyObject, NSObject};
use objc2::{DefinedClass, MainThreadMarker, MainThreadOnly, define_class, msg_send};
use objc2_foundation::{NSArray, NSString};
use objc2_ui_kit::{UIApplication, UIViewController};

use smsgate_core::error::{Result, SmsGateError};
use smsgate_core::types::{ComposeResult, SendRequest};

use crate::correlator::PendingCorrelation;
use crate::modal::topmost_presenter;
use crate::traits::*;

// MFMessageComposeViewController lives in MessageUI, which objc2-ui-kit does
// not pull in.
#[link(name = "MessageUI", kind = "framework")]
unsafe extern "C" {}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Obtain the root `UIViewController` from the key window, if any.
///
/// Uses the deprecated `keyWindow` property for broad iOS-version compat.
fn root_view_controller(mtm: MainThreadMarker) -> Option<Retained<UIViewController>> {
    let app = UIApplication::sharedApplication(mtm);

    // SAFETY: msg_send! to well-known UIApplication/UIWindow selectors
    // (keyWindow, rootViewController). `mtm` proves we are on the main thread.
    unsafe {
        let window: Option<Retained<AnyObject>> = msg_send![&app, keyWindow];
        window.and_then(|w| msg_send![&w, rootViewController])
    }
}

/// The view controller to present on: the root, or the modal on top of it.
fn presenting_view_controller(mtm: MainThreadMarker) -> Option<Retained<UIViewController>> {
    let root = root_view_controller(mtm)?;
    // SAFETY: presentedViewController is a UIViewController property, read
    // on the main thread.
    Some(topmost_presenter(root, |vc| unsafe {
        msg_send![&**vc, presentedViewController]
    }))
}

// ---------------------------------------------------------------------------
// Compose delegate (MFMessageComposeViewControllerDelegate)
// ---------------------------------------------------------------------------

struct ComposeDelegateIvars {
    /// Request context; taken on the terminal callback so it resolves once.
    pending: RefCell<Option<PendingCorrelation>>,
    animated: bool,
}

// SAFETY: define_class! #[unsafe(super(NSObject))] declares ComposeDelegate as
// an ObjC class inheriting from NSObject. MainThreadOnly matches MessageUI,
// which calls its delegate on the main thread.
define_class! {
    #[unsafe(super(NSObject))]
    #[thread_kind = MainThreadOnly]
    #[name = "SmsGateComposeDelegate"]
    #[ivars = ComposeDelegateIvars]
    struct ComposeDelegate;

    impl ComposeDelegate {
        /// Terminal event: the user sent, cancelled, or the send failed.
        #[unsafe(method(messageComposeViewController:didFinishWithResult:))]
        fn did_finish(&self, controller: &AnyObject, result: isize) {
            // SAFETY: dismissViewControllerAnimated:completion: is a standard
            // UIViewController selector. Called on main thread (delegate is
            // MainThreadOnly).
            unsafe {
                let _: () = msg_send![
                    controller,
                    dismissViewControllerAnimated: self.ivars().animated,
                    completion: std::ptr::null::<c_void>()
                ];
            }

            let event = ComposeResult::from_raw(result as i64);
            match self.ivars().pending.borrow_mut().take() {
                Some(pending) => pending.finish(event),
                None => tracing::warn!(?event, "iOS: composer finished twice"),
            }
        }
    }
}

impl ComposeDelegate {
    fn new(mtm: MainThreadMarker, pending: PendingCorrelation, animated: bool) -> Retained<Self> {
        let this = mtm.alloc::<Self>();
        let this = this.set_ivars(ComposeDelegateIvars {
            pending: RefCell::new(Some(pending)),
            animated,
        });
        // SAFETY: Standard NSObject init via super. The alloc above provides
        // a valid, allocated-but-uninitialised object; init completes it.
        unsafe { msg_send![super(this), init] }
    }
}

// ---------------------------------------------------------------------------
// IosBridge
// ---------------------------------------------------------------------------

/// Concrete iOS mediated-compose bridge.
///
/// `messageComposeDelegate` is a weak reference on the composer, so the
/// bridge keeps the active delegate alive until the next presentation.
pub struct IosBridge {
    animated: bool,
    active_delegate: RefCell<Option<Retained<ComposeDelegate>>>,
}

impl IosBridge {
    /// Create a new iOS bridge instance.
    pub fn new(animated: bool) -> Self {
        Self {
            animated,
            active_delegate: RefCell::new(None),
        }
    }
}

impl PlatformBridge for IosBridge {
    fn platform_name(&self) -> &str {
        "iOS"
    }
}

// ---------------------------------------------------------------------------
// NativeMessageComposer -- MFMessageComposeViewController
// ---------------------------------------------------------------------------

impl NativeMessageComposer for IosBridge {
    /// `+[MFMessageComposeViewController canSendText]`.
    fn can_send_text(&self) -> bool {
        // SAFETY: class method documented as callable from any thread.
        unsafe { msg_send![objc2::class!(MFMessageComposeViewController), canSendText] }
    }

    /// Present the composer pre-filled with recipient and body.
    ///
    /// # Errors
    ///
    /// Returns `SmsGateError::NoRootController` when there is no window to
    /// present onto, when UIKit refuses the presentation, or when called off
    /// the main thread (there is no safe surface to present from there
    /// either). `pending` is dropped in every case, releasing the
    /// correlation slot.
    fn present_composer(&self, request: &SendRequest, pending: PendingCorrelation) -> Result<()> {
        let Some(mtm) = MainThreadMarker::new() else {
            tracing::error!("iOS: composer requested off the main thread");
            return Err(SmsGateError::NoRootController);
        };

        let Some(presenter) = presenting_view_controller(mtm) else {
            return Err(SmsGateError::NoRootController);
        };

        // SAFETY: `new` on MFMessageComposeViewController returns a retained
        // instance, or nil when MessageUI refuses (no Messages account).
        let controller: Option<Retained<AnyObject>> =
            unsafe { msg_send![objc2::class!(MFMessageComposeViewController), new] };
        let Some(controller) = controller else {
            return Err(SmsGateError::NotAvailable);
        };

        let recipients = NSArray::from_retained_slice(&[NSString::from_str(&request.phone_number)]);
        let body = NSString::from_str(&request.message);
        let delegate = ComposeDelegate::new(mtm, pending, self.animated);

        tracing::info!(
            request = %request.id,
            chars = request.message.chars().count(),
            "iOS: presenting MFMessageComposeViewController"
        );

        // SAFETY: setRecipients:, setBody: and setMessageComposeDelegate: are
        // MFMessageComposeViewController properties; presentViewController:
        // animated:completion: is a UIViewController method. Main thread is
        // guaranteed by `mtm` above.
        unsafe {
            let _: () = msg_send![&controller, setRecipients: &*recipients];
            let _: () = msg_send![&controller, setBody: &*body];
            let _: () = msg_send![&controller, setMessageComposeDelegate: &*delegate];
            let _: () = msg_send![
                &presenter,
                presentViewController: &*controller,
                animated: self.animated,
                completion: std::ptr::null::<c_void>()
            ];
        }

        // SAFETY: presentingViewController is a UIViewController property,
        // set synchronously when UIKit accepts the presentation.
        let presented_by: Option<Retained<AnyObject>> =
            unsafe { msg_send![&controller, presentingViewController] };
        if presented_by.is_none() {
            let refused = delegate.ivars().pending.borrow_mut().take();
            if let Some(pending) = refused {
                tracing::error!(
                    request = %pending.request_id(),
                    "iOS: UIKit refused to present the composer"
                );
            }
            return Err(SmsGateError::NoRootController);
        }

        *self.active_delegate.borrow_mut() = Some(delegate);
        Ok(())
    }
}
