// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! SMS gate — native messaging bridge.
//!
//! Exposes one call, `sendSMS`, over two incompatible OS models: Android
//! transmits directly once the runtime permission is granted, iOS hands the
//! message to the system composer and learns the outcome from a delegate
//! callback. [`RequestRouter`] validates calls and forwards them to the
//! [`DispatchEngine`] selected for the build target.

pub mod correlator;
pub mod dispatch;
pub mod modal;
pub mod permission;
pub mod router;
pub mod segment;
pub mod traits;

#[cfg(target_os = "ios")]
pub mod ios;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(any(target_os = "ios", target_os = "android")))]
pub mod stub;

#[cfg(test)]
mod fakes;

pub use correlator::{PendingCorrelation, ResultCorrelator};
pub use dispatch::{DirectSend, DispatchEngine, MediatedCompose};
pub use permission::PermissionGate;
pub use router::RequestRouter;
pub use segment::MessageSegmenter;

use smsgate_core::config::BridgeConfig;

/// Dispatch engine for the target operating system.
#[cfg(target_os = "ios")]
pub type PlatformEngine = MediatedCompose<ios::IosBridge>;

#[cfg(target_os = "android")]
pub type PlatformEngine = DirectSend<android::AndroidBridge>;

#[cfg(not(any(target_os = "ios", target_os = "android")))]
pub type PlatformEngine = DirectSend<stub::StubBridge>;

/// Build the dispatch engine for the target operating system.
pub fn platform_engine(config: &BridgeConfig) -> PlatformEngine {
    #[cfg(target_os = "ios")]
    {
        // iOS: MFMessageComposeViewController via objc2, outcome from the delegate.
        MediatedCompose::new(ios::IosBridge::new(config.compose_animated))
    }
    #[cfg(target_os = "android")]
    {
        // Android: SmsManager via jni-rs after the SEND_SMS runtime check.
        DirectSend::new(android::AndroidBridge::new(), config)
    }
    #[cfg(not(any(target_os = "ios", target_os = "android")))]
    {
        // DESKTOP/CI: no transport; dry-run optional.
        DirectSend::new(stub::StubBridge::new(config.desktop_dry_run), config)
    }
}

/// Build the bridge entry point for the target operating system.
pub fn platform_router(config: &BridgeConfig) -> RequestRouter<PlatformEngine> {
    RequestRouter::new(platform_engine(config), config)
}

#[cfg(all(test, not(any(target_os = "ios", target_os = "android"))))]
mod tests {
    use super::*;
    use smsgate_core::types::{DispatchStrategy, MethodCall, MethodResponse};

    #[tokio::test]
    async fn desktop_router_dry_run() {
        let config = BridgeConfig {
            desktop_dry_run: true,
            ..Default::default()
        };
        let router = platform_router(&config);
        assert_eq!(router.engine().strategy(), DispatchStrategy::DirectSend);

        let resp = router.handle(MethodCall::send_sms("+15550100", "hello")).await;
        assert!(resp.is_success());
    }

    #[tokio::test]
    async fn desktop_router_without_transport() {
        let router = platform_router(&BridgeConfig::default());
        let resp = router.handle(MethodCall::send_sms("+15550100", "hello")).await;
        assert_eq!(resp.error_code(), Some("SMS_SEND_ERROR"));
        assert_eq!(
            router.handle(MethodCall::new("ping", serde_json::Value::Null)).await,
            MethodResponse::NotImplemented
        );
    }
}
