// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform bridge via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. Android can transmit directly, so this bridge
// implements the direct-send pair: the SEND_SMS runtime permission through
// `ContextCompat` / `ActivityCompat`, and transmission through
// `android.telephony.SmsManager`.
//
// ## Architecture notes
//
// `requestPermissions` is fire-and-forget. The user's answer arrives in the
// host Activity's `onRequestPermissionsResult`; the host forwards it to
// `RequestRouter::authorization_result` and the UI sends again.
//
// Threads are attached permanently, so local references are only reclaimed
// when a frame is popped. Every public operation runs inside
// `with_local_frame`, and per-part objects are freed as the loop goes.
//
// No sent/delivered `PendingIntent`s are registered: the bridge reports
// success once `SmsManager` accepts the message, not on carrier delivery.

#![cfg(target_os = "android")]

use std::sync::OnceLock;

use jni::JNIEnv;
use jni::objects::{JObject, JString, JValue};
use jni::sys::jsize;

use smsgate_core::error::{Result, SmsGateError};
use smsgate_core::types::{MessageSegments, PermissionState};

use crate::segment::MessageSegmenter;
use crate::traits::*;

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// `android.Manifest.permission.SEND_SMS`.
const SEND_SMS_PERMISSION: &str = "android.permission.SEND_SMS";

/// `PackageManager.PERMISSION_GRANTED`.
const PERMISSION_GRANTED: i32 = 0;

/// Local references reserved for one bridge operation.
const LOCAL_FRAME_CAPACITY: i32 = 16;

/// The process-wide `JavaVM`, resolved once from the NDK context.
fn java_vm() -> Result<&'static jni::JavaVM> {
    static VM: OnceLock<jni::JavaVM> = OnceLock::new();
    if let Some(vm) = VM.get() {
        return Ok(vm);
    }
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code.
    // The pointer is guaranteed valid for the lifetime of the process.
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| SmsGateError::SendError(format!("failed to obtain JavaVM: {e}")))?;
    Ok(VM.get_or_init(|| vm))
}

/// Obtain a [`JNIEnv`] for the current thread, attaching it if needed.
fn jni_env() -> Result<JNIEnv<'static>> {
    java_vm()?
        .attach_current_thread_permanently()
        .map_err(|e| SmsGateError::SendError(format!("failed to attach JNI thread: {e}")))
}

/// Run `f` in a fresh JNI local frame; every local reference it creates is
/// released when it returns.
fn with_local_frame<T>(f: impl FnOnce(&mut JNIEnv) -> Result<T>) -> Result<T> {
    let mut env = jni_env()?;
    env.with_local_frame(LOCAL_FRAME_CAPACITY, |env| {
        Ok::<_, jni::errors::Error>(f(env))
    })
    .map_err(|e| SmsGateError::SendError(format!("JNI local frame: {e}")))?
}

/// Obtain the hosting Android `Activity` as a [`JObject`].
fn activity() -> Result<JObject<'static>> {
    let ctx = ndk_context::android_context();
    let ptr = ctx.context();
    if ptr.is_null() {
        return Err(SmsGateError::SendError(
            "Android context is null — host activity not initialised".into(),
        ));
    }
    // SAFETY: the NDK guarantees this pointer is a valid global jobject for
    // the hosting Activity.
    Ok(unsafe { JObject::from_raw(ptr.cast()) })
}

/// Map a JNI failure into `SendError`, preferring the pending Java
/// exception's text (e.g. `IllegalArgumentException: Invalid destinationAddress`)
/// over the generic JNI error. Clears the exception so the VM stays usable.
fn jni_err(env: &mut JNIEnv, context: &str, e: jni::errors::Error) -> SmsGateError {
    if env.exception_check().unwrap_or(false) {
        let throwable = env.exception_occurred();
        let _ = env.exception_clear();
        if let Ok(throwable) = throwable {
            let text = env
                .call_method(&throwable, "toString", "()Ljava/lang/String;", &[])
                .and_then(|v| v.l())
                .and_then(|obj| env.get_string(&JString::from(obj)).map(String::from));
            if let Ok(text) = text {
                return SmsGateError::SendError(text);
            }
        }
    }
    SmsGateError::SendError(format!("{context}: {e}"))
}

/// `SmsManager.getDefault()`.
fn sms_manager<'local>(env: &mut JNIEnv<'local>) -> Result<JObject<'local>> {
    let value = env.call_static_method(
        "android/telephony/SmsManager",
        "getDefault",
        "()Landroid/telephony/SmsManager;",
        &[],
    );
    let manager = match value.and_then(|v| v.l()) {
        Ok(manager) => manager,
        Err(e) => return Err(jni_err(env, "SmsManager.getDefault", e)),
    };
    if manager.is_null() {
        return Err(SmsGateError::SendError(
            "SmsManager unavailable on this device".into(),
        ));
    }
    Ok(manager)
}

/// Build a `java.util.ArrayList<String>` from segment parts.
fn string_array_list<'local>(
    env: &mut JNIEnv<'local>,
    parts: &MessageSegments,
) -> Result<JObject<'local>> {
    let list = match env.new_object("java/util/ArrayList", "(I)V", &[JValue::Int(parts.len() as i32)]) {
        Ok(list) => list,
        Err(e) => return Err(jni_err(env, "new ArrayList", e)),
    };
    for part in parts.parts() {
        let j_part = match env.new_string(part) {
            Ok(s) => s,
            Err(e) => return Err(jni_err(env, "new_string(part)", e)),
        };
        let added = env.call_method(
            &list,
            "add",
            "(Ljava/lang/Object;)Z",
            &[JValue::Object(&j_part)],
        );
        // The list holds its own reference to the part.
        let _ = env.delete_local_ref(j_part);
        if let Err(e) = added {
            return Err(jni_err(env, "ArrayList.add", e));
        }
    }
    Ok(list)
}

/// Read a `java.util.List<String>` back into Rust strings.
fn read_string_list(env: &mut JNIEnv, list: &JObject) -> std::result::Result<Vec<String>, jni::errors::Error> {
    let size = env.call_method(list, "size", "()I", &[])?.i()?;
    let mut out = Vec::with_capacity(size.max(0) as usize);
    for i in 0..size {
        let item = env
            .call_method(list, "get", "(I)Ljava/lang/Object;", &[JValue::Int(i)])?
            .l()?;
        let item = JString::from(item);
        let text = env.get_string(&item).map(String::from);
        env.delete_local_ref(item)?;
        out.push(text?);
    }
    Ok(out)
}

/// `SmsManager.getDefault().divideMessage(message)`.
fn native_divide(message: &str) -> Result<Vec<String>> {
    with_local_frame(|env| {
        let manager = sms_manager(env)?;
        let j_message = env
            .new_string(message)
            .map_err(|e| SmsGateError::SendError(format!("new_string(message): {e}")))?;
        let list = env
            .call_method(
                &manager,
                "divideMessage",
                "(Ljava/lang/String;)Ljava/util/ArrayList;",
                &[JValue::Object(&j_message)],
            )
            .and_then(|v| v.l());
        let list = match list {
            Ok(list) => list,
            Err(e) => return Err(jni_err(env, "SmsManager.divideMessage", e)),
        };
        match read_string_list(env, &list) {
            Ok(parts) => Ok(parts),
            Err(e) => Err(jni_err(env, "divideMessage result", e)),
        }
    })
}

// ---------------------------------------------------------------------------
// Bridge struct
// ---------------------------------------------------------------------------

/// Android implementation of the direct-send bridge.
///
/// The struct is zero-sized; all state lives on the Java side and is read
/// fresh on every call.
pub struct AndroidBridge;

impl AndroidBridge {
    /// Create a new Android bridge.
    ///
    /// This does **not** touch JNI — the first JNI call happens lazily when
    /// a trait method is invoked.
    pub fn new() -> Self {
        Self
    }

    fn check_self_permission(&self) -> Result<PermissionState> {
        with_local_frame(|env| {
            let activity = activity()?;
            let j_perm = env
                .new_string(SEND_SMS_PERMISSION)
                .map_err(|e| SmsGateError::SendError(format!("new_string(permission): {e}")))?;

            // ContextCompat.checkSelfPermission(activity, SEND_SMS)
            let status = env
                .call_static_method(
                    "androidx/core/content/ContextCompat",
                    "checkSelfPermission",
                    "(Landroid/content/Context;Ljava/lang/String;)I",
                    &[JValue::Object(&activity), JValue::Object(&j_perm)],
                )
                .and_then(|v| v.i());
            let status = match status {
                Ok(status) => status,
                Err(e) => return Err(jni_err(env, "checkSelfPermission", e)),
            };
            if status == PERMISSION_GRANTED {
                return Ok(PermissionState::Granted);
            }

            // A rationale is only offered after the user has refused once.
            let refused_before = env
                .call_static_method(
                    "androidx/core/app/ActivityCompat",
                    "shouldShowRequestPermissionRationale",
                    "(Landroid/app/Activity;Ljava/lang/String;)Z",
                    &[JValue::Object(&activity), JValue::Object(&j_perm)],
                )
                .and_then(|v| v.z());
            match refused_before {
                Ok(true) => Ok(PermissionState::Denied),
                Ok(false) => Ok(PermissionState::Undetermined),
                Err(e) => Err(jni_err(env, "shouldShowRequestPermissionRationale", e)),
            }
        })
    }
}

impl Default for AndroidBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBridge for AndroidBridge {
    fn platform_name(&self) -> &str {
        "Android"
    }
}

// ---------------------------------------------------------------------------
// NativePermissions — ContextCompat / ActivityCompat
// ---------------------------------------------------------------------------

impl NativePermissions for AndroidBridge {
    /// Read SEND_SMS authorization. A JNI failure reads as `Undetermined`,
    /// which still routes the request through the permission prompt.
    fn sms_permission_state(&self) -> PermissionState {
        self.check_self_permission().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Android: could not read SEND_SMS permission");
            PermissionState::Undetermined
        })
    }

    /// `ActivityCompat.requestPermissions(activity, [SEND_SMS], request_code)`.
    ///
    /// Returns once the system dialog is queued.
    fn request_sms_permission(&self, request_code: i32) -> Result<()> {
        with_local_frame(|env| {
            let activity = activity()?;
            let j_perm = env
                .new_string(SEND_SMS_PERMISSION)
                .map_err(|e| SmsGateError::SendError(format!("new_string(permission): {e}")))?;
            let permissions = match env.new_object_array(1 as jsize, "java/lang/String", &j_perm) {
                Ok(array) => array,
                Err(e) => return Err(jni_err(env, "new String[]", e)),
            };

            if let Err(e) = env.call_static_method(
                "androidx/core/app/ActivityCompat",
                "requestPermissions",
                "(Landroid/app/Activity;[Ljava/lang/String;I)V",
                &[
                    JValue::Object(&activity),
                    JValue::Object(&permissions),
                    JValue::Int(request_code),
                ],
            ) {
                return Err(jni_err(env, "ActivityCompat.requestPermissions", e));
            }
            Ok(())
        })?;

        tracing::info!(request_code, "Android: SEND_SMS permission dialog requested");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NativeSmsTransport — android.telephony.SmsManager
// ---------------------------------------------------------------------------

impl NativeSmsTransport for AndroidBridge {
    /// `SmsManager.divideMessage`, so part counts match what the OS sends.
    ///
    /// Falls back to the reference segmenter only if the JNI call itself
    /// fails; segmentation never errors.
    fn divide_message(&self, message: &str) -> MessageSegments {
        let native = native_divide(message);

        match native {
            Ok(parts) => MessageSegments::from_parts(parts),
            Err(e) => {
                tracing::warn!(error = %e, "Android: divideMessage failed; using reference segmenter");
                MessageSegmenter.segment(message)
            }
        }
    }

    /// `sendTextMessage(destination, null, text, null, null)`.
    fn send_text_message(&self, destination: &str, text: &str) -> Result<()> {
        with_local_frame(|env| {
            let manager = sms_manager(env)?;
            let j_dest = env
                .new_string(destination)
                .map_err(|e| SmsGateError::SendError(format!("new_string(destination): {e}")))?;
            let j_text = env
                .new_string(text)
                .map_err(|e| SmsGateError::SendError(format!("new_string(text): {e}")))?;
            let null = JObject::null();

            if let Err(e) = env.call_method(
                &manager,
                "sendTextMessage",
                "(Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;Landroid/app/PendingIntent;Landroid/app/PendingIntent;)V",
                &[
                    JValue::Object(&j_dest),
                    JValue::Object(&null),
                    JValue::Object(&j_text),
                    JValue::Object(&null),
                    JValue::Object(&null),
                ],
            ) {
                return Err(jni_err(env, "SmsManager.sendTextMessage", e));
            }
            Ok(())
        })?;

        tracing::info!(chars = text.chars().count(), "Android: single SMS accepted");
        Ok(())
    }

    /// `sendMultipartTextMessage(destination, null, parts, null, null)`.
    fn send_multipart_text_message(
        &self,
        destination: &str,
        parts: &MessageSegments,
    ) -> Result<()> {
        with_local_frame(|env| {
            let manager = sms_manager(env)?;
            let j_dest = env
                .new_string(destination)
                .map_err(|e| SmsGateError::SendError(format!("new_string(destination): {e}")))?;
            let j_parts = string_array_list(env, parts)?;
            let null = JObject::null();

            if let Err(e) = env.call_method(
                &manager,
                "sendMultipartTextMessage",
                "(Ljava/lang/String;Ljava/lang/String;Ljava/util/ArrayList;Ljava/util/ArrayList;Ljava/util/ArrayList;)V",
                &[
                    JValue::Object(&j_dest),
                    JValue::Object(&null),
                    JValue::Object(&j_parts),
                    JValue::Object(&null),
                    JValue::Object(&null),
                ],
            ) {
                return Err(jni_err(env, "SmsManager.sendMultipartTextMessage", e));
            }
            Ok(())
        })?;

        tracing::info!(parts = parts.len(), "Android: multipart SMS accepted");
        Ok(())
    }
}
