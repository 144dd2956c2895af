// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// iOS platform bridge via objc2.
//
// Requires compilation with the iOS SDK (Xcode). Each trait method wraps the
// corresponding UIKit / UserNotifications API through Objective-C message
// sends.
//
// This module is cfg-gated to `target_os = "ios"` and will not compile on other
// platforms. All UIKit interactions require the main thread; methods that
// present view controllers return `SwitchboardError::Bridge` if called
// off-main.
//
// Unsafe code in this module falls into two categories:
//
// 1. **ObjC message sends** (msg_send!, alloc+init): selector correctness is
//    given by Apple's SDK headers; thread requirements are checked with
//    `MainThreadMarker` before any UIKit call.
//
// 2. **Block callbacks** (block2::RcBlock): UIKit and UserNotifications copy
//    the block, so the Rust closure outlives this stack frame. Error pointers
//    handed to the blocks are nullable and only dereferenced after a null
//    check.

#![cfg(target_os = "ios")]

use std::sync::Mutex;

use block2::RcBlock;
use dispatch2::DispatchQueue;
use objc2::rc::Retained;
use objc2::runtime::{AnyObject, Bool};
use objc2::{MainThreadMarker, msg_send};
use objc2_foundation::{NSArray, NSError, NSString, NSURL};
use objc2_ui_kit::{UIActivityViewController, UIApplication, UIViewController};
use objc2_user_notifications::{
    UNMutableNotificationContent, UNNotificationRequest, UNTimeIntervalNotificationTrigger,
    UNUserNotificationCenter,
};

use switchboard_core::error::{Result, SwitchboardError};
use switchboard_core::types::LocalNotificationRequest;

use crate::traits::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Assert that we are on the main thread and return the marker.
fn require_main_thread() -> Result<MainThreadMarker> {
    MainThreadMarker::new()
        .ok_or_else(|| SwitchboardError::Bridge("must be called from the main thread".into()))
}

/// Obtain the root `UIViewController` from the key window.
///
/// Uses the deprecated `keyWindow` property for broad iOS-version compat.
/// A missing window or root controller means there is nothing to present
/// from, which callers treat differently from a bridge failure.
fn root_view_controller(mtm: MainThreadMarker) -> Result<Retained<UIViewController>> {
    let app = UIApplication::sharedApplication(mtm);

    // SAFETY: msg_send! to well-known UIApplication / UIWindow selectors
    // (keyWindow, rootViewController). `mtm` proves we are on the main thread.
    let root: Option<Retained<UIViewController>> = unsafe {
        let window: Option<Retained<AnyObject>> = msg_send![&app, keyWindow];
        window.and_then(|w| msg_send![&w, rootViewController])
    };

    root.ok_or(SwitchboardError::NoPresenter)
}

/// `localizedDescription` of a nullable `NSError *`.
///
/// SAFETY: `error` must be null or point to a live `NSError` for the duration
/// of the call, which holds for error arguments passed into ObjC blocks.
unsafe fn error_description(error: *mut NSError) -> Option<String> {
    // SAFETY: see function contract.
    unsafe { error.as_ref() }.map(|e| e.localizedDescription().to_string())
}

// ---------------------------------------------------------------------------
// IosBridge
// ---------------------------------------------------------------------------

/// Concrete iOS platform bridge.
///
/// Share presentation and URL queries require the main thread. Notification
/// scheduling is thread-safe.
pub struct IosBridge;

impl IosBridge {
    /// Create a new iOS bridge instance.
    pub fn new() -> Self {
        Self
    }
}

impl Default for IosBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBridge for IosBridge {
    fn platform_name(&self) -> &str {
        "iOS"
    }
}

// ---------------------------------------------------------------------------
// NativeShare -- UIActivityViewController
// ---------------------------------------------------------------------------

impl NativeShare for IosBridge {
    /// Present `text` in a `UIActivityViewController`.
    ///
    /// # Errors
    ///
    /// Returns `SwitchboardError::Bridge` if not called from the main thread
    /// and `SwitchboardError::NoPresenter` if the key window has no root view
    /// controller.
    fn share_text(&self, text: &str, on_finish: ShareCallback) -> Result<()> {
        let mtm = require_main_thread()?;
        let root_vc = root_view_controller(mtm)?;

        tracing::info!("iOS: presenting UIActivityViewController");

        let ns_text = NSString::from_str(text);
        let text_as_obj: Retained<AnyObject> = Retained::into_super(Retained::into_super(ns_text));
        let items = NSArray::from_retained_slice(&[text_as_obj]);

        // SAFETY: ObjC alloc+init pattern for UIActivityViewController.
        // initWithActivityItems:applicationActivities: takes an NSArray of
        // items and an optional NSArray of UIActivity objects (nil = system
        // default).
        let activity_vc: Retained<UIActivityViewController> = unsafe {
            let alloc: Retained<UIActivityViewController> =
                msg_send![objc2::class!(UIActivityViewController), alloc];
            msg_send![
                alloc,
                initWithActivityItems: &*items,
                applicationActivities: std::ptr::null::<AnyObject>()
            ]
        };

        // UIKit can call the handler again when an extension dismisses, so the
        // callback is taken on the first call.
        let on_finish = Mutex::new(Some(on_finish));
        let handler = RcBlock::new(
            move |_activity: *mut AnyObject,
                  completed: Bool,
                  _returned: *mut AnyObject,
                  error: *mut NSError| {
                let Some(done) = on_finish.lock().ok().and_then(|mut slot| slot.take()) else {
                    return;
                };
                // SAFETY: UIKit passes a nullable NSError that lives for the
                // duration of the callback.
                let outcome = match unsafe { error_description(error) } {
                    Some(message) => ShareOutcome::Failed(message),
                    None if completed.as_bool() => ShareOutcome::Completed,
                    None => ShareOutcome::Cancelled,
                };
                tracing::debug!(?outcome, "iOS: share sheet finished");
                done(outcome);
            },
        );

        // SAFETY: setCompletionWithItemsHandler: is a UIActivityViewController
        // property setter; the block is copied by UIKit. presentViewController
        // is a UIViewController method and `mtm` confirms the main thread.
        unsafe {
            let _: () = msg_send![&activity_vc, setCompletionWithItemsHandler: &*handler];
            root_vc.presentViewController_animated_completion(&activity_vc, true, None);
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NativeUrlOpener -- UIApplication canOpenURL:
// ---------------------------------------------------------------------------

impl NativeUrlOpener for IosBridge {
    /// The scheme must be listed under `LSApplicationQueriesSchemes` in the
    /// app's Info.plist, otherwise iOS answers `false`.
    fn can_open_url(&self, url: &str) -> bool {
        let Some(mtm) = MainThreadMarker::new() else {
            tracing::warn!(url, "canOpenURL called off the main thread");
            return false;
        };
        let Some(ns_url) = NSURL::URLWithString(&NSString::from_str(url)) else {
            return false;
        };
        let app = UIApplication::sharedApplication(mtm);

        // SAFETY: canOpenURL: is a documented UIApplication selector taking an
        // NSURL and returning BOOL. Main thread confirmed above.
        unsafe { msg_send![&app, canOpenURL: &*ns_url] }
    }
}

// ---------------------------------------------------------------------------
// NativeNotifications -- UNUserNotificationCenter
// ---------------------------------------------------------------------------

impl NativeNotifications for IosBridge {
    /// Submit a time-interval notification request.
    ///
    /// The completion handler runs after submission; a failure there has no
    /// caller left to report to, so it is logged only.
    fn schedule_local(&self, request: &LocalNotificationRequest) -> Result<()> {
        tracing::info!(
            identifier = %request.identifier,
            delay_secs = request.delay.as_secs_f64(),
            "iOS: submitting UNNotificationRequest"
        );

        let content = UNMutableNotificationContent::new();
        // SAFETY: plain property setters on a freshly created content object.
        unsafe {
            content.setTitle(&NSString::from_str(&request.title));
            content.setBody(&NSString::from_str(&request.body));
        }

        // SAFETY: class constructors from UserNotifications.framework. iOS
        // rejects zero or negative intervals, so the delay is clamped.
        let interval = request.delay.as_secs_f64().max(1.0);
        let trigger = unsafe {
            UNTimeIntervalNotificationTrigger::triggerWithTimeInterval_repeats(
                interval,
                request.repeats,
            )
        };
        let un_request = unsafe {
            UNNotificationRequest::requestWithIdentifier_content_trigger(
                &NSString::from_str(&request.identifier),
                &content,
                Some(&**trigger),
            )
        };

        let identifier = request.identifier.clone();
        let handler = RcBlock::new(move |error: *mut NSError| {
            // SAFETY: nullable NSError valid for the duration of the callback.
            if let Some(message) = unsafe { error_description(error) } {
                tracing::error!(identifier, error = %message, "failed to schedule notification");
            }
        });

        let center = UNUserNotificationCenter::currentNotificationCenter();
        // SAFETY: addNotificationRequest:withCompletionHandler: is thread-safe
        // and copies the block.
        unsafe {
            center.addNotificationRequest_withCompletionHandler(&un_request, Some(&*handler));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MainThreadExecutor -- main dispatch queue
// ---------------------------------------------------------------------------

impl MainThreadExecutor for IosBridge {
    fn is_main_thread(&self) -> bool {
        MainThreadMarker::new().is_some()
    }

    fn run_on_main(&self, task: MainThreadTask) {
        DispatchQueue::main().exec_async(task);
    }
}
