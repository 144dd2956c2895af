// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where native mobile APIs are unavailable.
//
// Presentation and scheduling return `PlatformUnavailable`; queries answer
// `false`. The calling thread is treated as the UI thread.

use switchboard_core::error::{Result, SwitchboardError};
use switchboard_core::types::LocalNotificationRequest;

use crate::traits::*;

/// No-op bridge returned on non-mobile platforms.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl NativeShare for StubBridge {
    fn share_text(&self, _text: &str, _on_finish: ShareCallback) -> Result<()> {
        tracing::warn!("NativeShare::share_text called on stub bridge");
        Err(SwitchboardError::PlatformUnavailable)
    }
}

impl NativeUrlOpener for StubBridge {
    fn can_open_url(&self, url: &str) -> bool {
        tracing::debug!(url, "NativeUrlOpener::can_open_url called on stub bridge");
        false
    }
}

impl NativeNotifications for StubBridge {
    fn schedule_local(&self, request: &LocalNotificationRequest) -> Result<()> {
        tracing::warn!(
            identifier = %request.identifier,
            fire_at = %request.fire_at(),
            "NativeNotifications::schedule_local called on stub bridge"
        );
        Err(SwitchboardError::PlatformUnavailable)
    }
}

impl MainThreadExecutor for StubBridge {
    fn is_main_thread(&self) -> bool {
        true
    }

    fn run_on_main(&self, task: MainThreadTask) {
        task();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use switchboard_core::types::DeferredNotification;

    use super::*;

    #[test]
    fn share_is_unavailable_and_never_calls_back() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&called);
        let err = StubBridge
            .share_text("hello", Box::new(move |_| flag.store(true, Ordering::SeqCst)))
            .unwrap_err();
        assert!(matches!(err, SwitchboardError::PlatformUnavailable));
        assert!(!called.load(Ordering::SeqCst));
    }

    #[test]
    fn no_url_scheme_is_openable() {
        assert!(!StubBridge.can_open_url("mobilenotes://"));
    }

    #[test]
    fn scheduling_is_unavailable() {
        let request = LocalNotificationRequest::one_shot(
            "notification on app kill",
            DeferredNotification::new("t", "b"),
            Duration::from_secs(1),
        );
        assert!(matches!(
            StubBridge.schedule_local(&request),
            Err(SwitchboardError::PlatformUnavailable)
        ));
    }

    #[test]
    fn main_thread_tasks_run_inline() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        StubBridge.run_on_main(Box::new(move || flag.store(true, Ordering::SeqCst)));
        assert!(ran.load(Ordering::SeqCst));
        assert!(StubBridge.is_main_thread());
    }
}
