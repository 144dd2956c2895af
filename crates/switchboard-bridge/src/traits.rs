// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.
//
// The channel handlers only ever see these traits. Platforms that lack a
// capability return `SwitchboardError::PlatformUnavailable` from the stub
// implementation.

use switchboard_core::error::Result;
use switchboard_core::types::LocalNotificationRequest;

/// Work queued for the UI thread.
pub type MainThreadTask = Box<dyn FnOnce() + Send + 'static>;

/// Receives the user's verdict on a presented share sheet.
pub type ShareCallback = Box<dyn FnOnce(ShareOutcome) + Send + 'static>;

/// Unified bridge that groups all native capabilities.
pub trait PlatformBridge:
    NativeShare + NativeUrlOpener + NativeNotifications + MainThreadExecutor
{
    /// Human-readable platform name (e.g. "iOS").
    fn platform_name(&self) -> &str;
}

/// How a presented share sheet ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The user picked a destination and finished the share action.
    Completed,
    /// The user dismissed the sheet.
    Cancelled,
    /// The share subsystem reported an error.
    Failed(String),
}

/// Share content via the OS share sheet.
pub trait NativeShare: Send + Sync {
    /// Present the share sheet with `text` as the only item.
    ///
    /// Must be called on the UI thread. `on_finish` runs once, when the user
    /// finishes or cancels or the sheet fails. If presentation itself fails
    /// the error is returned and `on_finish` is never called; a missing
    /// presentation surface is reported as `SwitchboardError::NoPresenter`.
    fn share_text(&self, text: &str, on_finish: ShareCallback) -> Result<()>;
}

/// Query which URL schemes the device can open.
pub trait NativeUrlOpener: Send + Sync {
    /// Whether some installed app handles `url`. Unparseable URLs are `false`.
    fn can_open_url(&self, url: &str) -> bool;
}

/// Local (on-device) notification scheduling.
pub trait NativeNotifications: Send + Sync {
    /// Hand a request to the platform scheduler.
    ///
    /// Failures the platform reports asynchronously after submission are
    /// logged by the implementation; only synchronous failures are returned.
    fn schedule_local(&self, request: &LocalNotificationRequest) -> Result<()>;
}

/// The single UI thread that owns presentation.
pub trait MainThreadExecutor: Send + Sync {
    /// Whether the calling thread is the UI thread.
    fn is_main_thread(&self) -> bool;

    /// Queue `task` for the UI thread's next turn.
    fn run_on_main(&self, task: MainThreadTask);
}
