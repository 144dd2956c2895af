// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Deferred "app was killed" notification.
//
// The embedded runtime stages a title/body pair during the session; when the
// process terminates the last staged pair, if any, becomes a one-shot local
// notification. Nothing is delivered before termination and nothing is
// retried after it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use switchboard_bridge::traits::NativeNotifications;
use switchboard_core::config::KillNotificationConfig;
use switchboard_core::error::Result;
use switchboard_core::types::{DeferredNotification, LocalNotificationRequest, MethodCall};

use crate::registry::Channel;

pub const SET_NOTIFICATION_ON_KILL: &str = "setNotificationOnKillService";

/// Holds the staged notification and fires it once at termination.
pub struct KillNotifier {
    staged: Mutex<Option<DeferredNotification>>,
    terminated: AtomicBool,
    config: KillNotificationConfig,
}

impl KillNotifier {
    pub fn new(config: KillNotificationConfig) -> Self {
        Self {
            staged: Mutex::new(None),
            terminated: AtomicBool::new(false),
            config,
        }
    }

    /// The channel exposing `setNotificationOnKillService`.
    pub fn channel(self: Arc<Self>, name: impl Into<String>) -> Result<Channel> {
        Channel::builder(name)
            .method(SET_NOTIFICATION_ON_KILL, move |call, completion| {
                self.apply_call(&call);
                // Fire-and-forget for the caller; still exactly one reply.
                completion.success(Value::Null);
                Ok(())
            })
            .build()
    }

    /// Stage `notification`, replacing whatever was staged before.
    pub fn set_deferred_notification(&self, notification: DeferredNotification) {
        debug!(title = %notification.title, "deferred notification staged");
        *self.lock() = Some(notification);
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    pub fn staged(&self) -> Option<DeferredNotification> {
        self.lock().clone()
    }

    /// Apply a `setNotificationOnKillService` call.
    ///
    /// A mapping with string `title` and `description` stages them. A mapping
    /// missing either clears the staged value. Anything that is not a mapping
    /// leaves the state alone.
    pub fn apply_call(&self, call: &MethodCall) {
        let Some(args) = call.arguments_map() else {
            warn!(request_id = %call.id, "arguments are not a mapping; staged notification unchanged");
            return;
        };
        let title = args.get("title").and_then(Value::as_str);
        let body = args.get("description").and_then(Value::as_str);
        match (title, body) {
            (Some(title), Some(body)) => {
                self.set_deferred_notification(DeferredNotification::new(title, body))
            }
            _ => {
                debug!(request_id = %call.id, "title or description missing; staged notification cleared");
                self.clear();
            }
        }
    }

    /// Termination hook. Submits the staged notification, if any, and
    /// returns the request that was built. Runs at most once; later calls are
    /// no-ops. Submission failures are logged, never surfaced.
    #[instrument(skip_all)]
    pub fn on_terminate(
        &self,
        notifications: &dyn NativeNotifications,
    ) -> Option<LocalNotificationRequest> {
        if self.terminated.swap(true, Ordering::SeqCst) {
            debug!("termination hook already ran");
            return None;
        }
        let Some(content) = self.lock().take() else {
            debug!("no deferred notification staged");
            return None;
        };

        let request = LocalNotificationRequest::one_shot(
            self.config.identifier.as_str(),
            content,
            self.config.delay(),
        );
        match notifications.schedule_local(&request) {
            Ok(()) => info!(
                identifier = %request.identifier,
                fire_at = %request.fire_at(),
                "notification on kill submitted"
            ),
            Err(err) => error!(error = %err, "failed to show notification on kill"),
        }
        Some(request)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<DeferredNotification>> {
        self.staged.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
