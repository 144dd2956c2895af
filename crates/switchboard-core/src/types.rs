// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Switchboard method-channel bridge.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Unique identifier attached to every request crossing the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A request message delivered by the embedded UI runtime.
///
/// `arguments` is whatever the runtime sent. Typed accessors only look inside
/// it when it is a JSON object, so a scalar or array payload reads the same as
/// no payload at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    #[serde(default)]
    pub id: RequestId,
    pub method: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Option<Value>) -> Self {
        Self {
            id: RequestId::new(),
            method: method.into(),
            arguments,
        }
    }

    /// The arguments as a string-keyed mapping, if they are one.
    pub fn arguments_map(&self) -> Option<&Map<String, Value>> {
        self.arguments.as_ref()?.as_object()
    }

    /// A string argument by key. `None` if absent or not a string.
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.arguments_map()?.get(key)?.as_str()
    }
}

/// Structured error sent back across the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ChannelError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl std::fmt::Display for ChannelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// The single outcome of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reply {
    /// The method ran and produced a value (`null` for fire-and-forget).
    Success { value: Value },
    /// The method ran and failed.
    Error { error: ChannelError },
    /// The channel has no such method. Not a failure: callers use it to probe
    /// for capability support.
    NotImplemented,
}

impl Reply {
    pub fn success(value: impl Into<Value>) -> Self {
        Self::Success {
            value: value.into(),
        }
    }

    pub fn error(error: ChannelError) -> Self {
        Self::Error { error }
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented)
    }

    /// The error code, if this reply is an error.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Error { error } => Some(&error.code),
            _ => None,
        }
    }
}

/// Notification content staged during a session and shown only after the
/// process is terminated. Title and body always travel together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredNotification {
    pub title: String,
    pub body: String,
}

impl DeferredNotification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// A request handed to the platform's local notification scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalNotificationRequest {
    pub identifier: String,
    pub title: String,
    pub body: String,
    /// Time between submission and delivery.
    pub delay: Duration,
    pub repeats: bool,
    pub requested_at: DateTime<Utc>,
}

impl LocalNotificationRequest {
    /// A non-repeating request delivering `content` after `delay`.
    pub fn one_shot(
        identifier: impl Into<String>,
        content: DeferredNotification,
        delay: Duration,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            title: content.title,
            body: content.body,
            delay,
            repeats: false,
            requested_at: Utc::now(),
        }
    }

    /// Wall-clock time at which the platform should deliver the notification.
    /// Saturates at `requested_at` when the delay is out of range.
    pub fn fire_at(&self) -> DateTime<Utc> {
        chrono::Duration::from_std(self.delay)
            .ok()
            .and_then(|delay| self.requested_at.checked_add_signed(delay))
            .unwrap_or(self.requested_at)
    }
}
