// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Switchboard.

use thiserror::Error;

/// Top-level error type for all Switchboard operations.
#[derive(Debug, Error)]
pub enum SwitchboardError {
    // -- Registration errors --
    #[error("channel already registered: {0}")]
    DuplicateChannel(String),

    #[error("method `{method}` registered twice on channel {channel}")]
    DuplicateMethod { channel: String, method: String },

    #[error("channel {0} declares no methods")]
    EmptyChannel(String),

    // -- Request errors --
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    // -- Platform operation errors --
    #[error("share failed: {0}")]
    ShareFailed(String),

    #[error("no view controller available to present from")]
    NoPresenter,

    #[error("notification scheduling failed: {0}")]
    Notification(String),

    // -- Storage / configuration --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SwitchboardError>;
