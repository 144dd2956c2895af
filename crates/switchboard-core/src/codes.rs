// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wire error codes and the mapping from internal errors to them.
//
// Two tiers reach the caller: caller errors (bad arguments, detected before
// any side effect) and operational errors (the platform action was attempted
// and failed). Everything else collapses into a generic native error.

use crate::error::SwitchboardError;
use crate::types::ChannelError;

/// Required arguments missing or mistyped.
pub const INVALID_ARGUMENTS: &str = "INVALID_ARGUMENTS";
/// The share subsystem reported a failure.
pub const SHARE_FAILED: &str = "SHARE_FAILED";
/// The capability does not exist on this platform build.
pub const UNAVAILABLE: &str = "UNAVAILABLE";
/// A handler failed for a reason with no dedicated code.
pub const NATIVE_ERROR: &str = "NATIVE_ERROR";
/// A completion was released without ever being resolved.
pub const COMPLETION_DROPPED: &str = "COMPLETION_DROPPED";

impl From<&SwitchboardError> for ChannelError {
    fn from(err: &SwitchboardError) -> Self {
        let code = match err {
            SwitchboardError::InvalidArguments(_) => INVALID_ARGUMENTS,
            SwitchboardError::ShareFailed(_) => SHARE_FAILED,
            SwitchboardError::PlatformUnavailable => UNAVAILABLE,
            _ => NATIVE_ERROR,
        };
        let message = match err {
            // The diagnostic text alone, without our own prefix.
            SwitchboardError::ShareFailed(detail) => detail.clone(),
            other => other.to_string(),
        };
        ChannelError::new(code, message)
    }
}

impl From<SwitchboardError> for ChannelError {
    fn from(err: SwitchboardError) -> Self {
        Self::from(&err)
    }
}
