// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// switchboard-channels: request routing across the embedded-runtime
// boundary.
//
// Requests arrive as (channel, method, arguments). The registry resolves the
// channel, the channel resolves the method, and the handler settles a
// single-use `Completion` whose `PendingReply` goes back to the caller.

pub mod completion;
pub mod context;
pub mod external;
pub mod kill_notice;
pub mod notes;
pub mod registry;
pub mod ui_loop;

#[cfg(test)]
mod testing;

pub use completion::{Completion, PendingReply};
pub use context::{BridgeContext, BridgeContextBuilder};
pub use external::ExternalService;
pub use kill_notice::KillNotifier;
pub use notes::NotesService;
pub use registry::{Channel, ChannelBuilder, ChannelRegistry, MethodFn};
pub use ui_loop::{UiLoop, UiLoopHandle};
