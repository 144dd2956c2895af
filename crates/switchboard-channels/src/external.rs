// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Adapter for channels whose logic lives outside this workspace (reminders,
// calendar). The bridge only enforces the request/completion contract.

use std::sync::Arc;

use switchboard_core::error::Result;
use switchboard_core::types::MethodCall;

use crate::completion::Completion;
use crate::registry::Channel;

/// A collaborator that owns its own methods.
pub trait ExternalService: Send + Sync {
    /// Every method name the service answers. Declared up front so unknown
    /// methods still get the not-implemented sentinel from the dispatcher.
    fn methods(&self) -> Vec<String>;

    /// Handle one declared method. Must resolve `completion` exactly once,
    /// now or later.
    fn handle(&self, call: MethodCall, completion: Completion) -> Result<()>;
}

impl Channel {
    /// A channel forwarding each declared method to `service`.
    pub fn external(name: impl Into<String>, service: Arc<dyn ExternalService>) -> Result<Channel> {
        service
            .methods()
            .into_iter()
            .fold(Channel::builder(name), |builder, method| {
                let service = Arc::clone(&service);
                builder.method(method, move |call, completion| service.handle(call, completion))
            })
            .build()
    }
}
