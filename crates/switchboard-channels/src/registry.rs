// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Channel registry and per-channel request dispatch.
//
// Each channel owns a method table validated when it is built: duplicate
// method names and empty tables are startup errors. Dispatch resolves the
// method, hands the handler a completion, and converts a handler's early
// `Err` or panic into a structured error reply. Unknown methods (and unknown
// channels) answer with the not-implemented sentinel.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use switchboard_core::codes;
use switchboard_core::error::{Result, SwitchboardError};
use switchboard_core::types::{ChannelError, MethodCall};

use crate::completion::{Completion, PendingReply};

/// A method handler. Returning `Err` before resolving the completion turns
/// the error into the reply.
pub type MethodFn = Arc<dyn Fn(MethodCall, Completion) -> Result<()> + Send + Sync>;

/// A named channel and its method table.
pub struct Channel {
    name: String,
    methods: HashMap<String, MethodFn>,
}

impl Channel {
    pub fn builder(name: impl Into<String>) -> ChannelBuilder {
        ChannelBuilder {
            name: name.into(),
            methods: HashMap::new(),
            duplicates: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handles(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// Registered method names, sorted.
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Route one request to its handler.
    #[instrument(skip_all, fields(channel = %self.name, method = %call.method, request_id = %call.id))]
    pub fn dispatch(&self, call: MethodCall) -> PendingReply {
        let (completion, pending) = Completion::new(&self.name, &call.method, call.id);

        let Some(handler) = self.methods.get(&call.method) else {
            debug!("method not implemented on channel");
            completion.not_implemented();
            return pending;
        };

        debug!("dispatching method");
        match panic::catch_unwind(AssertUnwindSafe(|| handler(call, completion.clone()))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                warn!(error = %err, "handler failed");
                completion.error(ChannelError::from(&err));
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(panic = %message, "handler panicked");
                completion.error(ChannelError::new(
                    codes::NATIVE_ERROR,
                    format!("handler panicked: {message}"),
                ));
            }
        }
        pending
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("methods", &self.method_names())
            .finish()
    }
}

/// Collects a channel's method table; validation happens in `build`.
pub struct ChannelBuilder {
    name: String,
    methods: HashMap<String, MethodFn>,
    duplicates: Vec<String>,
}

impl ChannelBuilder {
    pub fn method<F>(mut self, method: impl Into<String>, handler: F) -> Self
    where
        F: Fn(MethodCall, Completion) -> Result<()> + Send + Sync + 'static,
    {
        let method = method.into();
        if self.methods.contains_key(&method) {
            self.duplicates.push(method);
        } else {
            self.methods.insert(method, Arc::new(handler));
        }
        self
    }

    pub fn build(self) -> Result<Channel> {
        if let Some(method) = self.duplicates.into_iter().next() {
            return Err(SwitchboardError::DuplicateMethod {
                channel: self.name,
                method,
            });
        }
        if self.methods.is_empty() {
            return Err(SwitchboardError::EmptyChannel(self.name));
        }
        Ok(Channel {
            name: self.name,
            methods: self.methods,
        })
    }
}

/// Channel name → channel. Filled sequentially at startup, read-only after.
#[derive(Default)]
pub struct ChannelRegistry {
    channels: HashMap<String, Channel>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, channel: Channel) -> Result<()> {
        if self.channels.contains_key(channel.name()) {
            return Err(SwitchboardError::DuplicateChannel(channel.name().to_owned()));
        }
        info!(channel = %channel.name(), methods = ?channel.method_names(), "channel registered");
        self.channels.insert(channel.name().to_owned(), channel);
        Ok(())
    }

    pub fn get(&self, channel: &str) -> Option<&Channel> {
        self.channels.get(channel)
    }

    /// Route `call` to the named channel.
    pub fn dispatch(&self, channel: &str, call: MethodCall) -> PendingReply {
        if let Some(target) = self.channels.get(channel) {
            return target.dispatch(call);
        }
        warn!(channel, method = %call.method, "no handler attached to channel");
        let (completion, pending) = Completion::new(channel, &call.method, call.id);
        completion.not_implemented();
        pending
    }

    /// Registered channel names, sorted.
    pub fn channel_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.channels.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
