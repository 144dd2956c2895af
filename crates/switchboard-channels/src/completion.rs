// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-resolution reply slot shared between a dispatcher and its handler.
//
// A `Completion` is the sending half; `PendingReply` is what goes back to the
// boundary. Clones of a completion share one slot: the first resolution wins,
// later ones are logged and discarded, and if the last clone is dropped with
// the slot still open it resolves itself with `COMPLETION_DROPPED`.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use switchboard_core::codes;
use switchboard_core::types::{ChannelError, Reply, RequestId};

struct Slot {
    channel: String,
    method: String,
    request_id: RequestId,
    tx: Mutex<Option<oneshot::Sender<Reply>>>,
}

impl Slot {
    fn take(&self) -> Option<oneshot::Sender<Reply>> {
        self.tx.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    fn is_open(&self) -> bool {
        self.tx.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }
}

impl Drop for Slot {
    fn drop(&mut self) {
        let tx = self.tx.get_mut().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(tx) = tx {
            warn!(
                channel = %self.channel,
                method = %self.method,
                request_id = %self.request_id,
                "completion released without a reply"
            );
            let _ = tx.send(dropped_reply(&self.method, &self.channel));
        }
    }
}

fn dropped_reply(method: &str, channel: &str) -> Reply {
    Reply::error(ChannelError::new(
        codes::COMPLETION_DROPPED,
        format!("{method} on {channel} finished without a reply"),
    ))
}

/// The single callback that finalizes one request.
#[derive(Clone)]
pub struct Completion {
    slot: Arc<Slot>,
}

impl Completion {
    /// Open a reply slot for one request.
    pub fn new(channel: &str, method: &str, request_id: RequestId) -> (Self, PendingReply) {
        let (tx, rx) = oneshot::channel();
        let slot = Slot {
            channel: channel.to_owned(),
            method: method.to_owned(),
            request_id,
            tx: Mutex::new(Some(tx)),
        };
        (
            Self {
                slot: Arc::new(slot),
            },
            PendingReply {
                channel: channel.to_owned(),
                method: method.to_owned(),
                rx,
            },
        )
    }

    /// Deliver `reply`. Returns `false` if the request was already resolved.
    pub fn resolve(self, reply: Reply) -> bool {
        let Some(tx) = self.slot.take() else {
            warn!(
                channel = %self.slot.channel,
                method = %self.slot.method,
                request_id = %self.slot.request_id,
                ?reply,
                "completion already resolved; reply discarded"
            );
            return false;
        };
        debug!(
            channel = %self.slot.channel,
            method = %self.slot.method,
            request_id = %self.slot.request_id,
            "completion resolved"
        );
        if tx.send(reply).is_err() {
            debug!(request_id = %self.slot.request_id, "boundary stopped waiting for the reply");
        }
        true
    }

    pub fn success(self, value: impl Into<Value>) -> bool {
        self.resolve(Reply::success(value))
    }

    pub fn error(self, error: ChannelError) -> bool {
        self.resolve(Reply::error(error))
    }

    pub fn not_implemented(self) -> bool {
        self.resolve(Reply::NotImplemented)
    }

    pub fn is_resolved(&self) -> bool {
        !self.slot.is_open()
    }

    pub fn request_id(&self) -> RequestId {
        self.slot.request_id
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("channel", &self.slot.channel)
            .field("method", &self.slot.method)
            .field("request_id", &self.slot.request_id)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// The boundary's view of an in-flight request. Resolves exactly once.
#[derive(Debug)]
pub struct PendingReply {
    channel: String,
    method: String,
    rx: oneshot::Receiver<Reply>,
}

impl PendingReply {
    /// The reply, if it has already been delivered.
    ///
    /// Once this returns `Some` the reply has been consumed; do not await the
    /// `PendingReply` afterwards.
    pub fn try_reply(&mut self) -> Option<Reply> {
        self.rx.try_recv().ok()
    }
}

impl Future for PendingReply {
    type Output = Reply;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Reply> {
        let received = std::task::ready!(Pin::new(&mut self.rx).poll(cx));
        // `Slot` sends before its sender goes away; this covers a sender lost
        // any other way.
        Poll::Ready(received.unwrap_or_else(|_| dropped_reply(&self.method, &self.channel)))
    }
}
