// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON-lines stand-in for the embedded runtime boundary.
//
// One request per input line:
//   {"channel": "...", "method": "...", "arguments": {...}}
// One reply per output line, written when the request settles (share replies
// can arrive long after later requests):
//   {"id": "...", "channel": "...", "method": "...", "reply": {...}}

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use switchboard_channels::{BridgeContext, PendingReply};
use switchboard_core::error::Result;
use switchboard_core::types::{MethodCall, Reply, RequestId};

/// A request line.
#[derive(Debug, Deserialize)]
pub struct RequestEnvelope {
    pub channel: String,
    #[serde(flatten)]
    pub call: MethodCall,
}

/// A reply line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyEnvelope {
    pub id: RequestId,
    pub channel: String,
    pub method: String,
    pub reply: Reply,
}

/// Why `serve` stopped reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    EndOfInput,
    Interrupted,
}

/// Parse and dispatch one input line. Malformed lines are logged and skipped.
pub fn dispatch_line(ctx: &BridgeContext, line: &str) -> Option<(ReplyEnvelope, PendingReply)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let envelope: RequestEnvelope = match serde_json::from_str(line) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "malformed request line skipped");
            return None;
        }
    };

    let header = ReplyEnvelope {
        id: envelope.call.id,
        channel: envelope.channel.clone(),
        method: envelope.call.method.clone(),
        reply: Reply::NotImplemented,
    };
    let pending = ctx.dispatch(&envelope.channel, envelope.call);
    Some((header, pending))
}

/// A boundary whose input has stopped but whose replies may still be in
/// flight.
pub struct Session {
    /// Why reading stopped, or the read error that stopped it.
    pub stopped: Result<Shutdown>,
    tx: mpsc::UnboundedSender<ReplyEnvelope>,
    forwarders: JoinSet<()>,
    writer: JoinHandle<()>,
}

impl Session {
    /// Requests accepted but not yet answered.
    pub fn in_flight(&self) -> usize {
        self.forwarders.len()
    }

    /// Wait for every accepted request to settle and its reply line to be
    /// written. Work parked on a UI loop that has stopped settles as
    /// `COMPLETION_DROPPED`.
    pub async fn drain(self) {
        let Session {
            tx,
            mut forwarders,
            writer,
            ..
        } = self;
        drop(tx);
        info!(in_flight = forwarders.len(), "draining boundary replies");
        while let Some(joined) = forwarders.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "reply forwarder failed");
            }
        }
        if let Err(e) = writer.await {
            error!(error = %e, "reply writer failed");
        }
        debug!("boundary drained");
    }
}

/// Read requests from `input` until it closes or the process is interrupted,
/// writing replies to `output` as they settle. Call [`Session::drain`] before
/// shutting the runtime down.
pub async fn serve<R, W>(ctx: Arc<BridgeContext>, input: R, output: W) -> Session
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_replies(rx, output));
    let mut forwarders = JoinSet::new();

    let mut lines = BufReader::new(input).lines();
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    let stopped: Result<Shutdown> = loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        info!("boundary input closed");
                        break Ok(Shutdown::EndOfInput);
                    }
                    Err(e) => break Err(e.into()),
                };
                if let Some((header, pending)) = dispatch_line(&ctx, &line) {
                    let tx = tx.clone();
                    forwarders.spawn(async move {
                        let reply = pending.await;
                        let _ = tx.send(ReplyEnvelope { reply, ..header });
                    });
                }
            }
            _ = &mut interrupt => {
                info!("interrupted");
                break Ok(Shutdown::Interrupted);
            }
        }
    };

    Session {
        stopped,
        tx,
        forwarders,
        writer,
    }
}

async fn write_replies<W>(mut rx: mpsc::UnboundedReceiver<ReplyEnvelope>, mut output: W)
where
    W: AsyncWrite + Unpin,
{
    while let Some(envelope) = rx.recv().await {
        let mut line = match serde_json::to_vec(&envelope) {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, request_id = %envelope.id, "reply not serializable");
                continue;
            }
        };
        line.push(b'\n');
        if let Err(e) = output.write_all(&line).await {
            error!(error = %e, "writing reply failed; boundary output closed");
            return;
        }
        if let Err(e) = output.flush().await {
            error!(error = %e, "flushing reply failed");
            return;
        }
        debug!(request_id = %envelope.id, "reply written");
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use switchboard_bridge::platform_bridge;
    use switchboard_channels::UiLoop;
    use switchboard_core::AppConfig;

    use super::*;

    fn context() -> Arc<BridgeContext> {
        Arc::new(
            BridgeContext::builder(AppConfig::default(), platform_bridge())
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn malformed_and_blank_lines_are_skipped() {
        let ctx = context();
        assert!(dispatch_line(&ctx, "").is_none());
        assert!(dispatch_line(&ctx, "not json").is_none());
        assert!(dispatch_line(&ctx, r#"{"method":"shareToNotes"}"#).is_none(), "channel required");
    }

    #[test]
    fn line_is_dispatched_to_its_channel() {
        let ctx = context();
        let (header, mut pending) = dispatch_line(
            &ctx,
            r#"{"channel":"com.omi.apple_notes","method":"shareToNotes","arguments":{}}"#,
        )
        .unwrap();
        assert_eq!(header.channel, "com.omi.apple_notes");
        assert_eq!(header.method, "shareToNotes");
        assert_eq!(pending.try_reply().unwrap().error_code(), Some("INVALID_ARGUMENTS"));
    }

    #[tokio::test]
    async fn serve_answers_every_line_then_stops_at_eof() {
        let ctx = context();
        let input = concat!(
            r#"{"channel":"com.omi.apple_notes","method":"isNotesAppAvailable"}"#,
            "\n",
            "garbage\n",
            r#"{"channel":"com.friend.ios/notifyOnKill","method":"setNotificationOnKillService","arguments":{"title":"Recording stopped","description":"Tap to resume"}}"#,
            "\n",
            r#"{"channel":"com.omi.apple_calendar","method":"getEvents"}"#,
            "\n",
        );
        let (writer, reader) = tokio::io::duplex(4096);

        let session = serve(Arc::clone(&ctx), input.as_bytes(), writer).await;
        assert_eq!(session.stopped.as_ref().ok(), Some(&Shutdown::EndOfInput));
        session.drain().await;

        let mut lines = BufReader::new(reader).lines();
        let mut replies = Vec::new();
        for _ in 0..3 {
            let line = lines.next_line().await.unwrap().expect("reply line");
            replies.push(serde_json::from_str::<Value>(&line).unwrap());
        }
        replies.sort_by_key(|r| r["method"].as_str().unwrap_or_default().to_owned());

        assert_eq!(replies[0]["method"], "getEvents");
        assert_eq!(replies[0]["reply"], json!({ "status": "not_implemented" }));
        assert_eq!(replies[1]["reply"], json!({ "status": "success", "value": false }));
        assert_eq!(replies[2]["reply"], json!({ "status": "success", "value": null }));

        assert!(ctx.kill_notifier().staged().is_some());
    }

    fn current_thread() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    fn read_lines(rt: &tokio::runtime::Runtime, reader: tokio::io::DuplexStream) -> Vec<Value> {
        rt.block_on(async move {
            let mut lines = BufReader::new(reader).lines();
            let mut replies = Vec::new();
            while let Some(line) = lines.next_line().await.unwrap() {
                replies.push(serde_json::from_str::<Value>(&line).unwrap());
            }
            replies
        })
    }

    #[test]
    fn settled_replies_survive_runtime_shutdown() {
        let ctx = context();
        let (writer, reader) = tokio::io::duplex(4096);
        let input = concat!(
            r#"{"channel":"com.omi.apple_notes","method":"isNotesAppAvailable"}"#,
            "\n",
        );

        let rt = current_thread();
        rt.block_on(async {
            let session = serve(Arc::clone(&ctx), input.as_bytes(), writer).await;
            session.drain().await;
        });
        drop(rt);

        let replies = read_lines(&current_thread(), reader);
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0]["method"], "isNotesAppAvailable");
        assert_eq!(replies[0]["reply"], json!({ "status": "success", "value": false }));
    }

    #[test]
    fn work_parked_on_a_stopped_ui_loop_still_replies() {
        let (ui_handle, ui_loop) = UiLoop::new();
        let platform = platform_bridge().with_main_thread(Arc::new(ui_handle));
        let ctx = Arc::new(
            BridgeContext::builder(AppConfig::default(), platform)
                .build()
                .unwrap(),
        );
        let (writer, reader) = tokio::io::duplex(4096);
        let input = concat!(
            r#"{"channel":"com.omi.apple_notes","method":"shareToNotes","arguments":{"content":"hello"}}"#,
            "\n",
        );

        let rt = current_thread();
        rt.block_on(async {
            let session = serve(Arc::clone(&ctx), input.as_bytes(), writer).await;
            assert_eq!(session.in_flight(), 1);
            drop(ui_loop);
            session.drain().await;
        });
        drop(rt);

        let replies = read_lines(&current_thread(), reader);
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0]["method"], "shareToNotes");
        assert_eq!(replies[0]["reply"]["error"]["code"], "COMPLETION_DROPPED");
    }
}
