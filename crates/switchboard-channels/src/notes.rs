// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Notes channel: share text through the system share sheet and probe whether
// the Notes app is installed.
//
// Argument validation runs on the calling thread and replies synchronously.
// Presentation always happens on the UI thread; the reply then waits on the
// user for as long as the sheet stays up.

use std::sync::Arc;

use tracing::{debug, info, warn};

use switchboard_bridge::Platform;
use switchboard_bridge::traits::{MainThreadExecutor, NativeShare, NativeUrlOpener, ShareOutcome};
use switchboard_core::codes;
use switchboard_core::error::{Result, SwitchboardError};
use switchboard_core::types::{ChannelError, MethodCall};

use crate::completion::Completion;
use crate::registry::Channel;

pub const SHARE_TO_NOTES: &str = "shareToNotes";
pub const IS_NOTES_APP_AVAILABLE: &str = "isNotesAppAvailable";

/// Handler behind the notes channel.
pub struct NotesService {
    share: Arc<dyn NativeShare>,
    urls: Arc<dyn NativeUrlOpener>,
    main_thread: Arc<dyn MainThreadExecutor>,
    url_scheme: String,
}

impl NotesService {
    pub fn new(platform: &Platform, url_scheme: impl Into<String>) -> Self {
        Self {
            share: Arc::clone(&platform.share),
            urls: Arc::clone(&platform.urls),
            main_thread: Arc::clone(&platform.main_thread),
            url_scheme: url_scheme.into(),
        }
    }

    /// The channel exposing `shareToNotes` and `isNotesAppAvailable`.
    pub fn channel(self: Arc<Self>, name: impl Into<String>) -> Result<Channel> {
        let sharer = Arc::clone(&self);
        Channel::builder(name)
            .method(SHARE_TO_NOTES, move |call, completion| {
                sharer.share_to_notes(&call, completion)
            })
            .method(IS_NOTES_APP_AVAILABLE, move |_call, completion| {
                completion.success(self.is_notes_app_available());
                Ok(())
            })
            .build()
    }

    /// Present the share sheet seeded with the `content` argument.
    ///
    /// Replies `INVALID_ARGUMENTS` before returning when `content` is missing
    /// or not a string. Otherwise the reply is `true`/`false` for
    /// finished/cancelled, `false` when there is nothing to present from, or
    /// `SHARE_FAILED` when the share subsystem reports an error.
    pub fn share_to_notes(&self, call: &MethodCall, completion: Completion) -> Result<()> {
        let Some(content) = call.str_arg("content") else {
            debug!(request_id = %call.id, "shareToNotes without string content");
            completion.error(ChannelError::new(
                codes::INVALID_ARGUMENTS,
                "Invalid arguments for shareToNotes",
            ));
            return Ok(());
        };

        let content = content.to_owned();
        let share = Arc::clone(&self.share);
        let present = move || present_share_sheet(share.as_ref(), &content, completion);

        if self.main_thread.is_main_thread() {
            present();
        } else {
            debug!(request_id = %call.id, "deferring share sheet to the UI thread");
            self.main_thread.run_on_main(Box::new(present));
        }
        Ok(())
    }

    /// Whether the Notes URL scheme can be opened. No side effects.
    pub fn is_notes_app_available(&self) -> bool {
        self.urls.can_open_url(&self.url_scheme)
    }
}

fn present_share_sheet(share: &dyn NativeShare, content: &str, completion: Completion) {
    let on_finish = {
        let completion = completion.clone();
        Box::new(move |outcome: ShareOutcome| {
            info!(?outcome, "share sheet finished");
            match outcome {
                ShareOutcome::Completed => completion.success(true),
                ShareOutcome::Cancelled => completion.success(false),
                ShareOutcome::Failed(message) => {
                    completion.error(ChannelError::new(codes::SHARE_FAILED, message))
                }
            };
        })
    };

    match share.share_text(content, on_finish) {
        Ok(()) => debug!("share sheet presented"),
        Err(SwitchboardError::NoPresenter) => {
            warn!("no view controller to present the share sheet from");
            completion.success(false);
        }
        Err(err) => {
            warn!(error = %err, "share sheet could not be presented");
            completion.error(ChannelError::new(codes::SHARE_FAILED, err.to_string()));
        }
    }
}
