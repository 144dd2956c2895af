// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory platform doubles for unit tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use switchboard_bridge::Platform;
use switchboard_bridge::traits::*;
use switchboard_core::error::{Result, SwitchboardError};
use switchboard_core::types::LocalNotificationRequest;

use crate::ui_loop::{UiLoop, UiLoopHandle};

/// What the fake share sheet does when presented.
#[derive(Debug, Clone)]
pub enum ShareScript {
    /// Present, then finish immediately with this outcome.
    Finish(ShareOutcome),
    /// Present and wait for `FakeShare::finish`.
    Hold,
    /// Nothing to present from.
    NoPresenter,
    /// Presentation fails with a bridge error.
    Refuse(String),
}

pub struct FakeShare {
    script: Mutex<ShareScript>,
    presented: Mutex<Vec<String>>,
    waiting: Mutex<Vec<ShareCallback>>,
}

impl FakeShare {
    pub fn new(script: ShareScript) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            presented: Mutex::new(Vec::new()),
            waiting: Mutex::new(Vec::new()),
        })
    }

    /// Texts handed to the share sheet, in order.
    pub fn presented(&self) -> Vec<String> {
        self.presented.lock().unwrap().clone()
    }

    /// Finish the oldest held sheet.
    pub fn finish(&self, outcome: ShareOutcome) {
        let callback = self.waiting.lock().unwrap().remove(0);
        callback(outcome);
    }

    /// Forget every held sheet without calling back.
    pub fn abandon(&self) {
        self.waiting.lock().unwrap().clear();
    }
}

impl NativeShare for FakeShare {
    fn share_text(&self, text: &str, on_finish: ShareCallback) -> Result<()> {
        let script = self.script.lock().unwrap().clone();
        match script {
            ShareScript::NoPresenter => return Err(SwitchboardError::NoPresenter),
            ShareScript::Refuse(reason) => return Err(SwitchboardError::Bridge(reason)),
            ShareScript::Finish(outcome) => {
                self.presented.lock().unwrap().push(text.to_owned());
                on_finish(outcome);
            }
            ShareScript::Hold => {
                self.presented.lock().unwrap().push(text.to_owned());
                self.waiting.lock().unwrap().push(on_finish);
            }
        }
        Ok(())
    }
}

/// Answers `true` for a fixed set of URLs and counts queries.
pub struct FakeUrls {
    openable: HashSet<String>,
    queries: AtomicUsize,
}

impl FakeUrls {
    pub fn new<I: IntoIterator<Item = &'static str>>(openable: I) -> Arc<Self> {
        Arc::new(Self {
            openable: openable.into_iter().map(str::to_owned).collect(),
            queries: AtomicUsize::new(0),
        })
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl NativeUrlOpener for FakeUrls {
    fn can_open_url(&self, url: &str) -> bool {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.openable.contains(url)
    }
}

/// Records every submitted request; optionally rejects them.
#[derive(Default)]
pub struct FakeNotifications {
    submitted: Mutex<Vec<LocalNotificationRequest>>,
    reject: bool,
}

impl FakeNotifications {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            reject: true,
            ..Self::default()
        })
    }

    pub fn submitted(&self) -> Vec<LocalNotificationRequest> {
        self.submitted.lock().unwrap().clone()
    }
}

impl NativeNotifications for FakeNotifications {
    fn schedule_local(&self, request: &LocalNotificationRequest) -> Result<()> {
        self.submitted.lock().unwrap().push(request.clone());
        if self.reject {
            return Err(SwitchboardError::Notification("authorization denied".into()));
        }
        Ok(())
    }
}

/// A full set of doubles plus the manually pumped UI loop driving them.
pub struct FakePlatform {
    pub share: Arc<FakeShare>,
    pub urls: Arc<FakeUrls>,
    pub notifications: Arc<FakeNotifications>,
    pub ui: UiLoop,
    pub ui_handle: UiLoopHandle,
}

impl FakePlatform {
    pub fn new(script: ShareScript) -> Self {
        let (ui_handle, ui) = UiLoop::new();
        Self {
            share: FakeShare::new(script),
            urls: FakeUrls::new(["mobilenotes://"]),
            notifications: FakeNotifications::new(),
            ui,
            ui_handle,
        }
    }

    pub fn platform(&self) -> Platform {
        Platform::new(
            "test",
            self.share.clone(),
            self.urls.clone(),
            self.notifications.clone(),
            Arc::new(self.ui_handle.clone()),
        )
    }
}
