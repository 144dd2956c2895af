// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// A UI-thread stand-in for hosts without a native main queue.
//
// Tasks are queued through `UiLoopHandle` and run one at a time by whichever
// thread drives the `UiLoop`; that thread counts as the UI thread while a task
// runs.

use std::cell::Cell;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use switchboard_bridge::traits::{MainThreadExecutor, MainThreadTask};

thread_local! {
    static ON_UI_LOOP: Cell<bool> = const { Cell::new(false) };
}

/// The consuming end: run it to execute queued UI work.
pub struct UiLoop {
    rx: mpsc::UnboundedReceiver<MainThreadTask>,
}

/// Cloneable producer implementing `MainThreadExecutor`.
#[derive(Clone)]
pub struct UiLoopHandle {
    tx: mpsc::UnboundedSender<MainThreadTask>,
}

impl UiLoop {
    pub fn new() -> (UiLoopHandle, UiLoop) {
        let (tx, rx) = mpsc::unbounded_channel();
        (UiLoopHandle { tx }, UiLoop { rx })
    }

    /// Run tasks until every handle has been dropped.
    pub async fn run(mut self) {
        debug!("UI loop started");
        while let Some(task) = self.rx.recv().await {
            run_task(task);
        }
        debug!("UI loop finished");
    }

    /// Run every task queued so far without waiting for more. Returns how
    /// many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            run_task(task);
            ran += 1;
        }
        ran
    }
}

/// Marks the current thread as the UI thread until dropped, unwinding included.
struct OnUiLoop;

impl OnUiLoop {
    fn enter() -> Self {
        ON_UI_LOOP.with(|flag| flag.set(true));
        OnUiLoop
    }
}

impl Drop for OnUiLoop {
    fn drop(&mut self) {
        ON_UI_LOOP.with(|flag| flag.set(false));
    }
}

fn run_task(task: MainThreadTask) {
    let _on_loop = OnUiLoop::enter();
    task();
}

impl MainThreadExecutor for UiLoopHandle {
    fn is_main_thread(&self) -> bool {
        ON_UI_LOOP.with(Cell::get)
    }

    fn run_on_main(&self, task: MainThreadTask) {
        if self.tx.send(task).is_err() {
            warn!("UI loop has stopped; task dropped");
        }
    }
}
