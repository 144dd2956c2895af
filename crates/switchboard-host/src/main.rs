// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Switchboard: headless host for the method-channel bridge.
//
// Entry point. Initialises logging and configuration, builds the bridge
// context, serves JSON-line requests from stdin, writes every outstanding
// reply, and runs the termination hook when input ends or the process is
// interrupted.

mod services;

use std::process::ExitCode;
use std::sync::Arc;

use switchboard_channels::{BridgeContext, UiLoop};

use services::{boundary, data_dir};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries replies only.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Switchboard starting");

    let config = data_dir::load_config(&data_dir::config_path());

    let (ui_handle, ui_loop) = UiLoop::new();
    let platform = switchboard_bridge::platform_bridge().with_main_thread(Arc::new(ui_handle));
    tracing::info!(platform = %platform.name(), "platform bridge selected");

    let ctx = match BridgeContext::builder(config, platform).build() {
        Ok(ctx) => Arc::new(ctx),
        Err(e) => {
            tracing::error!(error = %e, "channel registration failed");
            return ExitCode::FAILURE;
        }
    };

    let ui_task = tokio::spawn(ui_loop.run());

    let session = boundary::serve(Arc::clone(&ctx), tokio::io::stdin(), tokio::io::stdout()).await;
    let code = match &session.stopped {
        Ok(reason) => {
            tracing::info!(?reason, "boundary stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "boundary failed");
            ExitCode::FAILURE
        }
    };

    // Stopping the UI loop drops work it has not run yet, so those requests
    // reply COMPLETION_DROPPED while the session drains.
    ui_task.abort();
    session.drain().await;
    ctx.terminate();
    code
}
