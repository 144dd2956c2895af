// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware config file resolution.

use std::path::{Path, PathBuf};

use switchboard_core::AppConfig;
use switchboard_core::error::SwitchboardError;
use tracing::{debug, info, warn};

const CONFIG_FILE: &str = "config.json";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SWITCHBOARD_CONFIG";

/// The config file this process should read.
pub fn config_path() -> PathBuf {
    resolve_config_path(
        std::env::var_os(CONFIG_ENV).map(PathBuf::from),
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

/// Explicit path first, then `$XDG_DATA_HOME/switchboard`, then
/// `~/.local/share/switchboard`, then `/tmp/switchboard`.
fn resolve_config_path(
    explicit: Option<PathBuf>,
    xdg: Option<PathBuf>,
    home: Option<PathBuf>,
) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    let base = xdg
        .or_else(|| home.map(|h| h.join(".local").join("share")))
        .unwrap_or_else(|| PathBuf::from("/tmp"));
    base.join("switchboard").join(CONFIG_FILE)
}

/// Load the config at `path`, falling back to defaults if it is missing or
/// unreadable.
pub fn load_config(path: &Path) -> AppConfig {
    match AppConfig::load(path) {
        Ok(config) => {
            info!(path = %path.display(), "configuration loaded");
            config
        }
        Err(SwitchboardError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file; using defaults");
            AppConfig::default()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "config unreadable; using defaults");
            AppConfig::default()
        }
    }
}
