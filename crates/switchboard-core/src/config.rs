// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Bridge settings. Every field has a default, so a partial JSON file only
/// overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Names of the channels the embedded runtime talks to.
    pub channels: ChannelNames,
    /// URL scheme probed by `isNotesAppAvailable`.
    pub notes_url_scheme: String,
    /// Notification posted when the process is killed.
    pub kill_notification: KillNotificationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            channels: ChannelNames::default(),
            notes_url_scheme: "mobilenotes://".into(),
            kill_notification: KillNotificationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&data)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelNames {
    pub notify_on_kill: String,
    pub notes: String,
    pub reminders: String,
    pub calendar: String,
}

impl Default for ChannelNames {
    fn default() -> Self {
        Self {
            notify_on_kill: "com.friend.ios/notifyOnKill".into(),
            notes: "com.omi.apple_notes".into(),
            reminders: "com.omi.apple_reminders".into(),
            calendar: "com.omi.apple_calendar".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KillNotificationConfig {
    /// Fixed identifier, so a later submission replaces an undelivered one.
    pub identifier: String,
    pub delay_secs: u64,
}

impl Default for KillNotificationConfig {
    fn default() -> Self {
        Self {
            identifier: "notification on app kill".into(),
            delay_secs: 1,
        }
    }
}

impl KillNotificationConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}
