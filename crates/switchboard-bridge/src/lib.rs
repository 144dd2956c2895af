// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Switchboard: Native platform bridge abstractions.
//
// Defines the capability traits the channel handlers depend on and picks the
// implementation for the target operating system.

use std::sync::Arc;

pub mod traits;

#[cfg(target_os = "ios")]
pub mod ios;

#[cfg(not(target_os = "ios"))]
pub mod stub;

use traits::{MainThreadExecutor, NativeNotifications, NativeShare, NativeUrlOpener, PlatformBridge};

/// One platform bridge split into its capabilities.
///
/// Handlers hold only the capabilities they use, so tests can swap any one of
/// them without implementing the rest.
#[derive(Clone)]
pub struct Platform {
    name: String,
    pub share: Arc<dyn NativeShare>,
    pub urls: Arc<dyn NativeUrlOpener>,
    pub notifications: Arc<dyn NativeNotifications>,
    pub main_thread: Arc<dyn MainThreadExecutor>,
}

impl Platform {
    pub fn new(
        name: impl Into<String>,
        share: Arc<dyn NativeShare>,
        urls: Arc<dyn NativeUrlOpener>,
        notifications: Arc<dyn NativeNotifications>,
        main_thread: Arc<dyn MainThreadExecutor>,
    ) -> Self {
        Self {
            name: name.into(),
            share,
            urls,
            notifications,
            main_thread,
        }
    }

    /// Share one bridge instance across every capability slot.
    pub fn from_bridge<B: PlatformBridge + 'static>(bridge: B) -> Self {
        let bridge = Arc::new(bridge);
        Self {
            name: bridge.platform_name().to_owned(),
            share: bridge.clone(),
            urls: bridge.clone(),
            notifications: bridge.clone(),
            main_thread: bridge,
        }
    }

    /// Replace the UI-thread executor, e.g. with a host-driven event loop.
    pub fn with_main_thread(mut self, main_thread: Arc<dyn MainThreadExecutor>) -> Self {
        self.main_thread = main_thread;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform").field("name", &self.name).finish_non_exhaustive()
    }
}

/// The bridge implementation for the target operating system.
pub fn platform_bridge() -> Platform {
    #[cfg(target_os = "ios")]
    {
        Platform::from_bridge(ios::IosBridge::new())
    }
    #[cfg(not(target_os = "ios"))]
    {
        // Desktop/CI: capabilities report unavailable so non-native builds work.
        Platform::from_bridge(stub::StubBridge)
    }
}
