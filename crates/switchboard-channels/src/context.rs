// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The bridge's owned state: built once at startup, consulted for every
// request, and handed to the termination routine at shutdown.

use std::sync::Arc;

use tracing::{info, instrument};

use switchboard_bridge::Platform;
use switchboard_core::AppConfig;
use switchboard_core::error::Result;
use switchboard_core::types::{LocalNotificationRequest, MethodCall};

use crate::completion::PendingReply;
use crate::external::ExternalService;
use crate::kill_notice::KillNotifier;
use crate::notes::NotesService;
use crate::registry::{Channel, ChannelRegistry};

/// Registry, termination state, and platform for one process.
pub struct BridgeContext {
    registry: ChannelRegistry,
    kill_notifier: Arc<KillNotifier>,
    platform: Platform,
}

impl BridgeContext {
    pub fn builder(config: AppConfig, platform: Platform) -> BridgeContextBuilder {
        BridgeContextBuilder {
            config,
            platform,
            external: Vec::new(),
        }
    }

    /// Route a request arriving on `channel`.
    pub fn dispatch(&self, channel: &str, call: MethodCall) -> PendingReply {
        self.registry.dispatch(channel, call)
    }

    /// Process-termination hook. See [`KillNotifier::on_terminate`].
    #[instrument(skip_all, fields(platform = %self.platform.name()))]
    pub fn terminate(&self) -> Option<LocalNotificationRequest> {
        info!("bridge terminating");
        self.kill_notifier.on_terminate(self.platform.notifications.as_ref())
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    pub fn kill_notifier(&self) -> &KillNotifier {
        &self.kill_notifier
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }
}

/// Collects external collaborators before the registry is sealed.
pub struct BridgeContextBuilder {
    config: AppConfig,
    platform: Platform,
    external: Vec<(String, Arc<dyn ExternalService>)>,
}

impl BridgeContextBuilder {
    /// Attach the reminders service on its configured channel.
    pub fn reminders(self, service: Arc<dyn ExternalService>) -> Self {
        let name = self.config.channels.reminders.clone();
        self.external(name, service)
    }

    /// Attach the calendar service on its configured channel.
    pub fn calendar(self, service: Arc<dyn ExternalService>) -> Self {
        let name = self.config.channels.calendar.clone();
        self.external(name, service)
    }

    pub fn external(mut self, channel: impl Into<String>, service: Arc<dyn ExternalService>) -> Self {
        self.external.push((channel.into(), service));
        self
    }

    /// Register every channel. Fails on duplicate names or empty channels.
    pub fn build(self) -> Result<BridgeContext> {
        let Self {
            config,
            platform,
            external,
        } = self;
        let mut registry = ChannelRegistry::new();

        let kill_notifier = Arc::new(KillNotifier::new(config.kill_notification.clone()));
        registry.register(Arc::clone(&kill_notifier).channel(config.channels.notify_on_kill.as_str())?)?;

        let notes = Arc::new(NotesService::new(&platform, config.notes_url_scheme.as_str()));
        registry.register(notes.channel(config.channels.notes.as_str())?)?;

        for (name, service) in external {
            registry.register(Channel::external(name, service)?)?;
        }

        info!(
            platform = %platform.name(),
            channels = ?registry.channel_names(),
            "bridge context ready"
        );
        Ok(BridgeContext {
            registry,
            kill_notifier,
            platform,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use switchboard_bridge::traits::ShareOutcome;
    use switchboard_core::error::SwitchboardError;
    use switchboard_core::types::{DeferredNotification, Reply};

    use super::*;
    use crate::completion::Completion;
    use crate::kill_notice::SET_NOTIFICATION_ON_KILL;
    use crate::notes::{IS_NOTES_APP_AVAILABLE, SHARE_TO_NOTES};
    use crate::testing::{FakePlatform, ShareScript};

    struct Calendar;

    impl ExternalService for Calendar {
        fn methods(&self) -> Vec<String> {
            vec!["hasPermission".into()]
        }

        fn handle(&self, _call: MethodCall, completion: Completion) -> Result<()> {
            completion.success(false);
            Ok(())
        }
    }

    fn context(fake: &FakePlatform) -> BridgeContext {
        BridgeContext::builder(AppConfig::default(), fake.platform())
            .calendar(Arc::new(Calendar))
            .build()
            .unwrap()
    }

    #[test]
    fn default_channels_are_registered() {
        let fake = FakePlatform::new(ShareScript::Hold);
        let ctx = context(&fake);
        assert_eq!(
            ctx.registry().channel_names(),
            vec!["com.friend.ios/notifyOnKill", "com.omi.apple_calendar", "com.omi.apple_notes"]
        );
    }

    #[test]
    fn requests_route_through_the_context() {
        let mut fake = FakePlatform::new(ShareScript::Finish(ShareOutcome::Completed));
        let ctx = context(&fake);

        let mut available =
            ctx.dispatch("com.omi.apple_notes", MethodCall::new(IS_NOTES_APP_AVAILABLE, None));
        assert_eq!(available.try_reply(), Some(Reply::success(true)));

        let mut shared = ctx.dispatch(
            "com.omi.apple_notes",
            MethodCall::new(SHARE_TO_NOTES, Some(json!({ "content": "hi" }))),
        );
        fake.ui.run_pending();
        assert_eq!(shared.try_reply(), Some(Reply::success(true)));

        let mut calendar = ctx.dispatch("com.omi.apple_calendar", MethodCall::new("hasPermission", None));
        assert_eq!(calendar.try_reply(), Some(Reply::success(false)));
    }

    #[test]
    fn unknown_methods_are_probes_on_every_channel() {
        let fake = FakePlatform::new(ShareScript::Hold);
        let ctx = context(&fake);
        for channel in ctx.registry().channel_names() {
            let mut pending = ctx.dispatch(channel, MethodCall::new("noSuchMethod", None));
            assert_eq!(pending.try_reply(), Some(Reply::NotImplemented), "{channel}");
        }
        assert!(ctx.kill_notifier().staged().is_none());
        assert!(fake.share.presented().is_empty());
    }

    #[test]
    fn terminate_uses_the_last_staged_pair() {
        let fake = FakePlatform::new(ShareScript::Hold);
        let ctx = context(&fake);
        for (title, description) in [("A", "a"), ("B", "b")] {
            ctx.dispatch(
                "com.friend.ios/notifyOnKill",
                MethodCall::new(
                    SET_NOTIFICATION_ON_KILL,
                    Some(json!({ "title": title, "description": description })),
                ),
            );
        }
        assert_eq!(ctx.kill_notifier().staged(), Some(DeferredNotification::new("B", "b")));

        let request = ctx.terminate().expect("notification requested");
        assert_eq!(fake.notifications.submitted(), vec![request]);
        assert!(ctx.terminate().is_none());
    }

    #[test]
    fn clashing_external_channel_fails_the_build() {
        let fake = FakePlatform::new(ShareScript::Hold);
        let err = BridgeContext::builder(AppConfig::default(), fake.platform())
            .external("com.omi.apple_notes", Arc::new(Calendar))
            .build()
            .err()
            .expect("duplicate channel");
        assert!(matches!(err, SwitchboardError::DuplicateChannel(ref name) if name == "com.omi.apple_notes"));
    }
}
