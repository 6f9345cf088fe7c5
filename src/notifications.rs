// SPDX-License-Identifier: GPL-3.0-only

//! Push-to-local notification bootstrap
//!
//! [`bootstrap`] is started once per application session. It configures the
//! local presentation, asks the push provider for authorization, fetches the
//! delivery token and then forwards every foreground message as one
//! immediate local notification until the session ends.

use crate::backends::notifications::{LocalNotifier, NotificationBehavior};
use crate::backends::push::{PushProvider, RemoteMessage};
use crate::constants::notifications::{FALLBACK_BODY, FALLBACK_TITLE};
use futures::StreamExt;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Content and trigger of a local notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalNotification {
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
    /// Delay before showing; `None` shows immediately
    pub trigger: Option<Duration>,
}

impl LocalNotification {
    /// Immediate notification mirroring a remote message
    pub fn from_remote(message: RemoteMessage) -> Self {
        Self {
            title: message
                .title
                .unwrap_or_else(|| FALLBACK_TITLE.to_string()),
            body: message.body.unwrap_or_else(|| FALLBACK_BODY.to_string()),
            data: message.data,
            trigger: None,
        }
    }
}

/// Summary of the bootstrap steps before message forwarding began
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub authorization_enabled: bool,
    pub token: Option<String>,
    pub subscribed: bool,
    pub forwarded: usize,
}

/// Run the notification bootstrap for this session
///
/// Steps run in order and none depends on an earlier one succeeding.
/// `on_ready` sees the report once the subscription step is done; the
/// returned future only completes when the message stream ends.
pub async fn bootstrap<P, N, R>(
    provider: P,
    notifier: N,
    behavior: NotificationBehavior,
    on_ready: R,
) -> BootstrapReport
where
    P: PushProvider,
    N: LocalNotifier,
    R: FnOnce(&BootstrapReport),
{
    let mut report = BootstrapReport::default();

    notifier.set_presentation(behavior);

    match provider.request_authorization().await {
        Ok(status) => {
            report.authorization_enabled = status.is_enabled();
            info!(?status, enabled = report.authorization_enabled, "Notification authorization");
        }
        Err(e) => warn!(error = %e, "Notification authorization request failed"),
    }

    match provider.token().await {
        Ok(token) => {
            debug!(token = %token, "Push delivery token");
            report.token = Some(token);
        }
        Err(e) => warn!(error = %e, "Failed to fetch push delivery token"),
    }

    let mut messages = match provider.subscribe().await {
        Ok(messages) => messages,
        Err(e) => {
            warn!(error = %e, "Failed to subscribe to push messages");
            on_ready(&report);
            return report;
        }
    };
    report.subscribed = true;
    on_ready(&report);

    while let Some(message) = messages.next().await {
        let notification = LocalNotification::from_remote(message);
        match notifier.schedule(notification).await {
            Ok(_) => report.forwarded += 1,
            Err(e) => warn!(error = %e, "Failed to show local notification"),
        }
    }

    info!(forwarded = report.forwarded, "Push message stream ended");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::push::{AuthorizationStatus, PushSubscription};
    use crate::errors::NotificationError;
    use futures::channel::mpsc;
    use std::sync::{Arc, Mutex};

    fn remote(title: Option<&str>, body: Option<&str>) -> RemoteMessage {
        RemoteMessage {
            title: title.map(str::to_string),
            body: body.map(str::to_string),
            data: HashMap::from([("k".to_string(), "v".to_string())]),
        }
    }

    #[test]
    fn test_title_and_body_carried_through() {
        let local = LocalNotification::from_remote(remote(Some("T"), Some("B")));
        assert_eq!(local.title, "T");
        assert_eq!(local.body, "B");
        assert_eq!(local.trigger, None);
        assert_eq!(local.data.get("k").map(String::as_str), Some("v"));
    }

    #[test]
    fn test_missing_title_and_body_fall_back() {
        let local = LocalNotification::from_remote(remote(None, None));
        assert_eq!(local.title, "New Notification");
        assert_eq!(local.body, "");
    }

    /// Provider returning canned results and a fixed list of messages
    #[derive(Clone)]
    struct FakeProvider {
        authorization: Result<AuthorizationStatus, NotificationError>,
        token: Result<String, NotificationError>,
        messages: Vec<RemoteMessage>,
    }

    impl PushProvider for FakeProvider {
        async fn request_authorization(&self) -> Result<AuthorizationStatus, NotificationError> {
            self.authorization.clone()
        }

        async fn token(&self) -> Result<String, NotificationError> {
            self.token.clone()
        }

        async fn subscribe(&self) -> Result<PushSubscription, NotificationError> {
            let (mut sender, receiver) = mpsc::channel(self.messages.len().max(1));
            for message in &self.messages {
                sender
                    .try_send(message.clone())
                    .map_err(|e| NotificationError::Bus(e.to_string()))?;
            }
            Ok(PushSubscription::from_receiver(receiver))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        behavior: Arc<Mutex<Option<NotificationBehavior>>>,
        scheduled: Arc<Mutex<Vec<LocalNotification>>>,
    }

    impl LocalNotifier for RecordingNotifier {
        fn set_presentation(&self, behavior: NotificationBehavior) {
            *self.behavior.lock().unwrap() = Some(behavior);
        }

        async fn schedule(&self, notification: LocalNotification) -> Result<Option<u32>, NotificationError> {
            let mut scheduled = self.scheduled.lock().unwrap();
            scheduled.push(notification);
            Ok(Some(scheduled.len() as u32))
        }
    }

    #[tokio::test]
    async fn test_every_message_becomes_one_notification() {
        let provider = FakeProvider {
            authorization: Ok(AuthorizationStatus::Provisional),
            token: Ok("abc".to_string()),
            messages: vec![
                remote(Some("T"), Some("B")),
                remote(Some("T"), Some("B")),
                remote(None, None),
            ],
        };
        let notifier = RecordingNotifier::default();

        let report = bootstrap(provider, notifier.clone(), NotificationBehavior::default(), |_| {}).await;

        assert!(report.authorization_enabled);
        assert_eq!(report.token.as_deref(), Some("abc"));
        assert_eq!(report.forwarded, 3);

        let scheduled = notifier.scheduled.lock().unwrap();
        // No deduplication
        assert_eq!(scheduled[0], scheduled[1]);
        assert_eq!(scheduled[2].title, "New Notification");
        assert!(scheduled.iter().all(|n| n.trigger.is_none()));
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_later_steps() {
        let provider = FakeProvider {
            authorization: Err(NotificationError::Bus("no session bus".to_string())),
            token: Err(NotificationError::Token("read-only".to_string())),
            messages: vec![remote(Some("still delivered"), None)],
        };
        let notifier = RecordingNotifier::default();
        let behavior = NotificationBehavior {
            show_alert: true,
            play_sound: false,
            set_badge: false,
        };

        let report = bootstrap(provider, notifier.clone(), behavior, |_| {}).await;

        assert!(!report.authorization_enabled);
        assert_eq!(report.token, None);
        assert!(report.subscribed);
        assert_eq!(report.forwarded, 1);
        assert_eq!(*notifier.behavior.lock().unwrap(), Some(behavior));
    }

    #[tokio::test]
    async fn test_denied_authorization_still_subscribes() {
        let provider = FakeProvider {
            authorization: Ok(AuthorizationStatus::Denied),
            token: Ok("abc".to_string()),
            messages: vec![remote(Some("T"), Some("B"))],
        };

        let report = bootstrap(
            provider,
            RecordingNotifier::default(),
            NotificationBehavior::default(),
            |_| {},
        )
        .await;

        assert!(!report.authorization_enabled);
        assert_eq!(report.forwarded, 1);
    }

    #[tokio::test]
    async fn test_ready_reported_before_forwarding() {
        let provider = FakeProvider {
            authorization: Ok(AuthorizationStatus::Authorized),
            token: Ok("abc".to_string()),
            messages: vec![remote(Some("T"), None), remote(None, Some("B"))],
        };
        let mut ready = None;

        let report = bootstrap(
            provider,
            RecordingNotifier::default(),
            NotificationBehavior::default(),
            |report| ready = Some(report.clone()),
        )
        .await;

        let ready = ready.expect("ready callback not called");
        assert!(ready.subscribed);
        assert_eq!(ready.forwarded, 0);
        assert_eq!(report.forwarded, 2);
    }
}
