// SPDX-License-Identifier: GPL-3.0-only

//! Local desktop notifications via `org.freedesktop.Notifications`

use crate::constants::{app_info, notifications};
use crate::errors::NotificationError;
use crate::notifications::LocalNotification;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};
use zbus::zvariant::Value;

/// How notifications are presented while the app is in the foreground
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationBehavior {
    pub show_alert: bool,
    pub play_sound: bool,
    pub set_badge: bool,
}

impl Default for NotificationBehavior {
    fn default() -> Self {
        Self {
            show_alert: true,
            play_sound: true,
            set_badge: true,
        }
    }
}

/// Schedules local notifications
pub trait LocalNotifier: Send + Sync + 'static {
    /// Configure how incoming notifications are presented
    fn set_presentation(&self, behavior: NotificationBehavior);

    /// Show or schedule a notification, returning its id if one was shown
    fn schedule(
        &self,
        notification: LocalNotification,
    ) -> impl Future<Output = Result<Option<u32>, NotificationError>> + Send;
}

/// Freedesktop notification server client
#[derive(Debug, Clone, Default)]
pub struct FreedesktopNotifier {
    behavior: Arc<RwLock<NotificationBehavior>>,
    badge_count: Arc<AtomicI64>,
}

impl FreedesktopNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn behavior(&self) -> NotificationBehavior {
        self.behavior
            .read()
            .map(|behavior| *behavior)
            .unwrap_or_default()
    }

    async fn update_badge(connection: &zbus::Connection, count: i64) -> Result<(), NotificationError> {
        let app_uri = format!("application://{}.desktop", app_info::APP_ID);
        let mut properties: HashMap<&str, Value> = HashMap::new();
        properties.insert("count", Value::new(count));
        properties.insert("count-visible", Value::new(count > 0));

        connection
            .emit_signal(
                None::<zbus::names::BusName>,
                notifications::LAUNCHER_ENTRY_PATH,
                notifications::LAUNCHER_ENTRY_INTERFACE,
                "Update",
                &(app_uri, properties),
            )
            .await?;
        Ok(())
    }
}

/// Notification hints for the given payload and presentation
pub(crate) fn notification_hints<'a>(
    notification: &LocalNotification,
    behavior: NotificationBehavior,
) -> HashMap<&'a str, Value<'a>> {
    let mut hints: HashMap<&str, Value> = HashMap::new();
    hints.insert("desktop-entry", Value::new(app_info::APP_ID));
    hints.insert("suppress-sound", Value::new(!behavior.play_sound));

    if !notification.data.is_empty()
        && let Ok(json) = serde_json::to_string(&notification.data)
    {
        hints.insert(notifications::DATA_HINT, Value::new(json));
    }
    hints
}

impl LocalNotifier for FreedesktopNotifier {
    fn set_presentation(&self, behavior: NotificationBehavior) {
        if let Ok(mut current) = self.behavior.write() {
            *current = behavior;
        }
        debug!(?behavior, "Notification presentation configured");
    }

    async fn schedule(&self, notification: LocalNotification) -> Result<Option<u32>, NotificationError> {
        let behavior = self.behavior();
        if !behavior.show_alert {
            debug!("Alerts disabled, notification not shown");
            return Ok(None);
        }

        if let Some(delay) = notification.trigger {
            tokio::time::sleep(delay).await;
        }

        let connection = zbus::Connection::session().await?;
        let proxy = zbus::Proxy::new(
            &connection,
            notifications::NOTIFICATIONS_BUS_NAME,
            notifications::NOTIFICATIONS_OBJECT_PATH,
            notifications::NOTIFICATIONS_BUS_NAME,
        )
        .await?;

        let hints = notification_hints(&notification, behavior);
        let actions: Vec<&str> = Vec::new();

        let id: u32 = proxy
            .call(
                "Notify",
                &(
                    app_info::APP_NAME,
                    0u32,
                    app_info::APP_ID,
                    notification.title.as_str(),
                    notification.body.as_str(),
                    actions,
                    hints,
                    -1i32,
                ),
            )
            .await
            .map_err(|e| NotificationError::ScheduleFailed(e.to_string()))?;

        info!(id, title = %notification.title, "Local notification shown");

        if behavior.set_badge {
            let count = self.badge_count.fetch_add(1, Ordering::Relaxed) + 1;
            if let Err(e) = Self::update_badge(&connection, count).await {
                debug!(error = %e, "Failed to update launcher badge");
            }
        }

        Ok(Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(data: &[(&str, &str)]) -> LocalNotification {
        LocalNotification {
            title: "T".to_string(),
            body: "B".to_string(),
            data: data
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            trigger: None,
        }
    }

    #[test]
    fn test_hints_carry_data_as_json() {
        let hints = notification_hints(&notification(&[("order", "42")]), NotificationBehavior::default());

        let json = hints
            .get(notifications::DATA_HINT)
            .and_then(|value| value.downcast_ref::<&str>().ok())
            .expect("data hint");
        let parsed: HashMap<String, String> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.get("order").map(String::as_str), Some("42"));
    }

    #[test]
    fn test_hints_without_data() {
        let hints = notification_hints(&notification(&[]), NotificationBehavior::default());
        assert!(!hints.contains_key(notifications::DATA_HINT));
        assert!(hints.contains_key("desktop-entry"));
    }

    #[test]
    fn test_sound_suppressed_when_disabled() {
        let behavior = NotificationBehavior {
            play_sound: false,
            ..Default::default()
        };
        let hints = notification_hints(&notification(&[]), behavior);
        assert_eq!(
            hints.get("suppress-sound").and_then(|v| v.downcast_ref::<bool>().ok()),
            Some(true)
        );
    }

    #[test]
    fn test_presentation_is_stored() {
        let notifier = FreedesktopNotifier::new();
        let behavior = NotificationBehavior {
            show_alert: false,
            play_sound: false,
            set_badge: false,
        };
        notifier.set_presentation(behavior);
        assert_eq!(notifier.behavior(), behavior);
    }
}
