// SPDX-License-Identifier: GPL-3.0-only

//! Push message delivery over the session bus
//!
//! The app claims a well-known name and serves a small delivery interface.
//! A sender that knows this installation's token calls
//! `Deliver(token, title, body, data)`; every accepted call becomes one
//! [`RemoteMessage`] on the subscription stream. Empty title or body strings
//! mean "absent".

use crate::constants::notifications;
use crate::errors::NotificationError;
use futures::channel::mpsc;
use futures::{Stream, StreamExt};
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::{debug, info, warn};

/// Outcome of a delivery authorization request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    NotDetermined,
    Denied,
    Authorized,
    /// Notifications can be shown once the server is started on demand
    Provisional,
}

impl AuthorizationStatus {
    /// Authorized and provisional grants both allow delivery
    pub fn is_enabled(self) -> bool {
        matches!(
            self,
            AuthorizationStatus::Authorized | AuthorizationStatus::Provisional
        )
    }
}

/// A message received from the push provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteMessage {
    pub title: Option<String>,
    pub body: Option<String>,
    pub data: HashMap<String, String>,
}

/// Push messaging provider
pub trait PushProvider: Send + Sync + 'static {
    /// Ask for permission to deliver notifications
    fn request_authorization(
        &self,
    ) -> impl Future<Output = Result<AuthorizationStatus, NotificationError>> + Send;

    /// Token addressing this installation
    fn token(&self) -> impl Future<Output = Result<String, NotificationError>> + Send;

    /// Start receiving foreground messages
    fn subscribe(&self) -> impl Future<Output = Result<PushSubscription, NotificationError>> + Send;
}

/// Stream of incoming messages; delivery stops when it is dropped
pub struct PushSubscription {
    receiver: mpsc::Receiver<RemoteMessage>,
    _connection: Option<zbus::Connection>,
}

impl PushSubscription {
    /// Subscription fed by an in-process channel
    pub fn from_receiver(receiver: mpsc::Receiver<RemoteMessage>) -> Self {
        Self {
            receiver,
            _connection: None,
        }
    }
}

impl Stream for PushSubscription {
    type Item = RemoteMessage;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_next_unpin(cx)
    }
}

/// Session-bus push provider
#[derive(Debug, Clone)]
pub struct DbusPushProvider {
    token_path: PathBuf,
}

impl DbusPushProvider {
    pub fn new() -> Self {
        Self::with_token_path(default_token_path())
    }

    pub fn with_token_path(token_path: PathBuf) -> Self {
        Self { token_path }
    }
}

impl Default for DbusPushProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// `$XDG_DATA_HOME/filter-camera/push-token`
pub fn default_token_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(crate::constants::capture::TEMP_DIR_NAME)
        .join(notifications::TOKEN_FILE)
}

/// Read the persisted token, creating one on first use
pub async fn load_or_create_token(path: &std::path::Path) -> Result<String, NotificationError> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) if !contents.trim().is_empty() => return Ok(contents.trim().to_string()),
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(NotificationError::Token(e.to_string())),
    }

    let token = uuid::Uuid::new_v4().simple().to_string();
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| NotificationError::Token(e.to_string()))?;
    }
    tokio::fs::write(path, &token)
        .await
        .map_err(|e| NotificationError::Token(e.to_string()))?;

    info!(path = %path.display(), "Created push token");
    Ok(token)
}

struct PushInterface {
    token: String,
    sender: mpsc::Sender<RemoteMessage>,
}

#[zbus::interface(name = "io.github.filtercamera.Push1")]
impl PushInterface {
    /// Deliver a message addressed to `token`
    async fn deliver(
        &mut self,
        token: &str,
        title: &str,
        body: &str,
        data: HashMap<String, String>,
    ) -> zbus::fdo::Result<()> {
        if token != self.token {
            warn!("Rejected push message with unknown token");
            return Err(zbus::fdo::Error::AccessDenied(
                "Unknown delivery token".to_string(),
            ));
        }

        let message = RemoteMessage {
            title: non_empty(title),
            body: non_empty(body),
            data,
        };
        debug!(has_title = message.title.is_some(), "Push message received");

        self.sender
            .try_send(message)
            .map_err(|e| zbus::fdo::Error::LimitsExceeded(e.to_string()))
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl PushProvider for DbusPushProvider {
    async fn request_authorization(&self) -> Result<AuthorizationStatus, NotificationError> {
        let connection = zbus::Connection::session().await?;
        let dbus = zbus::fdo::DBusProxy::new(&connection).await?;

        let server = zbus::names::BusName::try_from(notifications::NOTIFICATIONS_BUS_NAME)
            .map_err(|e| NotificationError::Bus(e.to_string()))?;
        if dbus
            .name_has_owner(server)
            .await
            .map_err(|e| NotificationError::Bus(e.to_string()))?
        {
            return Ok(AuthorizationStatus::Authorized);
        }

        let activatable = dbus
            .list_activatable_names()
            .await
            .map_err(|e| NotificationError::Bus(e.to_string()))?;
        if activatable
            .iter()
            .any(|name| name.as_str() == notifications::NOTIFICATIONS_BUS_NAME)
        {
            Ok(AuthorizationStatus::Provisional)
        } else {
            Ok(AuthorizationStatus::Denied)
        }
    }

    async fn token(&self) -> Result<String, NotificationError> {
        load_or_create_token(&self.token_path).await
    }

    async fn subscribe(&self) -> Result<PushSubscription, NotificationError> {
        let token = self.token().await?;
        let (sender, receiver) = mpsc::channel(notifications::MESSAGE_CHANNEL_CAPACITY);

        let connection = zbus::connection::Builder::session()?
            .name(notifications::PUSH_BUS_NAME)?
            .serve_at(
                notifications::PUSH_OBJECT_PATH,
                PushInterface { token, sender },
            )?
            .build()
            .await?;

        info!(
            bus_name = notifications::PUSH_BUS_NAME,
            path = notifications::PUSH_OBJECT_PATH,
            "Listening for push messages"
        );

        Ok(PushSubscription {
            receiver,
            _connection: Some(connection),
        })
    }
}

/// Send a message to a running instance (used by the `push` command)
pub async fn deliver(token: &str, message: &RemoteMessage) -> Result<(), NotificationError> {
    let connection = zbus::Connection::session().await?;
    let proxy = zbus::Proxy::new(
        &connection,
        notifications::PUSH_BUS_NAME,
        notifications::PUSH_OBJECT_PATH,
        notifications::PUSH_INTERFACE,
    )
    .await?;

    let () = proxy
        .call(
            "Deliver",
            &(
                token,
                message.title.as_deref().unwrap_or_default(),
                message.body.as_deref().unwrap_or_default(),
                &message.data,
            ),
        )
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_enabled() {
        assert!(AuthorizationStatus::Authorized.is_enabled());
        assert!(AuthorizationStatus::Provisional.is_enabled());
        assert!(!AuthorizationStatus::Denied.is_enabled());
        assert!(!AuthorizationStatus::NotDetermined.is_enabled());
    }

    #[test]
    fn test_empty_strings_are_absent() {
        assert_eq!(non_empty(""), None);
        assert_eq!(non_empty("T").as_deref(), Some("T"));
    }

    #[tokio::test]
    async fn test_token_is_persisted() {
        let path = std::env::temp_dir()
            .join(format!("filter-camera-token-{}", uuid::Uuid::new_v4()))
            .join("push-token");

        let first = load_or_create_token(&path).await.unwrap();
        let second = load_or_create_token(&path).await.unwrap();

        assert_eq!(first.len(), 32);
        assert_eq!(first, second);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[tokio::test]
    async fn test_subscription_yields_channel_messages() {
        let (mut sender, receiver) = mpsc::channel(4);
        let mut subscription = PushSubscription::from_receiver(receiver);

        sender
            .try_send(RemoteMessage {
                title: Some("T".to_string()),
                ..Default::default()
            })
            .unwrap();
        drop(sender);

        let message = subscription.next().await.unwrap();
        assert_eq!(message.title.as_deref(), Some("T"));
        assert!(subscription.next().await.is_none());
    }
}
