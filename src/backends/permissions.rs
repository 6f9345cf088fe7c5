// SPDX-License-Identifier: GPL-3.0-only

//! Camera and media-library permissions
//!
//! Outside a sandbox the camera is always accessible. Inside Flatpak access
//! goes through the XDG camera portal, which answers asynchronously with a
//! `Response` signal on a per-request object.

use crate::constants::app_info;
use crate::errors::PermissionError;
use futures::StreamExt;
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use tracing::{debug, info, warn};
use zbus::zvariant::{OwnedValue, Value};

const PORTAL_BUS_NAME: &str = "org.freedesktop.portal.Desktop";
const PORTAL_OBJECT_PATH: &str = "/org/freedesktop/portal/desktop";
const CAMERA_INTERFACE: &str = "org.freedesktop.portal.Camera";
const REQUEST_INTERFACE: &str = "org.freedesktop.portal.Request";

/// Authorization state of a single permission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    NotDetermined,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == PermissionStatus::Granted
    }

    fn to_raw(self) -> u8 {
        match self {
            PermissionStatus::NotDetermined => 0,
            PermissionStatus::Granted => 1,
            PermissionStatus::Denied => 2,
        }
    }

    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => PermissionStatus::Granted,
            2 => PermissionStatus::Denied,
            _ => PermissionStatus::NotDetermined,
        }
    }

    /// Map a portal `Response` code (0 = success, 1 = cancelled, 2 = other)
    pub(crate) fn from_portal_response(code: u32) -> Self {
        if code == 0 {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }
}

/// A permission that can be queried and requested
pub trait PermissionProvider: Clone + Send + Sync + 'static {
    /// Current state without prompting the user
    fn status(&self) -> impl Future<Output = PermissionStatus> + Send;

    /// Prompt for the permission and return the resulting state
    fn request(&self) -> impl Future<Output = Result<PermissionStatus, PermissionError>> + Send;
}

/// Camera permission through the XDG camera portal
#[derive(Debug, Clone, Default)]
pub struct PortalCameraPermission {
    /// Result of the last portal request in this session
    cached: Arc<AtomicU8>,
}

impl PortalCameraPermission {
    pub fn new() -> Self {
        Self::default()
    }

    async fn access_camera() -> Result<PermissionStatus, PermissionError> {
        let connection = zbus::Connection::session().await?;

        let sender = connection
            .unique_name()
            .map(|name| name.as_str().trim_start_matches(':').replace('.', "_"))
            .ok_or_else(|| PermissionError::Unavailable("No unique bus name".to_string()))?;
        let token = format!("filter_camera_{}", uuid::Uuid::new_v4().simple());
        let request_path = format!("{}/request/{}/{}", PORTAL_OBJECT_PATH, sender, token);

        // Subscribe before calling so the response cannot be missed
        let request_proxy = zbus::Proxy::new(
            &connection,
            PORTAL_BUS_NAME,
            request_path.as_str(),
            REQUEST_INTERFACE,
        )
        .await?;
        let mut responses = request_proxy.receive_signal("Response").await?;

        let camera_proxy = zbus::Proxy::new(
            &connection,
            PORTAL_BUS_NAME,
            PORTAL_OBJECT_PATH,
            CAMERA_INTERFACE,
        )
        .await?;

        let mut options: HashMap<&str, Value> = HashMap::new();
        options.insert("handle_token", Value::new(token.as_str()));

        let handle: zbus::zvariant::OwnedObjectPath = camera_proxy
            .call("AccessCamera", &(options,))
            .await
            .map_err(|e| PermissionError::RequestFailed(e.to_string()))?;
        debug!(handle = %handle, "Camera access requested");

        let message = responses.next().await.ok_or_else(|| {
            PermissionError::RequestFailed("Portal closed without a response".to_string())
        })?;
        let (code, _results): (u32, HashMap<String, OwnedValue>) = message
            .body()
            .deserialize()
            .map_err(|e| PermissionError::RequestFailed(e.to_string()))?;

        info!(code, "Camera portal responded");
        Ok(PermissionStatus::from_portal_response(code))
    }
}

impl PermissionProvider for PortalCameraPermission {
    async fn status(&self) -> PermissionStatus {
        if !app_info::is_flatpak() {
            return PermissionStatus::Granted;
        }
        PermissionStatus::from_raw(self.cached.load(Ordering::Acquire))
    }

    async fn request(&self) -> Result<PermissionStatus, PermissionError> {
        if !app_info::is_flatpak() {
            return Ok(PermissionStatus::Granted);
        }

        let status = Self::access_camera().await?;
        self.cached.store(status.to_raw(), Ordering::Release);
        Ok(status)
    }
}

/// Write access to the media library root
#[derive(Debug, Clone)]
pub struct LibraryPermission {
    root: PathBuf,
}

impl LibraryPermission {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn check(&self) -> PermissionStatus {
        match std::fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() && !meta.permissions().readonly() => {
                PermissionStatus::Granted
            }
            Ok(_) => PermissionStatus::Denied,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PermissionStatus::NotDetermined,
            Err(e) => {
                warn!(path = %self.root.display(), error = %e, "Cannot inspect library root");
                PermissionStatus::Denied
            }
        }
    }
}

impl PermissionProvider for LibraryPermission {
    async fn status(&self) -> PermissionStatus {
        self.check()
    }

    async fn request(&self) -> Result<PermissionStatus, PermissionError> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || std::fs::create_dir_all(&root))
            .await
            .map_err(|e| PermissionError::RequestFailed(e.to_string()))?
            .map_err(|e| PermissionError::RequestFailed(e.to_string()))?;

        let status = self.check();
        info!(path = %self.root.display(), ?status, "Library access requested");
        Ok(status)
    }
}

/// Request camera then library access, one after the other
pub async fn request_all<C, L>(
    camera: &C,
    library: &L,
) -> (PermissionStatus, PermissionStatus)
where
    C: PermissionProvider,
    L: PermissionProvider,
{
    let camera_status = match camera.request().await {
        Ok(status) => status,
        Err(e) => {
            warn!(error = %e, "Camera permission request failed");
            PermissionStatus::Denied
        }
    };

    let library_status = match library.request().await {
        Ok(status) => status,
        Err(e) => {
            warn!(error = %e, "Library permission request failed");
            PermissionStatus::Denied
        }
    };

    (camera_status, library_status)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("filter-camera-{}-{}", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_portal_response_codes() {
        assert_eq!(PermissionStatus::from_portal_response(0), PermissionStatus::Granted);
        assert_eq!(PermissionStatus::from_portal_response(1), PermissionStatus::Denied);
        assert_eq!(PermissionStatus::from_portal_response(2), PermissionStatus::Denied);
    }

    #[test]
    fn test_raw_round_trip() {
        for status in [
            PermissionStatus::Granted,
            PermissionStatus::Denied,
            PermissionStatus::NotDetermined,
        ] {
            assert_eq!(PermissionStatus::from_raw(status.to_raw()), status);
        }
    }

    #[tokio::test]
    async fn test_library_permission_created_on_request() {
        let root = temp_root("perm");
        let permission = LibraryPermission::new(root.clone());

        assert_eq!(permission.status().await, PermissionStatus::NotDetermined);
        assert_eq!(permission.request().await.unwrap(), PermissionStatus::Granted);
        assert_eq!(permission.status().await, PermissionStatus::Granted);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_library_permission_denied_for_file() {
        let root = temp_root("file");
        std::fs::write(&root, b"not a directory").unwrap();

        let permission = LibraryPermission::new(root.clone());
        assert_eq!(permission.status().await, PermissionStatus::Denied);

        let _ = std::fs::remove_file(&root);
    }
}
