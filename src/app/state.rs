// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::app::session::CaptureSession;
use crate::backends::camera::types::CameraFrame;
use crate::backends::media_library::Album;
use crate::backends::permissions::{LibraryPermission, PermissionStatus, PortalCameraPermission};
use crate::config::Config;
use crate::constants::ui;
use crate::filters::FilterType;
use crate::notifications::BootstrapReport;
use crate::pipelines::photo::{CapturedImage, DecodedImage};
use cosmic::cosmic_config;
use cosmic::iced::Size;
use cosmic::widget::about::About;
use cosmic::widget::image::Handle;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Rendered images for the capture shown in the filter preview
#[derive(Debug, Clone, Default)]
pub struct PreviewImages {
    /// Capture the handles were rendered from
    pub source: Option<PathBuf>,
    /// Full-size image per filter
    pub filtered: HashMap<FilterType, Handle>,
    /// Picker thumbnail per filter
    pub thumbnails: HashMap<FilterType, Handle>,
}

impl PreviewImages {
    /// Drop everything and start collecting renders for `source`
    pub fn reset(&mut self, source: Option<PathBuf>) {
        self.source = source;
        self.filtered.clear();
        self.thumbnails.clear();
    }

    pub fn is_for(&self, source: &Path) -> bool {
        self.source.as_deref() == Some(source)
    }
}

/// Convert a decoded RGBA image into a widget image handle
pub fn image_handle(image: &DecodedImage) -> Handle {
    Handle::from_rgba(image.width, image.height, image.rgba.as_ref().clone())
}

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// The about page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Configuration handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,
    /// Camera screen state
    pub session: CaptureSession,
    /// Camera access provider
    pub camera_access: PortalCameraPermission,
    /// Media library access provider
    pub library_access: LibraryPermission,
    /// Latest live preview frame
    pub current_frame: Option<Arc<CameraFrame>>,
    /// Last camera error, shown in place of the preview
    pub camera_error: Option<String>,
    /// Rendered filter images for the current capture
    pub preview: PreviewImages,
    /// Window content size
    pub viewport: Size,
    /// Text in the album name field of the settings drawer
    pub album_name_input: String,
    /// Labels for the theme dropdown
    pub theme_options: Vec<String>,
    /// Whether the notification bootstrap runs this session
    pub notifications_active: bool,
    /// Latest report from this session's notification bootstrap
    pub notification_report: Option<BootstrapReport>,
}

impl AppModel {
    /// Area available to the camera feed or the filtered still
    pub fn preview_area(&self) -> Size {
        Size::new(
            self.viewport.width.max(0.0),
            (self.viewport.height - ui::ACTION_BAR_HEIGHT).max(0.0),
        )
    }
}

/// The context page to display in the context drawer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
    Settings,
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    LaunchUrl(String),
    ToggleContextPage(ContextPage),
    WindowResized(Size),

    // ===== Permissions =====
    PermissionsQueried(PermissionStatus, PermissionStatus),
    RequestPermissions,
    PermissionsRequested(PermissionStatus, PermissionStatus),

    // ===== Camera =====
    CameraFrame(Arc<CameraFrame>),
    CameraUnavailable(String),
    FlipCamera,
    Capture,
    PhotoCaptured(Result<CapturedImage, String>),

    // ===== Filter Preview =====
    PhotoDecoded(PathBuf, Result<DecodedImage, String>),
    FilterRendered(PathBuf, FilterType, DecodedImage),
    ThumbnailsRendered(PathBuf, HashMap<FilterType, DecodedImage>),
    SelectFilter(FilterType),
    Retake,
    Save,
    PhotoSaved(Result<Album, String>),

    // ===== Dialogs =====
    DismissDialog,
    OpenAlbum(PathBuf),

    // ===== Settings =====
    UpdateConfig(Config),
    SetAppTheme(usize),
    AlbumNameInput(String),
    SubmitAlbumName,
    ToggleMirrorFrontPreview(bool),
    ToggleBakeFilter(bool),
    ToggleNotifications(bool),
    ToggleNotificationSound(bool),
    ToggleNotificationBadge(bool),

    // ===== Notifications =====
    NotificationReport(BootstrapReport),

    Noop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_images_reset() {
        let mut preview = PreviewImages::default();
        preview.reset(Some(PathBuf::from("/tmp/a.jpg")));
        preview
            .filtered
            .insert(FilterType::Normal, Handle::from_rgba(1, 1, vec![0u8; 4]));

        assert!(preview.is_for(Path::new("/tmp/a.jpg")));
        assert!(!preview.is_for(Path::new("/tmp/b.jpg")));

        preview.reset(None);
        assert!(preview.filtered.is_empty());
        assert!(!preview.is_for(Path::new("/tmp/a.jpg")));
    }
}
