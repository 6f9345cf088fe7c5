// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function acts as a dispatcher, while specific handlers are implemented
//! in the `handlers` submodules organized by functional domain.
//!
//! # Handler Modules
//!
//! - `handlers::permissions`: Permission gate queries and requests
//! - `handlers::capture`: Live frames, flip and shutter
//! - `handlers::preview`: Decode, filter rendering, retake and save
//! - `handlers::system`: Navigation, dialogs, settings and notifications

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),
            Message::WindowResized(size) => self.handle_window_resized(size),

            // ===== Permissions =====
            Message::PermissionsQueried(camera, library) => {
                self.handle_permissions_resolved(camera, library)
            }
            Message::RequestPermissions => self.handle_request_permissions(),
            Message::PermissionsRequested(camera, library) => {
                self.handle_permissions_resolved(camera, library)
            }

            // ===== Camera =====
            Message::CameraFrame(frame) => self.handle_camera_frame(frame),
            Message::CameraUnavailable(error) => self.handle_camera_unavailable(error),
            Message::FlipCamera => self.handle_flip_camera(),
            Message::Capture => self.handle_capture(),
            Message::PhotoCaptured(result) => self.handle_photo_captured(result),

            // ===== Filter Preview =====
            Message::PhotoDecoded(source, result) => self.handle_photo_decoded(source, result),
            Message::FilterRendered(source, filter, image) => {
                self.handle_filter_rendered(source, filter, image)
            }
            Message::ThumbnailsRendered(source, thumbnails) => {
                self.handle_thumbnails_rendered(source, thumbnails)
            }
            Message::SelectFilter(filter) => self.handle_select_filter(filter),
            Message::Retake => self.handle_retake(),
            Message::Save => self.handle_save(),
            Message::PhotoSaved(result) => self.handle_photo_saved(result),

            // ===== Dialogs =====
            Message::DismissDialog => self.handle_dismiss_dialog(),
            Message::OpenAlbum(path) => self.handle_open_album(path),

            // ===== Settings =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
            Message::SetAppTheme(index) => self.handle_set_app_theme(index),
            Message::AlbumNameInput(name) => {
                self.album_name_input = name;
                Task::none()
            }
            Message::SubmitAlbumName => self.handle_submit_album_name(),
            Message::ToggleMirrorFrontPreview(enabled) => self.update_setting(|config| {
                config.mirror_front_preview = enabled;
            }),
            Message::ToggleBakeFilter(enabled) => self.update_setting(|config| {
                config.bake_filter_on_save = enabled;
            }),
            Message::ToggleNotifications(enabled) => self.update_setting(|config| {
                config.notifications_enabled = enabled;
            }),
            Message::ToggleNotificationSound(enabled) => self.update_setting(|config| {
                config.notification_sound = enabled;
            }),
            Message::ToggleNotificationBadge(enabled) => self.update_setting(|config| {
                config.notification_badge = enabled;
            }),

            // ===== Notifications =====
            Message::NotificationReport(report) => self.handle_notification_report(report),

            Message::Noop => Task::none(),
        }
    }
}
