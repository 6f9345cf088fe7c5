// SPDX-License-Identifier: GPL-3.0-only

//! Capture screen state machine
//!
//! `CaptureSession` holds everything the camera screen renders from and is
//! mutated only by the update handlers. It performs no I/O, so every
//! transition can be tested directly.
//!
//! ```text
//!  Blank ──permissions──▶ PermissionPrompt ──request──▶ Capture
//!    │                                                   │  ▲
//!    └───────────────── granted ────────────────────────┘  │
//!                                     shutter + decode  │  │ retake / save
//!                                                       ▼  │
//!                                                 FilterPreview
//! ```

use crate::backends::camera::Facing;
use crate::backends::media_library::Album;
use crate::backends::permissions::PermissionStatus;
use crate::filters::FilterType;
use crate::pipelines::photo::{CapturedImage, DecodedImage};
use std::collections::VecDeque;
use std::path::Path;
use tracing::{debug, info, warn};

/// What the screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// Permissions are still being queried
    Blank,
    /// At least one permission is missing
    PermissionPrompt,
    /// Live camera feed with flip and shutter
    Capture,
    /// Captured still with filter controls
    FilterPreview,
}

/// A modal message waiting for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertDialog {
    CaptureFailed(String),
    DecodeFailed(String),
    SaveFailed(String),
    Saved(Album),
}

#[derive(Debug, Clone, Default)]
pub struct CaptureSession {
    pub camera_permission: Option<PermissionStatus>,
    pub library_permission: Option<PermissionStatus>,
    pub facing: Facing,
    pub captured: Option<CapturedImage>,
    pub decoded: Option<DecodedImage>,
    pub selected_filter: FilterType,
    pub capturing: bool,
    pub saving: bool,
    pub requesting_permissions: bool,
    dialogs: VecDeque<AlertDialog>,
}

impl CaptureSession {
    pub fn new(facing: Facing) -> Self {
        Self {
            facing,
            ..Default::default()
        }
    }

    /// Both permissions granted
    pub fn gate_passed(&self) -> bool {
        self.camera_permission.is_some_and(PermissionStatus::is_granted)
            && self.library_permission.is_some_and(PermissionStatus::is_granted)
    }

    pub fn view_kind(&self) -> ViewKind {
        if self.camera_permission.is_none() || self.library_permission.is_none() {
            return ViewKind::Blank;
        }
        if !self.gate_passed() {
            return ViewKind::PermissionPrompt;
        }
        if self.decoded_for_capture().is_some() {
            ViewKind::FilterPreview
        } else {
            ViewKind::Capture
        }
    }

    /// Decoded image belonging to the current capture, if decode has resolved
    pub fn decoded_for_capture(&self) -> Option<&DecodedImage> {
        let captured = self.captured.as_ref()?;
        self.decoded
            .as_ref()
            .filter(|decoded| decoded.source == captured.path)
    }

    /// A capture or save is in flight
    pub fn is_busy(&self) -> bool {
        self.capturing || self.saving
    }

    /// Capture has been taken and is waiting for decode
    pub fn awaiting_decode(&self) -> bool {
        self.captured.is_some() && self.decoded_for_capture().is_none()
    }

    pub fn set_permissions(&mut self, camera: PermissionStatus, library: PermissionStatus) {
        info!(?camera, ?library, "Permissions resolved");
        self.camera_permission = Some(camera);
        self.library_permission = Some(library);
        self.requesting_permissions = false;
    }

    /// Mark a permission request as started; false if one is already running
    pub fn begin_permission_request(&mut self) -> bool {
        if self.requesting_permissions {
            return false;
        }
        self.requesting_permissions = true;
        true
    }

    /// Switch between the back and front camera
    pub fn flip(&mut self) {
        self.facing = self.facing.toggled();
        debug!(facing = %self.facing, "Camera flipped");
    }

    /// Mark a capture as started; false if the shutter should be ignored
    pub fn begin_capture(&mut self) -> bool {
        if self.view_kind() != ViewKind::Capture || self.is_busy() || self.captured.is_some() {
            return false;
        }
        self.capturing = true;
        true
    }

    pub fn on_captured(&mut self, result: Result<CapturedImage, String>) {
        self.capturing = false;
        match result {
            Ok(captured) => {
                info!(path = %captured.path.display(), "Capture stored");
                self.captured = Some(captured);
                self.decoded = None;
            }
            Err(message) => {
                warn!(error = %message, "Capture failed");
                self.dialogs.push_back(AlertDialog::CaptureFailed(message));
            }
        }
    }

    /// Apply a decode result for `source`; results for other captures are ignored
    ///
    /// Returns true when the decoded image was accepted.
    pub fn on_decoded(&mut self, source: &Path, result: Result<DecodedImage, String>) -> bool {
        let is_current = self
            .captured
            .as_ref()
            .is_some_and(|captured| captured.path == source);
        if !is_current {
            debug!(source = %source.display(), "Ignoring decode for stale capture");
            return false;
        }

        match result {
            Ok(decoded) => {
                self.decoded = Some(decoded);
                true
            }
            Err(message) => {
                warn!(error = %message, "Decoding capture failed");
                self.captured = None;
                self.decoded = None;
                self.dialogs.push_back(AlertDialog::DecodeFailed(message));
                false
            }
        }
    }

    pub fn select_filter(&mut self, filter: FilterType) {
        self.selected_filter = filter;
    }

    /// Discard the capture and return to the live camera
    pub fn retake(&mut self) {
        self.captured = None;
        self.decoded = None;
        self.selected_filter = FilterType::Normal;
    }

    /// Mark a save as started and return the capture to save
    pub fn begin_save(&mut self) -> Option<CapturedImage> {
        if self.view_kind() != ViewKind::FilterPreview || self.is_busy() {
            return None;
        }
        let captured = self.captured.clone()?;
        self.saving = true;
        Some(captured)
    }

    pub fn on_saved(&mut self, result: Result<Album, String>) {
        self.saving = false;
        match result {
            Ok(album) => {
                self.captured = None;
                self.decoded = None;
                self.dialogs.push_back(AlertDialog::Saved(album));
            }
            Err(message) => {
                warn!(error = %message, "Saving photo failed");
                self.dialogs.push_back(AlertDialog::SaveFailed(message));
            }
        }
    }

    /// Dialog currently shown
    pub fn dialog(&self) -> Option<&AlertDialog> {
        self.dialogs.front()
    }

    pub fn dialog_count(&self) -> usize {
        self.dialogs.len()
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialogs.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn granted() -> CaptureSession {
        let mut session = CaptureSession::new(Facing::Back);
        session.set_permissions(PermissionStatus::Granted, PermissionStatus::Granted);
        session
    }

    fn captured(name: &str) -> CapturedImage {
        CapturedImage {
            path: PathBuf::from(format!("/tmp/{name}.jpg")),
        }
    }

    fn decoded(name: &str) -> DecodedImage {
        DecodedImage {
            source: PathBuf::from(format!("/tmp/{name}.jpg")),
            width: 2,
            height: 2,
            rgba: Arc::new(vec![0; 16]),
        }
    }

    fn album() -> Album {
        Album {
            name: "Camera App".to_string(),
            path: PathBuf::from("/home/user/Pictures/Camera App"),
        }
    }

    fn in_preview() -> CaptureSession {
        let mut session = granted();
        assert!(session.begin_capture());
        session.on_captured(Ok(captured("a")));
        assert!(session.on_decoded(Path::new("/tmp/a.jpg"), Ok(decoded("a"))));
        session
    }

    #[test]
    fn test_blank_until_both_permissions_resolve() {
        let mut session = CaptureSession::new(Facing::Back);
        assert_eq!(session.view_kind(), ViewKind::Blank);
        session.camera_permission = Some(PermissionStatus::Granted);
        assert_eq!(session.view_kind(), ViewKind::Blank);
        session.library_permission = Some(PermissionStatus::Granted);
        assert_eq!(session.view_kind(), ViewKind::Capture);
    }

    #[test]
    fn test_denied_and_undetermined_render_alike() {
        for status in [PermissionStatus::Denied, PermissionStatus::NotDetermined] {
            let mut session = CaptureSession::new(Facing::Back);
            session.set_permissions(PermissionStatus::Granted, status);
            assert_eq!(session.view_kind(), ViewKind::PermissionPrompt);

            session.set_permissions(status, PermissionStatus::Granted);
            assert_eq!(session.view_kind(), ViewKind::PermissionPrompt);
        }
    }

    #[test]
    fn test_permission_request_is_not_reentrant() {
        let mut session = CaptureSession::new(Facing::Back);
        session.set_permissions(PermissionStatus::Denied, PermissionStatus::Denied);
        assert!(session.begin_permission_request());
        assert!(!session.begin_permission_request());
        session.set_permissions(PermissionStatus::Granted, PermissionStatus::Granted);
        assert!(session.begin_permission_request());
    }

    #[test]
    fn test_flip_parity() {
        for n in 0..7 {
            let mut session = granted();
            for _ in 0..n {
                session.flip();
            }
            let expected = if n % 2 == 0 { Facing::Back } else { Facing::Front };
            assert_eq!(session.facing, expected, "after {n} flips");
        }
    }

    #[test]
    fn test_capture_view_until_decode_resolves() {
        let mut session = granted();
        assert!(session.begin_capture());
        session.on_captured(Ok(captured("a")));

        assert_eq!(session.view_kind(), ViewKind::Capture);
        assert!(session.awaiting_decode());

        session.on_decoded(Path::new("/tmp/a.jpg"), Ok(decoded("a")));
        assert_eq!(session.view_kind(), ViewKind::FilterPreview);
    }

    fn assert_one_screen(session: &CaptureSession, expected: ViewKind, step: &str) {
        let kind = session.view_kind();
        let capture = kind == ViewKind::Capture;
        let preview = kind == ViewKind::FilterPreview;
        assert!(capture ^ preview, "{step}: got {kind:?}");
        assert_eq!(kind, expected, "{step}");
        assert_eq!(
            preview,
            session.captured.is_some() && session.decoded_for_capture().is_some(),
            "{step}"
        );
    }

    #[test]
    fn test_views_are_mutually_exclusive() {
        let mut session = CaptureSession::new(Facing::Back);
        assert_eq!(session.view_kind(), ViewKind::Blank, "unresolved");

        session.set_permissions(PermissionStatus::Denied, PermissionStatus::Granted);
        assert_eq!(session.view_kind(), ViewKind::PermissionPrompt, "denied");

        session.set_permissions(PermissionStatus::Granted, PermissionStatus::Granted);
        assert_one_screen(&session, ViewKind::Capture, "granted");

        assert!(session.begin_capture());
        assert_one_screen(&session, ViewKind::Capture, "capturing");

        session.on_captured(Ok(captured("a")));
        assert_one_screen(&session, ViewKind::Capture, "awaiting decode");

        assert!(session.on_decoded(Path::new("/tmp/a.jpg"), Ok(decoded("a"))));
        assert_one_screen(&session, ViewKind::FilterPreview, "preview");

        assert!(session.begin_save().is_some());
        assert_one_screen(&session, ViewKind::FilterPreview, "saving");

        session.on_saved(Err("disk full".to_string()));
        assert_one_screen(&session, ViewKind::FilterPreview, "save failed");

        assert!(session.begin_save().is_some());
        session.on_saved(Ok(album()));
        assert_one_screen(&session, ViewKind::Capture, "saved");

        // Decoded image from an older capture does not count
        session.captured = Some(captured("new"));
        session.decoded = Some(decoded("old"));
        assert_one_screen(&session, ViewKind::Capture, "stale decode");
    }

    #[test]
    fn test_flip_allowed_while_capturing() {
        let mut session = granted();
        assert!(session.begin_capture());
        session.flip();

        assert_eq!(session.facing, Facing::Front);
        assert!(session.capturing);

        session.on_captured(Ok(captured("a")));
        assert_eq!(session.captured, Some(captured("a")));
    }

    #[test]
    fn test_retake_allowed_while_saving() {
        let mut session = in_preview();
        assert!(session.begin_save().is_some());
        session.retake();

        assert_eq!(session.view_kind(), ViewKind::Capture);
        // Shutter stays locked until the save resolves
        assert!(!session.begin_capture());

        session.on_saved(Ok(album()));
        assert!(!session.saving);
        assert_eq!(session.dialog(), Some(&AlertDialog::Saved(album())));
        assert!(session.begin_capture());
    }

    #[test]
    fn test_stale_decode_is_ignored() {
        let mut session = granted();
        session.begin_capture();
        session.on_captured(Ok(captured("a")));
        session.retake();

        assert!(!session.on_decoded(Path::new("/tmp/a.jpg"), Ok(decoded("a"))));
        assert_eq!(session.view_kind(), ViewKind::Capture);
        assert!(session.decoded.is_none());
    }

    #[test]
    fn test_capture_failure_keeps_state() {
        let mut session = granted();
        session.begin_capture();
        session.on_captured(Err("camera busy".to_string()));

        assert!(session.captured.is_none());
        assert!(!session.capturing);
        assert_eq!(
            session.dialog(),
            Some(&AlertDialog::CaptureFailed("camera busy".to_string()))
        );
    }

    #[test]
    fn test_decode_failure_returns_to_capture() {
        let mut session = granted();
        session.begin_capture();
        session.on_captured(Ok(captured("a")));
        session.on_decoded(Path::new("/tmp/a.jpg"), Err("corrupt".to_string()));

        assert!(session.captured.is_none());
        assert_eq!(session.view_kind(), ViewKind::Capture);
        assert_eq!(session.dialog_count(), 1);
    }

    #[test]
    fn test_second_shutter_ignored_while_in_flight() {
        let mut session = granted();
        assert!(session.begin_capture());
        assert!(!session.begin_capture());
    }

    #[test]
    fn test_retake_resets_filter_and_reference() {
        let mut session = in_preview();
        session.select_filter(FilterType::Vintage);
        session.retake();

        assert_eq!(session.selected_filter, FilterType::Normal);
        assert!(session.captured.is_none());
        assert!(session.decoded.is_none());
        assert_eq!(session.view_kind(), ViewKind::Capture);
    }

    #[test]
    fn test_save_success_clears_reference_with_one_dialog() {
        let mut session = in_preview();
        let to_save = session.begin_save().unwrap();
        assert_eq!(to_save, captured("a"));
        assert!(session.begin_save().is_none());

        session.on_saved(Ok(album()));

        assert!(session.captured.is_none());
        assert!(!session.saving);
        assert_eq!(session.dialog_count(), 1);
        assert_eq!(session.dialog(), Some(&AlertDialog::Saved(album())));
        assert_eq!(session.view_kind(), ViewKind::Capture);
    }

    #[test]
    fn test_save_failure_keeps_reference_with_one_dialog() {
        let mut session = in_preview();
        session.select_filter(FilterType::Sepia);
        session.begin_save();
        session.on_saved(Err("disk full".to_string()));

        assert_eq!(session.captured, Some(captured("a")));
        assert_eq!(session.selected_filter, FilterType::Sepia);
        assert_eq!(session.view_kind(), ViewKind::FilterPreview);
        assert_eq!(session.dialog_count(), 1);

        session.dismiss_dialog();
        assert!(session.dialog().is_none());
    }

    #[test]
    fn test_filter_selection_is_immediate() {
        let mut session = in_preview();
        session.select_filter(FilterType::Grayscale);
        assert_eq!(session.selected_filter, FilterType::Grayscale);
    }
}
