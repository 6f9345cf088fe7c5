// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! Renders exactly one of the permission prompt, the capture view or the
//! filter preview, as decided by the capture session.

use crate::app::layout::fit_to_viewport;
use crate::app::session::{AlertDialog, ViewKind};
use crate::app::state::{AppModel, Message};
use crate::backends::camera::Facing;
use crate::backends::camera::types::CameraFrame;
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Color, ContentFit, Length};
use cosmic::widget::{self, icon};

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        match self.session.view_kind() {
            ViewKind::Blank => widget::container(widget::Space::new(Length::Fill, Length::Fill))
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            ViewKind::PermissionPrompt => self.permission_prompt_view(),
            ViewKind::Capture => self.capture_view(),
            ViewKind::FilterPreview => self.filter_preview_view(),
        }
    }

    fn permission_prompt_view(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let grant = widget::button::suggested(fl!("permission-grant")).on_press_maybe(
            (!self.session.requesting_permissions).then_some(Message::RequestPermissions),
        );

        let content = widget::column()
            .push(icon::from_name("camera-photo-symbolic").size(64).icon())
            .push(widget::text::title3(fl!("permission-title")))
            .push(
                widget::text::body(fl!("permission-body"))
                    .align_x(cosmic::iced::alignment::Horizontal::Center),
            )
            .push(grant)
            .spacing(spacing.space_m)
            .align_x(Alignment::Center)
            .max_width(420.0);

        widget::container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center(Length::Fill)
            .padding(spacing.space_l)
            .into()
    }

    fn capture_view(&self) -> Element<'_, Message> {
        let mirror = self.session.facing == Facing::Front && self.config.mirror_front_preview;

        let feed: Element<'_, Message> = match (&self.current_frame, &self.camera_error) {
            (Some(frame), _) => widget::image(widget::image::Handle::from_rgba(
                frame.width,
                frame.height,
                preview_pixels(frame, mirror),
            ))
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
            (None, Some(error)) => widget::column()
                .push(icon::from_name("camera-disabled-symbolic").size(48).icon())
                .push(widget::text::body(fl!("camera-unavailable")))
                .push(widget::text::caption(error.as_str()))
                .spacing(cosmic::theme::spacing().space_xs)
                .align_x(Alignment::Center)
                .into(),
            (None, None) => widget::text::body(fl!("camera-starting")).into(),
        };

        let feed = widget::container(feed)
            .width(Length::Fill)
            .height(Length::Fill)
            .center(Length::Fill)
            .style(|_theme| widget::container::Style {
                background: Some(Background::Color(Color::BLACK)),
                ..Default::default()
            });

        widget::column()
            .push(feed)
            .push(self.build_capture_bar())
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn filter_preview_view(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();
        let area = self.preview_area();
        let decoded = self.session.decoded_for_capture();

        let still: Element<'_, Message> = match (
            decoded.and_then(|d| fit_to_viewport(d.width, d.height, area.width, area.height)),
            self.preview.filtered.get(&self.session.selected_filter),
        ) {
            (Some(fit), Some(handle)) => widget::image(handle.clone())
                .content_fit(ContentFit::Fill)
                .width(Length::Fixed(fit.width))
                .height(Length::Fixed(fit.height))
                .into(),
            (Some(fit), None) => widget::container(widget::text::caption(fl!("applying-filter")))
                .width(Length::Fixed(fit.width))
                .height(Length::Fixed(fit.height))
                .center(Length::Fixed(fit.width))
                .into(),
            (None, _) => widget::Space::new(Length::Fill, Length::Fill).into(),
        };

        let still = widget::container(still)
            .width(Length::Fill)
            .height(Length::Fill)
            .center(Length::Fill)
            .style(|_theme| widget::container::Style {
                background: Some(Background::Color(Color::BLACK)),
                ..Default::default()
            });

        let saving = self.session.saving;
        let actions = widget::row()
            .push(
                widget::button::standard(fl!("retake")).on_press(Message::Retake),
            )
            .push(widget::horizontal_space())
            .push(
                widget::button::suggested(if saving {
                    fl!("saving")
                } else {
                    fl!("save")
                })
                .on_press_maybe((!saving).then_some(Message::Save)),
            )
            .align_y(Alignment::Center)
            .padding([0, spacing.space_m]);

        let bottom = widget::column()
            .push(self.build_filter_picker())
            .push(actions)
            .spacing(spacing.space_xs)
            .height(Length::Fixed(ui::ACTION_BAR_HEIGHT))
            .padding([spacing.space_xs, 0]);

        widget::column()
            .push(still)
            .push(bottom)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Modal dialog for the oldest pending alert
    pub fn alert_dialog(&self) -> Option<Element<'_, Message>> {
        let dialog = match self.session.dialog()? {
            AlertDialog::Saved(album) => widget::dialog()
                .title(fl!("saved-title"))
                .body(fl!("saved-body", album = album.name.as_str()))
                .icon(icon::from_name("emblem-ok-symbolic").size(64).icon())
                .primary_action(widget::button::suggested(fl!("ok")).on_press(Message::DismissDialog))
                .secondary_action(
                    widget::button::standard(fl!("open-album"))
                        .on_press(Message::OpenAlbum(album.path.clone())),
                ),
            AlertDialog::CaptureFailed(message) => {
                error_dialog(fl!("capture-failed-title"), message)
            }
            AlertDialog::DecodeFailed(message) => error_dialog(fl!("decode-failed-title"), message),
            AlertDialog::SaveFailed(message) => error_dialog(fl!("save-failed-title"), message),
        };
        Some(dialog.into())
    }
}

fn error_dialog<'a>(title: String, message: &'a str) -> widget::Dialog<'a, Message> {
    widget::dialog()
        .title(title)
        .body(message)
        .icon(icon::from_name("dialog-error-symbolic").size(64).icon())
        .primary_action(widget::button::suggested(fl!("ok")).on_press(Message::DismissDialog))
}

/// Frame pixels for display, flipped horizontally when `mirror` is set
pub(crate) fn preview_pixels(frame: &CameraFrame, mirror: bool) -> Vec<u8> {
    if !mirror {
        return frame.data.to_vec();
    }

    let row_len = frame.width as usize * 4;
    if row_len == 0 {
        return Vec::new();
    }
    let mut pixels = Vec::with_capacity(frame.data.len());
    for row in frame.data.chunks_exact(row_len) {
        for pixel in row.chunks_exact(4).rev() {
            pixels.extend_from_slice(pixel);
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    fn frame() -> CameraFrame {
        // 2x2: row 0 = [1, 2], row 1 = [3, 4]
        let data: Vec<u8> = [1u8, 2, 3, 4]
            .iter()
            .flat_map(|&v| [v, v, v, 255])
            .collect();
        CameraFrame {
            width: 2,
            height: 2,
            data: Arc::from(data),
            captured_at: Instant::now(),
        }
    }

    #[test]
    fn test_preview_pixels_unmirrored() {
        let frame = frame();
        assert_eq!(preview_pixels(&frame, false), frame.data.to_vec());
    }

    #[test]
    fn test_preview_pixels_empty_frame() {
        let empty = CameraFrame {
            width: 0,
            height: 0,
            data: Arc::from(Vec::<u8>::new()),
            captured_at: Instant::now(),
        };
        assert!(preview_pixels(&empty, true).is_empty());
    }

    #[test]
    fn test_preview_pixels_mirrored_per_row() {
        let mirrored = preview_pixels(&frame(), true);
        let firsts: Vec<u8> = mirrored.chunks_exact(4).map(|p| p[0]).collect();
        assert_eq!(firsts, vec![2, 1, 4, 3]);
    }
}
