// SPDX-License-Identifier: GPL-3.0-only

//! Capture button widget implementation

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Color, Length};
use cosmic::widget;

impl AppModel {
    /// Build the shutter button
    ///
    /// White when ready; translucent and non-interactive while busy or
    /// before the first frame arrives.
    pub fn build_capture_button(&self) -> Element<'_, Message> {
        let ready = !self.session.is_busy()
            && !self.session.awaiting_decode()
            && self.current_frame.is_some();

        let color = if ready {
            Color::WHITE
        } else {
            Color::from_rgba(1.0, 1.0, 1.0, ui::CAPTURE_BUTTON_BUSY_ALPHA)
        };

        let inner = widget::container(widget::Space::new(
            Length::Fixed(ui::CAPTURE_BUTTON_INNER),
            Length::Fixed(ui::CAPTURE_BUTTON_INNER),
        ))
        .style(move |_theme| widget::container::Style {
            background: Some(Background::Color(color)),
            border: cosmic::iced::Border {
                radius: [ui::CAPTURE_BUTTON_INNER / 2.0; 4].into(),
                ..Default::default()
            },
            ..Default::default()
        });

        let button = widget::button::custom(inner)
            .on_press_maybe(ready.then_some(Message::Capture))
            .padding(0)
            .width(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .height(Length::Fixed(ui::CAPTURE_BUTTON_OUTER));

        let button = widget::container(button)
            .width(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .height(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .center_x(ui::CAPTURE_BUTTON_OUTER)
            .center_y(ui::CAPTURE_BUTTON_OUTER)
            .style(|_theme| widget::container::Style {
                border: cosmic::iced::Border {
                    radius: [ui::CAPTURE_BUTTON_OUTER / 2.0; 4].into(),
                    width: 3.0,
                    color: Color::WHITE,
                },
                ..Default::default()
            });

        button.into()
    }

    /// Action row of the capture view: flip on the left, shutter centered
    pub fn build_capture_bar(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let flip = widget::button::icon(widget::icon::from_name("camera-switch-symbolic"))
            .on_press(Message::FlipCamera);

        let side = ui::CAPTURE_BUTTON_OUTER + spacing.space_l as f32;

        widget::row()
            .push(
                widget::container(flip)
                    .width(Length::Fixed(side))
                    .center_x(Length::Fixed(side)),
            )
            .push(
                widget::container(self.build_capture_button())
                    .width(Length::Fill)
                    .center_x(Length::Fill),
            )
            .push(widget::Space::new(Length::Fixed(side), Length::Shrink))
            .align_y(Alignment::Center)
            .height(Length::Fixed(ui::ACTION_BAR_HEIGHT))
            .padding([0, spacing.space_m])
            .into()
    }
}
