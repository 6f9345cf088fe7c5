// SPDX-License-Identifier: GPL-3.0-only

//! Filter picker UI view
//!
//! Horizontal row of filter thumbnails under the filter preview.

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::filters::FilterType;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Border, Color, Length};
use cosmic::widget;

/// Border width for the selected filter
const FILTER_BORDER_WIDTH: f32 = 2.0;
/// Edge length of the thumbnail inside its border
const THUMBNAIL_EDGE: f32 = ui::FILTER_THUMBNAIL_SIZE as f32 * 0.6;

impl AppModel {
    /// Build one selectable control per filter
    pub fn build_filter_picker(&self) -> Element<'_, Message> {
        let mut row = widget::row().spacing(ui::FILTER_THUMBNAIL_SPACING);

        for filter in FilterType::ALL {
            let is_selected = self.session.selected_filter == filter;

            let thumbnail: Element<'_, Message> = match self.preview.thumbnails.get(&filter) {
                Some(handle) => widget::image(handle.clone())
                    .content_fit(cosmic::iced::ContentFit::Cover)
                    .width(Length::Fixed(THUMBNAIL_EDGE))
                    .height(Length::Fixed(THUMBNAIL_EDGE))
                    .into(),
                None => {
                    let color = Self::filter_placeholder_color(filter);
                    widget::container(widget::Space::new(
                        Length::Fixed(THUMBNAIL_EDGE),
                        Length::Fixed(THUMBNAIL_EDGE),
                    ))
                    .style(move |_theme| widget::container::Style {
                        background: Some(Background::Color(color)),
                        border: Border {
                            radius: [6.0; 4].into(),
                            ..Default::default()
                        },
                        ..Default::default()
                    })
                    .into()
                }
            };

            let outer = THUMBNAIL_EDGE + FILTER_BORDER_WIDTH * 4.0;
            let bordered = widget::container(thumbnail)
                .width(Length::Fixed(outer))
                .height(Length::Fixed(outer))
                .center(outer)
                .style(move |_theme| widget::container::Style {
                    border: Border {
                        radius: [8.0; 4].into(),
                        width: if is_selected { FILTER_BORDER_WIDTH } else { 0.0 },
                        color: if is_selected {
                            Color::from_rgb(0.3, 0.6, 1.0)
                        } else {
                            Color::TRANSPARENT
                        },
                    },
                    ..Default::default()
                });

            let button = widget::button::custom(bordered)
                .on_press(Message::SelectFilter(filter))
                .padding(0)
                .class(cosmic::theme::Button::Image);

            let label = widget::text::caption(Self::filter_display_name(filter))
                .width(Length::Fixed(outer))
                .align_x(cosmic::iced::alignment::Horizontal::Center);

            row = row.push(
                widget::column()
                    .push(button)
                    .push(label)
                    .spacing(2)
                    .align_x(Alignment::Center),
            );
        }

        widget::container(row)
            .width(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    /// Placeholder tint until the thumbnail is rendered
    fn filter_placeholder_color(filter: FilterType) -> Color {
        match filter {
            FilterType::Normal => Color::from_rgb(0.35, 0.35, 0.35),
            FilterType::Sepia => Color::from_rgb(0.5, 0.4, 0.3),
            FilterType::Grayscale => Color::from_rgb(0.5, 0.5, 0.5),
            FilterType::Vintage => Color::from_rgb(0.55, 0.45, 0.35),
        }
    }

    fn filter_display_name(filter: FilterType) -> String {
        match filter {
            FilterType::Normal => fl!("filter-normal"),
            FilterType::Sepia => fl!("filter-sepia"),
            FilterType::Grayscale => fl!("filter-grayscale"),
            FilterType::Vintage => fl!("filter-vintage"),
        }
    }
}
