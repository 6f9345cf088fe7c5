// SPDX-License-Identifier: GPL-3.0-only

//! Settings drawer view

use crate::app::state::{AppModel, ContextPage, Message};
use crate::config::AppTheme;
use crate::constants::app_info;
use crate::fl;
use cosmic::Element;
use cosmic::app::context_drawer;
use cosmic::widget;

impl AppModel {
    /// Create the settings view for the context drawer
    pub fn settings_view(&self) -> context_drawer::ContextDrawer<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let theme_index = match self.config.app_theme {
            AppTheme::System => 0,
            AppTheme::Dark => 1,
            AppTheme::Light => 2,
        };
        let appearance = widget::settings::section()
            .title(fl!("settings-appearance"))
            .add(
                widget::settings::item::builder(fl!("settings-theme")).control(widget::dropdown(
                    &self.theme_options,
                    Some(theme_index),
                    Message::SetAppTheme,
                )),
            );

        let album_changed = self.album_name_input.trim() != self.config.album_name;
        let album_row = widget::row()
            .push(
                widget::text_input(fl!("settings-album-placeholder"), &self.album_name_input)
                    .on_input(Message::AlbumNameInput),
            )
            .push(
                widget::button::standard(fl!("settings-apply"))
                    .on_press_maybe(album_changed.then_some(Message::SubmitAlbumName)),
            )
            .spacing(spacing.space_xs)
            .align_y(cosmic::iced::Alignment::Center);

        let photos = widget::settings::section()
            .title(fl!("settings-photos"))
            .add(widget::settings::item::builder(fl!("settings-album")).control(album_row))
            .add(
                widget::settings::item::builder(fl!("settings-mirror-front"))
                    .control(
                        widget::toggler(self.config.mirror_front_preview)
                            .on_toggle(Message::ToggleMirrorFrontPreview),
                    ),
            )
            .add(
                widget::settings::item::builder(fl!("settings-bake-filter"))
                    .description(fl!("settings-bake-filter-description"))
                    .control(
                        widget::toggler(self.config.bake_filter_on_save)
                            .on_toggle(Message::ToggleBakeFilter),
                    ),
            );

        let status = match &self.notification_report {
            _ if !self.notifications_active => fl!("notifications-status-off"),
            Some(report) if report.authorization_enabled && report.subscribed => {
                fl!("notifications-status-enabled")
            }
            Some(_) => fl!("notifications-status-unavailable"),
            None => fl!("notifications-status-listening"),
        };

        let notifications = widget::settings::section()
            .title(fl!("settings-notifications"))
            .add(
                widget::settings::item::builder(fl!("settings-notifications-enabled"))
                    .description(fl!("settings-restart-required"))
                    .control(
                        widget::toggler(self.config.notifications_enabled)
                            .on_toggle(Message::ToggleNotifications),
                    ),
            )
            .add(
                widget::settings::item::builder(fl!("settings-notification-sound")).control(
                    widget::toggler(self.config.notification_sound)
                        .on_toggle(Message::ToggleNotificationSound),
                ),
            )
            .add(
                widget::settings::item::builder(fl!("settings-notification-badge")).control(
                    widget::toggler(self.config.notification_badge)
                        .on_toggle(Message::ToggleNotificationBadge),
                ),
            )
            .add(
                widget::settings::item::builder(fl!("settings-notification-status"))
                    .control(widget::text::body(status)),
            );

        let version_info = fl!(
            "settings-version",
            version = app_info::version(),
            environment = app_info::runtime_environment()
        );

        let content: Element<'_, Message> = widget::column()
            .push(appearance)
            .push(photos)
            .push(notifications)
            .push(
                widget::text(version_info)
                    .size(12)
                    .class(cosmic::theme::Text::Accent),
            )
            .spacing(spacing.space_m)
            .into();

        context_drawer::context_drawer(content, Message::ToggleContextPage(ContextPage::Settings))
            .title(fl!("settings-title"))
    }
}
