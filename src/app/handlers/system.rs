// SPDX-License-Identifier: GPL-3.0-only

//! System handlers
//!
//! Handles navigation, dialogs, settings and the notification bootstrap result.

use crate::app::state::{AppModel, ContextPage, Message};
use crate::config::{AppTheme, Config};
use crate::notifications::BootstrapReport;
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use cosmic::iced::Size;
use std::path::PathBuf;
use tracing::{error, info};

impl AppModel {
    // =========================================================================
    // UI Navigation Handlers
    // =========================================================================

    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        if let Err(err) = open::that_detached(&url) {
            error!(url = %url, error = %err, "Failed to open URL");
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    pub(crate) fn handle_window_resized(&mut self, size: Size) -> Task<cosmic::Action<Message>> {
        self.viewport = size;
        Task::none()
    }

    // =========================================================================
    // Dialog Handlers
    // =========================================================================

    pub(crate) fn handle_dismiss_dialog(&mut self) -> Task<cosmic::Action<Message>> {
        self.session.dismiss_dialog();
        Task::none()
    }

    pub(crate) fn handle_open_album(&mut self, path: PathBuf) -> Task<cosmic::Action<Message>> {
        info!(path = %path.display(), "Opening album");
        if let Err(e) = open::that_detached(&path) {
            error!(error = %e, path = %path.display(), "Failed to open album");
        }
        self.session.dismiss_dialog();
        Task::none()
    }

    // =========================================================================
    // Settings Handlers
    // =========================================================================

    pub(crate) fn handle_update_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        info!("UpdateConfig received");
        if config.album_name != self.config.album_name {
            self.album_name_input = config.album_name.clone();
        }
        self.config = config;
        Task::none()
    }

    /// Apply `change` to the config and persist it
    pub(crate) fn update_setting(
        &mut self,
        change: impl FnOnce(&mut Config),
    ) -> Task<cosmic::Action<Message>> {
        change(&mut self.config);
        self.save_config();
        Task::none()
    }

    fn save_config(&self) {
        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, "Failed to save config");
        }
    }

    pub(crate) fn handle_set_app_theme(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let app_theme = match index {
            0 => AppTheme::System,
            1 => AppTheme::Dark,
            2 => AppTheme::Light,
            _ => return Task::none(),
        };

        info!(?app_theme, "Setting application theme");
        self.config.app_theme = app_theme;
        self.save_config();

        cosmic::command::set_theme(app_theme.theme())
    }

    pub(crate) fn handle_submit_album_name(&mut self) -> Task<cosmic::Action<Message>> {
        let name = self.album_name_input.trim().to_string();
        match crate::backends::media_library::validate_album_name(&name) {
            Ok(()) => {
                info!(album = %name, "Album name changed");
                self.album_name_input = name.clone();
                self.update_setting(|config| config.album_name = name)
            }
            Err(e) => {
                error!(error = %e, "Rejected album name");
                self.album_name_input = self.config.album_name.clone();
                Task::none()
            }
        }
    }

    // =========================================================================
    // Notification Handlers
    // =========================================================================

    pub(crate) fn handle_notification_report(
        &mut self,
        report: BootstrapReport,
    ) -> Task<cosmic::Action<Message>> {
        info!(
            authorization_enabled = report.authorization_enabled,
            subscribed = report.subscribed,
            forwarded = report.forwarded,
            "Notification bootstrap report"
        );
        self.notification_report = Some(report);
        Task::none()
    }
}
