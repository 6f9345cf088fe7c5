// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::Facing;
use crate::backends::media_library::validate_album_name;
use crate::backends::notifications::NotificationBehavior;
use crate::constants::{capture, library};
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use cosmic::{Theme, theme};
use serde::{Deserialize, Serialize};

/// Application theme preference
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AppTheme {
    /// Follow system theme (dark or light based on system setting)
    #[default]
    System,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

impl AppTheme {
    /// Get the COSMIC theme for this app theme preference
    pub fn theme(&self) -> Theme {
        match self {
            Self::Dark => {
                let mut theme = theme::system_dark();
                theme.theme_type.prefer_dark(Some(true));
                theme
            }
            Self::Light => {
                let mut theme = theme::system_light();
                theme.theme_type.prefer_dark(Some(false));
                theme
            }
            Self::System => theme::system_preference(),
        }
    }
}

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Application theme preference (System, Dark, Light)
    pub app_theme: AppTheme,
    /// Album every saved photo is filed into
    pub album_name: String,
    /// Camera the capture view opens with
    pub default_facing: Facing,
    /// Mirror the live preview when the front camera is active
    pub mirror_front_preview: bool,
    /// Write the selected filter into the saved file instead of the raw capture
    pub bake_filter_on_save: bool,
    /// JPEG quality (1-100) for captured photos
    pub jpeg_quality: u8,
    /// Forward foreground push messages as local notifications
    pub notifications_enabled: bool,
    /// Let local notifications play a sound
    pub notification_sound: bool,
    /// Let local notifications update the app badge
    pub notification_badge: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(),
            album_name: library::DEFAULT_ALBUM_NAME.to_string(),
            default_facing: Facing::Back,
            mirror_front_preview: true,
            bake_filter_on_save: false,
            jpeg_quality: capture::DEFAULT_JPEG_QUALITY,
            notifications_enabled: true,
            notification_sound: true,
            notification_badge: true,
        }
    }
}

impl Config {
    /// Album name to save into, falling back to the default when unusable
    pub fn effective_album_name(&self) -> &str {
        validate_album_name(&self.album_name)
            .map(|()| self.album_name.trim())
            .unwrap_or(library::DEFAULT_ALBUM_NAME)
    }

    /// JPEG quality clamped to the range the encoder accepts
    pub fn effective_jpeg_quality(&self) -> u8 {
        match self.jpeg_quality {
            1..=100 => self.jpeg_quality,
            _ => capture::DEFAULT_JPEG_QUALITY,
        }
    }

    /// Presentation of foreground notifications
    pub fn notification_behavior(&self) -> NotificationBehavior {
        NotificationBehavior {
            show_alert: true,
            play_sound: self.notification_sound,
            set_badge: self.notification_badge,
        }
    }
}
