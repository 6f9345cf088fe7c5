// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Media library defaults
pub mod library {
    /// Album every saved photo is filed into unless configured otherwise
    pub const DEFAULT_ALBUM_NAME: &str = "Camera App";

    /// Prefix for asset file names created in the library root
    pub const ASSET_PREFIX: &str = "IMG";

    /// Characters that cannot appear in an album name (album = directory)
    pub const FORBIDDEN_ALBUM_CHARS: &[char] = &['/', '\\', '\0'];
}

/// Notification bootstrap constants
pub mod notifications {
    /// Title used when a remote message carries none
    pub const FALLBACK_TITLE: &str = "New Notification";

    /// Body used when a remote message carries none
    pub const FALLBACK_BODY: &str = "";

    /// Well-known bus name the push provider claims on the session bus
    pub const PUSH_BUS_NAME: &str = "io.github.filtercamera.FilterCamera.Push";

    /// Object path of the push delivery interface
    pub const PUSH_OBJECT_PATH: &str = "/io/github/filtercamera/Push";

    /// Interface name of the push delivery interface
    pub const PUSH_INTERFACE: &str = "io.github.filtercamera.Push1";

    /// Hint key carrying the JSON-encoded message data on local notifications
    pub const DATA_HINT: &str = "x-filter-camera-data";

    /// File (under the user data dir) holding the persisted push token
    pub const TOKEN_FILE: &str = "push-token";

    /// Buffered remote messages before delivery starts dropping
    pub const MESSAGE_CHANNEL_CAPACITY: usize = 32;

    /// Freedesktop notifications service
    pub const NOTIFICATIONS_BUS_NAME: &str = "org.freedesktop.Notifications";

    /// Freedesktop notifications object path
    pub const NOTIFICATIONS_OBJECT_PATH: &str = "/org/freedesktop/Notifications";

    /// Launcher badge protocol understood by docks and panels
    pub const LAUNCHER_ENTRY_INTERFACE: &str = "com.canonical.Unity.LauncherEntry";

    /// Object path the launcher badge signal is emitted from
    pub const LAUNCHER_ENTRY_PATH: &str = "/io/github/filtercamera/Launcher";
}

/// Photo capture constants
pub mod capture {
    use super::Duration;

    /// Directory (under the user cache dir) holding temporary captures
    pub const TEMP_DIR_NAME: &str = "filter-camera";

    /// Temporary captures older than this are removed on startup
    pub const STALE_CAPTURE_AGE: Duration = Duration::from_secs(24 * 60 * 60);

    /// JPEG quality used when the configuration value is out of range
    pub const DEFAULT_JPEG_QUALITY: u8 = 92;

    /// How long a headless capture waits for the first frame
    pub const FIRST_FRAME_TIMEOUT: Duration = Duration::from_secs(5);
}

/// GStreamer preview pipeline constants
pub mod pipeline {
    /// Maximum buffers queued in the appsink
    pub const MAX_BUFFERS: u32 = 2;

    /// Output pixel format of the preview pipeline
    pub const OUTPUT_FORMAT: &str = "RGBA";

    /// Capacity of the frame channel feeding the UI
    pub const FRAME_CHANNEL_CAPACITY: usize = 4;
}

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Frames between debug log lines in the preview pipeline
    pub const FRAME_LOG_INTERVAL: u64 = 30;

    /// Timeout for the pipeline to reach PLAYING
    pub const START_TIMEOUT_SECS: u64 = 5;

    /// Timeout for the pipeline to reach NULL
    pub const STOP_TIMEOUT_SECS: u64 = 2;

    /// Delay before the camera subscription retries a failed start
    pub const PIPELINE_RETRY_DELAY: Duration = Duration::from_secs(2);
}

/// UI layout constants
pub mod ui {
    /// Outer diameter of the shutter button
    pub const CAPTURE_BUTTON_OUTER: f32 = 72.0;

    /// Inner diameter of the shutter button
    pub const CAPTURE_BUTTON_INNER: f32 = 60.0;

    /// Opacity of the shutter while a capture is in flight
    pub const CAPTURE_BUTTON_BUSY_ALPHA: f32 = 0.4;

    /// Edge length of a filter thumbnail
    pub const FILTER_THUMBNAIL_SIZE: u32 = 96;

    /// Spacing between filter thumbnails
    pub const FILTER_THUMBNAIL_SPACING: u16 = 8;

    /// Minimum window width
    pub const MIN_WINDOW_WIDTH: f32 = 360.0;

    /// Minimum window height
    pub const MIN_WINDOW_HEIGHT: f32 = 480.0;

    /// Viewport assumed until the first resize event arrives
    pub const DEFAULT_VIEWPORT: (f32, f32) = (800.0, 600.0);

    /// Height reserved below the preview for the action row
    pub const ACTION_BAR_HEIGHT: f32 = 160.0;
}

/// Application information utilities
pub mod app_info {
    use std::path::Path;

    /// Reverse-DNS application id (desktop entry, config, D-Bus names)
    pub const APP_ID: &str = "io.github.filtercamera.FilterCamera";

    /// Human readable application name
    pub const APP_NAME: &str = "Filter Camera";

    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }

    /// Check if the application is running inside a Flatpak sandbox
    pub fn is_flatpak() -> bool {
        Path::new("/.flatpak-info").exists()
    }

    /// Get the runtime environment string (e.g., "Flatpak" or "Native")
    pub fn runtime_environment() -> &'static str {
        if is_flatpak() { "Flatpak" } else { "Native" }
    }
}
