// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use filter_camera::Config;
use filter_camera::backends::camera::Facing;

#[test]
fn test_config_default() {
    // Test that default config can be created
    let config = Config::default();

    // Check sensible defaults
    assert_eq!(config.album_name, "Camera App");
    assert_eq!(config.default_facing, Facing::Back);
    assert!(
        config.mirror_front_preview,
        "Front preview should be mirrored by default"
    );
    assert!(
        !config.bake_filter_on_save,
        "Saved photos should be unfiltered by default"
    );
    assert!(config.notifications_enabled);
}

#[test]
fn test_effective_album_name_falls_back() {
    let mut config = Config::default();

    config.album_name = "  Holidays  ".to_string();
    assert_eq!(config.effective_album_name(), "Holidays");

    config.album_name = "   ".to_string();
    assert_eq!(config.effective_album_name(), "Camera App");

    config.album_name = "a/b".to_string();
    assert_eq!(config.effective_album_name(), "Camera App");

    // Would resolve outside the library root
    for name in [".", "..", " .. "] {
        config.album_name = name.to_string();
        assert_eq!(config.effective_album_name(), "Camera App", "{name:?}");
    }
}

#[test]
fn test_effective_jpeg_quality_rejects_zero() {
    let mut config = Config::default();

    config.jpeg_quality = 0;
    assert_eq!(config.effective_jpeg_quality(), Config::default().jpeg_quality);

    config.jpeg_quality = 150;
    assert_eq!(config.effective_jpeg_quality(), Config::default().jpeg_quality);

    config.jpeg_quality = 40;
    assert_eq!(config.effective_jpeg_quality(), 40);
}

#[test]
fn test_notification_behavior_follows_toggles() {
    let mut config = Config::default();
    config.notification_sound = false;
    config.notification_badge = true;

    let behavior = config.notification_behavior();
    assert!(behavior.show_alert, "Foreground messages always alert");
    assert!(!behavior.play_sound);
    assert!(behavior.set_badge);
}
