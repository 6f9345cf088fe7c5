// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants and filter definitions

use filter_camera::constants::{capture, library, notifications, ui};
use filter_camera::filters::{ColorMatrix, FilterType};

#[test]
fn test_notification_fallbacks() {
    assert_eq!(notifications::FALLBACK_TITLE, "New Notification");
    assert_eq!(notifications::FALLBACK_BODY, "");
}

#[test]
fn test_default_album_name() {
    assert_eq!(library::DEFAULT_ALBUM_NAME, "Camera App");
}

#[test]
fn test_jpeg_quality_in_range() {
    assert!((1..=100).contains(&capture::DEFAULT_JPEG_QUALITY));
}

#[test]
fn test_shutter_inner_fits_outer() {
    assert!(ui::CAPTURE_BUTTON_INNER < ui::CAPTURE_BUTTON_OUTER);
    assert!((0.0..1.0).contains(&ui::CAPTURE_BUTTON_BUSY_ALPHA));
}

#[test]
fn test_filter_order_and_names() {
    // Picker order is Normal, Sepia, Grayscale, Vintage
    let names: Vec<&str> = FilterType::ALL.iter().map(|f| f.name()).collect();
    assert_eq!(names, ["normal", "sepia", "grayscale", "vintage"]);

    for filter in FilterType::ALL {
        assert_eq!(filter.name().parse::<FilterType>(), Ok(filter));
    }
    assert!("polaroid".parse::<FilterType>().is_err());
}

#[test]
fn test_filter_matrices() {
    assert_eq!(FilterType::Normal.matrix(), ColorMatrix::IDENTITY);

    let sepia = FilterType::Sepia.matrix().0;
    assert_eq!(&sepia[0..5], &[0.393, 0.769, 0.189, 0.0, 0.0]);
    assert_eq!(&sepia[5..10], &[0.349, 0.686, 0.168, 0.0, 0.0]);
    assert_eq!(&sepia[10..15], &[0.272, 0.534, 0.131, 0.0, 0.0]);

    // Alpha row passes alpha through for every filter
    for filter in FilterType::ALL {
        assert_eq!(&filter.matrix().0[15..20], &[0.0, 0.0, 0.0, 1.0, 0.0]);
    }
}

#[test]
fn test_vintage_offsets_brighten_black() {
    let [r, g, b, a] = ColorMatrix::VINTAGE.apply_to_pixel([0, 0, 0, 255]);
    assert!(r > 0 && g > 0 && b > 0);
    assert_eq!(a, 255);
}
