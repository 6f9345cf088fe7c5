// SPDX-License-Identifier: GPL-3.0-only

//! Scale-to-fit for the filter preview

/// Size an image is drawn at inside the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitDimensions {
    pub scale: f32,
    pub width: f32,
    pub height: f32,
}

/// Uniformly scale a `width` x `height` image to fit the viewport
///
/// Returns `None` when either the image or the viewport is empty.
pub fn fit_to_viewport(
    width: u32,
    height: u32,
    viewport_width: f32,
    viewport_height: f32,
) -> Option<FitDimensions> {
    if width == 0 || height == 0 || viewport_width <= 0.0 || viewport_height <= 0.0 {
        return None;
    }

    let (w, h) = (width as f32, height as f32);
    let scale = (viewport_width / w).min(viewport_height / h);

    Some(FitDimensions {
        scale,
        width: scale * w,
        height: scale * h,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_in_portrait_viewport() {
        let fit = fit_to_viewport(4000, 3000, 400.0, 800.0).unwrap();
        assert_eq!(fit.scale, 0.1);
        assert_eq!((fit.width, fit.height), (400.0, 300.0));
    }

    #[test]
    fn test_portrait_in_landscape_viewport() {
        let fit = fit_to_viewport(1000, 2000, 800.0, 500.0).unwrap();
        assert_eq!(fit.scale, 0.25);
        assert_eq!((fit.width, fit.height), (250.0, 500.0));
    }

    #[test]
    fn test_small_image_is_scaled_up() {
        let fit = fit_to_viewport(100, 50, 400.0, 400.0).unwrap();
        assert_eq!(fit.scale, 4.0);
        assert_eq!((fit.width, fit.height), (400.0, 200.0));
    }

    #[test]
    fn test_fitted_size_never_exceeds_viewport() {
        for (w, h) in [(1, 1), (3, 7), (1920, 1080), (1080, 1920), (17, 4000)] {
            let fit = fit_to_viewport(w, h, 360.0, 480.0).unwrap();
            assert!(fit.width <= 360.0 + 1e-3);
            assert!(fit.height <= 480.0 + 1e-3);
            // One side touches the viewport
            assert!((fit.width - 360.0).abs() < 1e-3 || (fit.height - 480.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(fit_to_viewport(0, 10, 100.0, 100.0), None);
        assert_eq!(fit_to_viewport(10, 10, 0.0, 100.0), None);
    }
}
