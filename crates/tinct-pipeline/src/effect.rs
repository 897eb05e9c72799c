//! Pixel transforms behind each effect kind.
//!
//! These are thin wrappers over `image::imageops` and `imageproc`. Each
//! maps the slider value (always within `[-2.0, 2.0]`) onto the
//! parameter the underlying library expects, and returns a fresh image.
//!
//! A value of exactly `0.0` is neutral for every effect and returns the
//! input unchanged. `image`'s contrast operator round-trips through
//! floating point and is not bit-exact at zero.

use image::{GrayImage, Rgba};

use crate::types::RgbaImage;

/// Brightness offset applied at a slider value of `1.0`.
///
/// The slider range `[-2.0, 2.0]` maps onto offsets `[-255, 255]`, so the
/// ends of the slider drive the image fully black or fully white.
pub const BRIGHTNESS_SCALE: f64 = 127.5;

/// Contrast percentage applied at a slider value of `1.0`.
///
/// `image::imageops::contrast` is monotone only for percentages in
/// `[-100, 100]`; the slider range maps exactly onto that.
pub const CONTRAST_SCALE: f64 = 50.0;

/// Canny low threshold used by [`edge_detection`].
pub const EDGE_LOW_THRESHOLD: f32 = 50.0;

/// Canny high threshold used by [`edge_detection`].
pub const EDGE_HIGH_THRESHOLD: f32 = 150.0;

/// Shift every color channel by `value * BRIGHTNESS_SCALE`.
///
/// Alpha is preserved.
#[must_use = "returns the adjusted image"]
#[allow(clippy::float_cmp)] // exact zero is the neutral slider position
pub fn brightness(image: &RgbaImage, value: f64) -> RgbaImage {
    if value == 0.0 {
        return image.clone();
    }
    #[allow(clippy::cast_possible_truncation)]
    let offset = (value * BRIGHTNESS_SCALE).round() as i32;
    image::imageops::brighten(image, offset)
}

/// Stretch (positive) or compress (negative) contrast around mid-gray.
///
/// At `-2.0` the image collapses to flat gray. Alpha is preserved.
#[must_use = "returns the adjusted image"]
#[allow(clippy::float_cmp)] // exact zero is the neutral slider position
pub fn contrast(image: &RgbaImage, value: f64) -> RgbaImage {
    if value == 0.0 {
        return image.clone();
    }
    #[allow(clippy::cast_possible_truncation)]
    let percent = (value * CONTRAST_SCALE) as f32;
    image::imageops::contrast(image, percent)
}

/// Render the edges of `image` as white lines on black.
///
/// `radius` is the sigma of the Gaussian blur applied before Canny edge
/// detection: larger radii suppress fine texture and keep only strong
/// outlines. Non-positive radii return the image unchanged, since
/// `imageproc`'s blur panics on `sigma <= 0.0`.
///
/// The alpha channel of the source is carried over to the output.
#[must_use = "returns the edge map"]
pub fn edge_detection(image: &RgbaImage, radius: f64) -> RgbaImage {
    if radius <= 0.0 {
        return image.clone();
    }

    #[allow(clippy::cast_possible_truncation)]
    let sigma = radius as f32;
    let gray: GrayImage = image::imageops::grayscale(image);
    let blurred = imageproc::filter::gaussian_blur_f32(&gray, sigma);
    let edges = imageproc::edges::canny(&blurred, EDGE_LOW_THRESHOLD, EDGE_HIGH_THRESHOLD);

    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let v = edges.get_pixel(x, y).0[0];
        let alpha = image.get_pixel(x, y).0[3];
        Rgba([v, v, v, alpha])
    })
}
