//! tinct-pipeline: Effect pipeline and editing session (sans-IO).
//!
//! Holds everything between an uploaded file and the encoded preview the
//! browser displays:
//!
//! upload -> decode + resize to preview width -> effect chain -> encode.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and returns structured data. All browser interaction
//! lives in `tinct-io`.
//!
//! Pixel math is delegated to `image` and `imageproc`; this crate owns
//! the ordering, identity, and clamping of effects, and the session state
//! machine that ties uploads, edits, and renders together.

pub mod catalog;
pub mod config;
pub mod control;
pub mod effect;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod source;
pub mod types;

pub use catalog::{Catalog, EffectDescriptor, EffectKind, ParamRange};
pub use config::{OutputFormat, ResizeFilter, SessionConfig, UpdatePolicy};
pub use control::{ControlDescriptor, render_control_descriptor};
pub use pipeline::{EffectId, EffectInstance, Pipeline};
pub use render::{EncodedImage, Renderer, encode};
pub use session::{Event, Outcome, Session, SessionState, UploadSource};
pub use source::{ImageFormat, ImageSource};
pub use types::{Dimensions, EditorError, RgbaImage};

/// Decode `bytes`, apply `effects` in order, and encode the result.
///
/// A one-shot convenience over [`Session`] for callers that do not need
/// incremental edits. Each entry is a kind name and its value.
///
/// # Errors
///
/// Returns the first error raised while loading, appending, or encoding.
pub fn process<'a>(
    bytes: &[u8],
    effects: impl IntoIterator<Item = (&'a str, f64)>,
    config: &SessionConfig,
) -> Result<EncodedImage, EditorError> {
    let mut session = Session::new(config.clone())?;
    session.load(&UploadSource::Bytes {
        bytes: bytes.to_vec(),
        mime_hint: None,
    })?;
    for (kind, value) in effects {
        session.append_with_value(kind, value)?;
    }
    let output = session.render_output()?;
    session.encode(&output)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::ImageEncoder;

    use super::*;

    /// Left half black, right half white.
    fn sharp_edge_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(width, height, |x, _y| {
            if x < width / 2 {
                image::Rgba([0, 0, 0, 255])
            } else {
                image::Rgba([255, 255, 255, 255])
            }
        });
        let mut buf = Vec::new();
        image::codecs::png::PngEncoder::new(&mut buf)
            .write_image(
                img.as_raw(),
                img.width(),
                img.height(),
                image::ExtendedColorType::Rgba8,
            )
            .unwrap();
        buf
    }

    fn no_effects() -> Vec<(&'static str, f64)> {
        Vec::new()
    }

    #[test]
    fn process_empty_input() {
        let result = process(&[], no_effects(), &SessionConfig::default());
        assert!(matches!(result, Err(EditorError::UnsupportedFormat(_))));
    }

    #[test]
    fn process_corrupt_png() {
        let mut bytes = sharp_edge_png(10, 10);
        bytes.truncate(20);
        let result = process(&bytes, no_effects(), &SessionConfig::default());
        assert!(matches!(result, Err(EditorError::Decode(_))));
    }

    #[test]
    fn process_unknown_effect() {
        let png = sharp_edge_png(10, 10);
        let result = process(&png, [("sepia", 1.0)], &SessionConfig::default());
        assert!(matches!(result, Err(EditorError::UnknownKind(_))));
    }

    #[test]
    fn process_edge_detection_to_png() {
        let png = sharp_edge_png(40, 40);
        let config = SessionConfig {
            output_format: OutputFormat::Png,
            ..SessionConfig::default()
        };
        let encoded = process(&png, [("edge-detection", 1.0)], &config).unwrap();
        assert_eq!(
            encoded.dimensions,
            Dimensions {
                width: 200,
                height: 200
            }
        );
        let decoded = image::load_from_memory(&encoded.bytes).unwrap().to_rgba8();
        assert!(
            decoded.pixels().any(|p| p.0[0] == 255),
            "expected at least one edge pixel"
        );
    }
}
