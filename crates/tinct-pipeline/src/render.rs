//! Render coordination: replaying the pipeline and encoding the result.
//!
//! [`Renderer`] borrows the current [`ImageSource`] and [`Pipeline`] and
//! owns nothing else. Every [`Renderer::render_output`] call replays the
//! whole chain over the preview image, so the output is always a pure
//! function of those two inputs.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::ImageEncoder;
use web_time::Instant;

use crate::config::OutputFormat;
use crate::pipeline::Pipeline;
use crate::source::ImageSource;
use crate::types::{Dimensions, EditorError, RgbaImage};

/// Encoded image bytes ready to hand to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Encoding of `bytes`.
    pub format: OutputFormat,
    /// Dimensions of the encoded image.
    pub dimensions: Dimensions,
    /// The encoded file contents.
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// `data:<mime>;base64,<payload>` form, usable as an `<img src>`.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            STANDARD.encode(&self.bytes)
        )
    }
}

/// Encode `image` as `format`.
///
/// JPEG has no alpha channel, so alpha is dropped before encoding.
/// `quality` (1-100) only applies to JPEG.
///
/// # Errors
///
/// Returns [`EditorError::Encode`] if the encoder fails.
pub fn encode(
    image: &RgbaImage,
    format: OutputFormat,
    quality: u8,
) -> Result<EncodedImage, EditorError> {
    let mut bytes = Vec::new();
    let result = match format {
        OutputFormat::Jpeg => {
            let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, quality).write_image(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                image::ExtendedColorType::Rgb8,
            )
        }
        OutputFormat::Png => image::codecs::png::PngEncoder::new(&mut bytes).write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        ),
    };
    result.map_err(|e| EditorError::Encode(e.to_string()))?;

    Ok(EncodedImage {
        format,
        dimensions: Dimensions::of(image),
        bytes,
    })
}

/// Read-only view over the state a render depends on.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    source: &'a ImageSource,
    pipeline: &'a Pipeline,
}

impl<'a> Renderer<'a> {
    /// Borrow `source` and `pipeline` for rendering.
    #[must_use]
    pub const fn new(source: &'a ImageSource, pipeline: &'a Pipeline) -> Self {
        Self { source, pipeline }
    }

    /// The unedited preview image.
    #[must_use]
    pub const fn preview_base(&self) -> &'a RgbaImage {
        self.source.preview()
    }

    /// Replay the full pipeline over the preview image.
    #[must_use = "returns the rendered image"]
    pub fn render_output(&self) -> RgbaImage {
        let start = Instant::now();
        let output = self.pipeline.apply(self.source.preview());
        log::debug!(
            "rendered {} effect(s) over {} in {:?}",
            self.pipeline.len(),
            self.source.preview_dimensions(),
            start.elapsed()
        );
        output
    }
}
