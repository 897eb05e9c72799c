//! Shared types for the tinct editing pipeline.

use serde::{Deserialize, Serialize};

use crate::pipeline::EffectId;

/// Re-export `RgbaImage` so downstream crates can reference decoded
/// and rendered rasters without depending on `image` directly.
pub use image::RgbaImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of an existing raster.
    #[must_use]
    pub fn of(image: &RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Errors that can occur while editing.
///
/// None of these are fatal to a [`Session`](crate::Session): after an
/// error is reported the session keeps its previous image and pipeline.
/// [`EditorError::Closed`] is the exception only in the sense that the
/// session was already shut down.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// The requested effect kind is not registered in the catalog.
    #[error("unknown effect kind: {0}")]
    UnknownKind(String),

    /// The upload is not a recognized image encoding.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The upload claimed a known encoding but could not be decoded.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// The decoded image has a zero-sized axis, or its preview would be
    /// too large to allocate.
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width of the offending image.
        width: u32,
        /// Height of the offending image.
        height: u32,
    },

    /// Encoding the rendered output failed.
    #[error("failed to encode image: {0}")]
    Encode(String),

    /// No effect with the given id exists in the pipeline.
    #[error("no effect with id {0}")]
    NotFound(EffectId),

    /// A render was requested before any image was loaded.
    #[error("no image loaded")]
    NoImage,

    /// The session has been shut down.
    #[error("session is closed")]
    Closed,

    /// Session configuration is invalid.
    #[error("invalid session configuration: {0}")]
    InvalidConfig(String),
}

impl From<image::ImageError> for EditorError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<base64::DecodeError> for EditorError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decode(format!("invalid base64 payload: {err}"))
    }
}
