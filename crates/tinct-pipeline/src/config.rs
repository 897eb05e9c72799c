//! Session configuration.
//!
//! [`SessionConfig`] gathers the knobs that shape a session: the preview
//! resolution, how the preview is resampled, how rendered output is
//! encoded, and how updates to unknown effect ids are treated.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::EditorError;

/// Resampling filter used when producing the preview image.
///
/// Ordered from fastest/lowest-quality to slowest/highest-quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    /// Nearest-neighbor: fastest, blocky artifacts.
    Nearest,
    /// Linear interpolation: fast, decent quality.
    #[default]
    Triangle,
    /// Bicubic (Catmull-Rom): moderate speed, good quality.
    CatmullRom,
    /// Gaussian: moderate speed, smooth output.
    Gaussian,
    /// Lanczos with 3 lobes: slowest, sharpest.
    Lanczos3,
}

impl ResizeFilter {
    /// Convert to the `image` crate's `FilterType`.
    #[must_use]
    pub const fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            Self::Nearest => image::imageops::FilterType::Nearest,
            Self::Triangle => image::imageops::FilterType::Triangle,
            Self::CatmullRom => image::imageops::FilterType::CatmullRom,
            Self::Gaussian => image::imageops::FilterType::Gaussian,
            Self::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for ResizeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => f.write_str("Nearest"),
            Self::Triangle => f.write_str("Triangle"),
            Self::CatmullRom => f.write_str("CatmullRom"),
            Self::Gaussian => f.write_str("Gaussian"),
            Self::Lanczos3 => f.write_str("Lanczos3"),
        }
    }
}

/// Encoding used for rendered previews handed back to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Lossy JPEG at [`SessionConfig::jpeg_quality`].
    #[default]
    Jpeg,
    /// Lossless PNG (keeps alpha).
    Png,
}

impl OutputFormat {
    /// MIME type of the encoded bytes.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Conventional file extension, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// How [`Session`](crate::Session) treats a value change for an effect
/// id that is not in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdatePolicy {
    /// Ignore the change and log a warning.
    #[default]
    Lenient,
    /// Report [`EditorError::NotFound`].
    Strict,
}

/// Configuration for an editing session.
///
/// Every field has a default, so partial JSON such as
/// `{"preview_width": 320}` deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Width in pixels of the preview image all effects operate on.
    /// Height follows from the source aspect ratio.
    pub preview_width: u32,

    /// Resampling filter used to produce the preview.
    pub resize_filter: ResizeFilter,

    /// Encoding of rendered output.
    pub output_format: OutputFormat,

    /// JPEG quality (1-100). Ignored for PNG output.
    pub jpeg_quality: u8,

    /// Behaviour for value changes addressed to unknown effect ids.
    pub update_policy: UpdatePolicy,
}

impl SessionConfig {
    /// Default preview width in pixels.
    pub const DEFAULT_PREVIEW_WIDTH: u32 = 200;

    /// Default JPEG quality.
    pub const DEFAULT_JPEG_QUALITY: u8 = 90;

    /// Widest preview JPEG can encode.
    pub const MAX_PREVIEW_WIDTH: u32 = 65_535;

    /// Check the configuration for values no session can work with.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidConfig`] if `preview_width` is outside
    /// `1..=MAX_PREVIEW_WIDTH` or `jpeg_quality` is outside `1..=100`.
    pub fn validate(&self) -> Result<(), EditorError> {
        if !(1..=Self::MAX_PREVIEW_WIDTH).contains(&self.preview_width) {
            return Err(EditorError::InvalidConfig(format!(
                "preview_width must be within 1..={}, got {}",
                Self::MAX_PREVIEW_WIDTH,
                self.preview_width
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(EditorError::InvalidConfig(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            preview_width: Self::DEFAULT_PREVIEW_WIDTH,
            resize_filter: ResizeFilter::default(),
            output_format: OutputFormat::default(),
            jpeg_quality: Self::DEFAULT_JPEG_QUALITY,
            update_policy: UpdatePolicy::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behaviour() {
        let config = SessionConfig::default();
        assert_eq!(config.preview_width, 200);
        assert_eq!(config.jpeg_quality, 90);
        assert_eq!(config.resize_filter, ResizeFilter::Triangle);
        assert_eq!(config.output_format, OutputFormat::Jpeg);
        assert_eq!(config.update_policy, UpdatePolicy::Lenient);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"preview_width": 320, "update_policy": "strict"}"#).unwrap();
        assert_eq!(config.preview_width, 320);
        assert_eq!(config.update_policy, UpdatePolicy::Strict);
        assert_eq!(config.jpeg_quality, SessionConfig::DEFAULT_JPEG_QUALITY);
    }

    #[test]
    fn preview_width_beyond_jpeg_limit_is_rejected() {
        let widest = SessionConfig {
            preview_width: SessionConfig::MAX_PREVIEW_WIDTH,
            ..SessionConfig::default()
        };
        assert!(widest.validate().is_ok());

        let too_wide = SessionConfig {
            preview_width: 70_000,
            ..SessionConfig::default()
        };
        assert!(matches!(
            too_wide.validate(),
            Err(EditorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_preview_width_is_rejected() {
        let config = SessionConfig {
            preview_width: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EditorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn out_of_range_quality_is_rejected() {
        for quality in [0, 101, 255] {
            let config = SessionConfig {
                jpeg_quality: quality,
                ..SessionConfig::default()
            };
            assert!(
                config.validate().is_err(),
                "quality {quality} should be rejected"
            );
        }
    }

    #[test]
    fn output_format_metadata() {
        assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::Png.mime_type(), "image/png");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
    }
}
