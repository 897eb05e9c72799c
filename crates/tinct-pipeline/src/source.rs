//! Decoding uploads and producing the preview-resolution base image.
//!
//! Uploads arrive either as raw file bytes or as a base64 data URL read
//! by the browser. The encoding is detected from the magic prefix of the
//! bytes (or the data-URL prefix); a MIME hint from the browser is never
//! trusted on its own.
//!
//! All effects run on the preview, a copy of the decoded image resized to
//! a fixed width. The full-resolution original is kept alongside it.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::config::ResizeFilter;
use crate::types::{Dimensions, EditorError, RgbaImage};

/// Data-URL prefix for JPEG uploads.
pub const JPEG_DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Data-URL prefix for PNG uploads.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// An upload encoding tinct can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageFormat {
    /// JPEG / JFIF.
    Jpeg,
    /// PNG.
    Png,
}

impl ImageFormat {
    /// Detect the encoding from the first bytes of `bytes`.
    #[must_use]
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(JPEG_MAGIC) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(PNG_MAGIC) {
            Some(Self::Png)
        } else {
            None
        }
    }

    /// Map a MIME type such as `image/png` to a format.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Map a file extension such as `png` or `JPG` (without the dot) to a
    /// format.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Canonical MIME type.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Data-URL prefix for this format.
    #[must_use]
    pub const fn data_url_prefix(self) -> &'static str {
        match self {
            Self::Jpeg => JPEG_DATA_URL_PREFIX,
            Self::Png => PNG_DATA_URL_PREFIX,
        }
    }

    const fn to_image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jpeg => f.write_str("JPEG"),
            Self::Png => f.write_str("PNG"),
        }
    }
}

/// Split a data URL into its declared format and decoded payload.
///
/// # Errors
///
/// Returns [`EditorError::UnsupportedFormat`] if `data_url` does not start
/// with a recognized prefix, or [`EditorError::Decode`] if the payload is
/// not valid base64.
pub fn parse_data_url(data_url: &str) -> Result<(ImageFormat, Vec<u8>), EditorError> {
    let (format, payload) = [ImageFormat::Jpeg, ImageFormat::Png]
        .into_iter()
        .find_map(|format| {
            data_url
                .strip_prefix(format.data_url_prefix())
                .map(|payload| (format, payload))
        })
        .ok_or_else(|| EditorError::UnsupportedFormat(describe_prefix(data_url)))?;

    let bytes = STANDARD.decode(payload.trim())?;
    Ok((format, bytes))
}

/// Short, log-safe description of what an unrecognized upload starts with.
fn describe_prefix(data_url: &str) -> String {
    let head: String = data_url.chars().take(32).collect();
    if head.is_empty() {
        "empty upload".to_owned()
    } else {
        format!("unrecognized prefix {head:?}")
    }
}

/// Largest preview, in pixels, a session will allocate (64 MiB of RGBA).
///
/// Very tall uploads scale up to very tall previews: a 1x100000 PNG at the
/// default width would otherwise need 16 GB.
pub const MAX_PREVIEW_PIXELS: u64 = 1 << 24;

/// Compute the preview height for a source of `source` dimensions resized
/// to `target_width`, preserving aspect ratio and rounding up.
///
/// # Errors
///
/// Returns [`EditorError::InvalidDimensions`] if either source axis is
/// zero, or if the preview would exceed [`MAX_PREVIEW_PIXELS`].
pub fn preview_dimensions(source: Dimensions, target_width: u32) -> Result<Dimensions, EditorError> {
    if source.width == 0 || source.height == 0 {
        return Err(EditorError::InvalidDimensions {
            width: source.width,
            height: source.height,
        });
    }
    let scaled = u64::from(target_width) * u64::from(source.height);
    let height = scaled.div_ceil(u64::from(source.width));
    if u64::from(target_width) * height > MAX_PREVIEW_PIXELS {
        return Err(EditorError::InvalidDimensions {
            width: source.width,
            height: source.height,
        });
    }
    let height = u32::try_from(height).map_err(|_| EditorError::InvalidDimensions {
        width: source.width,
        height: source.height,
    })?;
    Ok(Dimensions {
        width: target_width,
        height,
    })
}

/// A decoded upload and its preview-resolution copy.
#[derive(Debug, Clone)]
pub struct ImageSource {
    format: ImageFormat,
    original: RgbaImage,
    preview: RgbaImage,
}

impl ImageSource {
    /// Decode `bytes` and build the preview.
    ///
    /// The format is detected from the magic prefix of `bytes`.
    /// `mime_hint` is only compared against the detected format; a
    /// mismatch is logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnsupportedFormat`] if the bytes do not start
    /// with a JPEG or PNG signature, [`EditorError::Decode`] if the data is
    /// corrupt, and [`EditorError::InvalidDimensions`] for a zero-sized
    /// image or one whose preview would exceed [`MAX_PREVIEW_PIXELS`].
    pub fn load(
        bytes: &[u8],
        mime_hint: Option<&str>,
        preview_width: u32,
        filter: ResizeFilter,
    ) -> Result<Self, EditorError> {
        if bytes.is_empty() {
            return Err(EditorError::UnsupportedFormat("empty upload".to_owned()));
        }
        let format = ImageFormat::from_magic(bytes).ok_or_else(|| {
            EditorError::UnsupportedFormat(format!(
                "no JPEG or PNG signature (hint: {})",
                mime_hint.unwrap_or("none")
            ))
        })?;

        if let Some(hint) = mime_hint
            && ImageFormat::from_mime(hint) != Some(format)
        {
            log::warn!("upload declared {hint:?} but contains {format}; decoding as {format}");
        }

        let decoded = image::load_from_memory_with_format(bytes, format.to_image_format())?;
        let original = decoded.to_rgba8();
        let preview = resize_to_width(&original, preview_width, filter)?;

        log::info!(
            "loaded {format} image {} (preview {})",
            Dimensions::of(&original),
            Dimensions::of(&preview)
        );
        Ok(Self {
            format,
            original,
            preview,
        })
    }

    /// Decode a `data:image/jpeg;base64,` or `data:image/png;base64,` URL.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnsupportedFormat`] for any other prefix,
    /// plus every error [`load`](Self::load) can return.
    pub fn from_data_url(
        data_url: &str,
        preview_width: u32,
        filter: ResizeFilter,
    ) -> Result<Self, EditorError> {
        let (format, bytes) = parse_data_url(data_url)?;
        Self::load(&bytes, Some(format.mime_type()), preview_width, filter)
    }

    /// Detected encoding of the upload.
    #[must_use]
    pub const fn format(&self) -> ImageFormat {
        self.format
    }

    /// The decoded image at full resolution.
    #[must_use]
    pub const fn original(&self) -> &RgbaImage {
        &self.original
    }

    /// The resized base image effects operate on.
    #[must_use]
    pub const fn preview(&self) -> &RgbaImage {
        &self.preview
    }

    /// Dimensions of the full-resolution original.
    #[must_use]
    pub fn original_dimensions(&self) -> Dimensions {
        Dimensions::of(&self.original)
    }

    /// Dimensions of the preview.
    #[must_use]
    pub fn preview_dimensions(&self) -> Dimensions {
        Dimensions::of(&self.preview)
    }
}

/// Resize `image` to `target_width` pixels wide, preserving aspect ratio.
///
/// # Errors
///
/// Returns [`EditorError::InvalidDimensions`] if `image` has a zero-sized
/// axis.
pub fn resize_to_width(
    image: &RgbaImage,
    target_width: u32,
    filter: ResizeFilter,
) -> Result<RgbaImage, EditorError> {
    let target = preview_dimensions(Dimensions::of(image), target_width)?;
    Ok(image::imageops::resize(
        image,
        target.width,
        target.height,
        filter.to_image_filter(),
    ))
}
