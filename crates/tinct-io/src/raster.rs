//! Blob URL creation for encoded previews.
//!
//! Turns the encoded bytes produced by `tinct-pipeline` into
//! browser-displayable object URLs. Object URLs are cheaper than
//! `data:` URLs for repeated slider-driven redraws: no base64 expansion
//! and no giant attribute strings in the DOM.

use std::fmt;

use tinct_pipeline::EncodedImage;
use wasm_bindgen::JsValue;
use web_sys::BlobPropertyBag;

/// Errors that can occur during Blob URL creation.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for RasterError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// An object URL owning a `Blob` of encoded image bytes.
///
/// The URL is revoked when the value is dropped, so replacing a stored
/// `BlobUrl` with a fresh one releases the previous image.
#[derive(Debug, PartialEq, Eq)]
pub struct BlobUrl(String);

impl BlobUrl {
    /// Copy the encoded bytes of `image` into a `Blob` and create an
    /// object URL for it.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::JsError`] if Blob or URL creation fails.
    pub fn from_encoded(image: &EncodedImage) -> Result<Self, RasterError> {
        // 1. Create a Uint8Array from the encoded bytes.
        let uint8_array = js_sys::Uint8Array::from(image.bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&uint8_array);

        // 2. Create a Blob with the matching MIME type.
        let opts = BlobPropertyBag::new();
        opts.set_type(image.format.mime_type());
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;

        // 3. Generate an object URL.
        let url = web_sys::Url::create_object_url_with_blob(&blob)?;
        Ok(Self(url))
    }

    /// The URL, for use as an `<img src>`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Drop for BlobUrl {
    fn drop(&mut self) {
        revoke_blob_url(&self.0);
    }
}

/// Revoke an object URL.
///
/// Best-effort: failures are silently ignored since the URL may have
/// already been revoked or garbage collected.
pub fn revoke_blob_url(url: &str) {
    let _ = web_sys::Url::revoke_object_url(url);
}
