//! The editing session and its event dispatcher.
//!
//! A [`Session`] is created once per mounted UI and owns the only
//! [`ImageSource`] and [`Pipeline`]. The UI layer turns user actions into
//! [`Event`]s and feeds them to [`Session::dispatch`], which mutates the
//! session and returns an [`Outcome`] describing what to redraw.
//!
//! # States
//!
//! ```text
//! Empty --load--> Loaded --(append | update)*--> Loaded --shutdown--> Closed
//! ```
//!
//! Effects can be appended while `Empty`; they apply once an image
//! arrives. `Closed` is terminal and every mutating call fails with
//! [`EditorError::Closed`].

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::config::{SessionConfig, UpdatePolicy};
use crate::control::{ControlDescriptor, render_control_descriptor};
use crate::pipeline::{EffectId, EffectInstance, Pipeline};
use crate::render::{self, EncodedImage, Renderer};
use crate::source::ImageSource;
use crate::types::{Dimensions, EditorError, RgbaImage};

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No image has been loaded yet.
    Empty,
    /// An image is loaded; renders are possible.
    Loaded,
    /// The session was shut down.
    Closed,
}

/// An uploaded image as the UI received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSource {
    /// A `data:image/...;base64,` URL, as produced by `FileReader`.
    DataUrl(String),
    /// Raw file bytes with the MIME type the browser reported, if any.
    Bytes {
        /// File contents.
        bytes: Vec<u8>,
        /// Browser-reported MIME type; informational only.
        mime_hint: Option<String>,
    },
}

/// A user action, translated by the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A file was picked.
    Upload(UploadSource),
    /// The user asked for a new effect of the named kind.
    AddEffect {
        /// Kind name, e.g. `"contrast"`.
        kind: String,
    },
    /// A slider moved.
    SetValue {
        /// Instance the slider is bound to.
        id: EffectId,
        /// New raw slider value; clamped before use.
        value: f64,
    },
    /// The user closed the editor.
    Shutdown,
}

/// What changed as a result of an [`Event`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A new image replaced the previous one.
    Loaded {
        /// Dimensions of the full-resolution upload.
        original: Dimensions,
        /// The unedited preview.
        preview: EncodedImage,
        /// The preview with the current pipeline applied.
        output: EncodedImage,
    },
    /// An effect was appended.
    EffectAdded {
        /// Control to add to the effect list.
        control: ControlDescriptor,
        /// New output, or `None` if no image is loaded yet.
        output: Option<EncodedImage>,
    },
    /// An effect value changed (or an unknown id was ignored).
    ValueChanged {
        /// New output, or `None` if no image is loaded yet.
        output: Option<EncodedImage>,
    },
    /// The session is now closed.
    Closed,
}

/// One editing session: one image, one pipeline.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    pipeline: Pipeline,
    source: Option<ImageSource>,
    closed: bool,
}

impl Session {
    /// Create an empty session offering every effect kind.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidConfig`] if `config` fails
    /// [`SessionConfig::validate`].
    pub fn new(config: SessionConfig) -> Result<Self, EditorError> {
        Self::with_catalog(config, Catalog::default())
    }

    /// Create an empty session offering the kinds in `catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidConfig`] if `config` fails
    /// [`SessionConfig::validate`].
    pub fn with_catalog(config: SessionConfig, catalog: Catalog) -> Result<Self, EditorError> {
        config.validate()?;
        Ok(Self {
            config,
            pipeline: Pipeline::new(catalog),
            source: None,
            closed: false,
        })
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        if self.closed {
            SessionState::Closed
        } else if self.source.is_some() {
            SessionState::Loaded
        } else {
            SessionState::Empty
        }
    }

    /// The session configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The effect catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        self.pipeline.catalog()
    }

    /// The effect pipeline.
    #[must_use]
    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// The loaded image, if any.
    #[must_use]
    pub const fn source(&self) -> Option<&ImageSource> {
        self.source.as_ref()
    }

    /// Controls for every effect, in pipeline order.
    #[must_use]
    pub fn controls(&self) -> Vec<ControlDescriptor> {
        self.pipeline
            .effects()
            .iter()
            .map(render_control_descriptor)
            .collect()
    }

    const fn ensure_open(&self) -> Result<(), EditorError> {
        if self.closed {
            Err(EditorError::Closed)
        } else {
            Ok(())
        }
    }

    /// Replace the current image with a decoded upload.
    ///
    /// On any error the previously loaded image (if any) is kept.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Closed`] after shutdown, otherwise whatever
    /// [`ImageSource::load`] or [`ImageSource::from_data_url`] reports.
    pub fn load(&mut self, upload: &UploadSource) -> Result<&ImageSource, EditorError> {
        self.ensure_open()?;
        let source = self.decode(upload)?;
        Ok(&*self.source.insert(source))
    }

    /// Decode `upload` without touching the current image.
    fn decode(&self, upload: &UploadSource) -> Result<ImageSource, EditorError> {
        let width = self.config.preview_width;
        let filter = self.config.resize_filter;
        match upload {
            UploadSource::DataUrl(url) => ImageSource::from_data_url(url, width, filter),
            UploadSource::Bytes { bytes, mime_hint } => {
                ImageSource::load(bytes, mime_hint.as_deref(), width, filter)
            }
        }
    }

    /// Append an effect of the named kind at its default value.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Closed`] after shutdown or
    /// [`EditorError::UnknownKind`] if `kind` is not in the catalog.
    pub fn append(&mut self, kind: &str) -> Result<EffectInstance, EditorError> {
        self.ensure_open()?;
        let kind = self.pipeline.catalog().resolve(kind)?;
        self.pipeline.append_kind(kind, kind.default_value())
    }

    /// Append an effect of the named kind starting at `initial_value`.
    ///
    /// # Errors
    ///
    /// Same as [`append`](Self::append).
    pub fn append_with_value(
        &mut self,
        kind: &str,
        initial_value: f64,
    ) -> Result<EffectInstance, EditorError> {
        self.ensure_open()?;
        self.pipeline.append(kind, initial_value)
    }

    /// Change an effect's value according to the configured
    /// [`UpdatePolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Closed`] after shutdown, or
    /// [`EditorError::NotFound`] for an unknown id under
    /// [`UpdatePolicy::Strict`].
    pub fn update(&mut self, id: &EffectId, value: f64) -> Result<(), EditorError> {
        self.ensure_open()?;
        match self.config.update_policy {
            UpdatePolicy::Strict => self.pipeline.try_update(id, value),
            UpdatePolicy::Lenient => {
                if !self.pipeline.update(id, value) {
                    log::warn!("ignoring value change for unknown effect {id}");
                }
                Ok(())
            }
        }
    }

    /// Borrow the render inputs.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Closed`] after shutdown or
    /// [`EditorError::NoImage`] before the first successful load.
    pub fn renderer(&self) -> Result<Renderer<'_>, EditorError> {
        self.ensure_open()?;
        let source = self.source.as_ref().ok_or(EditorError::NoImage)?;
        Ok(Renderer::new(source, &self.pipeline))
    }

    /// The unedited preview image.
    ///
    /// # Errors
    ///
    /// Same as [`renderer`](Self::renderer).
    pub fn preview_base(&self) -> Result<&RgbaImage, EditorError> {
        Ok(self.renderer()?.preview_base())
    }

    /// The preview with every effect applied.
    ///
    /// # Errors
    ///
    /// Same as [`renderer`](Self::renderer).
    pub fn render_output(&self) -> Result<RgbaImage, EditorError> {
        Ok(self.renderer()?.render_output())
    }

    /// Encode `image` with the session's output settings.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Encode`] if the encoder fails.
    pub fn encode(&self, image: &RgbaImage) -> Result<EncodedImage, EditorError> {
        render::encode(image, self.config.output_format, self.config.jpeg_quality)
    }

    /// Render and encode the output, or `None` if no image is loaded.
    fn encoded_output(&self) -> Result<Option<EncodedImage>, EditorError> {
        match self.render_output() {
            Ok(output) => self.encode(&output).map(Some),
            Err(EditorError::NoImage) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Stop accepting events. Idempotent.
    pub fn shutdown(&mut self) {
        if !self.closed {
            log::info!("closing session with {} effect(s)", self.pipeline.len());
        }
        self.closed = true;
    }

    /// Apply one UI event and report what the UI should redraw.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying operation. The session stays
    /// usable afterwards unless it was already closed.
    pub fn dispatch(&mut self, event: Event) -> Result<Outcome, EditorError> {
        match event {
            Event::Upload(upload) => {
                self.ensure_open()?;
                let source = self.decode(&upload)?;
                let renderer = Renderer::new(&source, &self.pipeline);
                let preview = self.encode(renderer.preview_base())?;
                let output = self.encode(&renderer.render_output())?;
                let original = source.original_dimensions();
                // Commit only once both images have encoded.
                self.source = Some(source);
                Ok(Outcome::Loaded {
                    original,
                    preview,
                    output,
                })
            }
            Event::AddEffect { kind } => {
                let instance = self.append(&kind)?;
                Ok(Outcome::EffectAdded {
                    control: render_control_descriptor(&instance),
                    output: self.encoded_output()?,
                })
            }
            Event::SetValue { id, value } => {
                self.update(&id, value)?;
                Ok(Outcome::ValueChanged {
                    output: self.encoded_output()?,
                })
            }
            Event::Shutdown => {
                self.ensure_open()?;
                self.shutdown();
                Ok(Outcome::Closed)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use image::{ImageEncoder, Rgba};

    use super::*;
    use crate::catalog::EffectKind;

    fn png_upload(width: u32, height: u32) -> UploadSource {
        let img = RgbaImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgba([30, 30, 30, 255])
            } else {
                Rgba([220, 220, 220, 255])
            }
        });
        let mut bytes = Vec::new();
        image::codecs::png::PngEncoder::new(&mut bytes)
            .write_image(
                img.as_raw(),
                img.width(),
                img.height(),
                image::ExtendedColorType::Rgba8,
            )
            .unwrap();
        UploadSource::Bytes {
            bytes,
            mime_hint: Some("image/png".into()),
        }
    }

    fn session() -> Session {
        Session::new(SessionConfig::default()).unwrap()
    }

    #[test]
    fn new_session_is_empty() {
        let s = session();
        assert_eq!(s.state(), SessionState::Empty);
        assert!(matches!(s.render_output(), Err(EditorError::NoImage)));
        assert!(matches!(s.preview_base(), Err(EditorError::NoImage)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SessionConfig {
            preview_width: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            Session::new(config),
            Err(EditorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn upload_moves_to_loaded() {
        let mut s = session();
        let outcome = s.dispatch(Event::Upload(png_upload(100, 50))).unwrap();
        assert_eq!(s.state(), SessionState::Loaded);
        let Outcome::Loaded {
            original,
            preview,
            output,
        } = outcome
        else {
            panic!("expected Loaded, got {outcome:?}");
        };
        assert_eq!(
            original,
            Dimensions {
                width: 100,
                height: 50
            }
        );
        assert_eq!(
            preview.dimensions,
            Dimensions {
                width: 200,
                height: 100
            }
        );
        // Empty pipeline: output encodes the same pixels as the preview.
        assert_eq!(preview.bytes, output.bytes);
    }

    #[test]
    fn effects_can_be_added_before_upload() {
        let mut s = session();
        let outcome = s
            .dispatch(Event::AddEffect {
                kind: "brightness".into(),
            })
            .unwrap();
        let Outcome::EffectAdded { control, output } = outcome else {
            panic!("expected EffectAdded, got {outcome:?}");
        };
        assert_eq!(control.id.as_str(), "brightness-1");
        assert_eq!(control.value, 0.0);
        assert!(output.is_none());
        assert_eq!(s.state(), SessionState::Empty);
    }

    #[test]
    fn add_effect_after_upload_renders() {
        let mut s = session();
        s.dispatch(Event::Upload(png_upload(10, 10))).unwrap();
        let outcome = s
            .dispatch(Event::AddEffect {
                kind: "contrast".into(),
            })
            .unwrap();
        assert!(matches!(
            outcome,
            Outcome::EffectAdded {
                output: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn unknown_kind_keeps_pipeline() {
        let mut s = session();
        s.append("contrast").unwrap();
        let result = s.dispatch(Event::AddEffect {
            kind: "sepia".into(),
        });
        assert!(matches!(result, Err(EditorError::UnknownKind(_))));
        assert_eq!(s.pipeline().len(), 1);
    }

    #[test]
    fn set_value_changes_output() {
        let mut s = session();
        s.dispatch(Event::Upload(png_upload(20, 20))).unwrap();
        let instance = s.append("brightness").unwrap();
        let before = s.render_output().unwrap();

        s.dispatch(Event::SetValue {
            id: instance.id.clone(),
            value: 1.0,
        })
        .unwrap();
        let after = s.render_output().unwrap();
        assert_ne!(before, after);
        assert_eq!(
            after,
            EffectKind::Brightness.transform(s.preview_base().unwrap(), 1.0)
        );
    }

    #[test]
    fn lenient_update_ignores_unknown_id() {
        let mut s = session();
        let outcome = s
            .dispatch(Event::SetValue {
                id: EffectId::new("ghost-1"),
                value: 1.0,
            })
            .unwrap();
        assert_eq!(outcome, Outcome::ValueChanged { output: None });
    }

    #[test]
    fn strict_update_reports_unknown_id() {
        let config = SessionConfig {
            update_policy: UpdatePolicy::Strict,
            ..SessionConfig::default()
        };
        let mut s = Session::new(config).unwrap();
        let result = s.dispatch(Event::SetValue {
            id: EffectId::new("ghost-1"),
            value: 1.0,
        });
        assert!(matches!(result, Err(EditorError::NotFound(_))));
    }

    #[test]
    fn failed_upload_keeps_previous_image() {
        let mut s = session();
        s.dispatch(Event::Upload(png_upload(40, 20))).unwrap();
        let before = s.preview_base().unwrap().clone();

        let result = s.dispatch(Event::Upload(UploadSource::DataUrl(
            "data:text/plain;base64,aGVsbG8=".into(),
        )));
        assert!(matches!(result, Err(EditorError::UnsupportedFormat(_))));
        assert_eq!(s.state(), SessionState::Loaded);
        assert_eq!(s.preview_base().unwrap(), &before);
    }

    #[test]
    fn upload_that_fails_to_encode_keeps_previous_image() {
        let mut s = session();
        s.dispatch(Event::Upload(png_upload(40, 20))).unwrap();
        let before = s.preview_base().unwrap().clone();

        // 1x350 scales to a 200x70000 preview: within the pixel budget,
        // but taller than JPEG can encode.
        let result = s.dispatch(Event::Upload(png_upload(1, 350)));
        assert!(matches!(result, Err(EditorError::Encode(_))));
        assert_eq!(s.state(), SessionState::Loaded);
        assert_eq!(s.preview_base().unwrap(), &before);
    }

    #[test]
    fn upload_that_fails_to_encode_leaves_empty_session_empty() {
        let mut s = session();
        let result = s.dispatch(Event::Upload(png_upload(1, 350)));
        assert!(matches!(result, Err(EditorError::Encode(_))));
        assert_eq!(s.state(), SessionState::Empty);
    }

    #[test]
    fn oversized_preview_is_rejected_without_loading() {
        let mut s = session();
        let result = s.dispatch(Event::Upload(png_upload(1, 100_000)));
        assert!(matches!(
            result,
            Err(EditorError::InvalidDimensions { .. })
        ));
        assert_eq!(s.state(), SessionState::Empty);
    }

    #[test]
    fn new_upload_replaces_image_and_keeps_pipeline() {
        let mut s = session();
        s.dispatch(Event::Upload(png_upload(40, 20))).unwrap();
        s.append("contrast").unwrap();
        s.dispatch(Event::Upload(png_upload(10, 40))).unwrap();
        assert_eq!(
            s.source().unwrap().preview_dimensions(),
            Dimensions {
                width: 200,
                height: 800
            }
        );
        assert_eq!(s.pipeline().len(), 1);
    }

    #[test]
    fn shutdown_is_terminal() {
        let mut s = session();
        s.dispatch(Event::Upload(png_upload(8, 8))).unwrap();
        assert_eq!(s.dispatch(Event::Shutdown).unwrap(), Outcome::Closed);
        assert_eq!(s.state(), SessionState::Closed);

        assert!(matches!(
            s.dispatch(Event::AddEffect {
                kind: "contrast".into()
            }),
            Err(EditorError::Closed)
        ));
        assert!(matches!(
            s.dispatch(Event::Upload(png_upload(8, 8))),
            Err(EditorError::Closed)
        ));
        assert!(matches!(s.render_output(), Err(EditorError::Closed)));
        assert!(matches!(
            s.dispatch(Event::Shutdown),
            Err(EditorError::Closed)
        ));
    }

    #[test]
    fn controls_follow_pipeline_order() {
        let mut s = session();
        s.append("edge-detection").unwrap();
        s.append("brightness").unwrap();
        let labels: Vec<_> = s.controls().iter().map(|c| c.label).collect();
        assert_eq!(labels, ["Edge Detection", "Brightness"]);
    }
}
