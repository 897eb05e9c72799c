//! tinct-io: Browser I/O and Dioxus component library.
//!
//! Handles file uploads, Blob URL creation for encoded previews, and
//! provides the UI components of the tinct editor: upload zone, effect
//! picker, per-effect sliders, and the before/after preview pane.
//!
//! Components only emit typed callbacks; translating them into
//! [`tinct_pipeline::Event`]s and dispatching them is the application's job.

pub mod components;
pub mod raster;

pub use components::{EffectControls, EffectPicker, FileUpload, PreviewPane};
pub use raster::{BlobUrl, RasterError};
