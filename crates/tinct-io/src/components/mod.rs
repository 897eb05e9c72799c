//! Dioxus UI components for tinct.
//!
//! Provides the file upload zone, the effect picker, the list of effect
//! sliders, and the side-by-side preview pane.

mod effect_controls;
mod effect_picker;
mod preview;
mod upload;

pub use effect_controls::EffectControls;
pub use effect_picker::EffectPicker;
pub use preview::PreviewPane;
pub use upload::{FileUpload, mime_hint_for};
