//! UI-agnostic description of the slider bound to an effect instance.

use serde::Serialize;

use crate::pipeline::{EffectId, EffectInstance};

/// What a UI needs to draw the control for one effect instance.
///
/// Markup is the UI layer's business; this only carries the data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlDescriptor {
    /// Id of the bound instance; value changes are addressed by it.
    pub id: EffectId,
    /// Display label.
    pub label: &'static str,
    /// Slider minimum.
    pub min: f64,
    /// Slider maximum.
    pub max: f64,
    /// Slider step.
    pub step: f64,
    /// Current value.
    pub value: f64,
}

/// Describe the control for `instance`.
#[must_use]
pub fn render_control_descriptor(instance: &EffectInstance) -> ControlDescriptor {
    let range = instance.kind.range();
    ControlDescriptor {
        id: instance.id.clone(),
        label: instance.kind.label(),
        min: range.min,
        max: range.max,
        step: instance.kind.step(),
        value: instance.value,
    }
}

impl From<&EffectInstance> for ControlDescriptor {
    fn from(instance: &EffectInstance) -> Self {
        render_control_descriptor(instance)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;

    #[test]
    fn descriptor_reflects_instance() {
        let mut pipeline = Pipeline::default();
        let instance = pipeline.append("edge-detection", 0.7).unwrap();
        let control = render_control_descriptor(&instance);
        assert_eq!(control.id, instance.id);
        assert_eq!(control.label, "Edge Detection");
        assert_eq!((control.min, control.max, control.step), (-2.0, 2.0, 0.1));
        assert_eq!(control.value, 0.7);
        assert!(instance.kind.range().contains(control.value));
    }

    #[test]
    fn descriptor_serializes_for_the_ui() {
        let mut pipeline = Pipeline::default();
        let instance = pipeline.append("brightness", 0.0).unwrap();
        let json = serde_json::to_value(ControlDescriptor::from(&instance)).unwrap();
        assert_eq!(json["id"], "brightness-1");
        assert_eq!(json["label"], "Brightness");
        assert_eq!(json["max"], 2.0);
    }
}
