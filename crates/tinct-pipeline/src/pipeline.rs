//! The ordered chain of effect instances applied to the preview image.
//!
//! ```rust
//! # use tinct_pipeline::{Pipeline, EditorError, RgbaImage};
//! # fn run(base: &RgbaImage) -> Result<(), EditorError> {
//! let mut pipeline = Pipeline::default();
//! let contrast = pipeline.append("contrast", 1.0)?;
//! pipeline.append("brightness", 0.5)?;
//! pipeline.update(&contrast.id, 0.4);
//!
//! let output = pipeline.apply(base);
//! # Ok(())
//! # }
//! ```
//!
//! Instances are append-only and keep insertion order. Every call to
//! [`Pipeline::apply`] replays the whole chain from the base image; no
//! intermediate stage is cached.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, EffectKind};
use crate::types::{EditorError, RgbaImage};

/// Stable identity of an effect instance.
///
/// Ids have the form `<kind-name>-<n>` where `n` counts appends within
/// one pipeline, starting at 1. An id is never reissued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectId(String);

impl EffectId {
    /// Wrap an id received from the UI.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One user-added, independently tunable effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectInstance {
    /// Identity assigned at creation.
    pub id: EffectId,
    /// The effect applied.
    pub kind: EffectKind,
    /// Current parameter, always within `kind.range()`.
    pub value: f64,
}

impl EffectInstance {
    /// Apply this instance to `image`.
    #[must_use = "returns the transformed image"]
    pub fn transform(&self, image: &RgbaImage) -> RgbaImage {
        self.kind.transform(image, self.value)
    }
}

/// Ordered, append-only sequence of effect instances.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    catalog: Catalog,
    effects: Vec<EffectInstance>,
    index: HashMap<EffectId, usize>,
    appended: u64,
}

impl Pipeline {
    /// An empty pipeline accepting the kinds registered in `catalog`.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            effects: Vec::new(),
            index: HashMap::new(),
            appended: 0,
        }
    }

    /// The catalog this pipeline draws kinds from.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Instances in application order.
    #[must_use]
    pub fn effects(&self) -> &[EffectInstance] {
        &self.effects
    }

    /// Number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Returns `true` if no effect has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Look up an instance by id.
    #[must_use]
    pub fn get(&self, id: &EffectId) -> Option<&EffectInstance> {
        self.index.get(id).map(|&i| &self.effects[i])
    }

    /// Append a new instance of the kind named `kind`.
    ///
    /// `initial_value` is clamped into the kind's range. Returns a copy of
    /// the created instance so the caller can bind a control to its id.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownKind`] if `kind` does not name a kind
    /// registered in the catalog. The pipeline is left unchanged.
    pub fn append(&mut self, kind: &str, initial_value: f64) -> Result<EffectInstance, EditorError> {
        let kind = self.catalog.resolve(kind)?;
        self.append_kind(kind, initial_value)
    }

    /// Append a new instance of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownKind`] if `kind` is not registered in
    /// the catalog. The pipeline is left unchanged.
    pub fn append_kind(
        &mut self,
        kind: EffectKind,
        initial_value: f64,
    ) -> Result<EffectInstance, EditorError> {
        if !self.catalog.contains(kind) {
            return Err(EditorError::UnknownKind(kind.name().to_owned()));
        }

        self.appended += 1;
        let instance = EffectInstance {
            id: EffectId(format!("{}-{}", kind.name(), self.appended)),
            kind,
            value: kind.clamp(initial_value),
        };
        self.index.insert(instance.id.clone(), self.effects.len());
        self.effects.push(instance.clone());
        log::debug!(
            "appended {} at position {} (value {})",
            instance.id,
            self.effects.len(),
            instance.value
        );
        Ok(instance)
    }

    /// Set the value of the instance with id `id`, clamped to its range.
    ///
    /// An unknown id is ignored. Returns whether an instance was found.
    pub fn update(&mut self, id: &EffectId, new_value: f64) -> bool {
        let Some(&i) = self.index.get(id) else {
            return false;
        };
        let effect = &mut self.effects[i];
        effect.value = effect.kind.clamp(new_value);
        true
    }

    /// Like [`update`](Self::update), but an unknown id is an error.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NotFound`] if no instance has id `id`.
    pub fn try_update(&mut self, id: &EffectId, new_value: f64) -> Result<(), EditorError> {
        if self.update(id, new_value) {
            Ok(())
        } else {
            Err(EditorError::NotFound(id.clone()))
        }
    }

    /// Run every instance over `base`, left to right.
    ///
    /// Each instance receives the previous instance's output. An empty
    /// pipeline returns a copy of `base`.
    #[must_use = "returns the rendered image"]
    pub fn apply(&self, base: &RgbaImage) -> RgbaImage {
        self.effects
            .iter()
            .fold(base.clone(), |image, effect| effect.transform(&image))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use image::Rgba;

    use super::*;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            let v = ((x * 255) / width.max(1)) as u8;
            #[allow(clippy::cast_possible_truncation)]
            let a = (255 - (y * 4).min(255)) as u8;
            Rgba([v, v / 2, 255 - v, a])
        })
    }

    #[test]
    fn empty_pipeline_is_identity() {
        let base = gradient(16, 9);
        let pipeline = Pipeline::default();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.apply(&base), base);
    }

    #[test]
    fn append_assigns_sequential_ids() {
        let mut pipeline = Pipeline::default();
        let a = pipeline.append("contrast", 0.0).unwrap();
        let b = pipeline.append("brightness", 0.0).unwrap();
        let c = pipeline.append("contrast", 0.0).unwrap();
        assert_eq!(a.id.as_str(), "contrast-1");
        assert_eq!(b.id.as_str(), "brightness-2");
        assert_eq!(c.id.as_str(), "contrast-3");
    }

    #[test]
    fn ids_are_unique() {
        let mut pipeline = Pipeline::default();
        let mut seen = HashSet::new();
        for i in 0..30 {
            let kind = EffectKind::ALL[i % EffectKind::ALL.len()];
            let instance = pipeline.append_kind(kind, 0.0).unwrap();
            assert!(seen.insert(instance.id), "duplicate id issued");
        }
        assert_eq!(pipeline.len(), 30);
    }

    #[test]
    fn append_clamps_initial_value() {
        let mut pipeline = Pipeline::default();
        let high = pipeline.append("brightness", 9.0).unwrap();
        let low = pipeline.append("brightness", -9.0).unwrap();
        assert_eq!(high.value, 2.0);
        assert_eq!(low.value, -2.0);
    }

    #[test]
    fn unknown_kind_leaves_pipeline_unchanged() {
        let mut pipeline = Pipeline::default();
        pipeline.append("contrast", 0.5).unwrap();
        let result = pipeline.append("sepia", 0.0);
        assert!(matches!(result, Err(EditorError::UnknownKind(_))));
        assert_eq!(pipeline.len(), 1);

        // The failed append does not consume an id.
        let next = pipeline.append("brightness", 0.0).unwrap();
        assert_eq!(next.id.as_str(), "brightness-2");
    }

    #[test]
    fn unregistered_kind_is_rejected() {
        let mut pipeline = Pipeline::new(Catalog::with_kinds([EffectKind::Brightness]));
        let result = pipeline.append_kind(EffectKind::EdgeDetection, 1.0);
        assert!(matches!(result, Err(EditorError::UnknownKind(_))));
        assert!(pipeline.is_empty());
    }

    #[test]
    fn update_replaces_and_clamps_value() {
        let mut pipeline = Pipeline::default();
        let instance = pipeline.append("contrast", 0.0).unwrap();

        assert!(pipeline.update(&instance.id, 1.5));
        assert_eq!(pipeline.get(&instance.id).unwrap().value, 1.5);

        assert!(pipeline.update(&instance.id, 40.0));
        assert_eq!(pipeline.get(&instance.id).unwrap().value, 2.0);
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let mut pipeline = Pipeline::default();
        pipeline.append("contrast", 0.3).unwrap();
        let before = pipeline.effects().to_vec();

        assert!(!pipeline.update(&EffectId::new("contrast-99"), 1.0));
        assert_eq!(pipeline.effects(), before.as_slice());
    }

    #[test]
    fn try_update_unknown_id_is_not_found() {
        let mut pipeline = Pipeline::default();
        let result = pipeline.try_update(&EffectId::new("nope"), 1.0);
        assert!(matches!(result, Err(EditorError::NotFound(ref id)) if id.as_str() == "nope"));
    }

    #[test]
    fn apply_runs_in_insertion_order() {
        let base = gradient(12, 12);
        let mut pipeline = Pipeline::default();
        pipeline.append("contrast", 1.0).unwrap();
        pipeline.append("brightness", 0.5).unwrap();

        let expected = EffectKind::Brightness
            .transform(&EffectKind::Contrast.transform(&base, 1.0), 0.5);
        let reversed = EffectKind::Contrast
            .transform(&EffectKind::Brightness.transform(&base, 0.5), 1.0);

        let output = pipeline.apply(&base);
        assert_eq!(output, expected);
        assert_ne!(output, reversed, "order should matter for this input");
    }

    #[test]
    fn apply_is_deterministic() {
        let base = gradient(20, 10);
        let mut pipeline = Pipeline::default();
        pipeline.append("edge-detection", 1.2).unwrap();
        pipeline.append("brightness", -0.3).unwrap();
        assert_eq!(pipeline.apply(&base), pipeline.apply(&base));
    }

    #[test]
    fn apply_reflects_updates() {
        let base = gradient(8, 8);
        let mut pipeline = Pipeline::default();
        let instance = pipeline.append("brightness", 0.0).unwrap();
        assert_eq!(pipeline.apply(&base), base);

        pipeline.update(&instance.id, 1.0);
        assert_eq!(
            pipeline.apply(&base),
            EffectKind::Brightness.transform(&base, 1.0)
        );
    }

    #[test]
    fn apply_does_not_mutate_base() {
        let base = gradient(6, 6);
        let copy = base.clone();
        let mut pipeline = Pipeline::default();
        pipeline.append("contrast", 2.0).unwrap();
        let _ = pipeline.apply(&base);
        assert_eq!(base, copy);
    }
}
