//! The catalog of effect kinds a session may use.
//!
//! [`EffectKind`] enumerates every transform tinct knows about, with its
//! fixed parameter range. [`Catalog`] is the ordered subset offered to the
//! user; appending a kind that is not registered fails with
//! [`EditorError::UnknownKind`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::effect;
use crate::types::{EditorError, RgbaImage};

/// Closed range of valid parameter values for an effect kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    /// Smallest valid value.
    pub min: f64,
    /// Largest valid value.
    pub max: f64,
}

impl ParamRange {
    /// Clamp `value` into the range.
    ///
    /// NaN maps to `fallback` (itself clamped); infinities clamp to the
    /// nearest bound.
    #[must_use]
    pub fn clamp(self, value: f64, fallback: f64) -> f64 {
        let value = if value.is_nan() { fallback } else { value };
        value.clamp(self.min, self.max)
    }

    /// Whether `value` lies within the range.
    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// A kind of pixel effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectKind {
    /// Uniform lightening or darkening.
    Brightness,
    /// Contrast stretch around mid-gray.
    Contrast,
    /// Canny edge map; the value is the pre-blur radius.
    EdgeDetection,
}

impl EffectKind {
    /// Every kind, in default catalog order.
    pub const ALL: [Self; 3] = [Self::Contrast, Self::Brightness, Self::EdgeDetection];

    /// Machine name, as used in events, ids, and serialized data.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::EdgeDetection => "edge-detection",
        }
    }

    /// Human-readable label for controls.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Brightness => "Brightness",
            Self::Contrast => "Contrast",
            Self::EdgeDetection => "Edge Detection",
        }
    }

    /// Valid parameter range.
    #[must_use]
    pub const fn range(self) -> ParamRange {
        match self {
            Self::Brightness | Self::Contrast | Self::EdgeDetection => {
                ParamRange { min: -2.0, max: 2.0 }
            }
        }
    }

    /// Slider step.
    #[must_use]
    #[allow(clippy::unused_self)] // shared by every kind today
    pub const fn step(self) -> f64 {
        0.1
    }

    /// Neutral value a freshly added effect starts at.
    #[must_use]
    #[allow(clippy::unused_self)] // shared by every kind today
    pub const fn default_value(self) -> f64 {
        0.0
    }

    /// Clamp `value` into this kind's range.
    #[must_use]
    pub fn clamp(self, value: f64) -> f64 {
        self.range().clamp(value, self.default_value())
    }

    /// Apply this effect to `image` with parameter `value`.
    ///
    /// `value` is expected to be already clamped to [`range`](Self::range).
    #[must_use = "returns the transformed image"]
    pub fn transform(self, image: &RgbaImage, value: f64) -> RgbaImage {
        match self {
            Self::Brightness => effect::brightness(image, value),
            Self::Contrast => effect::contrast(image, value),
            Self::EdgeDetection => effect::edge_detection(image, value),
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| EditorError::UnknownKind(s.to_owned()))
    }
}

/// Everything the UI needs to know about an effect kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectDescriptor {
    /// The described kind.
    pub kind: EffectKind,
    /// Machine name.
    pub name: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Smallest valid value.
    pub min: f64,
    /// Largest valid value.
    pub max: f64,
    /// Slider step.
    pub step: f64,
    /// Initial value for new instances.
    pub default: f64,
}

impl From<EffectKind> for EffectDescriptor {
    fn from(kind: EffectKind) -> Self {
        let range = kind.range();
        Self {
            kind,
            name: kind.name(),
            label: kind.label(),
            min: range.min,
            max: range.max,
            step: kind.step(),
            default: kind.default_value(),
        }
    }
}

/// Ordered set of effect kinds available to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    kinds: Vec<EffectKind>,
}

impl Catalog {
    /// A catalog offering exactly `kinds`, in the given order.
    ///
    /// Duplicates are dropped, keeping the first occurrence.
    #[must_use]
    pub fn with_kinds(kinds: impl IntoIterator<Item = EffectKind>) -> Self {
        let mut unique = Vec::new();
        for kind in kinds {
            if !unique.contains(&kind) {
                unique.push(kind);
            }
        }
        Self { kinds: unique }
    }

    /// The registered kinds, in display order. Same result every call.
    #[must_use]
    pub fn list_available(&self) -> &[EffectKind] {
        &self.kinds
    }

    /// Whether `kind` is registered.
    #[must_use]
    pub fn contains(&self, kind: EffectKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Describe a registered kind.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownKind`] if `kind` is not registered.
    pub fn describe(&self, kind: EffectKind) -> Result<EffectDescriptor, EditorError> {
        if self.contains(kind) {
            Ok(EffectDescriptor::from(kind))
        } else {
            Err(EditorError::UnknownKind(kind.name().to_owned()))
        }
    }

    /// Parse a kind name and check that it is registered.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownKind`] if `name` is not a known kind
    /// or the kind is not registered.
    pub fn resolve(&self, name: &str) -> Result<EffectKind, EditorError> {
        let kind = EffectKind::from_str(name)?;
        if self.contains(kind) {
            Ok(kind)
        } else {
            Err(EditorError::UnknownKind(name.to_owned()))
        }
    }

    /// Descriptors for every registered kind, in display order.
    pub fn descriptors(&self) -> impl Iterator<Item = EffectDescriptor> + '_ {
        self.kinds.iter().copied().map(EffectDescriptor::from)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::with_kinds(EffectKind::ALL)
    }
}
