//! The sixteen adjustment values of a session.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::adjustments::{AdjustmentKind, Transform, ADJUSTMENT_COUNT};
use crate::error::EditError;

/// Current and default value of one adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentSpec {
    pub kind: AdjustmentKind,
    pub default: f32,
    pub current: f32,
}

impl AdjustmentSpec {
    /// Spec sitting at the kind's neutral value.
    pub fn new(kind: AdjustmentKind) -> Self {
        let default = kind.default_value();
        Self {
            kind,
            default,
            current: default,
        }
    }

    pub fn key(&self) -> &'static str {
        self.kind.key()
    }

    /// The transform this spec applies.
    pub fn transform(&self) -> Transform {
        self.kind.entry().transform
    }

    /// Whether the value differs from the default and must be applied.
    ///
    /// Any non-default value counts, including NaN.
    pub fn is_dirty(&self) -> bool {
        self.current != self.default
    }
}

/// Every adjustment, always all sixteen, stored in application order.
///
/// Serializes as a `key → current value` map.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentSet {
    specs: [AdjustmentSpec; ADJUSTMENT_COUNT],
}

impl Default for AdjustmentSet {
    fn default() -> Self {
        Self {
            specs: AdjustmentKind::ORDER.map(AdjustmentSpec::new),
        }
    }
}

impl AdjustmentSet {
    /// All adjustments at their defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: AdjustmentKind) -> &AdjustmentSpec {
        &self.specs[kind.index()]
    }

    /// Current value of `kind`.
    pub fn value(&self, kind: AdjustmentKind) -> f32 {
        self.get(kind).current
    }

    /// Set the current value of `kind`.
    pub fn set(&mut self, kind: AdjustmentKind, value: f32) {
        self.specs[kind.index()].current = value;
    }

    /// Set by key; unknown keys are rejected.
    pub fn set_named(&mut self, key: &str, value: f32) -> Result<AdjustmentKind, EditError> {
        let kind = key.parse::<AdjustmentKind>()?;
        self.set(kind, value);
        Ok(kind)
    }

    /// Put every adjustment back to its default.
    pub fn reset(&mut self) {
        for spec in &mut self.specs {
            spec.current = spec.default;
        }
    }

    /// Whether no adjustment is dirty.
    pub fn is_default(&self) -> bool {
        self.specs.iter().all(|spec| !spec.is_dirty())
    }

    /// All specs in application order.
    pub fn iter(&self) -> impl Iterator<Item = &AdjustmentSpec> {
        self.specs.iter()
    }

    /// Specs that differ from their defaults, in application order.
    pub fn dirty(&self) -> impl Iterator<Item = &AdjustmentSpec> {
        self.specs.iter().filter(|spec| spec.is_dirty())
    }
}

impl Serialize for AdjustmentSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.specs.iter().map(|spec| (spec.key(), spec.current)))
    }
}

impl<'de> Deserialize<'de> for AdjustmentSet {
    /// Missing keys keep their defaults; unknown keys are an error.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = BTreeMap::<String, f32>::deserialize(deserializer)?;
        let mut set = AdjustmentSet::default();
        for (key, value) in values {
            set.set_named(&key, value).map_err(de::Error::custom)?;
        }
        Ok(set)
    }
}

impl fmt::Display for AdjustmentSet {
    /// Dirty adjustments as `key=value` pairs, or `defaults`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            return f.write_str("defaults");
        }
        let mut first = true;
        for spec in self.dirty() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", spec.key(), spec.current)?;
            first = false;
        }
        Ok(())
    }
}
