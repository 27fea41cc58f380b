//! Value collection and the one-shot spacing lookup.
//!
//! The collector walks a subtree once and gathers every distinct value carried
//! by a scalable property. Each distinct value is scaled exactly once into a
//! [`ScaleLookup`], so equal values anywhere in the tree (a padding of 24 here,
//! a gap of 24 there) always land on the same new value.

use crate::scale::{scale, ScaleTable};
use crate::types::Node;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

/// A collected property value with total equality.
///
/// `-0.0` and `0.0` are the same value, and so are all NaNs.
#[derive(Debug, Clone, Copy)]
pub struct ScalableValue(f64);

impl ScalableValue {
    /// Wraps `value`, folding signed zeros and NaN payloads together.
    pub fn new(value: f64) -> Self {
        if value == 0.0 {
            Self(0.0)
        } else if value.is_nan() {
            Self(f64::NAN)
        } else {
            Self(value)
        }
    }

    /// The wrapped number.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl From<f64> for ScalableValue {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl PartialEq for ScalableValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScalableValue {}

impl PartialOrd for ScalableValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScalableValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for ScalableValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// Distinct scalable values found in `root` and all of its descendants.
pub fn collect_scalable_values(root: &Node) -> BTreeSet<ScalableValue> {
    let mut values = BTreeSet::new();
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        values.extend(
            node.scalable_values()
                .map(|(_, value)| ScalableValue::new(value)),
        );
        pending.extend(node.children());
    }
    values
}

/// Old value to new value, built before any node is touched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScaleLookup {
    entries: BTreeMap<ScalableValue, f64>,
}

impl ScaleLookup {
    /// Scales each distinct value once through `table`.
    pub fn build(values: impl IntoIterator<Item = ScalableValue>, table: &ScaleTable) -> Self {
        let entries = values
            .into_iter()
            .map(|value| (value, scale(value.get(), table)))
            .collect();
        Self { entries }
    }

    /// Collects `root`'s values and builds the lookup in one step.
    pub fn for_tree(root: &Node, table: &ScaleTable) -> Self {
        Self::build(collect_scalable_values(root), table)
    }

    /// Replacement for `value`, if it was collected.
    pub fn get(&self, value: f64) -> Option<f64> {
        self.entries.get(&ScalableValue::new(value)).copied()
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no values were collected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(old, new)` pairs in ascending order of the old value.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.entries.iter().map(|(old, new)| (old.get(), *new))
    }
}
