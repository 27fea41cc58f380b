//! Piecewise step scales.
//!
//! A [`ScaleTable`] is an ordered list of `(upper bound, ratio)` rules. A value is
//! handled by the first rule whose bound is at or above it, and the last rule
//! catches anything beyond every bound. Scaled values are counted in whole
//! 16px steps: `floor(value / 16) * ratio`. A rule without a ratio returns the
//! value unchanged.

use crate::constants::{
    FONT_CATCH_ALL, FONT_STEPS, PADDING_CATCH_ALL, PADDING_STEPS, PASS_THROUGH_BOUND, STEP_SIZE,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single `(upper bound, ratio)` rule of a scale table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleRule {
    /// Inclusive upper bound; `None` matches every value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_to: Option<f64>,
    /// Multiplier applied to the number of whole steps; `None` passes the value through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
}

impl ScaleRule {
    /// Rule that leaves values up to `up_to` untouched.
    pub const fn pass_through(up_to: f64) -> Self {
        Self {
            up_to: Some(up_to),
            ratio: None,
        }
    }

    /// Rule that scales values up to `up_to` by `ratio`.
    pub const fn step(up_to: f64, ratio: f64) -> Self {
        Self {
            up_to: Some(up_to),
            ratio: Some(ratio),
        }
    }

    /// Unbounded rule scaling by `ratio`.
    pub const fn catch_all(ratio: f64) -> Self {
        Self {
            up_to: None,
            ratio: Some(ratio),
        }
    }

    /// Whether `value` falls under this rule's bound.
    pub fn matches(&self, value: f64) -> bool {
        self.up_to.map_or(true, |bound| value <= bound)
    }

    /// Applies this rule's ratio to `value`.
    pub fn apply(&self, value: f64) -> f64 {
        match self.ratio {
            Some(ratio) => (value / STEP_SIZE).floor() * ratio,
            None => value,
        }
    }
}

/// Reasons a custom scale table is rejected.
#[derive(Debug, Error, PartialEq)]
pub enum ScaleTableError {
    /// A bound was NaN or infinite.
    #[error("rule {index}: bound {bound} is not finite")]
    NonFiniteBound {
        /// Position of the offending rule
        index: usize,
        /// The rejected bound
        bound: f64,
    },
    /// Bounds must strictly increase from one rule to the next.
    #[error("rule {index}: bound {bound} does not exceed previous bound {previous}")]
    UnorderedBound {
        /// Position of the offending rule
        index: usize,
        /// The rejected bound
        bound: f64,
        /// Bound of the closest earlier bounded rule
        previous: f64,
    },
    /// An unbounded rule would shadow every rule after it.
    #[error("rule {index}: an unbounded rule must be the last one")]
    CatchAllNotLast {
        /// Position of the offending rule
        index: usize,
    },
    /// A ratio was NaN or infinite.
    #[error("rule {index}: ratio {ratio} is not finite")]
    NonFiniteRatio {
        /// Position of the offending rule
        index: usize,
        /// The rejected ratio
        ratio: f64,
    },
}

/// Ordered rules consulted by [`scale`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ScaleRule>", into = "Vec<ScaleRule>")]
pub struct ScaleTable {
    rules: Vec<ScaleRule>,
}

impl ScaleTable {
    /// Builds a table after checking the rules are in ascending bound order.
    pub fn new(rules: Vec<ScaleRule>) -> Result<Self, ScaleTableError> {
        let mut previous: Option<f64> = None;
        for (index, rule) in rules.iter().enumerate() {
            if let Some(ratio) = rule.ratio {
                if !ratio.is_finite() {
                    return Err(ScaleTableError::NonFiniteRatio { index, ratio });
                }
            }
            match rule.up_to {
                Some(bound) if !bound.is_finite() => {
                    return Err(ScaleTableError::NonFiniteBound { index, bound });
                }
                Some(bound) => {
                    if let Some(previous) = previous {
                        if bound <= previous {
                            return Err(ScaleTableError::UnorderedBound {
                                index,
                                bound,
                                previous,
                            });
                        }
                    }
                    previous = Some(bound);
                }
                None if index + 1 != rules.len() => {
                    return Err(ScaleTableError::CatchAllNotLast { index });
                }
                None => {}
            }
        }
        Ok(Self { rules })
    }

    /// Table for padding, item spacing and grid values.
    pub fn padding() -> Self {
        Self::from_steps(PADDING_STEPS, PADDING_CATCH_ALL)
    }

    /// Table shared by font sizes and line heights.
    pub fn font() -> Self {
        Self::from_steps(FONT_STEPS, FONT_CATCH_ALL)
    }

    fn from_steps(steps: &[(f64, f64)], catch_all: f64) -> Self {
        let mut rules = Vec::with_capacity(steps.len() + 2);
        rules.push(ScaleRule::pass_through(PASS_THROUGH_BOUND));
        rules.extend(steps.iter().map(|&(bound, ratio)| ScaleRule::step(bound, ratio)));
        rules.push(ScaleRule::catch_all(catch_all));
        Self { rules }
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &[ScaleRule] {
        &self.rules
    }

    /// Picks the rule for `value`: the first matching bound, else the last rule.
    pub fn rule_for(&self, value: f64) -> Option<&ScaleRule> {
        self.rules
            .iter()
            .find(|rule| rule.matches(value))
            .or_else(|| self.rules.last())
    }
}

impl TryFrom<Vec<ScaleRule>> for ScaleTable {
    type Error = ScaleTableError;

    fn try_from(rules: Vec<ScaleRule>) -> Result<Self, Self::Error> {
        Self::new(rules)
    }
}

impl From<ScaleTable> for Vec<ScaleRule> {
    fn from(table: ScaleTable) -> Self {
        table.rules
    }
}

/// Maps `value` through `table`. Total over all inputs; an empty table is the identity.
pub fn scale(value: f64, table: &ScaleTable) -> f64 {
    match table.rule_for(value) {
        Some(rule) => rule.apply(value),
        None => value,
    }
}
