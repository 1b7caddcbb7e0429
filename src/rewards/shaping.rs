//! Shaping Functions
//!
//! Pure numeric maps from a raw physical quantity to a bounded score.
//!
//! - [`tolerance`]: 1 inside `[lower, upper]`, decaying over a soft margin outside.
//! - [`linear`]: a tent centred on a target, reaching 0 at `target + span`.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{RewardError, RewardResult};

/// Score at the margin edge when none is given
pub const DEFAULT_MARGIN_VALUE: f64 = 0.1;

/// Falloff curve used outside the tolerance bounds
///
/// Every shape `f` is scaled so that `f(0) = 1` and `f(1) = margin_value`,
/// and decreases monotonically in the normalised distance `s`.
/// `Cosine`, `Linear` and `Quadratic` have finite support and read exactly 0
/// once past it; the others only approach 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sigmoid {
    /// `exp(-(s·k)² / 2)`
    #[default]
    Gaussian,
    /// `1 / cosh(s·k)`
    Hyperbolic,
    /// `1 / ((s·k)² + 1)`
    LongTail,
    /// `1 / (s·k + 1)`
    Reciprocal,
    /// `(1 + cos(π·s·k)) / 2` while `s·k < 1`
    Cosine,
    /// `1 - s·k` while `s·k < 1`
    Linear,
    /// `1 - (s·k)²` while `s·k < 1`
    Quadratic,
    /// `1 - tanh(s·k)²`
    TanhSquared,
}

impl Sigmoid {
    pub const ALL: [Sigmoid; 8] = [
        Sigmoid::Gaussian,
        Sigmoid::Hyperbolic,
        Sigmoid::LongTail,
        Sigmoid::Reciprocal,
        Sigmoid::Cosine,
        Sigmoid::Linear,
        Sigmoid::Quadratic,
        Sigmoid::TanhSquared,
    ];

    /// Evaluate the curve at normalised distance `s >= 0`.
    ///
    /// `value_at_1` must lie strictly inside (0, 1).
    pub fn eval(self, s: f64, value_at_1: f64) -> f64 {
        match self {
            Sigmoid::Gaussian => {
                let scale = (-2.0 * value_at_1.ln()).sqrt();
                (-0.5 * (s * scale).powi(2)).exp()
            }
            Sigmoid::Hyperbolic => {
                let scale = (1.0 / value_at_1).acosh();
                1.0 / (s * scale).cosh()
            }
            Sigmoid::LongTail => {
                let scale = (1.0 / value_at_1 - 1.0).sqrt();
                1.0 / ((s * scale).powi(2) + 1.0)
            }
            Sigmoid::Reciprocal => {
                let scale = 1.0 / value_at_1 - 1.0;
                1.0 / (s * scale + 1.0)
            }
            Sigmoid::Cosine => {
                let scale = (2.0 * value_at_1 - 1.0).acos() / PI;
                let scaled = s * scale;
                if scaled < 1.0 {
                    (1.0 + (PI * scaled).cos()) / 2.0
                } else {
                    0.0
                }
            }
            Sigmoid::Linear => {
                let scaled = s * (1.0 - value_at_1);
                if scaled < 1.0 {
                    1.0 - scaled
                } else {
                    0.0
                }
            }
            Sigmoid::Quadratic => {
                let scaled = s * (1.0 - value_at_1).sqrt();
                if scaled < 1.0 {
                    1.0 - scaled * scaled
                } else {
                    0.0
                }
            }
            Sigmoid::TanhSquared => {
                // 1 - tanh² = sech², so this is atanh(sqrt(1 - v)) without the cancellation
                let scale = (1.0 / value_at_1.sqrt()).acosh();
                1.0 - (s * scale).tanh().powi(2)
            }
        }
    }
}

/// Parameters of a [`tolerance`] evaluation
///
/// Defaults to a single-point bound at 0 with no margin, a margin value of
/// [`DEFAULT_MARGIN_VALUE`] and a Gaussian falloff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub bounds: (f64, f64),
    pub margin: f64,
    pub margin_value: f64,
    pub sigmoid: Sigmoid,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            bounds: (0.0, 0.0),
            margin: 0.0,
            margin_value: DEFAULT_MARGIN_VALUE,
            sigmoid: Sigmoid::Gaussian,
        }
    }
}

impl Tolerance {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            bounds: (lower, upper),
            ..Default::default()
        }
    }

    /// Bounds `[center - half_width, center + half_width]`
    pub fn around(center: f64, half_width: f64) -> Self {
        Self::new(center - half_width, center + half_width)
    }

    pub fn margin(mut self, margin: f64, margin_value: f64) -> Self {
        self.margin = margin;
        self.margin_value = margin_value;
        self
    }

    pub fn sigmoid(mut self, sigmoid: Sigmoid) -> Self {
        self.sigmoid = sigmoid;
        self
    }

    /// Check the parameters without evaluating anything
    pub fn validate(&self) -> RewardResult<()> {
        let (lower, upper) = self.bounds;
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(RewardError::invalid(
                "bounds",
                format!("lower bound {} must not exceed upper bound {}", lower, upper),
            ));
        }
        if self.margin.is_nan() || self.margin < 0.0 {
            return Err(RewardError::invalid(
                "margin",
                format!("must be non-negative, got {}", self.margin),
            ));
        }
        if !(self.margin_value > 0.0 && self.margin_value < 1.0) {
            return Err(RewardError::invalid(
                "margin_value",
                format!("must lie strictly inside (0, 1), got {}", self.margin_value),
            ));
        }
        Ok(())
    }

    pub fn evaluate(&self, x: f64) -> RewardResult<f64> {
        self.validate()?;

        let (lower, upper) = self.bounds;
        if lower <= x && x <= upper {
            return Ok(1.0);
        }
        if self.margin == 0.0 {
            return Ok(0.0);
        }

        let distance = if x < lower { lower - x } else { x - upper };
        Ok(self.sigmoid.eval(distance / self.margin, self.margin_value))
    }
}

/// Score `x` against `bounds`, with a soft falloff of width `margin`.
///
/// Returns exactly 1.0 inside the bounds. Outside, returns 0.0 when `margin`
/// is 0, otherwise `sigmoid` evaluated at the distance to the nearest bound
/// divided by `margin`, which equals `margin_value` one margin away.
///
/// # Errors
/// `InvalidArgument` when `lower > upper`, `margin < 0`, or `margin_value`
/// is outside (0, 1).
pub fn tolerance(
    x: f64,
    bounds: (f64, f64),
    margin: f64,
    margin_value: f64,
    sigmoid: Sigmoid,
) -> RewardResult<f64> {
    Tolerance {
        bounds,
        margin,
        margin_value,
        sigmoid,
    }
    .evaluate(x)
}

/// Tent score: 1 at `target`, falling linearly to 0 at `target + span`.
///
/// Only deviations in the direction of `span` score unless `symmetric` is
/// set, in which case deviations of either sign score the same.
/// A zero span scores 1 only at the target itself.
pub fn linear(x: f64, target: f64, span: f64, symmetric: bool) -> f64 {
    if span == 0.0 {
        return if x == target { 1.0 } else { 0.0 };
    }

    let fraction = (x - target) / span;
    if (0.0..=1.0).contains(&fraction) {
        return 1.0 - fraction;
    }

    if symmetric {
        let flipped = (x - target) / -span;
        if (0.0..=1.0).contains(&flipped) {
            return 1.0 - flipped;
        }
    }

    0.0
}
