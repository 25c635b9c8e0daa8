//! Monotone Easing Curves
//!
//! Shape-preserving cubic curves used to turn a raw progress ratio into a
//! perceptually shaped ratio.
//!
//! # Construction
//!
//! A curve is described by two breakpoints `a < b` inside the domain
//! `[0, s]` and a slope for each of the three segments. Accumulating the
//! slopes gives four control points:
//!
//! ```text
//! y0 = 0
//! y1 = y0 + k1 * a
//! y2 = y1 + k2 * (b - a)
//! y3 = y2 + k3 * (s - b)
//! ```
//!
//! A piecewise cubic Hermite interpolant (PCHIP) is fitted through
//! `(0, y0), (a, y1), (b, y2), (s, y3)`. Knot derivatives are chosen so the
//! curve never overshoots the control values and stays monotone wherever the
//! data is monotone.

use serde::{Deserialize, Serialize};

use super::error::{AssistError, Result};

const KNOTS: usize = 4;
const SEGMENTS: usize = KNOTS - 1;

/// Serializable description of an easing curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveConfig {
    /// First breakpoint
    pub a: f64,

    /// Second breakpoint
    pub b: f64,

    /// Slope of `[0, a]`
    pub k1: f64,

    /// Slope of `[a, b]`
    pub k2: f64,

    /// Slope of `[b, s]`
    pub k3: f64,

    /// Domain end
    pub s: f64,

    /// Evaluate at `s - x` instead of `x`
    #[serde(default)]
    pub reversed: bool,

    /// Curve input reached when the driving value hits its limit.
    /// The controller maps `value / limit` linearly onto `[0, input_scale]`.
    #[serde(default = "default_input_scale")]
    pub input_scale: f64,
}

fn default_input_scale() -> f64 {
    500.0
}

impl CurveConfig {
    /// Distance-since-retarget curve
    pub fn distance() -> Self {
        Self {
            a: 175.0,
            b: 250.0,
            k1: 0.5,
            k2: 5.0,
            k3: 0.5,
            s: 500.0,
            reversed: false,
            input_scale: default_input_scale(),
        }
    }

    /// Debt-age curve
    pub fn time() -> Self {
        Self {
            a: 350.0,
            b: 500.0,
            k1: 0.35,
            k2: 2.0,
            k3: 0.1,
            s: 600.0,
            reversed: false,
            input_scale: default_input_scale(),
        }
    }

    /// Target speed curve (reversed: fast targets repay slowly)
    pub fn speed() -> Self {
        Self {
            a: 150.0,
            b: 350.0,
            k1: 1.0,
            k2: 3.0,
            k3: 1.0,
            s: 500.0,
            reversed: true,
            input_scale: default_input_scale(),
        }
    }

    /// Fit the curve described by this configuration
    pub fn build(&self) -> Result<EasingCurve> {
        EasingCurve::new(self.a, self.b, self.k1, self.k2, self.k3, self.s, self.reversed)
    }
}

/// Immutable monotone cubic easing curve
#[derive(Debug, Clone)]
pub struct EasingCurve {
    reversed: bool,
    xs: [f64; KNOTS],
    ys: [f64; KNOTS],
    derivatives: [f64; KNOTS],
    /// Unreversed value at `s`, the ratio denominator
    peak: f64,
}

impl EasingCurve {
    /// Build a curve from breakpoints `0 < a < b < s` and segment slopes
    pub fn new(a: f64, b: f64, k1: f64, k2: f64, k3: f64, s: f64, reversed: bool) -> Result<Self> {
        let ordered = [a, b, s].iter().all(|v| v.is_finite()) && 0.0 < a && a < b && b < s;
        if !ordered {
            return Err(AssistError::InvalidBreakpoints { a, b, s });
        }
        if let Some(&k) = [k1, k2, k3].iter().find(|k| !k.is_finite()) {
            return Err(AssistError::InvalidSlope(k));
        }

        let y1 = k1 * a;
        let y2 = y1 + k2 * (b - a);
        let y3 = y2 + k3 * (s - b);

        let xs = [0.0, a, b, s];
        let ys = [0.0, y1, y2, y3];
        let derivatives = pchip_derivatives(&xs, &ys);

        let mut curve = Self {
            reversed,
            xs,
            ys,
            derivatives,
            peak: 0.0,
        };
        curve.peak = curve.interpolate(s);
        Ok(curve)
    }

    /// Domain end `s`
    pub fn domain_end(&self) -> f64 {
        self.xs[SEGMENTS]
    }

    /// Whether the curve is evaluated mirrored
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Control values `[y0, y1, y2, y3]`
    pub fn control_values(&self) -> [f64; KNOTS] {
        self.ys
    }

    /// Evaluate the curve at `x`
    ///
    /// `x` is not clamped; values outside `[0, s]` extrapolate with the end
    /// cubic pieces.
    pub fn evaluate(&self, x: f64) -> f64 {
        if self.reversed {
            self.interpolate(self.domain_end() - x)
        } else {
            self.interpolate(x)
        }
    }

    /// Evaluate the curve normalized by its unreversed value at `s`
    ///
    /// Lies in `[0, 1]` on `[0, s]` for non-negative slopes. A curve whose
    /// peak is zero yields zero.
    pub fn evaluate_as_ratio(&self, x: f64) -> f64 {
        if self.peak == 0.0 {
            return 0.0;
        }
        self.evaluate(x) / self.peak
    }

    fn interpolate(&self, x: f64) -> f64 {
        let i = if x <= self.xs[1] {
            0
        } else if x <= self.xs[2] {
            1
        } else {
            2
        };

        let h = self.xs[i + 1] - self.xs[i];
        let t = (x - self.xs[i]) / h;
        let t2 = t * t;
        let t3 = t2 * t;

        // Hermite basis, with h00 folded in as 1 - h01 so flat segments stay exact
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h10 = t3 - 2.0 * t2 + t;
        let h11 = t3 - t2;

        self.ys[i]
            + (self.ys[i + 1] - self.ys[i]) * h01
            + h * (self.derivatives[i] * h10 + self.derivatives[i + 1] * h11)
    }
}

fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

fn pchip_derivatives(xs: &[f64; KNOTS], ys: &[f64; KNOTS]) -> [f64; KNOTS] {
    let mut h = [0.0; SEGMENTS];
    let mut m = [0.0; SEGMENTS];
    for i in 0..SEGMENTS {
        h[i] = xs[i + 1] - xs[i];
        m[i] = (ys[i + 1] - ys[i]) / h[i];
    }

    let mut d = [0.0; KNOTS];
    for k in 1..SEGMENTS {
        let (m0, m1) = (m[k - 1], m[k]);
        if m0 == 0.0 || m1 == 0.0 || sign(m0) != sign(m1) {
            d[k] = 0.0;
        } else {
            // Weighted harmonic mean of the adjacent secants
            let w1 = 2.0 * h[k] + h[k - 1];
            let w2 = h[k] + 2.0 * h[k - 1];
            d[k] = (w1 + w2) / (w1 / m0 + w2 / m1);
        }
    }

    d[0] = edge_derivative(h[0], h[1], m[0], m[1]);
    d[SEGMENTS] = edge_derivative(
        h[SEGMENTS - 1],
        h[SEGMENTS - 2],
        m[SEGMENTS - 1],
        m[SEGMENTS - 2],
    );
    d
}

/// One-sided three-point estimate, limited to keep the end piece monotone
fn edge_derivative(h0: f64, h1: f64, m0: f64, m1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if sign(d) != sign(m0) {
        0.0
    } else if sign(m0) != sign(m1) && d.abs() > 3.0 * m0.abs() {
        3.0 * m0
    } else {
        d
    }
}
