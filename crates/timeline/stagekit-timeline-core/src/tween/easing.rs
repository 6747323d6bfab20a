//! Easing: scalar ease amounts and custom cubic-Bézier ease curves.
//!
//! Both map normalized time t in [0,1] to eased progress. The scalar amount
//! blends quadratically toward ease-in (negative) or ease-out (positive);
//! a custom curve is a piecewise cubic Bézier whose x axis is time, solved
//! for `x == t` by bisection since the curve is not parametrized by x.

use serde::{Deserialize, Serialize};

use crate::error::StageError;

/// Quadratic ease blend for the scalar amount in [-100, 100].
/// amount = 0 is linear; 100 is full ease-out; -100 full ease-in.
pub fn ease_amount(t: f64, amount: i32) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let s = f64::from(amount.clamp(-100, 100)) / 100.0;
    if s > 0.0 {
        let out = 1.0 - (1.0 - t) * (1.0 - t);
        t + (out - t) * s
    } else if s < 0.0 {
        let inn = t * t;
        t + (inn - t) * (-s)
    } else {
        t
    }
}

/// One ease-curve control point; `x` is normalized time, `y` eased progress.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

impl CurvePoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Custom ease curve, validated at construction.
///
/// Point layout: 2 points form a single linear segment; `3n + 1` points form
/// `n` cubic segments with anchors at indices 0, 3, 6, … . `x` must be
/// strictly increasing and stay in [0, 1].
///
/// Evaluation pins the endpoints: below the first anchor the mapping ramps
/// linearly from (0,0), above the last it ramps to (1,1), so `progress(0)`
/// is 0 and `progress(1)` is 1 for every valid curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EaseCurve {
    points: Vec<CurvePoint>,
}

impl EaseCurve {
    pub fn new(points: Vec<CurvePoint>) -> Result<Self, StageError> {
        if points.len() < 2 {
            return Err(StageError::MalformedEaseCurve {
                reason: format!("needs at least 2 control points, got {}", points.len()),
            });
        }
        if points.len() != 2 && (points.len() - 1) % 3 != 0 {
            return Err(StageError::MalformedEaseCurve {
                reason: format!(
                    "control point count must be 2 or 3n+1, got {}",
                    points.len()
                ),
            });
        }
        let mut last_x = f64::NEG_INFINITY;
        for p in &points {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(StageError::MalformedEaseCurve {
                    reason: "control point coordinates must be finite".into(),
                });
            }
            if !(0.0..=1.0).contains(&p.x) {
                return Err(StageError::MalformedEaseCurve {
                    reason: format!("control point x {} is outside [0, 1]", p.x),
                });
            }
            if p.x <= last_x {
                return Err(StageError::MalformedEaseCurve {
                    reason: format!("control point x must be strictly increasing at {}", p.x),
                });
            }
            last_x = p.x;
        }
        Ok(Self { points })
    }

    /// Linear time curve: identity mapping.
    pub fn linear() -> Self {
        Self {
            points: vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(1.0, 1.0)],
        }
    }

    #[inline]
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Eased progress at normalized time `t`.
    pub fn progress(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        let first = self.points[0];
        let last = *self.points.last().expect("validated non-empty");
        if t < first.x {
            // Linear ramp from the pinned origin.
            return first.y * (t / first.x);
        }
        if t > last.x {
            // Linear ramp to the pinned (1,1) endpoint.
            let span = 1.0 - last.x;
            return last.y + (1.0 - last.y) * ((t - last.x) / span);
        }

        if self.points.len() == 2 {
            let span = last.x - first.x;
            let lt = (t - first.x) / span;
            return first.y + (last.y - first.y) * lt;
        }

        // Locate the cubic segment whose anchors bracket t.
        let segments = (self.points.len() - 1) / 3;
        for s in 0..segments {
            let p0 = self.points[3 * s];
            let p1 = self.points[3 * s + 1];
            let p2 = self.points[3 * s + 2];
            let p3 = self.points[3 * s + 3];
            if t <= p3.x {
                let u = solve_bezier_x(p0.x, p1.x, p2.x, p3.x, t);
                return cubic_bezier(p0.y, p1.y, p2.y, p3.y, u);
            }
        }
        last.y
    }
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Invert the x polynomial via bisection; x is monotonic because control
/// point xs are strictly increasing.
#[inline]
fn solve_bezier_x(x0: f64, x1: f64, x2: f64, x3: f64, target: f64) -> f64 {
    let mut lo = 0.0f64;
    let mut hi = 1.0f64;
    let mut mid = ((target - x0) / (x3 - x0)).clamp(0.0, 1.0);
    for _ in 0..32 {
        let x = cubic_bezier(x0, x1, x2, x3, mid);
        if (x - target).abs() < 1e-9 {
            break;
        }
        if x < target {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    mid
}
