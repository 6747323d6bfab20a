//! Time-indexed amplitude envelopes for frame-attached sounds.

use serde::{Deserialize, Serialize};

use crate::error::StageError;

/// Upper bound for channel amplitude levels.
pub const MAX_LEVEL: u16 = 32768;

/// One envelope sample: amplitude of both channels at a time mark.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvelopePoint {
    /// Time mark in sound samples; strictly increasing within an envelope.
    pub mark: u32,
    pub left: u16,
    pub right: u16,
}

/// Audible excerpt of the underlying sound, `start < end`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeLimits {
    pub start: u32,
    pub end: u32,
}

/// Ordered amplitude envelope with excerpt limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SoundEnvelope {
    points: Vec<EnvelopePoint>,
    pub limits: EnvelopeLimits,
}

impl SoundEnvelope {
    /// Validating constructor; fails with `InvalidEnvelope` for empty point
    /// lists, non-increasing marks, out-of-bound levels, or inverted limits.
    pub fn new(points: Vec<EnvelopePoint>, limits: EnvelopeLimits) -> Result<Self, StageError> {
        if points.is_empty() {
            return Err(StageError::InvalidEnvelope {
                reason: "envelope has no points".into(),
            });
        }
        let mut last: Option<u32> = None;
        for p in &points {
            if let Some(prev) = last {
                if p.mark <= prev {
                    return Err(StageError::InvalidEnvelope {
                        reason: format!("marks must be strictly increasing ({prev} then {})", p.mark),
                    });
                }
            }
            if p.left > MAX_LEVEL || p.right > MAX_LEVEL {
                return Err(StageError::InvalidEnvelope {
                    reason: format!("level above {MAX_LEVEL} at mark {}", p.mark),
                });
            }
            last = Some(p.mark);
        }
        if limits.start >= limits.end {
            return Err(StageError::InvalidEnvelope {
                reason: format!("limits start {} must be before end {}", limits.start, limits.end),
            });
        }
        Ok(Self { points, limits })
    }

    #[inline]
    pub fn points(&self) -> &[EnvelopePoint] {
        &self.points
    }

    /// Amplitude of both channels at `mark`: linear interpolation between
    /// the bracketing samples, clamped (not extrapolated) outside the
    /// sampled range. Exact marks return that sample's levels exactly.
    pub fn amplitude_at(&self, mark: u32) -> (f64, f64) {
        let first = &self.points[0];
        if mark <= first.mark {
            return (f64::from(first.left), f64::from(first.right));
        }
        let last = self.points.last().expect("validated non-empty");
        if mark >= last.mark {
            return (f64::from(last.left), f64::from(last.right));
        }
        // Bracketing pair exists since first.mark < mark < last.mark.
        let idx = self
            .points
            .partition_point(|p| p.mark <= mark);
        let lo = &self.points[idx - 1];
        let hi = &self.points[idx];
        if lo.mark == mark {
            return (f64::from(lo.left), f64::from(lo.right));
        }
        let t = f64::from(mark - lo.mark) / f64::from(hi.mark - lo.mark);
        (
            f64::from(lo.left) + (f64::from(hi.left) - f64::from(lo.left)) * t,
            f64::from(lo.right) + (f64::from(hi.right) - f64::from(lo.right)) * t,
        )
    }
}

/// A sound attached to a frame: library item, loop data and envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSound {
    /// Library item name of the sound.
    pub item: String,
    pub loop_count: u32,
    pub envelope: SoundEnvelope,
}
