//! Tween descriptors and keyframe-span evaluation.
//!
//! A keyframe's elements are authoritative; everything between two
//! keyframes is computed here: locate the enclosing span, normalize time,
//! ease it per property group, then blend transforms (classic/motion) or
//! morph vertices (shape).

pub mod easing;
pub mod morph;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use stagekit_api_core::{Matrix2D, Transform2D};

use crate::element::{Element, ElementId, ElementKind, ShapePath};
use crate::error::StageError;
use crate::frame::Frame;
use crate::layer::Layer;
use easing::{ease_amount, EaseCurve};

/// Interpolation mode of a keyframe span.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TweenType {
    /// No interpolation; content holds until the next keyframe.
    #[default]
    None,
    /// Classic transform tween (the legacy "motion" tween).
    Classic,
    /// Motion-object tween; same transform interpolation, distinct authoring
    /// model downstream.
    Motion,
    /// Vertex-level shape morph.
    Shape,
}

/// Property group a custom ease curve applies to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyGroup {
    Position,
    Rotation,
    Scale,
    Color,
    Filters,
    All,
}

/// How rotation travels from the start angle to the end angle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationPolicy {
    /// Plain linear interpolation of the raw angle values.
    None,
    /// Travel the shorter way around.
    #[default]
    Auto,
    /// Force clockwise, adding `repeat` extra full turns.
    Clockwise { repeat: u32 },
    /// Force counter-clockwise, adding `repeat` extra full turns.
    CounterClockwise { repeat: u32 },
}

/// Vertex correspondence mode for shape tweens.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeBlend {
    #[default]
    Distributive,
    Angular,
}

/// Interpolation descriptor attached to a keyframe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub tween_type: TweenType,
    /// Scalar ease in [-100, 100]; ignored for groups with a custom curve.
    ease_amount: i32,
    custom_eases: HashMap<PropertyGroup, EaseCurve>,
    pub rotation: RotationPolicy,
    pub orient_to_path: bool,
    pub snap_to_guide: bool,
    pub shape_blend: ShapeBlend,
}

impl Tween {
    pub fn new(tween_type: TweenType) -> Self {
        Self {
            tween_type,
            ease_amount: 0,
            custom_eases: HashMap::new(),
            rotation: RotationPolicy::default(),
            orient_to_path: false,
            snap_to_guide: false,
            shape_blend: ShapeBlend::default(),
        }
    }

    #[inline]
    pub fn ease_amount(&self) -> i32 {
        self.ease_amount
    }

    /// Set the scalar ease amount; values outside [-100, 100] are clamped.
    pub fn set_ease_amount(&mut self, amount: i32) {
        self.ease_amount = amount.clamp(-100, 100);
    }

    pub fn set_custom_ease(&mut self, group: PropertyGroup, curve: EaseCurve) {
        self.custom_eases.insert(group, curve);
    }

    pub fn clear_custom_ease(&mut self, group: PropertyGroup) {
        self.custom_eases.remove(&group);
    }

    #[inline]
    pub fn custom_ease(&self, group: PropertyGroup) -> Option<&EaseCurve> {
        self.custom_eases.get(&group)
    }

    /// Eased progress for a property group: the group's own curve wins,
    /// then the `All` curve, then the scalar amount.
    pub fn eased(&self, group: PropertyGroup, t: f64) -> f64 {
        self.custom_eases
            .get(&group)
            .or_else(|| self.custom_eases.get(&PropertyGroup::All))
            .map(|curve| curve.progress(t))
            .unwrap_or_else(|| ease_amount(t, self.ease_amount))
    }
}

/// Interpolated state of one element at a frame index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementState {
    pub element: ElementId,
    pub depth: usize,
    pub transform: Transform2D,
    /// Placement matrix composed from `transform` about the pivot.
    pub matrix: Matrix2D,
    /// Morphed geometry for shape tweens; `None` means the element's own
    /// geometry is authoritative.
    pub shape: Option<ShapePath>,
}

/// Signed rotation distance from `a` to `b` in degrees under a policy.
/// Forced directions add 360° per extra repeat.
fn rotation_delta(policy: RotationPolicy, a: f64, b: f64) -> f64 {
    match policy {
        RotationPolicy::None => b - a,
        RotationPolicy::Auto => {
            let d = (b - a).rem_euclid(360.0);
            if d > 180.0 {
                d - 360.0
            } else {
                d
            }
        }
        RotationPolicy::Clockwise { repeat } => {
            (b - a).rem_euclid(360.0) + 360.0 * f64::from(repeat)
        }
        RotationPolicy::CounterClockwise { repeat } => {
            -(a - b).rem_euclid(360.0) - 360.0 * f64::from(repeat)
        }
    }
}

fn literal_state(e: &Element) -> ElementState {
    ElementState {
        element: e.id,
        depth: e.depth,
        transform: e.transform,
        matrix: e.matrix(),
        shape: None,
    }
}

fn literal_states(frame: &Frame) -> Vec<ElementState> {
    frame.elements().iter().map(literal_state).collect()
}

/// Evaluate a layer at a frame index.
///
/// Returns the literal keyframe state at a span's start frame, a static hold
/// for untweened spans or a tween keyframe with no successor, and the
/// interpolated state otherwise. Fails with `InvalidIndex` when the index is
/// outside the layer.
pub fn evaluate(layer: &Layer, frame_index: usize) -> Result<Vec<ElementState>, StageError> {
    let len = layer.frame_count();
    let Some(span_idx) = layer.span_index_at(frame_index) else {
        return Err(StageError::InvalidIndex {
            index: frame_index,
            len,
        });
    };
    let k0 = &layer.spans()[span_idx];
    if frame_index == k0.start_frame {
        return Ok(literal_states(k0));
    }

    let (Some(tween), Some(k1)) = (k0.tween(), layer.spans().get(span_idx + 1)) else {
        // Static hold: no descriptor, or last keyframe of the layer.
        return Ok(literal_states(k0));
    };

    let span_frames = (k1.start_frame - k0.start_frame) as f64;
    let t = (frame_index - k0.start_frame) as f64 / span_frames;

    match tween.tween_type {
        TweenType::None => Ok(literal_states(k0)),
        TweenType::Classic | TweenType::Motion => Ok(motion_states(layer, k0, k1, tween, t)),
        TweenType::Shape => Ok(shape_states(k0, k1, tween, t)),
    }
}

/// Classic/motion interpolation: elements paired across the span by depth
/// rank; unpaired elements hold their keyframe state.
fn motion_states(layer: &Layer, k0: &Frame, k1: &Frame, tween: &Tween, t: f64) -> Vec<ElementState> {
    let t_pos = tween.eased(PropertyGroup::Position, t);
    let t_rot = tween.eased(PropertyGroup::Rotation, t);
    let t_scale = tween.eased(PropertyGroup::Scale, t);

    k0.elements()
        .iter()
        .map(|e0| {
            let Some(e1) = k1.elements().get(e0.depth) else {
                return literal_state(e0);
            };
            let a = &e0.transform;
            let b = &e1.transform;
            let lerp = |from: f64, to: f64, p: f64| from + (to - from) * p;
            let mut tf = Transform2D {
                x: lerp(a.x, b.x, t_pos),
                y: lerp(a.y, b.y, t_pos),
                scale_x: lerp(a.scale_x, b.scale_x, t_scale),
                scale_y: lerp(a.scale_y, b.scale_y, t_scale),
                rotation: a.rotation + rotation_delta(tween.rotation, a.rotation, b.rotation) * t_rot,
                skew_x: lerp(a.skew_x, b.skew_x, t_scale),
                skew_y: lerp(a.skew_y, b.skew_y, t_scale),
            };

            if tween.orient_to_path {
                if let Some(guide) = layer.guide() {
                    let dir = guide.tangent_at(t_pos);
                    tf.rotation = dir.y.atan2(dir.x).to_degrees();
                    if tween.snap_to_guide {
                        let p = guide.point_at(t_pos);
                        tf.x = p.x;
                        tf.y = p.y;
                    }
                }
            }

            let pivot = e0
                .transformation_point
                .lerp(&e1.transformation_point, t_pos);
            ElementState {
                element: e0.id,
                depth: e0.depth,
                matrix: tf.to_matrix(pivot),
                transform: tf,
                shape: None,
            }
        })
        .collect()
}

/// Shape interpolation: shape elements morph vertex-wise, everything else
/// holds. Transforms blend with the `All` group ease.
fn shape_states(k0: &Frame, k1: &Frame, tween: &Tween, t: f64) -> Vec<ElementState> {
    let te = tween.eased(PropertyGroup::All, t);

    k0.elements()
        .iter()
        .map(|e0| {
            let paired = k1.elements().get(e0.depth);
            let (Some(e1), ElementKind::Shape(path_a)) = (paired, &e0.kind) else {
                return literal_state(e0);
            };
            let ElementKind::Shape(path_b) = &e1.kind else {
                return literal_state(e0);
            };

            let morphed = morph::morph(path_a, path_b, te, tween.shape_blend);
            let tf = e0.transform.lerp(&e1.transform, te);
            let pivot = e0.transformation_point.lerp(&e1.transformation_point, te);
            ElementState {
                element: e0.id,
                depth: e0.depth,
                matrix: tf.to_matrix(pivot),
                transform: tf,
                shape: Some(morphed),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_delta_policies() {
        // Auto takes the short way.
        assert_eq!(rotation_delta(RotationPolicy::Auto, 0.0, 90.0), 90.0);
        assert_eq!(rotation_delta(RotationPolicy::Auto, 0.0, 270.0), -90.0);
        // None is raw linear.
        assert_eq!(rotation_delta(RotationPolicy::None, 0.0, 270.0), 270.0);
        // Forced directions accumulate repeats.
        assert_eq!(
            rotation_delta(RotationPolicy::Clockwise { repeat: 2 }, 0.0, 90.0),
            810.0
        );
        assert_eq!(
            rotation_delta(RotationPolicy::CounterClockwise { repeat: 1 }, 0.0, 90.0),
            -270.0 - 360.0
        );
    }

    #[test]
    fn group_ease_precedence() {
        let mut tw = Tween::new(TweenType::Classic);
        tw.set_ease_amount(100);
        // Scalar applies with no curves.
        assert!(tw.eased(PropertyGroup::Position, 0.5) > 0.5);
        // All-group curve overrides the scalar.
        tw.set_custom_ease(PropertyGroup::All, EaseCurve::linear());
        assert_eq!(tw.eased(PropertyGroup::Position, 0.5), 0.5);
        // Group curve overrides All.
        let ease_in = EaseCurve::new(vec![
            easing::CurvePoint::new(0.0, 0.0),
            easing::CurvePoint::new(0.4, 0.0),
            easing::CurvePoint::new(0.7, 0.3),
            easing::CurvePoint::new(1.0, 1.0),
        ])
        .unwrap();
        tw.set_custom_ease(PropertyGroup::Position, ease_in);
        assert!(tw.eased(PropertyGroup::Position, 0.5) < 0.5);
        assert_eq!(tw.eased(PropertyGroup::Scale, 0.5), 0.5);
    }

    #[test]
    fn ease_amount_clamped() {
        let mut tw = Tween::new(TweenType::Classic);
        tw.set_ease_amount(250);
        assert_eq!(tw.ease_amount(), 100);
        tw.set_ease_amount(-101);
        assert_eq!(tw.ease_amount(), -100);
    }
}
