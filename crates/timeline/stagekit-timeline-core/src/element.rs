//! Elements: the content of a keyframe.
//!
//! The host exposes shapes, text fields and symbol instances through a
//! common base; the variant set is closed, so this models them as a tagged
//! enum over shared placement fields rather than inheritance.

use serde::{Deserialize, Serialize};
use stagekit_api_core::{Matrix2D, Point, Rect, Transform2D};
use uuid::Uuid;

use crate::store::DataStore;

/// Opaque element identifier, stable across keyframe copies.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub Uuid);

impl ElementId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Polyline/polygon vertex path in element-local coordinates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapePath {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl ShapePath {
    pub fn open(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    pub fn polygon(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Segment list; for closed paths this includes the wrap-around segment.
    fn segments(&self) -> impl Iterator<Item = (&Point, &Point)> {
        let wrap = if self.closed && self.points.len() > 1 {
            Some((self.points.last().unwrap(), &self.points[0]))
        } else {
            None
        };
        self.points.windows(2).map(|w| (&w[0], &w[1])).chain(wrap)
    }

    /// Total arc length.
    pub fn length(&self) -> f64 {
        self.segments().map(|(a, b)| a.distance(b)).sum()
    }

    /// Point at normalized arc-length position `u` in [0,1].
    /// Degenerate paths (fewer than two points or zero length) return the
    /// first point, or the origin when empty.
    pub fn point_at(&self, u: f64) -> Point {
        let Some(first) = self.points.first() else {
            return Point::default();
        };
        let total = self.length();
        if total <= 0.0 {
            return *first;
        }
        let mut remaining = u.clamp(0.0, 1.0) * total;
        for (a, b) in self.segments() {
            let seg = a.distance(b);
            if remaining <= seg {
                if seg <= 0.0 {
                    return *a;
                }
                return a.lerp(b, remaining / seg);
            }
            remaining -= seg;
        }
        if self.closed {
            *first
        } else {
            *self.points.last().unwrap_or(first)
        }
    }

    /// Unit tangent direction at normalized arc-length position `u`.
    /// Degenerate paths return the +x axis.
    pub fn tangent_at(&self, u: f64) -> Point {
        let total = self.length();
        if total <= 0.0 || self.points.len() < 2 {
            return Point::new(1.0, 0.0);
        }
        let mut remaining = u.clamp(0.0, 1.0) * total;
        let mut last_dir = Point::new(1.0, 0.0);
        for (a, b) in self.segments() {
            let seg = a.distance(b);
            if seg > 0.0 {
                last_dir = Point::new((b.x - a.x) / seg, (b.y - a.y) / seg);
            }
            if remaining <= seg {
                return last_dir;
            }
            remaining -= seg;
        }
        last_dir
    }

    /// Axis-aligned bounds of the vertices, `None` when empty.
    pub fn bounds(&self) -> Option<Rect> {
        Rect::covering(self.points.iter())
    }
}

/// Static text field attributes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextAttrs {
    pub text: String,
    pub font: String,
    pub size: f64,
    /// Fixed text box extent (local units); the host measures glyphs.
    pub width: f64,
    pub height: f64,
}

/// Reference to a library symbol placed on the stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstanceRef {
    /// Library item name.
    pub item: String,
    /// First frame of the symbol's own timeline to show.
    pub first_frame: usize,
    /// Natural bounds of the symbol content, reported by the library.
    pub natural_bounds: Rect,
}

/// Closed variant payload for the element kinds the host scripts against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ElementKind {
    Shape(ShapePath),
    Text(TextAttrs),
    Instance(InstanceRef),
}

/// A positioned piece of keyframe content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub name: Option<String>,
    /// Draw-order rank within the owning frame; unique and contiguous from 0.
    /// Maintained by the frame's depth operations.
    pub depth: usize,
    pub transform: Transform2D,
    /// Pivot for rotation/scale, in element-local coordinates.
    pub transformation_point: Point,
    pub kind: ElementKind,
    /// Per-element persistent annotations.
    #[serde(default)]
    pub data: DataStore,
}

impl Element {
    fn with_kind(kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(),
            name: None,
            depth: 0,
            transform: Transform2D::default(),
            transformation_point: Point::default(),
            kind,
            data: DataStore::new(),
        }
    }

    pub fn shape(path: ShapePath) -> Self {
        Self::with_kind(ElementKind::Shape(path))
    }

    pub fn text(attrs: TextAttrs) -> Self {
        Self::with_kind(ElementKind::Text(attrs))
    }

    pub fn instance(instance: InstanceRef) -> Self {
        Self::with_kind(ElementKind::Instance(instance))
    }

    /// Builder-style placement.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.transform.x = x;
        self.transform.y = y;
        self
    }

    /// Placement matrix (pivot-aware).
    #[inline]
    pub fn matrix(&self) -> Matrix2D {
        self.transform.to_matrix(self.transformation_point)
    }

    /// Natural (untransformed) bounds; `None` for an empty shape path.
    pub fn bounds(&self) -> Option<Rect> {
        match &self.kind {
            ElementKind::Shape(path) => path.bounds(),
            ElementKind::Text(t) => Some(Rect::new(0.0, 0.0, t.width, t.height)),
            ElementKind::Instance(i) => Some(i.natural_bounds),
        }
    }

    /// Bounds in parent (stage) space: natural bounds mapped through the
    /// placement matrix, as an axis-aligned cover.
    pub fn stage_bounds(&self) -> Option<Rect> {
        self.bounds().map(|r| self.matrix().apply_rect(&r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
    }

    #[test]
    fn path_arc_length_sampling() {
        // L-shaped open path: (0,0)->(10,0)->(10,10), length 20
        let path = ShapePath::open(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ]);
        approx(path.length(), 20.0, 1e-12);
        let mid = path.point_at(0.5);
        approx(mid.x, 10.0, 1e-12);
        approx(mid.y, 0.0, 1e-12);
        let q3 = path.point_at(0.75);
        approx(q3.x, 10.0, 1e-12);
        approx(q3.y, 5.0, 1e-12);

        let t = path.tangent_at(0.25);
        approx(t.x, 1.0, 1e-12);
        let t = path.tangent_at(0.75);
        approx(t.y, 1.0, 1e-12);
    }

    #[test]
    fn closed_path_includes_wrap_segment() {
        let square = ShapePath::polygon(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]);
        approx(square.length(), 4.0, 1e-12);
        // 7/8 of the way around is halfway up the closing edge
        let p = square.point_at(0.875);
        approx(p.x, 0.0, 1e-12);
        approx(p.y, 0.5, 1e-12);
    }

    #[test]
    fn stage_bounds_uses_placement() {
        let mut e = Element::shape(ShapePath::polygon(vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
        ]))
        .at(10.0, 0.0);
        e.transform.scale_x = 2.0;
        let b = e.stage_bounds().unwrap();
        approx(b.left, 10.0, 1e-9);
        approx(b.right, 14.0, 1e-9);
        approx(b.bottom, 2.0, 1e-9);
    }

    #[test]
    fn empty_shape_has_no_bounds() {
        let e = Element::shape(ShapePath::default());
        assert!(e.bounds().is_none());
        assert!(e.stage_bounds().is_none());
    }
}
