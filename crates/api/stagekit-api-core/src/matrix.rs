//! 2D affine transforms.
//!
//! `Matrix2D` is the wire/composition form (column-vector convention:
//! `apply(p) = (a·x + c·y + tx, b·x + d·y + ty)`); `Transform2D` is the
//! authoring form (translation/scale/rotation/skew, rotation in degrees)
//! that the tween engine interpolates field-wise.

use serde::{Deserialize, Serialize};

use crate::error::GeomError;
use crate::rect::{Point, Rect};

/// Determinants below this are treated as singular.
const SINGULAR_EPS: f64 = 1e-12;

/// Affine 2x3 matrix (third row implied `[0 0 1]`).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Matrix2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Matrix2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix2D {
    pub const IDENTITY: Matrix2D = Matrix2D {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    #[inline]
    pub fn translation(tx: f64, ty: f64) -> Self {
        Matrix2D {
            tx,
            ty,
            ..Self::IDENTITY
        }
    }

    #[inline]
    pub fn scaling(sx: f64, sy: f64) -> Self {
        Matrix2D {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    /// Rotation by `radians` (positive rotates x toward y, i.e. clockwise in
    /// the stage's y-down coordinate space).
    #[inline]
    pub fn rotation(radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        Matrix2D {
            a: c,
            b: s,
            c: -s,
            d: c,
            tx: 0.0,
            ty: 0.0,
        }
    }

    #[inline]
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Composition `self ∘ other`: apply `other` first, then `self`.
    /// Associative: `a.compose(&b.compose(&c)) == a.compose(&b).compose(&c)`.
    pub fn compose(&self, other: &Matrix2D) -> Matrix2D {
        Matrix2D {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            tx: self.a * other.tx + self.c * other.ty + self.tx,
            ty: self.b * other.tx + self.d * other.ty + self.ty,
        }
    }

    /// Inverse, or `GeomError::SingularMatrix` when the determinant is
    /// effectively zero.
    pub fn invert(&self) -> Result<Matrix2D, GeomError> {
        let det = self.determinant();
        if det.abs() < SINGULAR_EPS {
            return Err(GeomError::SingularMatrix { det });
        }
        let inv = det.recip();
        Ok(Matrix2D {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            tx: (self.c * self.ty - self.d * self.tx) * inv,
            ty: (self.b * self.tx - self.a * self.ty) * inv,
        })
    }

    /// Map a point through this transform.
    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.tx,
            y: self.b * p.x + self.d * p.y + self.ty,
        }
    }

    /// Axis-aligned bounds of a rect after mapping its corners.
    pub fn apply_rect(&self, rect: &Rect) -> Rect {
        let corners = rect.corners().map(|p| self.apply(p));
        // corners is non-empty, so covering cannot fail
        Rect::covering(corners.iter()).unwrap_or(*rect)
    }
}

/// Decomposed placement: translation, per-axis scale, rotation and skews in
/// degrees. This is the form scripts author and the tween engine blends.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
    pub skew_x: f64,
    pub skew_y: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            skew_x: 0.0,
            skew_y: 0.0,
        }
    }
}

impl Transform2D {
    #[inline]
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// Matrix placing the local origin-relative `pivot` at `(x, y)` in parent
    /// space, with scale/rotation/skew applied about that pivot.
    pub fn to_matrix(&self, pivot: Point) -> Matrix2D {
        let rx = (self.rotation + self.skew_y).to_radians();
        let ry = (self.rotation + self.skew_x).to_radians();
        let linear = Matrix2D {
            a: self.scale_x * rx.cos(),
            b: self.scale_x * rx.sin(),
            c: -self.scale_y * ry.sin(),
            d: self.scale_y * ry.cos(),
            tx: 0.0,
            ty: 0.0,
        };
        Matrix2D::translation(self.x, self.y)
            .compose(&linear)
            .compose(&Matrix2D::translation(-pivot.x, -pivot.y))
    }

    /// Field-wise linear blend. Rotation is blended like the other fields;
    /// callers that need direction-aware rotation set it separately.
    pub fn lerp(&self, other: &Transform2D, t: f64) -> Transform2D {
        let l = |a: f64, b: f64| a + (b - a) * t;
        Transform2D {
            x: l(self.x, other.x),
            y: l(self.y, other.y),
            scale_x: l(self.scale_x, other.scale_x),
            scale_y: l(self.scale_y, other.scale_y),
            rotation: l(self.rotation, other.rotation),
            skew_x: l(self.skew_x, other.skew_x),
            skew_y: l(self.skew_y, other.skew_y),
        }
    }
}
