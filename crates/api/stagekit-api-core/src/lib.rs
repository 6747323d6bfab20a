//! stagekit-api-core: shared geometry & typed-value API (core, host-agnostic)

pub mod error;
pub mod matrix;
pub mod rect;
pub mod value;

pub use error::GeomError;
pub use matrix::{Matrix2D, Transform2D};
pub use rect::{Point, Rect};
pub use value::{DataValue, DataValueKind};
