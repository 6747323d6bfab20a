//! Stagekit Timeline Core (host-agnostic)
//!
//! The frame/timeline animation data model of a vector authoring tool and
//! the engine that interpolates between its keyframes: the
//! Document → Timeline → Layer → Frame → Element hierarchy, depth-ordered
//! frame content, classic/motion/shape tweens with custom easing curves,
//! frame-attached sound envelopes, and typed persistent annotations.
//!
//! Everything here is single-threaded and synchronous; `&mut` ownership
//! guarantees evaluation never observes a half-applied structural edit.

pub mod document;
pub mod element;
pub mod envelope;
pub mod error;
pub mod frame;
pub mod layer;
pub mod library;
pub mod session;
pub mod store;
pub mod timeline;
pub mod tween;

// Re-exports for consumers (host adapters)
pub use document::Document;
pub use element::{Element, ElementId, ElementKind, InstanceRef, ShapePath, TextAttrs};
pub use envelope::{EnvelopeLimits, EnvelopePoint, FrameSound, SoundEnvelope, MAX_LEVEL};
pub use error::StageError;
pub use frame::Frame;
pub use layer::Layer;
pub use library::{ItemKind, Library, LibraryItem};
pub use session::Session;
pub use store::DataStore;
pub use timeline::Timeline;
pub use tween::easing::{CurvePoint, EaseCurve};
pub use tween::{
    evaluate, ElementState, PropertyGroup, RotationPolicy, ShapeBlend, Tween, TweenType,
};
pub use stagekit_api_core::{DataValue, DataValueKind, Matrix2D, Point, Rect, Transform2D};

/// Timeline core result type
pub type Result<T> = core::result::Result<T, StageError>;
