//! Layers: ordered keyframe spans over the shared frame axis.
//!
//! Spans are contiguous and non-overlapping: the first span starts at 0 and
//! each span starts where the previous one ends. Mutating operations repair
//! that invariant internally; it is never surfaced as an error.

use serde::{Deserialize, Serialize};

use crate::element::ShapePath;
use crate::error::StageError;
use crate::frame::Frame;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    frames: Vec<Frame>,
    /// Motion guide path for orient-to-path tweens on this layer.
    guide: Option<ShapePath>,
    pub visible: bool,
    pub locked: bool,
}

impl Layer {
    /// New layer with a single empty keyframe at frame 0.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frames: vec![Frame::keyframe_at(0)],
            guide: None,
            visible: true,
            locked: false,
        }
    }

    /// Keyframe spans in frame order.
    #[inline]
    pub fn spans(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of frame ticks covered by this layer.
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.last().map_or(0, Frame::end_frame)
    }

    #[inline]
    pub fn guide(&self) -> Option<&ShapePath> {
        self.guide.as_ref()
    }

    pub fn set_guide(&mut self, guide: Option<ShapePath>) {
        self.guide = guide;
    }

    /// Index of the span covering `frame_index`.
    pub fn span_index_at(&self, frame_index: usize) -> Option<usize> {
        if frame_index >= self.frame_count() {
            return None;
        }
        // Spans are contiguous, so partition on end_frame.
        Some(self.frames.partition_point(|f| f.end_frame() <= frame_index))
    }

    pub fn span_at(&self, frame_index: usize) -> Option<&Frame> {
        self.span_index_at(frame_index).map(|i| &self.frames[i])
    }

    pub fn span_at_mut(&mut self, frame_index: usize) -> Option<&mut Frame> {
        self.span_index_at(frame_index)
            .map(move |i| &mut self.frames[i])
    }

    /// The keyframe governing `frame_index` and, when present, the next
    /// keyframe (the tween end state).
    pub fn keyframe_and_next(&self, frame_index: usize) -> Option<(&Frame, Option<&Frame>)> {
        let i = self.span_index_at(frame_index)?;
        Some((&self.frames[i], self.frames.get(i + 1)))
    }

    /// Convert `frame_index` into a keyframe by splitting its enclosing
    /// span; content and tween settings are cloned onto the new keyframe.
    /// A frame that already starts a span is left as-is.
    ///
    /// Fails with `InvalidIndex` beyond the layer's extent.
    pub fn insert_keyframe(&mut self, frame_index: usize) -> Result<(), StageError> {
        let len = self.frame_count();
        let Some(i) = self.span_index_at(frame_index) else {
            return Err(StageError::InvalidIndex {
                index: frame_index,
                len,
            });
        };
        let span = &mut self.frames[i];
        if span.start_frame == frame_index {
            return Ok(());
        }
        let mut split = span.clone();
        split.start_frame = frame_index;
        split.duration = span.end_frame() - frame_index;
        span.duration = frame_index - span.start_frame;
        self.frames.insert(i + 1, split);
        Ok(())
    }

    /// Insert `count` ticks at `frame_index`, extending the enclosing span
    /// and shifting everything after it.
    pub fn insert_frames(&mut self, frame_index: usize, count: usize) -> Result<(), StageError> {
        let len = self.frame_count();
        let Some(i) = self.span_index_at(frame_index) else {
            return Err(StageError::InvalidIndex {
                index: frame_index,
                len,
            });
        };
        self.frames[i].duration += count;
        self.recontiguate();
        Ok(())
    }

    /// Remove `count` ticks starting at `frame_index`. Spans fully inside
    /// the removed range disappear; partially covered spans shrink; the
    /// remainder is re-contiguated. A layer never becomes empty: removing
    /// everything leaves one empty keyframe at 0.
    pub fn remove_frames(&mut self, frame_index: usize, count: usize) -> Result<(), StageError> {
        let len = self.frame_count();
        if frame_index >= len {
            return Err(StageError::InvalidIndex {
                index: frame_index,
                len,
            });
        }
        let removed_end = frame_index.saturating_add(count);
        self.frames.retain_mut(|f| {
            let overlap_start = f.start_frame.max(frame_index);
            let overlap_end = f.end_frame().min(removed_end);
            let overlap = overlap_end.saturating_sub(overlap_start);
            if overlap >= f.duration {
                return false;
            }
            f.duration -= overlap;
            true
        });
        if self.frames.is_empty() {
            self.frames.push(Frame::keyframe_at(0));
        }
        self.recontiguate();
        Ok(())
    }

    /// Reassign start frames so spans are contiguous from 0.
    fn recontiguate(&mut self) {
        let mut next = 0;
        for f in &mut self.frames {
            f.start_frame = next;
            next = f.end_frame();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starts_and_durations(layer: &Layer) -> Vec<(usize, usize)> {
        layer
            .spans()
            .iter()
            .map(|f| (f.start_frame, f.duration))
            .collect()
    }

    fn assert_contiguous(layer: &Layer) {
        let mut next = 0;
        for f in layer.spans() {
            assert_eq!(f.start_frame, next, "span must start where previous ends");
            assert!(f.duration >= 1);
            next = f.end_frame();
        }
    }

    #[test]
    fn new_layer_has_one_keyframe() {
        let layer = Layer::new("Layer 1");
        assert_eq!(starts_and_durations(&layer), vec![(0, 1)]);
        assert_eq!(layer.frame_count(), 1);
    }

    #[test]
    fn insert_keyframe_splits_span() {
        let mut layer = Layer::new("L");
        layer.insert_frames(0, 9).unwrap(); // span [0, 10)
        layer.insert_keyframe(4).unwrap();
        assert_eq!(starts_and_durations(&layer), vec![(0, 4), (4, 6)]);
        assert_contiguous(&layer);

        // Re-inserting on an existing keyframe is a no-op.
        layer.insert_keyframe(4).unwrap();
        assert_eq!(starts_and_durations(&layer), vec![(0, 4), (4, 6)]);
    }

    #[test]
    fn insert_keyframe_out_of_range_fails() {
        let mut layer = Layer::new("L");
        let err = layer.insert_keyframe(5).unwrap_err();
        assert!(matches!(err, StageError::InvalidIndex { index: 5, len: 1 }));
    }

    #[test]
    fn span_lookup_brackets_frames() {
        let mut layer = Layer::new("L");
        layer.insert_frames(0, 9).unwrap();
        layer.insert_keyframe(5).unwrap();
        assert_eq!(layer.span_at(0).unwrap().start_frame, 0);
        assert_eq!(layer.span_at(4).unwrap().start_frame, 0);
        assert_eq!(layer.span_at(5).unwrap().start_frame, 5);
        assert_eq!(layer.span_at(9).unwrap().start_frame, 5);
        assert!(layer.span_at(10).is_none());
    }

    #[test]
    fn remove_frames_recontiguates() {
        let mut layer = Layer::new("L");
        layer.insert_frames(0, 11).unwrap(); // [0, 12)
        layer.insert_keyframe(4).unwrap();
        layer.insert_keyframe(8).unwrap(); // spans 0-4, 4-8, 8-12

        // Remove ticks [2, 6): shrinks first two spans.
        layer.remove_frames(2, 4).unwrap();
        assert_eq!(starts_and_durations(&layer), vec![(0, 2), (2, 2), (4, 4)]);
        assert_contiguous(&layer);

        // Removing a whole span drops it.
        layer.remove_frames(2, 2).unwrap();
        assert_eq!(starts_and_durations(&layer), vec![(0, 2), (2, 4)]);
        assert_contiguous(&layer);
    }

    #[test]
    fn remove_everything_leaves_empty_keyframe() {
        let mut layer = Layer::new("L");
        layer.insert_frames(0, 5).unwrap();
        layer.remove_frames(0, 100).unwrap();
        assert_eq!(starts_and_durations(&layer), vec![(0, 1)]);
    }
}
