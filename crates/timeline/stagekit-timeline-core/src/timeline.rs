//! Timelines: stacked layers sharing one frame axis, plus edit cursors.

use serde::{Deserialize, Serialize};

use crate::error::StageError;
use crate::layer::Layer;
use crate::tween::{self, ElementState};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub name: String,
    layers: Vec<Layer>,
    /// Edit cursor: the layer edits target by default.
    pub current_layer: usize,
    /// Edit cursor: the frame index edits target by default.
    pub current_frame: usize,
}

impl Timeline {
    /// New timeline with one default layer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layers: vec![Layer::new("Layer 1")],
            current_layer: 0,
            current_frame: 0,
        }
    }

    /// Layers back-to-front: index 0 draws underneath everything else.
    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Result<&Layer, StageError> {
        self.layers.get(index).ok_or(StageError::InvalidIndex {
            index,
            len: self.layers.len(),
        })
    }

    pub fn layer_mut(&mut self, index: usize) -> Result<&mut Layer, StageError> {
        let len = self.layers.len();
        self.layers
            .get_mut(index)
            .ok_or(StageError::InvalidIndex { index, len })
    }

    /// Append a layer on top of the stack; returns its index.
    pub fn add_layer(&mut self, layer: Layer) -> usize {
        self.layers.push(layer);
        self.layers.len() - 1
    }

    /// Remove a layer. The edit cursor is clamped to the remaining stack.
    pub fn remove_layer(&mut self, index: usize) -> Result<Layer, StageError> {
        if index >= self.layers.len() {
            return Err(StageError::InvalidIndex {
                index,
                len: self.layers.len(),
            });
        }
        let removed = self.layers.remove(index);
        self.current_layer = self
            .current_layer
            .min(self.layers.len().saturating_sub(1));
        Ok(removed)
    }

    /// Frame extent of the timeline: the longest layer's extent.
    pub fn frame_count(&self) -> usize {
        self.layers.iter().map(Layer::frame_count).max().unwrap_or(0)
    }

    /// Evaluate every visible layer at `frame_index`, bottom layer first.
    /// Layers that don't reach the index contribute nothing; hidden layers
    /// are skipped. Fails only when the index is beyond the whole timeline.
    pub fn evaluate(&self, frame_index: usize) -> Result<Vec<ElementState>, StageError> {
        let len = self.frame_count();
        if frame_index >= len {
            return Err(StageError::InvalidIndex {
                index: frame_index,
                len,
            });
        }
        let mut states = Vec::new();
        for layer in &self.layers {
            if !layer.visible || frame_index >= layer.frame_count() {
                continue;
            }
            states.extend(tween::evaluate(layer, frame_index)?);
        }
        Ok(states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Element, ShapePath};
    use stagekit_api_core::Point;

    fn dot() -> Element {
        Element::shape(ShapePath::open(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
        ]))
    }

    #[test]
    fn frame_count_is_longest_layer() {
        let mut tl = Timeline::new("Scene 1");
        tl.add_layer(Layer::new("L2"));
        tl.layer_mut(1).unwrap().insert_frames(0, 9).unwrap();
        assert_eq!(tl.frame_count(), 10);
    }

    #[test]
    fn evaluate_stacks_layers_bottom_first() {
        let mut tl = Timeline::new("Scene 1");
        let top = tl.add_layer(Layer::new("Top"));
        let bottom_id = tl.layer_mut(0).unwrap().span_at_mut(0).unwrap().insert_element(dot(), None);
        let top_id = tl.layer_mut(top).unwrap().span_at_mut(0).unwrap().insert_element(dot(), None);

        let states = tl.evaluate(0).unwrap();
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].element, bottom_id);
        assert_eq!(states[1].element, top_id);
    }

    #[test]
    fn evaluate_skips_hidden_and_short_layers() {
        let mut tl = Timeline::new("Scene 1");
        tl.layer_mut(0).unwrap().span_at_mut(0).unwrap().insert_element(dot(), None);
        let long = tl.add_layer(Layer::new("Long"));
        tl.layer_mut(long).unwrap().insert_frames(0, 9).unwrap();
        tl.layer_mut(long).unwrap().span_at_mut(0).unwrap().insert_element(dot(), None);

        // Frame 5 is past layer 0's extent; only the long layer contributes.
        assert_eq!(tl.evaluate(5).unwrap().len(), 1);

        tl.layer_mut(long).unwrap().visible = false;
        assert!(tl.evaluate(5).unwrap().is_empty());
    }

    #[test]
    fn evaluate_out_of_range_fails() {
        let tl = Timeline::new("Scene 1");
        let err = tl.evaluate(1).unwrap_err();
        assert!(matches!(err, StageError::InvalidIndex { index: 1, len: 1 }));
    }

    #[test]
    fn remove_layer_clamps_cursor() {
        let mut tl = Timeline::new("Scene 1");
        tl.add_layer(Layer::new("L2"));
        tl.current_layer = 1;
        tl.remove_layer(1).unwrap();
        assert_eq!(tl.current_layer, 0);
        assert!(tl.remove_layer(5).is_err());
    }
}
