//! Frames: keyframe spans holding depth-ordered content.
//!
//! A frame owns a `start_frame` and `duration` on the layer's frame axis and
//! the elements that are authoritative for that span. Depth values within a
//! frame are unique and contiguous from 0; every mutating operation here
//! restores that invariant before returning.

use serde::{Deserialize, Serialize};
use stagekit_api_core::Rect;

use crate::element::{Element, ElementId};
use crate::envelope::FrameSound;
use crate::tween::{Tween, TweenType};

/// One keyframe span on a layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// First frame index this span covers.
    pub start_frame: usize,
    /// Number of timeline ticks covered; always >= 1.
    pub duration: usize,
    /// Optional frame label.
    pub name: Option<String>,
    elements: Vec<Element>,
    tween: Option<Tween>,
    pub sound: Option<FrameSound>,
}

impl Frame {
    /// Empty keyframe covering a single tick.
    pub fn keyframe_at(start_frame: usize) -> Self {
        Self {
            start_frame,
            duration: 1,
            name: None,
            elements: Vec::new(),
            tween: None,
            sound: None,
        }
    }

    /// One past the last frame index covered.
    #[inline]
    pub fn end_frame(&self) -> usize {
        self.start_frame + self.duration
    }

    #[inline]
    pub fn contains(&self, frame_index: usize) -> bool {
        frame_index >= self.start_frame && frame_index < self.end_frame()
    }

    /// Elements in depth order (index == depth).
    #[inline]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Insert at the given depth (clamped to the top), or append above the
    /// current maximum when `depth` is `None`. Elements at or above the
    /// target shift up by one.
    pub fn insert_element(&mut self, element: Element, depth: Option<usize>) -> ElementId {
        let id = element.id;
        let at = depth.unwrap_or(self.elements.len()).min(self.elements.len());
        self.elements.insert(at, element);
        self.renumber();
        id
    }

    /// Remove an element; remaining depths are compacted to stay contiguous
    /// from 0. Returns the removed element, or `None` for an unknown id.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        let pos = self.elements.iter().position(|e| e.id == id)?;
        let removed = self.elements.remove(pos);
        self.renumber();
        Some(removed)
    }

    /// Move an element to `new_depth` (clamped to the valid range), shifting
    /// the others. Returns false for an unknown id.
    pub fn reorder_element(&mut self, id: ElementId, new_depth: usize) -> bool {
        let Some(pos) = self.elements.iter().position(|e| e.id == id) else {
            return false;
        };
        let element = self.elements.remove(pos);
        let at = new_depth.min(self.elements.len());
        self.elements.insert(at, element);
        self.renumber();
        true
    }

    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        let top = self.elements.len().saturating_sub(1);
        self.reorder_element(id, top)
    }

    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        self.reorder_element(id, 0)
    }

    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        match self.element(id).map(|e| e.depth) {
            Some(d) => self.reorder_element(id, d + 1),
            None => false,
        }
    }

    pub fn send_backward(&mut self, id: ElementId) -> bool {
        match self.element(id).map(|e| e.depth) {
            Some(d) => self.reorder_element(id, d.saturating_sub(1)),
            None => false,
        }
    }

    /// Minimal axis-aligned rect covering the transformed bounds of the
    /// given elements. Empty input (or elements with no geometry) yields
    /// `None` rather than a degenerate rect.
    pub fn selection_bounds<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Option<Rect> {
        elements
            .into_iter()
            .filter_map(Element::stage_bounds)
            .reduce(|acc, r| acc.union(&r))
    }

    /// Current tween type; `None` when no descriptor is attached.
    #[inline]
    pub fn tween_type(&self) -> TweenType {
        self.tween.as_ref().map_or(TweenType::None, |t| t.tween_type)
    }

    /// Change the tween type. `TweenType::None` discards the descriptor;
    /// any other type creates a default descriptor (or retypes the existing
    /// one, keeping its easing and policies).
    pub fn set_tween_type(&mut self, tween_type: TweenType) {
        match (tween_type, self.tween.as_mut()) {
            (TweenType::None, _) => self.tween = None,
            (t, Some(existing)) => existing.tween_type = t,
            (t, None) => self.tween = Some(Tween::new(t)),
        }
    }

    #[inline]
    pub fn tween(&self) -> Option<&Tween> {
        self.tween.as_ref()
    }

    #[inline]
    pub fn tween_mut(&mut self) -> Option<&mut Tween> {
        self.tween.as_mut()
    }

    /// Restore depth == index after a structural edit.
    fn renumber(&mut self) {
        for (i, e) in self.elements.iter_mut().enumerate() {
            e.depth = i;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapePath;
    use stagekit_api_core::Point;

    fn dot() -> Element {
        Element::shape(ShapePath::open(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
        ]))
    }

    fn depths(frame: &Frame) -> Vec<usize> {
        frame.elements().iter().map(|e| e.depth).collect()
    }

    #[test]
    fn depths_stay_contiguous_through_edit_sequence() {
        let mut f = Frame::keyframe_at(0);
        let a = f.insert_element(dot(), None);
        let b = f.insert_element(dot(), None);
        let c = f.insert_element(dot(), Some(1));
        assert_eq!(depths(&f), vec![0, 1, 2]);
        assert_eq!(f.element(c).unwrap().depth, 1);
        assert_eq!(f.element(b).unwrap().depth, 2);

        f.remove_element(a);
        assert_eq!(depths(&f), vec![0, 1]);

        f.bring_to_front(c);
        assert_eq!(f.element(c).unwrap().depth, 1);
        f.send_to_back(c);
        assert_eq!(f.element(c).unwrap().depth, 0);
        f.bring_forward(c);
        assert_eq!(f.element(c).unwrap().depth, 1);
        f.send_backward(c);
        assert_eq!(f.element(c).unwrap().depth, 0);
        assert_eq!(depths(&f), vec![0, 1]);
    }

    #[test]
    fn insert_above_max_clamps_to_append() {
        let mut f = Frame::keyframe_at(0);
        f.insert_element(dot(), None);
        let id = f.insert_element(dot(), Some(99));
        assert_eq!(f.element(id).unwrap().depth, 1);
        assert_eq!(depths(&f), vec![0, 1]);
    }

    #[test]
    fn remove_unknown_id_is_none() {
        let mut f = Frame::keyframe_at(0);
        f.insert_element(dot(), None);
        assert!(f.remove_element(ElementId::new()).is_none());
        assert_eq!(depths(&f), vec![0]);
    }

    #[test]
    fn tween_descriptor_lifecycle() {
        let mut f = Frame::keyframe_at(0);
        assert_eq!(f.tween_type(), TweenType::None);
        assert!(f.tween().is_none());

        f.set_tween_type(TweenType::Classic);
        assert_eq!(f.tween_type(), TweenType::Classic);
        f.tween_mut().unwrap().set_ease_amount(50);

        // Retyping keeps the descriptor settings.
        f.set_tween_type(TweenType::Motion);
        assert_eq!(f.tween().unwrap().ease_amount(), 50);

        // Setting None discards it.
        f.set_tween_type(TweenType::None);
        assert!(f.tween().is_none());
    }

    #[test]
    fn selection_bounds_empty_is_none() {
        assert_eq!(Frame::selection_bounds(std::iter::empty::<&Element>()), None);
    }

    #[test]
    fn selection_bounds_covers_all() {
        let mut f = Frame::keyframe_at(0);
        let a = f.insert_element(dot(), None);
        let b = f.insert_element(dot().at(10.0, 10.0), None);
        let selected: Vec<&Element> = [a, b].iter().filter_map(|id| f.element(*id)).collect();
        let bounds = Frame::selection_bounds(selected).unwrap();
        assert_eq!(bounds.left, 0.0);
        assert_eq!(bounds.right, 11.0);
        assert_eq!(bounds.bottom, 11.0);
    }
}
