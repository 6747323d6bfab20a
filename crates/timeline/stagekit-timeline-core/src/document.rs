//! Documents: stage settings, timelines, the library, and the selection.

use serde::{Deserialize, Serialize};
use stagekit_api_core::Rect;

use crate::element::{Element, ElementId};
use crate::error::StageError;
use crate::frame::Frame;
use crate::library::Library;
use crate::store::DataStore;
use crate::timeline::Timeline;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    timelines: Vec<Timeline>,
    current_timeline: usize,
    pub library: Library,
    /// Document-level persistent data.
    pub data: DataStore,
    selection: Vec<ElementId>,
    pub width: f64,
    pub height: f64,
    pub frame_rate: f64,
}

impl Document {
    /// New document with one scene and default stage settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timelines: vec![Timeline::new("Scene 1")],
            current_timeline: 0,
            library: Library::default(),
            data: DataStore::default(),
            selection: Vec::new(),
            width: 550.0,
            height: 400.0,
            frame_rate: 24.0,
        }
    }

    #[inline]
    pub fn timelines(&self) -> &[Timeline] {
        &self.timelines
    }

    pub fn timeline(&self, index: usize) -> Result<&Timeline, StageError> {
        self.timelines.get(index).ok_or(StageError::InvalidIndex {
            index,
            len: self.timelines.len(),
        })
    }

    pub fn timeline_mut(&mut self, index: usize) -> Result<&mut Timeline, StageError> {
        let len = self.timelines.len();
        self.timelines
            .get_mut(index)
            .ok_or(StageError::InvalidIndex { index, len })
    }

    #[inline]
    pub fn current_timeline_index(&self) -> usize {
        self.current_timeline
    }

    pub fn current_timeline(&self) -> &Timeline {
        &self.timelines[self.current_timeline]
    }

    pub fn current_timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timelines[self.current_timeline]
    }

    /// Switch scenes; clears the selection since it is frame-local.
    pub fn set_current_timeline(&mut self, index: usize) -> Result<(), StageError> {
        if index >= self.timelines.len() {
            return Err(StageError::InvalidIndex {
                index,
                len: self.timelines.len(),
            });
        }
        self.current_timeline = index;
        self.selection.clear();
        Ok(())
    }

    /// Append a scene; returns its index.
    pub fn add_timeline(&mut self, timeline: Timeline) -> usize {
        self.timelines.push(timeline);
        self.timelines.len() - 1
    }

    /// Replace the selection. Ids not present on the current frame of the
    /// current scene are dropped rather than kept as dangling references.
    pub fn select(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.selection = ids
            .into_iter()
            .filter(|id| self.find_on_current_frame(*id).is_some())
            .collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected ids, already pruned against the current frame: edits since
    /// the last `select` call may have removed elements.
    pub fn selection(&mut self) -> &[ElementId] {
        let keep: Vec<ElementId> = self
            .selection
            .iter()
            .copied()
            .filter(|id| self.find_on_current_frame(*id).is_some())
            .collect();
        self.selection = keep;
        &self.selection
    }

    /// Minimal stage rect covering the selection, `None` when nothing with
    /// geometry is selected.
    pub fn selection_bounds(&mut self) -> Option<Rect> {
        let ids: Vec<ElementId> = self.selection().to_vec();
        let elements: Vec<&Element> = ids
            .iter()
            .filter_map(|id| self.find_on_current_frame(*id))
            .collect();
        Frame::selection_bounds(elements)
    }

    /// Look an element up on the current frame, searching every layer of the
    /// current scene.
    pub fn find_on_current_frame(&self, id: ElementId) -> Option<&Element> {
        let tl = self.current_timeline();
        let frame = tl.current_frame;
        tl.layers()
            .iter()
            .filter_map(|layer| layer.span_at(frame))
            .find_map(|span| span.element(id))
    }
}
