//! Host session adapter: explicit multi-document context.
//!
//! Hosts talk to a `Session` rather than a hidden "current document"
//! singleton. All numeric domains coming over the host boundary (signed
//! depths, out-of-range ease amounts) are enforced or clamped here, before
//! reaching the core types.

use log::{debug, warn};

use crate::document::Document;
use crate::element::{Element, ElementId};
use crate::error::StageError;
use crate::frame::Frame;
use crate::tween::easing::{CurvePoint, EaseCurve};
use crate::tween::{ElementState, PropertyGroup, TweenType};

#[derive(Clone, Debug, Default)]
pub struct Session {
    documents: Vec<Document>,
    current: Option<usize>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a document and make it current. Returns its index.
    pub fn open_document(&mut self, document: Document) -> usize {
        debug!("session: open document '{}'", document.name);
        self.documents.push(document);
        let index = self.documents.len() - 1;
        self.current = Some(index);
        index
    }

    /// Close a document. The current pointer moves to the last remaining
    /// document, or clears when none are left.
    pub fn close_document(&mut self, index: usize) -> Result<Document, StageError> {
        if index >= self.documents.len() {
            return Err(StageError::InvalidIndex {
                index,
                len: self.documents.len(),
            });
        }
        let closed = self.documents.remove(index);
        debug!("session: close document '{}'", closed.name);
        self.current = match self.documents.len() {
            0 => None,
            n => Some(self.current.map_or(n - 1, |c| {
                if c > index {
                    c - 1
                } else {
                    c.min(n - 1)
                }
            })),
        };
        Ok(closed)
    }

    #[inline]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    #[inline]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn set_current(&mut self, index: usize) -> Result<(), StageError> {
        if index >= self.documents.len() {
            return Err(StageError::InvalidIndex {
                index,
                len: self.documents.len(),
            });
        }
        self.current = Some(index);
        Ok(())
    }

    pub fn current_document(&self) -> Result<&Document, StageError> {
        let index = self.current.ok_or(StageError::InvalidIndex {
            index: 0,
            len: self.documents.len(),
        })?;
        Ok(&self.documents[index])
    }

    pub fn current_document_mut(&mut self) -> Result<&mut Document, StageError> {
        let index = self.current.ok_or(StageError::InvalidIndex {
            index: 0,
            len: self.documents.len(),
        })?;
        Ok(&mut self.documents[index])
    }

    /// Keyframe span under the edit cursor (current layer, current frame).
    fn current_span_mut(&mut self) -> Result<&mut Frame, StageError> {
        let doc = self.current_document_mut()?;
        let frame = doc.current_timeline().current_frame;
        let tl = doc.current_timeline_mut();
        let layer_index = tl.current_layer;
        let layer = tl.layer_mut(layer_index)?;
        let len = layer.frame_count();
        layer.span_at_mut(frame).ok_or(StageError::InvalidIndex {
            index: frame,
            len,
        })
    }

    /// Place an element on the current frame. `depth` comes over the host
    /// boundary as a signed integer; negative values are rejected with
    /// `InvalidDepth`, values beyond the top clamp (append).
    pub fn add_element(&mut self, element: Element, depth: i64) -> Result<ElementId, StageError> {
        if depth < 0 {
            return Err(StageError::InvalidDepth { depth });
        }
        let span = self.current_span_mut()?;
        Ok(span.insert_element(element, Some(depth as usize)))
    }

    pub fn remove_element(&mut self, id: ElementId) -> Result<Option<Element>, StageError> {
        Ok(self.current_span_mut()?.remove_element(id))
    }

    /// Move an element to a host-supplied depth; negative → `InvalidDepth`.
    pub fn set_element_depth(&mut self, id: ElementId, depth: i64) -> Result<bool, StageError> {
        if depth < 0 {
            return Err(StageError::InvalidDepth { depth });
        }
        Ok(self.current_span_mut()?.reorder_element(id, depth as usize))
    }

    /// Set the tween type of the span under the edit cursor.
    pub fn set_tween_type(&mut self, tween_type: TweenType) -> Result<(), StageError> {
        self.current_span_mut()?.set_tween_type(tween_type);
        Ok(())
    }

    /// Set the scalar ease; host values outside [-100, 100] are clamped and
    /// the clamp is logged. No-op when the span has no tween descriptor.
    pub fn set_ease_amount(&mut self, amount: i64) -> Result<(), StageError> {
        let clamped = amount.clamp(-100, 100);
        if clamped != amount {
            warn!("session: ease amount {amount} clamped to {clamped}");
        }
        if let Some(tween) = self.current_span_mut()?.tween_mut() {
            tween.set_ease_amount(clamped as i32);
        }
        Ok(())
    }

    /// Install a custom ease curve from raw host control points; curve
    /// validation (count, range, monotonic x) happens in `EaseCurve::new`.
    pub fn set_custom_ease(
        &mut self,
        group: PropertyGroup,
        points: Vec<CurvePoint>,
    ) -> Result<(), StageError> {
        let curve = EaseCurve::new(points)?;
        if let Some(tween) = self.current_span_mut()?.tween_mut() {
            tween.set_custom_ease(group, curve);
        }
        Ok(())
    }

    /// Evaluate the current scene at a frame index.
    pub fn evaluate(&self, frame_index: usize) -> Result<Vec<ElementState>, StageError> {
        self.current_document()?
            .current_timeline()
            .evaluate(frame_index)
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
            Point::new(1.0, 0.0),
        ]))
    }

    #[test]
    fn open_close_moves_current() {
        let mut s = Session::new();
        assert!(s.current_document().is_err());
        let a = s.open_document(Document::new("a"));
        let b = s.open_document(Document::new("b"));
        assert_eq!(s.current_index(), Some(b));

        s.close_document(b).unwrap();
        assert_eq!(s.current_index(), Some(a));
        s.close_document(a).unwrap();
        assert_eq!(s.current_index(), None);
        assert!(s.current_document().is_err());
    }

    #[test]
    fn closing_earlier_document_keeps_current() {
        let mut s = Session::new();
        let a = s.open_document(Document::new("a"));
        s.open_document(Document::new("b"));
        s.close_document(a).unwrap();
        assert_eq!(s.current_document().unwrap().name, "b");
    }

    #[test]
    fn negative_depth_is_rejected() {
        let mut s = Session::new();
        s.open_document(Document::new("a"));
        let err = s.add_element(dot(), -1).unwrap_err();
        assert!(matches!(err, StageError::InvalidDepth { depth: -1 }));

        let id = s.add_element(dot(), 0).unwrap();
        let err = s.set_element_depth(id, -7).unwrap_err();
        assert!(matches!(err, StageError::InvalidDepth { depth: -7 }));
    }

    #[test]
    fn ease_amount_clamped_at_boundary() {
        let mut s = Session::new();
        s.open_document(Document::new("a"));
        s.set_tween_type(TweenType::Classic).unwrap();
        s.set_ease_amount(1_000).unwrap();
        let doc = s.current_document().unwrap();
        let span = doc
            .current_timeline()
            .layers()[0]
            .span_at(0)
            .unwrap();
        assert_eq!(span.tween().unwrap().ease_amount(), 100);
    }

    #[test]
    fn custom_ease_validated_at_boundary() {
        let mut s = Session::new();
        s.open_document(Document::new("a"));
        s.set_tween_type(TweenType::Classic).unwrap();
        let err = s
            .set_custom_ease(
                PropertyGroup::All,
                vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(1.5, 1.0)],
            )
            .unwrap_err();
        assert!(matches!(err, StageError::MalformedEaseCurve { .. }));
    }
}
