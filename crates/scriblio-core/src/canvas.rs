//! Canvas document and state management.

use crate::camera::Camera;
use crate::events::DocumentEvent;
use crate::shapes::{Shape, ShapeId};
use crate::tools::{ToolKind, ToolManager};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Maximum number of undo states to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// A snapshot of document state for undo/redo.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocumentSnapshot {
    /// All shapes in the snapshot.
    shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes.
    z_order: Vec<ShapeId>,
}

/// A canvas document containing all shapes.
///
/// Mutations are recorded as [`DocumentEvent`]s; the app drains them each
/// frame and feeds them to the mini-map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasDocument {
    /// Unique document identifier.
    pub id: String,
    /// All shapes in the document, keyed by ID.
    pub shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes (back to front).
    pub z_order: Vec<ShapeId>,
    /// Undo history stack.
    #[serde(skip)]
    undo_stack: Vec<DocumentSnapshot>,
    /// Redo history stack.
    #[serde(skip)]
    redo_stack: Vec<DocumentSnapshot>,
    /// Mutation events not yet drained.
    #[serde(skip)]
    pending_events: Vec<DocumentEvent>,
}

impl Default for CanvasDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            shapes: HashMap::new(),
            z_order: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            pending_events: Vec::new(),
        }
    }

    /// Take all pending mutation events, in emission order.
    pub fn take_events(&mut self) -> Vec<DocumentEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check whether mutation events are waiting to be drained.
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    /// Take a snapshot of the current document state for undo.
    fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            shapes: self.shapes.clone(),
            z_order: self.z_order.clone(),
        }
    }

    /// Push current state to undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.undo_stack.push(snapshot);

        // Clear redo stack when new changes are made
        self.redo_stack.clear();

        // Limit undo history size
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Restore a snapshot, emitting events so mirrors rebuild.
    fn restore(&mut self, snapshot: DocumentSnapshot) {
        self.shapes = snapshot.shapes;
        self.z_order = snapshot.z_order;
        self.pending_events.push(DocumentEvent::Cleared);
        for &id in &self.z_order {
            self.pending_events.push(DocumentEvent::ShapeAdded(id));
        }
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        if let Some(snapshot) = self.undo_stack.pop() {
            let current = self.snapshot();
            self.redo_stack.push(current);
            self.restore(snapshot);
            true
        } else {
            false
        }
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        if let Some(snapshot) = self.redo_stack.pop() {
            let current = self.snapshot();
            self.undo_stack.push(current);
            self.restore(snapshot);
            true
        } else {
            false
        }
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Add a shape to the document.
    pub fn add_shape(&mut self, shape: Shape) {
        let id = shape.id();
        self.z_order.push(id);
        self.shapes.insert(id, shape);
        self.pending_events.push(DocumentEvent::ShapeAdded(id));
    }

    /// Remove a shape from the document.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        self.z_order.retain(|&shape_id| shape_id != id);
        let removed = self.shapes.remove(&id);
        if removed.is_some() {
            self.pending_events.push(DocumentEvent::ShapeRemoved(id));
        }
        removed
    }

    /// Clear all shapes from the document.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.z_order.clear();
        self.pending_events.push(DocumentEvent::Cleared);
    }

    /// Record that a shape was modified in place.
    ///
    /// Callers mutate through [`get_shape_mut`](Self::get_shape_mut) and then
    /// notify; one event is recorded per change, never coalesced.
    pub fn notify_modified(&mut self, id: ShapeId) {
        if self.shapes.contains_key(&id) {
            self.pending_events.push(DocumentEvent::ShapeModified(id));
        }
    }

    /// Get a shape by ID.
    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Get a mutable reference to a shape by ID.
    pub fn get_shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    /// Get shapes in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Find shapes at a point (in world coordinates).
    pub fn shapes_at_point(&self, point: Point, tolerance: f64) -> Vec<ShapeId> {
        // Return in reverse z-order (front to back) for selection priority
        self.z_order
            .iter()
            .rev()
            .filter_map(|&id| {
                self.shapes
                    .get(&id)
                    .filter(|s| s.hit_test(point, tolerance))
                    .map(|_| id)
            })
            .collect()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Get the number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }
}

/// Runtime canvas state (not persisted).
#[derive(Debug, Clone)]
pub struct Canvas {
    /// The document being edited.
    pub document: CanvasDocument,
    /// Camera for view transform.
    pub camera: Camera,
    /// Tool manager.
    pub tool_manager: ToolManager,
    /// Currently selected shape IDs.
    pub selection: Vec<ShapeId>,
    /// Viewport size.
    pub viewport_size: kurbo::Size,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a new canvas with an empty document.
    pub fn new() -> Self {
        Self {
            document: CanvasDocument::new(),
            camera: Camera::new(),
            tool_manager: ToolManager::new(),
            selection: Vec::new(),
            viewport_size: kurbo::Size::new(800.0, 600.0),
        }
    }

    /// Set the viewport size.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = kurbo::Size::new(width, height);
    }

    /// Select a shape (clears previous selection).
    pub fn select(&mut self, id: ShapeId) {
        self.selection.clear();
        self.selection.push(id);
    }

    /// Add to selection.
    pub fn add_to_selection(&mut self, id: ShapeId) {
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
    }

    /// Clear selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Select all shapes.
    pub fn select_all(&mut self) {
        self.selection = self.document.z_order.clone();
    }

    /// Check if a shape is selected.
    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection.contains(&id)
    }

    /// Set the current tool, cancelling any gesture in flight first.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool_manager.set_tool(tool, &mut self.document);
    }

    /// Delete selected shapes.
    pub fn delete_selected(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.document.push_undo();
        for id in self.selection.drain(..).collect::<Vec<_>>() {
            self.document.remove_shape(id);
        }
    }

    /// Remove a shape from the canvas.
    pub fn remove_shape(&mut self, id: ShapeId) {
        self.selection.retain(|&s| s != id);
        self.document.remove_shape(id);
    }

    /// Remove all shapes.
    pub fn clear_all(&mut self) {
        if self.document.is_empty() {
            return;
        }
        self.document.push_undo();
        self.selection.clear();
        self.document.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, ShapeTrait};

    #[test]
    fn test_document_creation() {
        let doc = CanvasDocument::new();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_add_shape() {
        let mut doc = CanvasDocument::new();
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        let id = rect.id();

        doc.add_shape(Shape::Rectangle(rect));
        assert_eq!(doc.len(), 1);
        assert!(doc.get_shape(id).is_some());
        assert_eq!(doc.take_events(), vec![DocumentEvent::ShapeAdded(id)]);
    }

    #[test]
    fn test_remove_shape() {
        let mut doc = CanvasDocument::new();
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        let id = rect.id();

        doc.add_shape(Shape::Rectangle(rect));
        let removed = doc.remove_shape(id);

        assert!(removed.is_some());
        assert!(doc.is_empty());
        assert_eq!(
            doc.take_events(),
            vec![
                DocumentEvent::ShapeAdded(id),
                DocumentEvent::ShapeRemoved(id)
            ]
        );
    }

    #[test]
    fn test_remove_unknown_shape_emits_nothing() {
        let mut doc = CanvasDocument::new();
        assert!(doc.remove_shape(Uuid::new_v4()).is_none());
        assert!(!doc.has_pending_events());
    }

    #[test]
    fn test_notify_modified() {
        let mut doc = CanvasDocument::new();
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        let id = rect.id();
        doc.add_shape(Shape::Rectangle(rect));
        doc.take_events();

        doc.notify_modified(id);
        assert_eq!(doc.take_events(), vec![DocumentEvent::ShapeModified(id)]);
    }

    #[test]
    fn test_events_preserve_order() {
        let mut doc = CanvasDocument::new();
        let a = Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0);
        let b = Rectangle::new(Point::new(20.0, 20.0), 10.0, 10.0);
        let (ia, ib) = (a.id(), b.id());
        doc.add_shape(Shape::Rectangle(a));
        doc.add_shape(Shape::Rectangle(b));
        doc.notify_modified(ia);
        doc.remove_shape(ib);
        assert_eq!(
            doc.take_events(),
            vec![
                DocumentEvent::ShapeAdded(ia),
                DocumentEvent::ShapeAdded(ib),
                DocumentEvent::ShapeModified(ia),
                DocumentEvent::ShapeRemoved(ib),
            ]
        );
    }

    #[test]
    fn test_shapes_at_point() {
        let mut doc = CanvasDocument::new();
        let mut rect1 = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        let mut rect2 = Rectangle::new(Point::new(50.0, 50.0), 100.0, 100.0);
        rect1.style.fill_color = Some(crate::shapes::SerializableColor::black());
        rect2.style.fill_color = Some(crate::shapes::SerializableColor::black());
        let id1 = rect1.id();
        let id2 = rect2.id();

        doc.add_shape(Shape::Rectangle(rect1));
        doc.add_shape(Shape::Rectangle(rect2));

        // Point in both shapes
        let hits = doc.shapes_at_point(Point::new(75.0, 75.0), 0.0);
        assert_eq!(hits.len(), 2);
        // Front shape should be first
        assert_eq!(hits[0], id2);
        assert_eq!(hits[1], id1);

        // Point only in rect1
        let hits = doc.shapes_at_point(Point::new(25.0, 25.0), 0.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0], id1);
    }

    #[test]
    fn test_canvas_selection() {
        let mut canvas = Canvas::new();
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        let id = rect.id();

        canvas.document.add_shape(Shape::Rectangle(rect));

        assert!(!canvas.is_selected(id));
        canvas.select(id);
        assert!(canvas.is_selected(id));
        canvas.clear_selection();
        assert!(!canvas.is_selected(id));
    }

    #[test]
    fn test_delete_selected() {
        let mut canvas = Canvas::new();
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        let id = rect.id();

        canvas.document.add_shape(Shape::Rectangle(rect));
        canvas.select(id);
        canvas.delete_selected();

        assert!(canvas.document.is_empty());
        assert!(canvas.selection.is_empty());
        assert!(canvas.document.can_undo());
    }

    #[test]
    fn test_clear_all() {
        let mut canvas = Canvas::new();
        canvas
            .document
            .add_shape(Shape::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0)));
        canvas.clear_all();
        assert!(canvas.document.is_empty());

        // Clearing an already-empty document pushes no extra undo state
        let depth_marker = canvas.document.can_undo();
        canvas.clear_all();
        assert_eq!(canvas.document.can_undo(), depth_marker);
    }

    #[test]
    fn test_undo_add_shape() {
        let mut doc = CanvasDocument::new();

        doc.push_undo();
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        let id = rect.id();
        doc.add_shape(Shape::Rectangle(rect));

        assert_eq!(doc.len(), 1);
        assert!(doc.can_undo());

        // Undo should remove the shape
        assert!(doc.undo());
        assert!(doc.is_empty());
        assert!(doc.can_redo());

        // Redo should restore the shape
        assert!(doc.redo());
        assert_eq!(doc.len(), 1);
        assert!(doc.get_shape(id).is_some());
    }

    #[test]
    fn test_undo_emits_rebuild_events() {
        let mut doc = CanvasDocument::new();
        doc.push_undo();
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        doc.add_shape(Shape::Rectangle(rect));
        doc.take_events();

        doc.undo();
        let events = doc.take_events();
        assert_eq!(events, vec![DocumentEvent::Cleared]);

        doc.redo();
        let events = doc.take_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], DocumentEvent::Cleared);
        assert!(matches!(events[1], DocumentEvent::ShapeAdded(_)));
    }

    #[test]
    fn test_undo_clears_redo() {
        let mut doc = CanvasDocument::new();

        doc.push_undo();
        let rect1 = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        doc.add_shape(Shape::Rectangle(rect1));

        assert!(doc.undo());
        assert!(doc.can_redo());

        // Add new shape (should clear redo)
        doc.push_undo();
        let rect2 = Rectangle::new(Point::new(50.0, 50.0), 100.0, 100.0);
        doc.add_shape(Shape::Rectangle(rect2));

        assert!(!doc.can_redo());
    }

    #[test]
    fn test_undo_empty_stack() {
        let mut doc = CanvasDocument::new();

        assert!(!doc.can_undo());
        assert!(!doc.undo());

        assert!(!doc.can_redo());
        assert!(!doc.redo());
    }
}
