//! Tool system for the whiteboard.
//!
//! The active tool owns at most one gesture at a time: press inserts the
//! shape, move reshapes it from the anchor, release drops the in-progress
//! reference (the shape stays on the surface). Switching tools goes through
//! [`ToolManager::set_tool`], the single detach/attach transition point, so
//! a gesture can never be handled by two tools.

use crate::canvas::CanvasDocument;
use crate::shapes::{Ellipse, Freehand, Rectangle, Shape, ShapeId, ShapeStyle, Text};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Draw,
    Rectangle,
    Circle,
    Text,
}

/// State of a tool gesture.
#[derive(Debug, Clone, Copy, Default)]
pub enum ToolState {
    /// Tool is idle, waiting for interaction.
    #[default]
    Idle,
    /// A gesture is in flight.
    Active {
        /// Pointer-down position in world coordinates.
        anchor: Point,
        /// Shape being sized by this gesture.
        in_progress: ShapeId,
    },
}

/// Manages the current tool and its gesture state.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current state of the tool.
    pub state: ToolState,
    /// Style applied to newly created shapes (stroke color from the picker).
    pub current_style: ShapeStyle,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool.
    ///
    /// Any gesture in flight is resolved first: the in-progress reference is
    /// dropped (the shape stays as created so far) and the state resets, so
    /// re-binding is idempotent and the old tool can never see another event.
    pub fn set_tool(&mut self, tool: ToolKind, document: &mut CanvasDocument) {
        if let ToolState::Active { .. } = self.state {
            self.end(document);
        }
        self.current_tool = tool;
        self.state = ToolState::Idle;
    }

    /// Check if a gesture is in flight.
    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Active { .. })
    }

    /// The shape currently being sized, if any.
    pub fn in_progress(&self) -> Option<ShapeId> {
        match self.state {
            ToolState::Active { in_progress, .. } => Some(in_progress),
            ToolState::Idle => None,
        }
    }

    /// Begin a gesture at `point` (world coordinates).
    ///
    /// Drawing tools insert their zero-size shape here and return its id.
    /// The text tool inserts the placeholder text and returns its id without
    /// entering the Active state (text is placed by a single press). Select
    /// creates nothing.
    pub fn begin(&mut self, point: Point, document: &mut CanvasDocument) -> Option<ShapeId> {
        match self.current_tool {
            ToolKind::Select => None,
            ToolKind::Draw => {
                let mut stroke = Freehand::from_points(vec![point]);
                stroke.style = self.current_style.clone();
                let shape = Shape::Freehand(stroke);
                let id = shape.id();
                document.push_undo();
                document.add_shape(shape);
                self.state = ToolState::Active {
                    anchor: point,
                    in_progress: id,
                };
                Some(id)
            }
            ToolKind::Rectangle => {
                let mut rect = Rectangle::new(point, 0.0, 0.0);
                rect.style = self.current_style.clone();
                let shape = Shape::Rectangle(rect);
                let id = shape.id();
                document.push_undo();
                document.add_shape(shape);
                self.state = ToolState::Active {
                    anchor: point,
                    in_progress: id,
                };
                Some(id)
            }
            ToolKind::Circle => {
                let mut circle = Ellipse::circle(point, 0.0);
                circle.style = self.current_style.clone();
                let shape = Shape::Ellipse(circle);
                let id = shape.id();
                document.push_undo();
                document.add_shape(shape);
                self.state = ToolState::Active {
                    anchor: point,
                    in_progress: id,
                };
                Some(id)
            }
            ToolKind::Text => {
                let mut text = Text::placeholder(point);
                text.style = self.current_style.clone();
                let shape = Shape::Text(text);
                let id = shape.id();
                document.push_undo();
                document.add_shape(shape);
                Some(id)
            }
        }
    }

    /// Update the gesture with a new pointer position.
    ///
    /// A move with no gesture in flight is a no-op.
    pub fn update(&mut self, point: Point, document: &mut CanvasDocument) {
        let ToolState::Active { anchor, in_progress } = self.state else {
            return;
        };
        let Some(shape) = document.get_shape_mut(in_progress) else {
            return;
        };

        match shape {
            Shape::Freehand(stroke) => stroke.add_point(point),
            Shape::Rectangle(rect) => rect.set_corners(anchor, point),
            Shape::Ellipse(circle) => circle.set_circle_from_gesture(anchor, point),
            Shape::Text(_) => return,
        }
        document.notify_modified(in_progress);
    }

    /// End the gesture, dropping the in-progress reference.
    ///
    /// Returns the id of the completed shape, which remains on the surface.
    pub fn end(&mut self, _document: &mut CanvasDocument) -> Option<ShapeId> {
        let finished = self.in_progress();
        self.state = ToolState::Idle;
        finished
    }

    /// Abort the gesture, removing the unfinished shape from the surface.
    pub fn cancel(&mut self, document: &mut CanvasDocument) {
        if let Some(id) = self.in_progress() {
            document.remove_shape(id);
        }
        self.state = ToolState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::DocumentEvent;

    fn manager_with(tool: ToolKind) -> (ToolManager, CanvasDocument) {
        let mut doc = CanvasDocument::new();
        let mut tm = ToolManager::new();
        tm.set_tool(tool, &mut doc);
        (tm, doc)
    }

    #[test]
    fn test_tool_selection() {
        let mut doc = CanvasDocument::new();
        let mut tm = ToolManager::new();
        assert_eq!(tm.current_tool, ToolKind::Select);

        tm.set_tool(ToolKind::Rectangle, &mut doc);
        assert_eq!(tm.current_tool, ToolKind::Rectangle);
    }

    #[test]
    fn test_rectangle_gesture_geometry() {
        let (mut tm, mut doc) = manager_with(ToolKind::Rectangle);

        tm.begin(Point::new(10.0, 10.0), &mut doc);
        tm.update(Point::new(110.0, 60.0), &mut doc);
        let id = tm.end(&mut doc).unwrap();

        let Some(Shape::Rectangle(rect)) = doc.get_shape(id) else {
            panic!("expected rectangle");
        };
        assert!((rect.position.x - 10.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 10.0).abs() < f64::EPSILON);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rectangle_gesture_reversed_corners() {
        let (mut tm, mut doc) = manager_with(ToolKind::Rectangle);

        tm.begin(Point::new(110.0, 60.0), &mut doc);
        tm.update(Point::new(10.0, 10.0), &mut doc);
        let id = tm.end(&mut doc).unwrap();

        let Some(Shape::Rectangle(rect)) = doc.get_shape(id) else {
            panic!("expected rectangle");
        };
        assert!((rect.position.x - 10.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 10.0).abs() < f64::EPSILON);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_circle_gesture_geometry() {
        let (mut tm, mut doc) = manager_with(ToolKind::Circle);

        tm.begin(Point::new(0.0, 0.0), &mut doc);
        tm.update(Point::new(40.0, 0.0), &mut doc);
        let id = tm.end(&mut doc).unwrap();

        let Some(Shape::Ellipse(circle)) = doc.get_shape(id) else {
            panic!("expected ellipse");
        };
        assert!((circle.center.x - 20.0).abs() < f64::EPSILON);
        assert!(circle.center.y.abs() < f64::EPSILON);
        assert!((circle.radius_x - 20.0).abs() < f64::EPSILON);
        assert!((circle.radius_y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_circle_radius_is_half_distance() {
        let (mut tm, mut doc) = manager_with(ToolKind::Circle);

        tm.begin(Point::new(3.0, 4.0), &mut doc);
        tm.update(Point::new(6.0, 8.0), &mut doc);
        let id = tm.end(&mut doc).unwrap();

        let Some(Shape::Ellipse(circle)) = doc.get_shape(id) else {
            panic!("expected ellipse");
        };
        // distance((3,4),(6,8)) = 5
        assert!((circle.radius_x - 2.5).abs() < 1e-12);
        assert!((circle.center.x - 4.5).abs() < 1e-12);
        assert!((circle.center.y - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_draw_accumulates_points() {
        let (mut tm, mut doc) = manager_with(ToolKind::Draw);

        tm.begin(Point::new(0.0, 0.0), &mut doc);
        tm.update(Point::new(5.0, 5.0), &mut doc);
        tm.update(Point::new(10.0, 0.0), &mut doc);
        let id = tm.end(&mut doc).unwrap();

        let Some(Shape::Freehand(stroke)) = doc.get_shape(id) else {
            panic!("expected freehand");
        };
        assert_eq!(stroke.len(), 3);
    }

    #[test]
    fn test_move_without_gesture_is_noop() {
        let (mut tm, mut doc) = manager_with(ToolKind::Rectangle);

        tm.update(Point::new(50.0, 50.0), &mut doc);
        assert!(doc.is_empty());
        assert!(!doc.has_pending_events());
    }

    #[test]
    fn test_select_tool_creates_nothing() {
        let (mut tm, mut doc) = manager_with(ToolKind::Select);

        assert!(tm.begin(Point::new(0.0, 0.0), &mut doc).is_none());
        assert!(!tm.is_active());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_text_places_without_gesture() {
        let (mut tm, mut doc) = manager_with(ToolKind::Text);

        let id = tm.begin(Point::new(30.0, 40.0), &mut doc).unwrap();
        assert!(!tm.is_active());

        let Some(Shape::Text(text)) = doc.get_shape(id) else {
            panic!("expected text");
        };
        assert_eq!(text.content, crate::shapes::TEXT_PLACEHOLDER);
        assert!((text.position.x - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_tool_resolves_active_gesture() {
        let (mut tm, mut doc) = manager_with(ToolKind::Rectangle);

        tm.begin(Point::new(0.0, 0.0), &mut doc);
        tm.update(Point::new(20.0, 20.0), &mut doc);
        assert!(tm.is_active());

        tm.set_tool(ToolKind::Circle, &mut doc);
        assert!(!tm.is_active());
        assert_eq!(tm.current_tool, ToolKind::Circle);
        // The partially drawn rectangle stays on the surface
        assert_eq!(doc.len(), 1);

        // The new tool's gesture touches only its own shape
        tm.begin(Point::new(100.0, 100.0), &mut doc);
        tm.update(Point::new(140.0, 100.0), &mut doc);
        tm.end(&mut doc);
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_cancel_removes_unfinished_shape() {
        let (mut tm, mut doc) = manager_with(ToolKind::Circle);

        tm.begin(Point::new(0.0, 0.0), &mut doc);
        assert_eq!(doc.len(), 1);

        tm.cancel(&mut doc);
        assert!(!tm.is_active());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_gesture_emits_modify_events() {
        let (mut tm, mut doc) = manager_with(ToolKind::Rectangle);

        let id = tm.begin(Point::new(0.0, 0.0), &mut doc).unwrap();
        doc.take_events();

        tm.update(Point::new(10.0, 10.0), &mut doc);
        tm.update(Point::new(20.0, 20.0), &mut doc);
        assert_eq!(
            doc.take_events(),
            vec![
                DocumentEvent::ShapeModified(id),
                DocumentEvent::ShapeModified(id)
            ]
        );
    }

    #[test]
    fn test_new_shapes_carry_current_style() {
        let (mut tm, mut doc) = manager_with(ToolKind::Rectangle);
        tm.current_style.stroke_color = crate::shapes::SerializableColor::new(139, 92, 246, 255);

        let id = tm.begin(Point::new(0.0, 0.0), &mut doc).unwrap();
        let style = doc.get_shape(id).unwrap().style();
        assert_eq!(style.stroke_color.r, 139);
        assert!(style.fill_color.is_none());
    }
}
