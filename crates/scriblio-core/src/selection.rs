//! Selection handles and direct manipulation (move/resize/rotate).

use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Rect, Vec2};
use std::collections::HashMap;

/// Handle size in screen pixels.
pub const HANDLE_SIZE: f64 = 16.0;
/// Hit tolerance for handles in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 24.0;
/// Distance of the rotate handle above the top edge, in screen pixels.
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;
/// Smallest width/height a resize can produce.
const MIN_SHAPE_SIZE: f64 = 1.0;

/// Which handle of a selected shape is being manipulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Corner(Corner),
    Edge(Edge),
    Rotate,
}

/// Corner identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// A manipulation handle with its world-space position.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        (dx * dx + dy * dy).sqrt() <= tolerance
    }
}

/// Get the manipulation handles for a shape.
///
/// All shapes expose corner and edge handles on their bounding box; shapes
/// that support rotation also get a rotate handle above the top edge.
/// `zoom` scales the rotate-handle offset so it keeps a constant screen
/// distance.
pub fn get_handles(shape: &Shape, zoom: f64) -> Vec<Handle> {
    let bounds = shape.bounds();
    let cx = bounds.center().x;

    let mut handles = vec![
        Handle::new(Point::new(bounds.x0, bounds.y0), HandleKind::Corner(Corner::TopLeft)),
        Handle::new(Point::new(bounds.x1, bounds.y0), HandleKind::Corner(Corner::TopRight)),
        Handle::new(Point::new(bounds.x0, bounds.y1), HandleKind::Corner(Corner::BottomLeft)),
        Handle::new(Point::new(bounds.x1, bounds.y1), HandleKind::Corner(Corner::BottomRight)),
        Handle::new(Point::new(cx, bounds.y0), HandleKind::Edge(Edge::Top)),
        Handle::new(Point::new(cx, bounds.y1), HandleKind::Edge(Edge::Bottom)),
        Handle::new(Point::new(bounds.x0, bounds.center().y), HandleKind::Edge(Edge::Left)),
        Handle::new(Point::new(bounds.x1, bounds.center().y), HandleKind::Edge(Edge::Right)),
    ];

    if shape.supports_rotation() {
        let offset = ROTATE_HANDLE_OFFSET / zoom.max(f64::EPSILON);
        handles.push(Handle::new(
            Point::new(cx, bounds.y0 - offset),
            HandleKind::Rotate,
        ));
    }

    handles
}

/// Find the handle of a shape at a point, if any.
pub fn hit_test_handles(shape: &Shape, point: Point, tolerance: f64, zoom: f64) -> Option<HandleKind> {
    get_handles(shape, zoom)
        .into_iter()
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.kind)
}

/// State for a single-shape handle manipulation (resize/rotate).
#[derive(Debug, Clone)]
pub struct ManipulationState {
    /// Shape being manipulated.
    pub shape_id: ShapeId,
    /// Handle being dragged (None = whole-shape move).
    pub handle: Option<HandleKind>,
    /// World point where the drag started.
    pub start_point: Point,
    /// Current world point of the drag.
    pub current_point: Point,
    /// Shape as it was when the drag started.
    pub original_shape: Shape,
}

impl ManipulationState {
    pub fn new(
        shape_id: ShapeId,
        handle: Option<HandleKind>,
        start_point: Point,
        original_shape: Shape,
    ) -> Self {
        Self {
            shape_id,
            handle,
            start_point,
            current_point: start_point,
            original_shape,
        }
    }

    /// Total drag delta so far.
    pub fn delta(&self) -> Vec2 {
        Vec2::new(
            self.current_point.x - self.start_point.x,
            self.current_point.y - self.start_point.y,
        )
    }
}

/// State for moving the whole selection.
#[derive(Debug, Clone)]
pub struct MultiMoveState {
    /// World point where the drag started.
    pub start_point: Point,
    /// Current world point of the drag.
    pub current_point: Point,
    /// Shapes as they were when the drag started.
    pub original_shapes: HashMap<ShapeId, Shape>,
}

impl MultiMoveState {
    pub fn new(start_point: Point, original_shapes: HashMap<ShapeId, Shape>) -> Self {
        Self {
            start_point,
            current_point: start_point,
            original_shapes,
        }
    }

    /// Total drag delta so far.
    pub fn delta(&self) -> Vec2 {
        Vec2::new(
            self.current_point.x - self.start_point.x,
            self.current_point.y - self.start_point.y,
        )
    }

    pub fn shape_ids(&self) -> Vec<ShapeId> {
        self.original_shapes.keys().copied().collect()
    }
}

/// Compute the resized bounds for a handle drag, clamped to a minimum size.
fn resized_bounds(bounds: Rect, handle: HandleKind, delta: Vec2) -> Rect {
    let mut x0 = bounds.x0;
    let mut y0 = bounds.y0;
    let mut x1 = bounds.x1;
    let mut y1 = bounds.y1;

    match handle {
        HandleKind::Corner(Corner::TopLeft) => {
            x0 += delta.x;
            y0 += delta.y;
        }
        HandleKind::Corner(Corner::TopRight) => {
            x1 += delta.x;
            y0 += delta.y;
        }
        HandleKind::Corner(Corner::BottomLeft) => {
            x0 += delta.x;
            y1 += delta.y;
        }
        HandleKind::Corner(Corner::BottomRight) => {
            x1 += delta.x;
            y1 += delta.y;
        }
        HandleKind::Edge(Edge::Top) => y0 += delta.y,
        HandleKind::Edge(Edge::Bottom) => y1 += delta.y,
        HandleKind::Edge(Edge::Left) => x0 += delta.x,
        HandleKind::Edge(Edge::Right) => x1 += delta.x,
        HandleKind::Rotate => {}
    }

    // Keep the opposite side fixed; never let the shape collapse or flip
    match handle {
        HandleKind::Corner(Corner::TopLeft) | HandleKind::Corner(Corner::BottomLeft) => {
            x0 = x0.min(x1 - MIN_SHAPE_SIZE);
        }
        HandleKind::Corner(Corner::TopRight) | HandleKind::Corner(Corner::BottomRight) => {
            x1 = x1.max(x0 + MIN_SHAPE_SIZE);
        }
        HandleKind::Edge(Edge::Left) => x0 = x0.min(x1 - MIN_SHAPE_SIZE),
        HandleKind::Edge(Edge::Right) => x1 = x1.max(x0 + MIN_SHAPE_SIZE),
        _ => {}
    }
    match handle {
        HandleKind::Corner(Corner::TopLeft) | HandleKind::Corner(Corner::TopRight) => {
            y0 = y0.min(y1 - MIN_SHAPE_SIZE);
        }
        HandleKind::Corner(Corner::BottomLeft) | HandleKind::Corner(Corner::BottomRight) => {
            y1 = y1.max(y0 + MIN_SHAPE_SIZE);
        }
        HandleKind::Edge(Edge::Top) => y0 = y0.min(y1 - MIN_SHAPE_SIZE),
        HandleKind::Edge(Edge::Bottom) => y1 = y1.max(y0 + MIN_SHAPE_SIZE),
        _ => {}
    }

    Rect::new(x0, y0, x1, y1)
}

/// The corner or edge that stays fixed while a handle is dragged.
fn resize_anchor(bounds: Rect, handle: HandleKind) -> Point {
    match handle {
        HandleKind::Corner(Corner::TopLeft) => Point::new(bounds.x1, bounds.y1),
        HandleKind::Corner(Corner::TopRight) => Point::new(bounds.x0, bounds.y1),
        HandleKind::Corner(Corner::BottomLeft) => Point::new(bounds.x1, bounds.y0),
        HandleKind::Corner(Corner::BottomRight) => Point::new(bounds.x0, bounds.y0),
        HandleKind::Edge(Edge::Top) | HandleKind::Edge(Edge::Left) => {
            Point::new(bounds.x1, bounds.y1)
        }
        HandleKind::Edge(Edge::Bottom) | HandleKind::Edge(Edge::Right) => {
            Point::new(bounds.x0, bounds.y0)
        }
        HandleKind::Rotate => bounds.center(),
    }
}

/// Produce the manipulated shape from its original, a handle, and a delta.
///
/// `handle == None` moves the whole shape. `keep_aspect_ratio` forces a
/// uniform scale (shift-drag).
pub fn apply_manipulation(
    original: &Shape,
    handle: Option<HandleKind>,
    delta: Vec2,
    keep_aspect_ratio: bool,
) -> Shape {
    let mut shape = original.clone();

    let Some(handle) = handle else {
        shape.transform(kurbo::Affine::translate(delta));
        return shape;
    };

    if handle == HandleKind::Rotate {
        // Rotation is applied through apply_rotation, not deltas
        return shape;
    }

    let old_bounds = original.bounds();
    if old_bounds.width() < f64::EPSILON || old_bounds.height() < f64::EPSILON {
        return shape;
    }

    let new_bounds = resized_bounds(old_bounds, handle, delta);
    let mut sx = new_bounds.width() / old_bounds.width();
    let mut sy = new_bounds.height() / old_bounds.height();

    if keep_aspect_ratio {
        let s = match handle {
            HandleKind::Edge(Edge::Left) | HandleKind::Edge(Edge::Right) => sx,
            HandleKind::Edge(Edge::Top) | HandleKind::Edge(Edge::Bottom) => sy,
            _ => sx.max(sy),
        };
        sx = s;
        sy = s;
    }

    // Scale about the fixed anchor so the opposite side stays put
    let anchor = resize_anchor(old_bounds, handle);
    let affine = kurbo::Affine::translate(Vec2::new(anchor.x, anchor.y))
        * kurbo::Affine::scale_non_uniform(sx, sy)
        * kurbo::Affine::translate(Vec2::new(-anchor.x, -anchor.y));
    shape.transform(affine);
    shape
}

/// Rotate a shape so its rotate handle follows the cursor.
///
/// Returns the applied angle in radians. When `snap_to_15deg` is set the
/// angle snaps to 15° increments.
pub fn apply_rotation(shape: &mut Shape, cursor_point: Point, snap_to_15deg: bool) -> f64 {
    let center = shape.bounds().center();
    // The rotate handle sits above the shape, so straight up is zero
    let mut angle =
        (cursor_point.y - center.y).atan2(cursor_point.x - center.x) + std::f64::consts::FRAC_PI_2;

    if snap_to_15deg {
        let step = 15f64.to_radians();
        angle = (angle / step).round() * step;
    }

    shape.set_rotation(angle);
    angle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Ellipse, Freehand, Rectangle, Text};

    fn rect_shape() -> Shape {
        Shape::Rectangle(Rectangle::new(Point::new(10.0, 10.0), 100.0, 50.0))
    }

    #[test]
    fn test_handles_cover_corners_and_edges() {
        let shape = rect_shape();
        let handles = get_handles(&shape, 1.0);
        // 4 corners + 4 edges + rotate
        assert_eq!(handles.len(), 9);
        assert!(handles
            .iter()
            .any(|h| h.kind == HandleKind::Corner(Corner::TopLeft)
                && (h.position.x - 10.0).abs() < f64::EPSILON));
        assert!(handles.iter().any(|h| h.kind == HandleKind::Rotate));
    }

    #[test]
    fn test_freehand_has_no_rotate_handle() {
        let shape = Shape::Freehand(Freehand::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
        ]));
        let handles = get_handles(&shape, 1.0);
        assert_eq!(handles.len(), 8);
    }

    #[test]
    fn test_hit_test_handles() {
        let shape = rect_shape();
        let hit = hit_test_handles(&shape, Point::new(110.0, 60.0), 5.0, 1.0);
        assert_eq!(hit, Some(HandleKind::Corner(Corner::BottomRight)));
        assert!(hit_test_handles(&shape, Point::new(60.0, 35.0), 5.0, 1.0).is_none());
    }

    #[test]
    fn test_move_manipulation() {
        let shape = rect_shape();
        let moved = apply_manipulation(&shape, None, Vec2::new(5.0, -3.0), false);
        let bounds = moved.bounds();
        assert!((bounds.x0 - 15.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 7.0).abs() < f64::EPSILON);
        assert!((bounds.width() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_corner_resize_keeps_anchor() {
        let shape = rect_shape();
        let resized = apply_manipulation(
            &shape,
            Some(HandleKind::Corner(Corner::BottomRight)),
            Vec2::new(50.0, 25.0),
            false,
        );
        let bounds = resized.bounds();
        // Top-left anchor unchanged
        assert!((bounds.x0 - 10.0).abs() < 1e-9);
        assert!((bounds.y0 - 10.0).abs() < 1e-9);
        assert!((bounds.width() - 150.0).abs() < 1e-9);
        assert!((bounds.height() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_edge_resize_single_axis() {
        let shape = rect_shape();
        let resized = apply_manipulation(
            &shape,
            Some(HandleKind::Edge(Edge::Right)),
            Vec2::new(20.0, 99.0),
            false,
        );
        let bounds = resized.bounds();
        assert!((bounds.width() - 120.0).abs() < 1e-9);
        assert!((bounds.height() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_clamps_to_minimum() {
        let shape = rect_shape();
        let resized = apply_manipulation(
            &shape,
            Some(HandleKind::Corner(Corner::BottomRight)),
            Vec2::new(-500.0, -500.0),
            false,
        );
        let bounds = resized.bounds();
        assert!(bounds.width() >= 0.9);
        assert!(bounds.height() >= 0.9);
    }

    #[test]
    fn test_aspect_ratio_resize() {
        let shape = Shape::Rectangle(Rectangle::new(Point::ZERO, 100.0, 100.0));
        let resized = apply_manipulation(
            &shape,
            Some(HandleKind::Corner(Corner::BottomRight)),
            Vec2::new(100.0, 0.0),
            true,
        );
        let bounds = resized.bounds();
        assert!((bounds.width() - bounds.height()).abs() < 1e-9);
        assert!((bounds.width() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_ellipse_resize() {
        let shape = Shape::Ellipse(Ellipse::new(Point::new(50.0, 50.0), 30.0, 20.0));
        let resized = apply_manipulation(
            &shape,
            Some(HandleKind::Edge(Edge::Right)),
            Vec2::new(60.0, 0.0),
            false,
        );
        let Shape::Ellipse(e) = resized else {
            panic!("expected ellipse")
        };
        assert!((e.radius_x - 60.0).abs() < 1e-9);
        assert!((e.radius_y - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_resize_scales_font() {
        let text = Text::new(Point::ZERO, "hello".to_string());
        text.set_cached_size(100.0, 20.0);
        let original_font = text.font_size;
        let shape = Shape::Text(text);
        let resized = apply_manipulation(
            &shape,
            Some(HandleKind::Corner(Corner::BottomRight)),
            Vec2::new(100.0, 20.0),
            false,
        );
        let Shape::Text(t) = resized else {
            panic!("expected text")
        };
        assert!(t.font_size > original_font);
    }

    #[test]
    fn test_apply_rotation_snaps() {
        let mut shape = rect_shape();
        let center = shape.bounds().center();
        // Cursor 40° off vertical, snapping should land on 45°
        let angle = 40f64.to_radians() - std::f64::consts::FRAC_PI_2;
        let cursor = Point::new(
            center.x + angle.cos() * 100.0,
            center.y + angle.sin() * 100.0,
        );
        let applied = apply_rotation(&mut shape, cursor, true);
        assert!((applied - 45f64.to_radians()).abs() < 1e-9);
        assert!((shape.rotation() - applied).abs() < f64::EPSILON);
    }
}
