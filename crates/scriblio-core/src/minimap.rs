//! Mini-map overview projection.
//!
//! Maintains a 150×100 mirror of the primary surface: every document
//! mutation event triggers a full rebuild of the projected shape list and of
//! the viewport indicator. Zoom/pan-only changes emit no document events and
//! leave the projection untouched until the next mutation.

use crate::camera::Camera;
use crate::canvas::CanvasDocument;
use crate::events::DocumentEvent;
use crate::shapes::SerializableColor;
use kurbo::{Rect, Size};

/// Thumbnail width in logical units.
pub const THUMB_WIDTH: f64 = 150.0;
/// Thumbnail height in logical units.
pub const THUMB_HEIGHT: f64 = 100.0;

/// A shape's bounding geometry projected into thumbnail space.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedShape {
    /// Bounding rectangle in thumbnail coordinates.
    pub rect: Rect,
    /// Stroke color carried over from the source shape.
    pub stroke: SerializableColor,
    /// Fill color carried over from the source shape.
    pub fill: Option<SerializableColor>,
}

/// The mini-map model: projected shapes plus the viewport indicator.
///
/// Purely derived state; rebuilt from scratch per event batch and rendered
/// by the overlay pass. The indicator is kept separate from the shape list
/// so it always draws last (on top).
#[derive(Debug, Clone)]
pub struct MiniMap {
    /// Projected shapes in z-order.
    shapes: Vec<ProjectedShape>,
    /// Viewport indicator rectangle in thumbnail coordinates.
    indicator: Rect,
}

impl Default for MiniMap {
    fn default() -> Self {
        Self::new()
    }
}

impl MiniMap {
    /// Create an empty mini-map.
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            indicator: Rect::new(0.0, 0.0, 50.0, 30.0),
        }
    }

    /// Attach to a primary surface: build the initial projection and place
    /// the indicator once.
    pub fn attach(&mut self, document: &CanvasDocument, camera: &Camera, viewport: Size) {
        self.rebuild(document, camera, viewport);
    }

    /// Process a batch of drained document events.
    ///
    /// An empty batch is a no-op: zoom- or pan-only frames do not refresh
    /// the projection or the indicator.
    pub fn process_events(
        &mut self,
        events: &[DocumentEvent],
        document: &CanvasDocument,
        camera: &Camera,
        viewport: Size,
    ) {
        if events.is_empty() {
            return;
        }
        self.rebuild(document, camera, viewport);
    }

    /// Projected shapes in draw order (indicator excluded).
    pub fn shapes(&self) -> &[ProjectedShape] {
        &self.shapes
    }

    /// The viewport indicator rectangle, drawn above all projected shapes.
    pub fn indicator(&self) -> Rect {
        self.indicator
    }

    fn rebuild(&mut self, document: &CanvasDocument, camera: &Camera, viewport: Size) {
        self.shapes.clear();

        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return;
        }

        // Shapes scale uniformly off the width ratio; the indicator uses
        // per-axis ratios. Matches the product's observed projection.
        let scale = THUMB_WIDTH / viewport.width;

        for shape in document.shapes_ordered() {
            match project_bounds(shape.bounds(), scale) {
                Some(rect) => self.shapes.push(ProjectedShape {
                    rect,
                    stroke: shape.style().stroke_color,
                    fill: shape.style().fill_color,
                }),
                // Malformed geometry: skip this shape, keep rebuilding
                None => {
                    log::debug!("minimap: skipping shape with malformed geometry");
                }
            }
        }

        self.indicator = indicator_rect(camera, viewport);
    }
}

/// Project a world-space bounding rect into thumbnail space.
///
/// Returns None when the geometry does not project to finite coordinates.
fn project_bounds(bounds: Rect, scale: f64) -> Option<Rect> {
    let rect = Rect::new(
        bounds.x0 * scale,
        bounds.y0 * scale,
        bounds.x1 * scale,
        bounds.y1 * scale,
    );
    let finite = rect.x0.is_finite()
        && rect.y0.is_finite()
        && rect.x1.is_finite()
        && rect.y1.is_finite();
    finite.then_some(rect)
}

/// Compute the viewport indicator rectangle for the current camera.
fn indicator_rect(camera: &Camera, viewport: Size) -> Rect {
    let scale_x = THUMB_WIDTH / viewport.width;
    let scale_y = THUMB_HEIGHT / viewport.height;

    let visible_w = (viewport.width / camera.zoom) * scale_x;
    let visible_h = (viewport.height / camera.zoom) * scale_y;
    let left = -camera.offset.x * scale_x;
    let top = -camera.offset.y * scale_y;

    Rect::new(left, top, left + visible_w, top + visible_h)
}
