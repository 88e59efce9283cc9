//! Text shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use uuid::Uuid;

/// Placeholder content for freshly placed text shapes.
pub const TEXT_PLACEHOLDER: &str = "Click to edit text";

/// A text shape.
#[derive(Debug, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Position (top-left corner of the text bounding box).
    pub position: Point,
    /// The text content.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Rotation angle in radians (around center).
    #[serde(default)]
    pub rotation: f64,
    /// Style properties.
    pub style: ShapeStyle,
    /// Cached layout size (width, height) computed by the renderer.
    /// If None, approximate bounds are used.
    #[serde(skip)]
    cached_size: RwLock<Option<(f64, f64)>>,
}

impl Clone for Text {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            position: self.position,
            content: self.content.clone(),
            font_size: self.font_size,
            rotation: self.rotation,
            style: self.style.clone(),
            // Clone the cached size value, not the lock
            cached_size: RwLock::new(self.cached_size.read().ok().and_then(|guard| *guard)),
        }
    }
}

impl Text {
    /// Default font size.
    pub const DEFAULT_FONT_SIZE: f64 = 18.0;

    /// Create a new text shape.
    pub fn new(position: Point, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content,
            font_size: Self::DEFAULT_FONT_SIZE,
            rotation: 0.0,
            style: ShapeStyle::default(),
            cached_size: RwLock::new(None),
        }
    }

    /// Create a text shape with the placeholder content.
    pub fn placeholder(position: Point) -> Self {
        Self::new(position, TEXT_PLACEHOLDER.to_string())
    }

    /// Set the cached layout size (computed by the renderer).
    /// Uses interior mutability so this can be called during rendering.
    pub fn set_cached_size(&self, width: f64, height: f64) {
        if let Ok(mut cache) = self.cached_size.write() {
            *cache = Some((width, height));
        }
    }

    /// Clear the cached size (call when content or font size changes).
    pub fn invalidate_cache(&self) {
        if let Ok(mut cache) = self.cached_size.write() {
            *cache = None;
        }
    }

    /// Approximate layout size when no renderer measurement is available.
    fn approximate_size(&self) -> (f64, f64) {
        let lines: Vec<&str> = self.content.split('\n').collect();
        let max_chars = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = (max_chars as f64 * self.font_size * 0.55).max(self.font_size * 0.55);
        let height = lines.len().max(1) as f64 * self.font_size * 1.25;
        (width, height)
    }

    /// Current layout size: renderer-cached if available, approximate otherwise.
    pub fn layout_size(&self) -> (f64, f64) {
        self.cached_size
            .read()
            .ok()
            .and_then(|guard| *guard)
            .unwrap_or_else(|| self.approximate_size())
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let (width, height) = self.layout_size();
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + width,
            self.position.y + height,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn to_path(&self) -> BezPath {
        // Text glyphs are rendered by the text pipeline; the path is the box
        self.bounds().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.position = affine * self.position;
        let scale = affine.as_coeffs();
        let factor = scale[0].abs().max(scale[3].abs());
        if (factor - 1.0).abs() > f64::EPSILON {
            self.font_size *= factor;
            self.invalidate_cache();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_creation() {
        let text = Text::new(Point::new(10.0, 20.0), "Hello".to_string());
        assert_eq!(text.content, "Hello");
        assert!((text.font_size - Text::DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_placeholder() {
        let text = Text::placeholder(Point::new(0.0, 0.0));
        assert_eq!(text.content, TEXT_PLACEHOLDER);
    }

    #[test]
    fn test_cached_size_overrides_estimate() {
        let text = Text::new(Point::new(0.0, 0.0), "Hi".to_string());
        text.set_cached_size(123.0, 45.0);
        let bounds = text.bounds();
        assert!((bounds.width() - 123.0).abs() < f64::EPSILON);
        assert!((bounds.height() - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_inside_box() {
        let text = Text::new(Point::new(0.0, 0.0), "Hello".to_string());
        text.set_cached_size(50.0, 20.0);
        assert!(text.hit_test(Point::new(25.0, 10.0), 0.0));
        assert!(!text.hit_test(Point::new(200.0, 10.0), 0.0));
    }

    #[test]
    fn test_clone_keeps_cached_size() {
        let text = Text::new(Point::new(0.0, 0.0), "Hello".to_string());
        text.set_cached_size(50.0, 20.0);
        let copy = text.clone();
        assert!((copy.bounds().width() - 50.0).abs() < f64::EPSILON);
    }
}
