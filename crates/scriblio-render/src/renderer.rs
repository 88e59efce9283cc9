//! Renderer trait abstraction.

use kurbo::Size;
use peniko::Color;
use scriblio_core::canvas::Canvas;
use scriblio_core::minimap::MiniMap;
use scriblio_core::shapes::ShapeId;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Mini-map model to draw as an overlay (None hides the panel).
    pub minimap: Option<&'a MiniMap>,
    /// Viewport size in logical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
    /// Selection highlight color.
    pub selection_color: Color,
    /// Shape ID currently being edited (rendered separately with a cursor).
    pub editing_shape_id: Option<ShapeId>,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(canvas: &'a Canvas, viewport_size: Size) -> Self {
        Self {
            canvas,
            minimap: None,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::WHITE,
            selection_color: Color::from_rgba8(139, 92, 246, 255),
            editing_shape_id: None,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the mini-map overlay to draw.
    pub fn with_minimap(mut self, minimap: &'a MiniMap) -> Self {
        self.minimap = Some(minimap);
        self
    }

    /// Set the shape ID being edited (skipped in the main shape pass).
    pub fn with_editing_shape(mut self, shape_id: Option<ShapeId>) -> Self {
        self.editing_shape_id = shape_id;
        self
    }
}

/// Trait for rendering backends.
///
/// Implementations can use Vello, wgpu directly, or other rendering engines.
pub trait Renderer: Send + Sync {
    /// Build the scene/command buffer for a frame.
    ///
    /// This method is called once per frame and should prepare all drawing
    /// commands.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
