//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, Renderer};
use crate::text_editor::TextEditState;
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape, Size, Stroke};
use parley::{FontContext, LayoutContext};
use peniko::{Brush, Color, Fill};
use scriblio_core::minimap::{MiniMap, THUMB_HEIGHT, THUMB_WIDTH};
use scriblio_core::selection::{get_handles, Handle, HandleKind};
use scriblio_core::shapes::{Shape, ShapeStyle, Text};
use vello::Scene;

/// Margin between the mini-map panel and the viewport edges.
const MINIMAP_MARGIN: f64 = 16.0;

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Selection highlight color.
    selection_color: Color,
    /// Font context for text rendering (cached between frames).
    font_cx: FontContext,
    /// Layout context for text rendering.
    layout_cx: LayoutContext<Brush>,
    /// Current zoom level (for zoom-independent UI elements).
    zoom: f64,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            selection_color: Color::from_rgba8(139, 92, 246, 255),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            zoom: 1.0,
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Render a shape path with the given style.
    fn render_path(&mut self, path: &BezPath, style: &ShapeStyle, transform: Affine) {
        if let Some(fill_color) = style.fill() {
            self.scene.fill(Fill::NonZero, transform, fill_color, None, path);
        }

        let stroke = Stroke::new(style.stroke_width);
        self.scene.stroke(&stroke, transform, style.stroke(), None, path);
    }

    /// Lay out text with parley and return the layout.
    fn layout_text(&mut self, content: &str, font_size: f32, brush: Brush) -> parley::Layout<Brush> {
        use parley::StyleProperty;

        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, content, 1.0, false);
        builder.push_default(StyleProperty::FontSize(font_size));
        builder.push_default(StyleProperty::Brush(brush));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::Single(
            parley::FontFamily::Generic(parley::GenericFamily::SansSerif),
        )));
        let mut layout = builder.build(content);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        layout
    }

    /// Draw a laid-out text block at `transform`.
    fn draw_layout(&mut self, layout: &parley::Layout<Brush>, brush: &Brush, transform: Affine) {
        use parley::layout::PositionedLayoutItem;

        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let font_size = run.font_size();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(font)
                        .brush(brush)
                        .hint(true)
                        .transform(transform)
                        .glyph_transform(glyph_xform)
                        .font_size(font_size)
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }
    }

    /// Render a text shape.
    fn render_text(&mut self, text: &Text, transform: Affine) {
        if text.content.is_empty() {
            // Placeholder caret for empty text (position is top-left)
            let caret_height = text.font_size * 1.2;
            let caret = kurbo::Line::new(
                text.position,
                Point::new(text.position.x, text.position.y + caret_height),
            );
            let stroke = Stroke::new(2.0);
            self.scene.stroke(
                &stroke,
                transform,
                Color::from_rgba8(100, 100, 100, 200),
                None,
                &caret,
            );
            return;
        }

        let brush = Brush::Solid(text.style.stroke());
        let layout = self.layout_text(&text.content, text.font_size as f32, brush.clone());

        // Cache the computed dimensions so bounds and hit-testing are accurate
        text.set_cached_size(layout.width() as f64, layout.height() as f64);

        let text_transform = transform * Affine::translate((text.position.x, text.position.y));
        self.draw_layout(&layout, &brush, text_transform);
    }

    /// Render a text shape in edit mode, with a blinking caret.
    pub fn render_text_editing(
        &mut self,
        text: &Text,
        edit_state: &TextEditState,
        transform: Affine,
    ) {
        let brush = Brush::Solid(text.style.stroke());
        let font_size = text.font_size as f32;
        let content = edit_state.text();

        let text_transform = transform * Affine::translate((text.position.x, text.position.y));

        let mut line_height = text.font_size * 1.2;
        if !content.is_empty() {
            let layout = self.layout_text(content, font_size, brush.clone());
            text.set_cached_size(layout.width() as f64, layout.height() as f64);
            let line_count = layout.lines().count();
            if line_count > 0 {
                line_height = layout.height() as f64 / line_count as f64;
            }
            self.draw_layout(&layout, &brush, text_transform);
        }

        if edit_state.is_cursor_visible() {
            // Caret position: measure the content before the caret; the last
            // line's width gives x, the line count gives y.
            let before = edit_state.text_before_cursor();
            let caret_line = before.matches('\n').count();
            let last_line = before.rsplit('\n').next().unwrap_or("");
            let caret_x = if last_line.is_empty() {
                0.0
            } else {
                let layout = self.layout_text(last_line, font_size, brush.clone());
                layout.width() as f64
            };
            let caret_y = caret_line as f64 * line_height;

            let caret_rect = Rect::new(
                caret_x,
                caret_y,
                caret_x + 1.5,
                caret_y + line_height.max(text.font_size),
            );
            self.scene.fill(
                Fill::NonZero,
                text_transform,
                Color::from_rgba8(0, 0, 0, 255),
                None,
                &caret_rect,
            );
        }
    }

    /// Render a shape with the given camera transform.
    fn render_shape(&mut self, shape: &Shape, camera_transform: Affine, selected: bool) {
        let rotation = shape.rotation();
        let transform = if rotation.abs() > f64::EPSILON {
            camera_transform * Affine::rotate_about(rotation, shape.bounds().center())
        } else {
            camera_transform
        };

        match shape {
            Shape::Text(text) => self.render_text(text, transform),
            _ => self.render_path(&shape.to_path(), shape.style(), transform),
        }

        if selected {
            self.render_shape_handles(shape, camera_transform);
        }
    }

    /// Render shape-specific selection handles.
    /// Handles are scaled inversely with zoom to maintain constant screen size.
    fn render_shape_handles(&mut self, shape: &Shape, transform: Affine) {
        let handles = get_handles(shape, self.zoom);
        let handle_size = 16.0 / self.zoom;
        let stroke_width = 1.0 / self.zoom;
        let dash_len = 4.0 / self.zoom;

        // Dashed selection rectangle around the bounds
        let bounds = shape.bounds();
        let stroke = Stroke::new(stroke_width).with_dashes(0.0, [dash_len, dash_len]);
        let mut path = BezPath::new();
        path.move_to(Point::new(bounds.x0, bounds.y0));
        path.line_to(Point::new(bounds.x1, bounds.y0));
        path.line_to(Point::new(bounds.x1, bounds.y1));
        path.line_to(Point::new(bounds.x0, bounds.y1));
        path.close_path();

        self.scene
            .stroke(&stroke, transform, self.selection_color, None, &path);

        for handle in handles {
            self.render_handle(&handle, transform, handle_size);
        }
    }

    /// Render a single handle.
    /// Stroke widths are scaled inversely with zoom to maintain constant screen size.
    fn render_handle(&mut self, handle: &Handle, transform: Affine, size: f64) {
        let pos = handle.position;
        let stroke_width = 1.5 / self.zoom;

        match handle.kind {
            HandleKind::Rotate => {
                // Circle handle for rotation
                let radius = size / 2.0;
                let ellipse = kurbo::Ellipse::new(pos, (radius, radius), 0.0);
                let path = ellipse.to_path(0.1);

                self.scene
                    .fill(Fill::NonZero, transform, Color::WHITE, None, &path);
                self.scene.stroke(
                    &Stroke::new(stroke_width),
                    transform,
                    self.selection_color,
                    None,
                    &path,
                );
            }
            HandleKind::Corner(_) | HandleKind::Edge(_) => {
                // Square handle for corners/edges
                let half = size / 2.0;
                let rect = Rect::new(pos.x - half, pos.y - half, pos.x + half, pos.y + half);
                let path = rect.to_path(0.1);

                self.scene
                    .fill(Fill::NonZero, transform, Color::WHITE, None, &path);
                self.scene.stroke(
                    &Stroke::new(stroke_width),
                    transform,
                    self.selection_color,
                    None,
                    &path,
                );
            }
        }
    }

    /// Render the mini-map overlay in the bottom-right corner.
    ///
    /// The panel is drawn in screen coordinates; projected shapes are
    /// clipped to the thumbnail by rect intersection, and the viewport
    /// indicator is drawn last so it stays on top.
    fn render_minimap(&mut self, minimap: &MiniMap, viewport: Size) {
        let origin = Point::new(
            viewport.width - THUMB_WIDTH - MINIMAP_MARGIN,
            viewport.height - THUMB_HEIGHT - MINIMAP_MARGIN,
        );
        let panel = Rect::new(
            origin.x,
            origin.y,
            origin.x + THUMB_WIDTH,
            origin.y + THUMB_HEIGHT,
        );
        let thumb = Rect::new(0.0, 0.0, THUMB_WIDTH, THUMB_HEIGHT);
        let to_screen = Affine::translate((origin.x, origin.y));

        // Panel card: white background with a light border
        let card = kurbo::RoundedRect::from_rect(panel.inflate(4.0, 4.0), 6.0);
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, Color::WHITE, None, &card);
        self.scene.stroke(
            &Stroke::new(1.0),
            Affine::IDENTITY,
            Color::from_rgba8(220, 220, 220, 255),
            None,
            &card,
        );

        for projected in minimap.shapes() {
            let clipped = projected.rect.intersect(thumb);
            if clipped.width() <= 0.0 || clipped.height() <= 0.0 {
                continue;
            }
            if let Some(fill) = projected.fill {
                self.scene
                    .fill(Fill::NonZero, to_screen, Color::from(fill), None, &clipped);
            }
            self.scene.stroke(
                &Stroke::new(1.0),
                to_screen,
                Color::from(projected.stroke),
                None,
                &clipped,
            );
        }

        // Indicator rectangle, always on top of the projected shapes
        let indicator = minimap.indicator().intersect(thumb);
        if indicator.width() > 0.0 && indicator.height() > 0.0 {
            self.scene.fill(
                Fill::NonZero,
                to_screen,
                Color::from_rgba8(0, 0, 0, 51),
                None,
                &indicator,
            );
            self.scene.stroke(
                &Stroke::new(1.0),
                to_screen,
                Color::from_rgba8(139, 92, 246, 255),
                None,
                &indicator,
            );
        }
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        self.selection_color = ctx.selection_color;
        self.zoom = ctx.canvas.camera.zoom;

        let camera_transform = ctx.canvas.camera.transform();

        // Draw all shapes in z-order (the shape being edited is rendered
        // separately with its caret)
        for shape in ctx.canvas.document.shapes_ordered() {
            if ctx.editing_shape_id == Some(shape.id()) {
                continue;
            }
            let is_selected = ctx.canvas.is_selected(shape.id());
            self.render_shape(shape, camera_transform, is_selected);
        }

        // Mini-map overlay in screen space, above the document
        if let Some(minimap) = ctx.minimap {
            self.render_minimap(minimap, ctx.viewport_size);
        }
    }
}
