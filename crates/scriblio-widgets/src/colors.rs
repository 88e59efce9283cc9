//! The board color palette and color swatch components.

use egui::{vec2, Color32, CursorIcon, Rect, Sense, Stroke, Ui, Vec2};

use crate::sizing;

/// A named palette entry.
#[derive(Clone, Copy)]
pub struct BoardColor {
    /// Color name shown in tooltips.
    pub name: &'static str,
    /// The swatch color.
    pub color: Color32,
}

impl BoardColor {
    pub const fn new(name: &'static str, r: u8, g: u8, b: u8) -> Self {
        Self {
            name,
            color: Color32::from_rgb(r, g, b),
        }
    }
}

/// The fixed 8-swatch board palette.
pub const BOARD_PALETTE: &[BoardColor] = &[
    BoardColor::new("Purple", 139, 92, 246),
    BoardColor::new("Pink", 236, 72, 153),
    BoardColor::new("Amber", 245, 158, 11),
    BoardColor::new("Green", 16, 185, 129),
    BoardColor::new("Blue", 59, 130, 246),
    BoardColor::new("Black", 0, 0, 0),
    BoardColor::new("Gray", 107, 114, 128),
    BoardColor::new("Red", 239, 68, 68),
];

/// Style for color swatches.
#[derive(Clone)]
pub struct ColorSwatchStyle {
    /// Size of the swatch
    pub size: Vec2,
    /// Whether to show as circle (true) or rounded rect (false)
    pub circular: bool,
}

impl Default for ColorSwatchStyle {
    fn default() -> Self {
        Self {
            size: vec2(sizing::SMALL, sizing::SMALL),
            circular: true,
        }
    }
}

impl ColorSwatchStyle {
    /// Larger swatch for the picker popover grid.
    pub fn grid() -> Self {
        Self {
            size: vec2(sizing::MEDIUM, sizing::MEDIUM),
            circular: false,
        }
    }
}

/// A clickable color swatch.
pub struct ColorSwatch<'a> {
    color: Color32,
    tooltip: &'a str,
    selected: bool,
    style: ColorSwatchStyle,
}

impl<'a> ColorSwatch<'a> {
    /// Create a new color swatch.
    pub fn new(color: Color32, tooltip: &'a str) -> Self {
        Self {
            color,
            tooltip,
            selected: false,
            style: ColorSwatchStyle::default(),
        }
    }

    /// Set whether this swatch is selected.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Use grid style.
    pub fn grid(mut self) -> Self {
        self.style = ColorSwatchStyle::grid();
        self
    }

    /// Show the swatch and return (clicked, rect).
    pub fn show(self, ui: &mut Ui) -> (bool, Rect) {
        let (rect, response) = ui.allocate_exact_size(self.style.size, Sense::click());

        if ui.is_rect_visible(rect) {
            let center = rect.center();
            let radius = rect.width().min(rect.height()) / 2.0;

            if self.style.circular {
                ui.painter().circle_filled(center, radius, self.color);

                if self.selected {
                    // Selection ring, offset like the product's active swatch
                    ui.painter().circle_stroke(
                        center,
                        radius + 2.0,
                        Stroke::new(2.0, Color32::from_gray(120)),
                    );
                }
            } else {
                ui.painter().rect_filled(
                    rect,
                    egui::CornerRadius::same(sizing::CORNER_RADIUS),
                    self.color,
                );

                if self.selected {
                    ui.painter().rect_stroke(
                        rect.expand(2.0),
                        egui::CornerRadius::same(sizing::CORNER_RADIUS),
                        Stroke::new(2.0, Color32::from_gray(120)),
                        egui::StrokeKind::Outside,
                    );
                }
            }
        }

        let clicked = response.clicked();
        response
            .on_hover_text(self.tooltip)
            .on_hover_cursor(CursorIcon::PointingHand);
        (clicked, rect)
    }
}
