//! Button components: glyph icon buttons, toggle buttons, text buttons.

use egui::{vec2, Color32, CornerRadius, CursorIcon, Sense, Ui, Vec2};

use crate::{sizing, theme};

/// Style configuration for icon buttons.
#[derive(Clone)]
pub struct IconButtonStyle {
    /// Button size
    pub size: Vec2,
    /// Glyph font size
    pub glyph_size: f32,
    /// Corner radius
    pub corner_radius: u8,
    /// Background color when not selected
    pub bg_color: Color32,
    /// Background color when hovered
    pub hover_color: Color32,
    /// Background color when selected/active
    pub selected_color: Color32,
    /// Glyph color when not selected
    pub glyph_color: Color32,
    /// Glyph color when selected
    pub selected_glyph_color: Color32,
}

impl Default for IconButtonStyle {
    fn default() -> Self {
        Self {
            size: vec2(sizing::MEDIUM, sizing::MEDIUM),
            glyph_size: 14.0,
            corner_radius: sizing::CORNER_RADIUS,
            bg_color: Color32::TRANSPARENT,
            hover_color: theme::HOVER_BG,
            selected_color: theme::ACCENT,
            glyph_color: Color32::from_gray(80),
            selected_glyph_color: Color32::WHITE,
        }
    }
}

impl IconButtonStyle {
    /// Toolbar tool button style (32x32, solid accent when selected).
    pub fn tool() -> Self {
        Self {
            size: vec2(32.0, 32.0),
            glyph_size: 16.0,
            corner_radius: 6,
            hover_color: Color32::from_gray(235),
            ..Default::default()
        }
    }

    /// Small style for the bottom controls.
    pub fn small() -> Self {
        Self {
            size: vec2(24.0, 24.0),
            glyph_size: 13.0,
            ..Default::default()
        }
    }

    /// Destructive style (red glyph).
    pub fn danger() -> Self {
        Self {
            glyph_color: theme::DANGER,
            selected_glyph_color: Color32::WHITE,
            selected_color: theme::DANGER,
            ..Self::tool()
        }
    }
}

/// An icon button that displays a single glyph.
pub struct IconButton<'a> {
    glyph: &'a str,
    tooltip: &'a str,
    shortcut: Option<&'a str>,
    selected: bool,
    style: IconButtonStyle,
}

impl<'a> IconButton<'a> {
    /// Create a new icon button.
    pub fn new(glyph: &'a str, tooltip: &'a str) -> Self {
        Self {
            glyph,
            tooltip,
            shortcut: None,
            selected: false,
            style: IconButtonStyle::default(),
        }
    }

    /// Set whether the button is selected/active.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Set the button style.
    pub fn style(mut self, style: IconButtonStyle) -> Self {
        self.style = style;
        self
    }

    /// Use tool style for the main toolbar.
    pub fn tool(mut self) -> Self {
        self.style = IconButtonStyle::tool();
        self
    }

    /// Use small style for the bottom controls.
    pub fn small(mut self) -> Self {
        self.style = IconButtonStyle::small();
        self
    }

    /// Set keyboard shortcut (shown in the hover tooltip).
    pub fn shortcut(mut self, shortcut: &'a str) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let (rect, response) = ui.allocate_exact_size(self.style.size, Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                self.style.selected_color
            } else if response.hovered() {
                self.style.hover_color
            } else {
                self.style.bg_color
            };

            ui.painter().rect_filled(
                rect,
                CornerRadius::same(self.style.corner_radius),
                bg_color,
            );

            let glyph_color = if self.selected {
                self.style.selected_glyph_color
            } else if response.hovered() {
                Color32::from_gray(40)
            } else {
                self.style.glyph_color
            };

            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.glyph,
                egui::FontId::proportional(self.style.glyph_size),
                glyph_color,
            );
        }

        let clicked = response.clicked();
        if let Some(shortcut) = self.shortcut {
            response.clone().on_hover_ui(|ui| {
                ui.horizontal(|ui| {
                    ui.label(self.tooltip);
                    ui.label(
                        egui::RichText::new(format!("({})", shortcut))
                            .color(Color32::from_gray(128))
                            .small(),
                    );
                });
            });
        } else {
            response.clone().on_hover_text(self.tooltip);
        }
        response.on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

/// A plain text button with hover feedback.
pub struct TextButton<'a> {
    label: &'a str,
    enabled: bool,
}

impl<'a> TextButton<'a> {
    /// Create a new text button.
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            enabled: true,
        }
    }

    /// Set whether the button reacts to clicks.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let font_size = 12.0;
        let width = self.label.len() as f32 * font_size * 0.6 + 20.0;
        let (rect, response) = ui.allocate_exact_size(vec2(width, 26.0), Sense::click());

        if ui.is_rect_visible(rect) {
            let bg = if self.enabled && response.hovered() {
                theme::HOVER_BG
            } else {
                Color32::TRANSPARENT
            };
            let fg = if self.enabled {
                theme::TEXT
            } else {
                Color32::from_gray(180)
            };

            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg);
            ui.painter().rect_stroke(
                rect,
                CornerRadius::same(sizing::CORNER_RADIUS),
                egui::Stroke::new(1.0, theme::BORDER),
                egui::StrokeKind::Inside,
            );
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.label,
                egui::FontId::proportional(font_size),
                fg,
            );
        }

        let clicked = self.enabled && response.clicked();
        if self.enabled {
            response.on_hover_cursor(CursorIcon::PointingHand);
        }
        clicked
    }
}
