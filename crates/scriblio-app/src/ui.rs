//! UI chrome built with egui.

use egui::{Align2, Color32, Context, Vec2};
use scriblio_core::board::BoardId;
use scriblio_core::tools::ToolKind;

use scriblio_widgets::{
    panel_frame, section_label, theme, toolbar_frame, vertical_separator, ColorSwatch, IconButton,
    IconButtonStyle, TextButton, BOARD_PALETTE,
};

// Use web-time on WASM, std::time otherwise
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// How long the share toast stays on screen.
const TOAST_SECONDS: u64 = 2;

/// A transient confirmation message.
pub struct Toast {
    message: String,
    shown_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    fn is_expired(&self) -> bool {
        self.shown_at.elapsed().as_secs() >= TOAST_SECONDS
    }
}

/// UI state mirrored from the canvas each frame.
pub struct UiState {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current stroke color for new shapes.
    pub active_color: Color32,
    /// Whether the color picker popover is open.
    pub color_popover_open: bool,
    /// Number of selected shapes.
    pub selection_count: usize,
    /// Whether undo is available.
    pub can_undo: bool,
    /// Whether redo is available.
    pub can_redo: bool,
    /// The board shown in the canvas view.
    pub board_id: Option<BoardId>,
    /// Whether the landing view is showing (no board yet).
    pub landing: bool,
    /// Transient confirmation toast.
    pub toast: Option<Toast>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            current_tool: ToolKind::Select,
            active_color: BOARD_PALETTE[0].color,
            color_popover_open: false,
            selection_count: 0,
            can_undo: false,
            can_redo: false,
            board_id: None,
            landing: false,
            toast: None,
        }
    }
}

impl UiState {
    /// Show a transient toast message.
    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message));
    }
}

/// Actions emitted by the chrome, applied by the app.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiAction {
    /// Change the current tool.
    SetTool(ToolKind),
    /// Change the active stroke color.
    SetColor(Color32),
    /// Delete the selected shapes.
    DeleteSelected,
    /// Remove all shapes.
    ClearAll,
    /// Zoom in about the viewport center.
    ZoomIn,
    /// Zoom out about the viewport center.
    ZoomOut,
    /// Undo the last action.
    Undo,
    /// Redo the last undone action.
    Redo,
    /// Copy the board link to the clipboard.
    ShareBoard,
    /// Create a board and enter the canvas view (landing only).
    NewBoard,
}

/// Render all chrome. Returns at most one action per frame.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    if ui_state.landing {
        return render_landing(ctx);
    }

    let mut action = render_navbar(ctx, ui_state);
    action = action.or(render_toolbar(ctx, ui_state));
    action = action.or(render_color_picker(ctx, ui_state));
    action = action.or(render_zoom_controls(ctx));
    render_toast(ctx, ui_state);
    action
}

/// Landing view: a centered card with a single create action.
fn render_landing(ctx: &Context) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("landing"))
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(12.0);
                    ui.label(
                        egui::RichText::new("Scriblio")
                            .size(28.0)
                            .strong()
                            .color(theme::ACCENT),
                    );
                    ui.label(
                        egui::RichText::new("A shared whiteboard for quick sketches")
                            .size(13.0)
                            .color(theme::TEXT_MUTED),
                    );
                    ui.add_space(16.0);
                    if TextButton::new("New Board").show(ui) {
                        action = Some(UiAction::NewBoard);
                    }
                    ui.add_space(12.0);
                });
            });
        });

    action
}

/// Top navbar: title, undo/redo, share.
fn render_navbar(ctx: &Context, ui_state: &UiState) -> Option<UiAction> {
    let mut action = None;

    egui::TopBottomPanel::top("navbar")
        .frame(
            egui::Frame::new()
                .fill(Color32::WHITE)
                .stroke(egui::Stroke::new(1.0, theme::BORDER))
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new("Scriblio")
                        .size(18.0)
                        .strong()
                        .color(theme::ACCENT),
                );
                ui.add_space(16.0);

                if TextButton::new("Undo").enabled(ui_state.can_undo).show(ui) {
                    action = Some(UiAction::Undo);
                }
                if TextButton::new("Redo").enabled(ui_state.can_redo).show(ui) {
                    action = Some(UiAction::Redo);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if TextButton::new("Share Board").show(ui) {
                        action = Some(UiAction::ShareBoard);
                    }
                    if let Some(ref id) = ui_state.board_id {
                        ui.label(
                            egui::RichText::new(id.as_str())
                                .size(11.0)
                                .color(theme::TEXT_MUTED),
                        );
                    }
                });
            });
        });

    action
}

/// Floating toolbar: the five tools plus delete.
fn render_toolbar(ctx: &Context, ui_state: &UiState) -> Option<UiAction> {
    let mut action = None;

    const TOOLS: &[(ToolKind, &str, &str, &str)] = &[
        (ToolKind::Select, "➤", "Select", "V"),
        (ToolKind::Draw, "✏", "Draw", "P"),
        (ToolKind::Rectangle, "▭", "Rectangle", "R"),
        (ToolKind::Circle, "◯", "Circle", "C"),
        (ToolKind::Text, "T", "Text", "T"),
    ];

    egui::Area::new(egui::Id::new("toolbar"))
        .anchor(Align2::CENTER_TOP, Vec2::new(0.0, 52.0))
        .show(ctx, |ui| {
            toolbar_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    for &(tool, glyph, tooltip, shortcut) in TOOLS {
                        let clicked = IconButton::new(glyph, tooltip)
                            .tool()
                            .shortcut(shortcut)
                            .selected(ui_state.current_tool == tool)
                            .show(ui);
                        if clicked {
                            action = Some(UiAction::SetTool(tool));
                        }
                    }

                    vertical_separator(ui);

                    let delete = IconButton::new("🗑", "Delete selected")
                        .style(IconButtonStyle::danger())
                        .shortcut("Del")
                        .show(ui);
                    if delete && ui_state.selection_count > 0 {
                        action = Some(UiAction::DeleteSelected);
                    }
                });
            });
        });

    action
}

/// Color picker: current-color button that opens the 8-swatch popover.
fn render_color_picker(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("color-picker"))
        .anchor(Align2::LEFT_TOP, Vec2::new(16.0, 110.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.vertical(|ui| {
                    let (clicked, _) =
                        ColorSwatch::new(ui_state.active_color, "Color").show(ui);
                    if clicked {
                        ui_state.color_popover_open = !ui_state.color_popover_open;
                    }

                    if ui_state.color_popover_open {
                        ui.add_space(6.0);
                        section_label(ui, "Colors");
                        egui::Grid::new("palette").spacing(Vec2::splat(4.0)).show(
                            ui,
                            |ui| {
                                for (i, swatch) in BOARD_PALETTE.iter().enumerate() {
                                    let selected = ui_state.active_color == swatch.color;
                                    let (clicked, _) =
                                        ColorSwatch::new(swatch.color, swatch.name)
                                            .grid()
                                            .selected(selected)
                                            .show(ui);
                                    if clicked {
                                        action = Some(UiAction::SetColor(swatch.color));
                                        ui_state.color_popover_open = false;
                                    }
                                    if i % 4 == 3 {
                                        ui.end_row();
                                    }
                                }
                            },
                        );
                    }
                });
            });
        });

    action
}

/// Bottom-left zoom controls and clear-all.
fn render_zoom_controls(ctx: &Context) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("zoom-controls"))
        .anchor(Align2::LEFT_BOTTOM, Vec2::new(16.0, -16.0))
        .show(ctx, |ui| {
            toolbar_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    if IconButton::new("+", "Zoom in").small().show(ui) {
                        action = Some(UiAction::ZoomIn);
                    }
                    if IconButton::new("−", "Zoom out").small().show(ui) {
                        action = Some(UiAction::ZoomOut);
                    }

                    vertical_separator(ui);

                    if TextButton::new("Clear All").show(ui) {
                        action = Some(UiAction::ClearAll);
                    }
                });
            });
        });

    action
}

/// Transient confirmation toast, bottom center.
fn render_toast(ctx: &Context, ui_state: &mut UiState) {
    let expired = ui_state.toast.as_ref().is_some_and(Toast::is_expired);
    if expired {
        ui_state.toast = None;
    }

    if let Some(ref toast) = ui_state.toast {
        egui::Area::new(egui::Id::new("toast"))
            .anchor(Align2::CENTER_BOTTOM, Vec2::new(0.0, -24.0))
            .show(ctx, |ui| {
                panel_frame().show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(&toast.message)
                            .size(13.0)
                            .color(theme::TEXT),
                    );
                });
            });
        // Keep repainting so the toast disappears without input
        ctx.request_repaint();
    }
}
