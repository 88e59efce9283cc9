//! Reusable egui widget components for the Scriblio chrome:
//!
//! - **Buttons**: glyph icon buttons and text buttons
//! - **Colors**: the fixed board palette and color swatches
//! - **Layout**: separators and section labels
//! - **Menu**: panel and toolbar frames

pub mod buttons;
pub mod colors;
pub mod layout;
pub mod menu;

pub use buttons::{IconButton, IconButtonStyle, TextButton};
pub use colors::{BoardColor, ColorSwatch, ColorSwatchStyle, BOARD_PALETTE};
pub use layout::{section_label, separator, vertical_separator};
pub use menu::{panel_frame, toolbar_frame};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Small button size (icons, color swatches)
    pub const SMALL: f32 = 20.0;
    /// Medium button size (toolbar buttons)
    pub const MEDIUM: f32 = 28.0;
    /// Large button size
    pub const LARGE: f32 = 36.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Selection/active color (the product violet)
    pub const ACCENT: Color32 = Color32::from_rgb(139, 92, 246);
    /// Hover background
    pub const HOVER_BG: Color32 = Color32::from_rgb(245, 245, 245);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
    /// Destructive action color
    pub const DANGER: Color32 = Color32::from_rgb(239, 68, 68);
}
