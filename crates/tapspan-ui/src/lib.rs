//! egui rendering for TapSpan touch selection.
//!
//! This crate draws the state owned by `tapspan-core`:
//!
//! - **Handles**: the draggable start/end selection handles with their
//!   orientation-aware grip indicators
//! - **Menu**: the floating selection menu built from the tool registry
//!
//! The host calls [`draw_handles`] and [`selection_menu`] during its egui
//! pass and feeds the returned interactions back into the controller.

pub mod handles;
pub mod menu;

pub use handles::{draw_handles, hit_test};
pub use menu::{panel_frame, selection_menu};

use egui::Pos2;
use kurbo::Point;

/// Standard sizing constants used across the overlay.
pub mod sizing {
    /// Diameter of a handle's grip circle.
    pub const GRIP: f32 = 14.0;
    /// Width of the caret bar inside a handle.
    pub const CARET_WIDTH: f32 = 2.0;
    /// Button corner radius.
    pub const CORNER_RADIUS: u8 = 4;
    /// Menu panel corner radius.
    pub const PANEL_RADIUS: u8 = 8;
}

/// Standard colors used across the overlay.
pub mod theme {
    use egui::Color32;

    /// Handle grip and caret bar (blue).
    pub const HANDLE: Color32 = Color32::from_rgb(59, 130, 246);
    /// Menu text color.
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Menu border color.
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Button hover background.
    pub const HOVER_BG: Color32 = Color32::from_rgb(245, 245, 245);
    /// Menu panel background.
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
}

pub(crate) fn to_pos2(point: Point) -> Pos2 {
    Pos2::new(point.x as f32, point.y as f32)
}
