//! The floating selection menu surface.

use egui::{vec2, Color32, Context, CornerRadius, CursorIcon, Frame, Margin, Sense, Stroke, Ui};
use kurbo::Size;
use tapspan_core::TouchSelection;

use crate::{sizing, theme, to_pos2};

/// Show the floating menu when the controller has it open.
///
/// Returns the name of the tool tapped this frame, which the host feeds into
/// `TouchSelection::dispatch_tool`. The rendered surface size is reported
/// back to the controller so placement clamping matches what is on screen.
pub fn selection_menu(ctx: &Context, controller: &mut TouchSelection) -> Option<String> {
    if !controller.menu().visible() {
        return None;
    }

    let mut tapped = None;
    let area = egui::Area::new(egui::Id::new("tapspan-selection-menu"))
        .order(egui::Order::Foreground)
        .fixed_pos(to_pos2(controller.menu().position()))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    for tool in controller.registry().tools() {
                        if tool_button(ui, &tool.icon().resolve()) {
                            tapped = Some(tool.name().to_string());
                        }
                    }
                });
            });
        });

    let rect = area.response.rect;
    controller.set_menu_size(Size::new(rect.width() as f64, rect.height() as f64));
    tapped
}

/// One tappable tool entry.
fn tool_button(ui: &mut Ui, label: &str) -> bool {
    let text_width = label.len() as f32 * 7.0 + 16.0;
    let size = vec2(text_width.max(28.0), 28.0);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let bg_color = if response.hovered() {
            theme::HOVER_BG
        } else {
            Color32::TRANSPARENT
        };
        ui.painter()
            .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);
        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            label,
            egui::FontId::proportional(13.0),
            theme::TEXT,
        );
    }

    response.on_hover_cursor(CursorIcon::PointingHand).clicked()
}

/// The menu's panel frame with shadow.
pub fn panel_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .corner_radius(CornerRadius::same(sizing::PANEL_RADIUS))
        .stroke(Stroke::new(1.0, theme::BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::same(8))
}
