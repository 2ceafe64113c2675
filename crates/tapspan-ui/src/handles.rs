//! Drawing and hit-testing of the selection handle pair.

use egui::{CornerRadius, Pos2, Rect, Ui, Vec2};
use kurbo::Point;
use tapspan_core::{HandleEnd, IndicatorOrientation, TouchSelection, TouchTarget};

use crate::{sizing, theme, to_pos2};

/// Draw both selection handles into the current layer.
///
/// `origin` is the screen position of the widget container's top-left corner;
/// handle offsets are content-relative and already carry the controller's
/// layer translation.
pub fn draw_handles(ui: &mut Ui, controller: &TouchSelection, origin: Pos2) {
    if !controller.handles_visible() {
        return;
    }
    for end in [HandleEnd::Start, HandleEnd::End] {
        draw_handle(ui, controller, end, origin);
    }
}

fn draw_handle(ui: &mut Ui, controller: &TouchSelection, end: HandleEnd, origin: Pos2) {
    let handle = controller.handles().get(end);
    if handle.opacity() <= 0.0 {
        return;
    }

    let anchor = client_point(controller, handle.offset(), origin);
    let line_height = controller.metrics().line_height as f32;
    let color = theme::HANDLE.gamma_multiply(handle.opacity());
    let painter = ui.painter();

    // Caret bar spanning the anchored line.
    let bar = Rect::from_min_size(
        Pos2::new(anchor.x - sizing::CARET_WIDTH / 2.0, anchor.y),
        egui::vec2(sizing::CARET_WIDTH, line_height),
    );
    painter.rect_filled(bar, CornerRadius::ZERO, color);

    // Grip circle below the bar, offset to the handle's open side.
    let radius = sizing::GRIP / 2.0;
    let grip_x = match handle.orientation() {
        IndicatorOrientation::OpenLeft => anchor.x - radius,
        IndicatorOrientation::OpenRight => anchor.x + radius,
        IndicatorOrientation::Caret => anchor.x,
    };
    painter.circle_filled(Pos2::new(grip_x, anchor.y + line_height + radius), radius, color);
}

/// Map a screen position to the overlay element under it.
///
/// Returns `None` when the position misses every overlay element; the host
/// then reports [`TouchTarget::Container`] for touches inside the widget.
pub fn hit_test(controller: &TouchSelection, origin: Pos2, pos: Pos2) -> Option<TouchTarget> {
    if controller.menu().visible() {
        let menu = controller.menu();
        let rect = Rect::from_min_size(
            to_pos2(menu.position()),
            egui::vec2(menu.size().width as f32, menu.size().height as f32),
        );
        if rect.contains(pos) {
            return Some(TouchTarget::Menu);
        }
    }
    if !controller.handles_visible() {
        return None;
    }

    for end in [HandleEnd::Start, HandleEnd::End] {
        let handle = controller.handles().get(end);
        if handle.opacity() <= 0.0 {
            continue;
        }
        let anchor = client_point(controller, handle.offset(), origin);
        let line_height = controller.metrics().line_height as f32;

        // The caret bar is the word-select tap surface.
        let bar = Rect::from_min_size(
            Pos2::new(anchor.x - sizing::CARET_WIDTH / 2.0, anchor.y),
            egui::vec2(sizing::CARET_WIDTH, line_height),
        )
        .expand(2.0);
        if bar.contains(pos) {
            return Some(TouchTarget::Indicator(end));
        }

        let size = controller.metrics().handle_size as f32;
        let grip = Rect::from_min_size(
            Pos2::new(anchor.x - size / 2.0, anchor.y + line_height),
            egui::vec2(size, size),
        );
        if grip.contains(pos) {
            return Some(TouchTarget::Handle(end));
        }
    }
    None
}

fn client_point(controller: &TouchSelection, offset: Point, origin: Pos2) -> Pos2 {
    let layer = controller.layer_offset();
    origin + Vec2::new((offset.x + layer.x) as f32, (offset.y + layer.y) as f32)
}
