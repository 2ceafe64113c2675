//! Edge-proximity probing and bounded scroll steps for drag auto-scroll.

use kurbo::{Point, Vec2};

use crate::widget::{TextWidget, WidgetConfig};

/// Whether content resolved just before and just after a touch point along
/// one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisProbe {
    /// Content resolved one unit before the point (up / left).
    pub before: bool,
    /// Content resolved one unit after the point (down / right).
    pub after: bool,
}

/// Sample the widget one `step` before and after `point` along a single axis.
///
/// `step` is one line height (vertical) or one character width (horizontal)
/// expressed as an axis-aligned vector.
pub fn probe_axis(widget: &dyn TextWidget, point: Point, step: Vec2) -> AxisProbe {
    AxisProbe {
        before: widget.position_at(point - step).is_some(),
        after: widget.position_at(point + step).is_some(),
    }
}

/// One bounded scroll step along a single axis.
///
/// A missing "before" sample with a present "after" sample means the point is
/// crossing the near edge: scroll one `unit` toward it, clamped at zero. The
/// symmetric pattern scrolls toward the far edge, clamped at `max_scroll`.
/// Both samples present (point well inside) or both missing (point outside
/// the content entirely) produce no movement.
pub fn edge_scroll_step(probe: AxisProbe, scroll: f64, max_scroll: f64, unit: f64) -> f64 {
    if probe.before == probe.after {
        return 0.0;
    }
    if !probe.before && scroll > 0.0 {
        -unit.min(scroll)
    } else if !probe.after && scroll < max_scroll {
        unit.min(max_scroll - scroll)
    } else {
        0.0
    }
}

/// Scroll adjustment for both axes at the current touch point.
///
/// Evaluated once per sampler tick, not per pixel moved; a finger resting at
/// an edge produces one nudge per tick.
pub fn edge_scroll_delta(widget: &dyn TextWidget, point: Point, config: &WidgetConfig) -> Vec2 {
    let scroll = widget.scroll_offset();
    let extent = widget.scroll_extent();
    let horizontal = probe_axis(widget, point, Vec2::new(config.char_width, 0.0));
    let vertical = probe_axis(widget, point, Vec2::new(0.0, config.line_height));
    Vec2::new(
        edge_scroll_step(horizontal, scroll.x, extent.width, config.char_width),
        edge_scroll_step(vertical, scroll.y, extent.height, config.line_height),
    )
}
