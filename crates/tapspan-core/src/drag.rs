//! Per-handle drag sessions driving live selection and edge auto-scroll.

use kurbo::Point;

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

use crate::geometry;
use crate::handles::{HandleEnd, HandleMetrics};
use crate::widget::{TextRange, TextWidget};

/// Default interval between drag sampler ticks.
pub const DEFAULT_SAMPLER_INTERVAL: Duration = Duration::from_millis(100);

/// State of one active handle drag.
///
/// The session owns the touch that started it; move events only refresh the
/// latest coordinates, and the periodic sampler does the actual work. At most
/// one session exists per handle.
#[derive(Debug, Clone)]
pub struct DragSession {
    handle: HandleEnd,
    touch_id: u64,
    latest: Point,
    /// Selection as it stood when the drag started.
    origin: Option<TextRange>,
    last_sample: Option<Instant>,
}

impl DragSession {
    /// Open a session for `handle` from the initiating touch.
    pub fn new(handle: HandleEnd, touch_id: u64, position: Point, origin: Option<TextRange>) -> Self {
        Self {
            handle,
            touch_id,
            latest: position,
            origin,
            last_sample: None,
        }
    }

    /// The handle being dragged.
    pub fn handle(&self) -> HandleEnd {
        self.handle
    }

    /// The touch identifier that owns this session.
    pub fn touch_id(&self) -> u64 {
        self.touch_id
    }

    /// Latest known touch position.
    pub fn latest(&self) -> Point {
        self.latest
    }

    /// Record a touch-move; motion between sampler ticks is coalesced.
    pub(crate) fn track(&mut self, position: Point) {
        self.latest = position;
    }

    /// Whether the sampler interval has elapsed since the last tick.
    pub(crate) fn due(&self, now: Instant, interval: Duration) -> bool {
        match self.last_sample {
            Some(last) => now.duration_since(last) >= interval,
            None => true,
        }
    }
}

/// One sampler tick for an active session.
///
/// Nudges the scroll when the touch point is crossing a viewport edge, then
/// resolves the text position half a line above the fingertip and updates the
/// live selection: a caret move when the drag started without a selection,
/// otherwise a replacement of this handle's endpoint only.
pub(crate) fn sample(
    session: &mut DragSession,
    widget: &mut dyn TextWidget,
    metrics: &HandleMetrics,
    now: Instant,
) {
    session.last_sample = Some(now);

    let config = widget.config();
    let delta = geometry::edge_scroll_delta(widget, session.latest, &config);
    if delta.x != 0.0 || delta.y != 0.0 {
        let scroll = widget.scroll_offset();
        widget.set_scroll_offset(scroll + delta);
    }

    // Aim above the fingertip, which occludes the target line.
    let target = Point::new(
        session.latest.x,
        session.latest.y - metrics.line_height / 2.0,
    );
    let Some(position) = widget.position_at(target) else {
        return;
    };

    let next = match session.origin {
        Some(origin) if !origin.is_empty() => match session.handle {
            HandleEnd::Start => TextRange::new(position, origin.end()),
            HandleEnd::End => TextRange::new(origin.start(), position),
        },
        _ => TextRange::caret(position),
    };
    widget.set_selection(next);
}
