//! Selection handle pair and the debounced handle transform sync.

use kurbo::{Point, Rect};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

use crate::widget::{TextPosition, TextRange, TextWidget, WidgetConfig};

/// Default debounce window between applied handle transforms.
pub const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_millis(300);

/// Window within which a second tap on a handle indicator selects a word.
pub const WORD_TAP_WINDOW: Duration = Duration::from_millis(200);

/// Smallest handle a finger can still hit comfortably.
pub const MIN_HANDLE_SIZE: f64 = 16.0;

/// Which end of the selection a handle owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleEnd {
    Start,
    End,
}

impl HandleEnd {
    /// The endpoint of `range` this handle is bound to.
    pub fn endpoint_of(self, range: TextRange) -> TextPosition {
        match self {
            HandleEnd::Start => range.start(),
            HandleEnd::End => range.end(),
        }
    }
}

/// Orientation of the teardrop indicator hanging off a handle.
///
/// A non-empty selection shows the pair asymmetrically (start opens left,
/// end opens right); a collapsed selection rotates both into the shared
/// caret orientation so the two indicators read as one cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorOrientation {
    OpenLeft,
    OpenRight,
    Caret,
}

/// Handle sizing derived from the widget configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleMetrics {
    /// Cached line height, drives sampling offsets and menu flipping.
    pub line_height: f64,
    /// Cached character width, drives horizontal edge probing.
    pub char_width: f64,
    /// Side length of a handle's touch target.
    pub handle_size: f64,
}

impl HandleMetrics {
    /// Derive metrics from the widget configuration.
    pub fn from_config(config: &WidgetConfig) -> Self {
        Self {
            line_height: config.line_height,
            char_width: config.char_width,
            handle_size: config.line_height.max(MIN_HANDLE_SIZE),
        }
    }
}

/// A visual marker bound to one end of the current selection.
///
/// Positions are derived from the widget's selection and scroll; the handle
/// never becomes an independent source of truth.
#[derive(Debug, Clone)]
pub struct Handle {
    end: HandleEnd,
    offset: Point,
    opacity: f32,
    orientation: IndicatorOrientation,
    last_tap: Option<Instant>,
}

impl Handle {
    fn new(end: HandleEnd) -> Self {
        Self {
            end,
            offset: Point::ZERO,
            opacity: 0.0,
            orientation: Self::default_orientation(end),
            last_tap: None,
        }
    }

    fn default_orientation(end: HandleEnd) -> IndicatorOrientation {
        match end {
            HandleEnd::Start => IndicatorOrientation::OpenLeft,
            HandleEnd::End => IndicatorOrientation::OpenRight,
        }
    }

    /// The selection end this handle owns.
    pub fn end(&self) -> HandleEnd {
        self.end
    }

    /// Current screen offset in content space.
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Current opacity; zero while a debounced sync is pending.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Current indicator orientation.
    pub fn orientation(&self) -> IndicatorOrientation {
        self.orientation
    }

    /// Touch-target bounds at the current offset.
    pub fn bounds(&self, metrics: &HandleMetrics) -> Rect {
        Rect::from_origin_size(self.offset, (metrics.handle_size, metrics.handle_size))
    }

    /// Center of the touch-target bounds.
    pub fn center(&self, metrics: &HandleMetrics) -> Point {
        self.bounds(metrics).center()
    }

    /// Record a tap on this handle's indicator.
    ///
    /// Returns true when the tap completes a qualifying double tap (a prior
    /// tap within [`WORD_TAP_WINDOW`]); the stored timestamp is consumed so a
    /// third tap starts a fresh pair.
    pub(crate) fn register_tap(&mut self, now: Instant) -> bool {
        let qualifies = self
            .last_tap
            .is_some_and(|last| now.duration_since(last) <= WORD_TAP_WINDOW);
        if qualifies {
            self.last_tap = None;
        } else {
            self.last_tap = Some(now);
        }
        qualifies
    }
}

/// The start/end handle pair.
#[derive(Debug, Clone)]
pub struct HandlePair {
    start: Handle,
    end: Handle,
}

impl HandlePair {
    /// Create the pair, hidden and at the origin.
    pub fn new() -> Self {
        Self {
            start: Handle::new(HandleEnd::Start),
            end: Handle::new(HandleEnd::End),
        }
    }

    /// The handle owning `end`.
    pub fn get(&self, end: HandleEnd) -> &Handle {
        match end {
            HandleEnd::Start => &self.start,
            HandleEnd::End => &self.end,
        }
    }

    pub(crate) fn get_mut(&mut self, end: HandleEnd) -> &mut Handle {
        match end {
            HandleEnd::Start => &mut self.start,
            HandleEnd::End => &mut self.end,
        }
    }

    /// The start handle.
    pub fn start(&self) -> &Handle {
        &self.start
    }

    /// The end handle.
    pub fn end(&self) -> &Handle {
        &self.end
    }

    /// The handle whose touch-target center is nearer to `point`, by squared
    /// distance. Ties favor the start handle.
    pub fn nearer(&self, point: Point, metrics: &HandleMetrics) -> HandleEnd {
        let ds = dist_sq(self.start.center(metrics), point);
        let de = dist_sq(self.end.center(metrics), point);
        if ds <= de {
            HandleEnd::Start
        } else {
            HandleEnd::End
        }
    }

    pub(crate) fn set_opacity(&mut self, opacity: f32) {
        self.start.opacity = opacity;
        self.end.opacity = opacity;
    }
}

impl Default for HandlePair {
    fn default() -> Self {
        Self::new()
    }
}

fn dist_sq(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Screen offset for one selection endpoint.
///
/// The widget converts the position to a client point; adding the scroll
/// offset and subtracting the gutter margin moves it into the content space
/// of the handle layer.
pub fn handle_anchor(widget: &dyn TextWidget, position: TextPosition) -> Option<Point> {
    let point = widget.point_of(position)?;
    let scroll = widget.scroll_offset();
    Some(Point::new(
        point.x + scroll.x - widget.gutter_width(),
        point.y + scroll.y,
    ))
}

#[derive(Debug, Clone, Copy)]
struct PendingSync {
    selection: TextRange,
    due: Instant,
}

/// Debounced repositioning of the handle pair.
///
/// Bursts of selection-change notifications within the window coalesce into
/// a single visible jump: the handles are hidden and the latest selection is
/// applied once the remaining window elapses.
#[derive(Debug)]
pub struct TransformSync {
    window: Duration,
    last_applied: Option<Instant>,
    pending: Option<PendingSync>,
}

impl TransformSync {
    /// Create a sync with the given debounce window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_applied: None,
            pending: None,
        }
    }

    /// Whether a coalesced apply is still waiting for its deadline.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Position both handles for `selection` immediately.
    pub fn apply(
        &mut self,
        pair: &mut HandlePair,
        widget: &dyn TextWidget,
        selection: TextRange,
        now: Instant,
    ) {
        self.pending = None;
        let (Some(start), Some(end)) = (
            handle_anchor(widget, selection.start()),
            handle_anchor(widget, selection.end()),
        ) else {
            // Widget mid-relayout; skip this tick and wait for the next event.
            log::debug!("handle transform skipped: endpoint unresolvable");
            return;
        };

        pair.start.offset = start;
        pair.end.offset = end;
        pair.set_opacity(1.0);

        if selection.is_empty() {
            pair.start.orientation = IndicatorOrientation::Caret;
            pair.end.orientation = IndicatorOrientation::Caret;
        } else {
            pair.start.orientation = Handle::default_orientation(HandleEnd::Start);
            pair.end.orientation = Handle::default_orientation(HandleEnd::End);
        }

        self.last_applied = Some(now);
    }

    /// Request a reposition, debounced against the previous applied one.
    pub fn request(
        &mut self,
        pair: &mut HandlePair,
        widget: &dyn TextWidget,
        selection: TextRange,
        now: Instant,
    ) {
        match self.last_applied {
            Some(last) if now.duration_since(last) < self.window => {
                pair.set_opacity(0.0);
                self.pending = Some(PendingSync {
                    selection,
                    due: last + self.window,
                });
            }
            _ => self.apply(pair, widget, selection, now),
        }
    }

    /// Apply a pending coalesced sync once its deadline has passed.
    pub fn service(&mut self, pair: &mut HandlePair, widget: &dyn TextWidget, now: Instant) {
        if let Some(pending) = self.pending
            && now >= pending.due
        {
            self.apply(pair, widget, pending.selection, now);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.pending = None;
    }
}
