//! The host editor contract and its value types.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// A text position as (line, column), 1-based, in widget-defined units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TextPosition {
    /// Line number, 1-based.
    pub line: u32,
    /// Column number, 1-based.
    pub column: u32,
}

impl TextPosition {
    /// Create a new position.
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A text range between two positions.
///
/// The range is kept normalized: `start` is never after `end`. A range whose
/// endpoints coincide is a caret (empty selection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    start: TextPosition,
    end: TextPosition,
}

impl TextRange {
    /// Create a range from two endpoints, normalizing their order.
    pub fn new(a: TextPosition, b: TextPosition) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Create a collapsed range (caret) at a single position.
    pub fn caret(position: TextPosition) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// The earlier endpoint.
    pub fn start(&self) -> TextPosition {
        self.start
    }

    /// The later endpoint.
    pub fn end(&self) -> TextPosition {
        self.end
    }

    /// Whether the range is a caret (no selected text).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Origin tag the widget receives with a content mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditSource {
    /// The selection menu's cut tool.
    Cut,
    /// The selection menu's paste tool.
    Paste,
}

/// Typography the controller caches for sampling offsets and handle sizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Height of one text line in pixels.
    pub line_height: f64,
    /// Width of one character cell in pixels.
    pub char_width: f64,
    /// Font size in pixels.
    pub font_size: f64,
}

/// Notifications the host forwards from its editor widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEvent {
    /// The selection (or caret) changed.
    SelectionChanged,
    /// The scroll offset changed.
    Scrolled,
    /// The widget configuration changed (fonts, line height).
    ConfigChanged,
    /// The widget container was resized.
    Resized,
    /// The widget lost focus.
    Blurred,
    /// The widget was disposed; terminal.
    Disposed,
}

/// The text-editing widget the controller attaches to.
///
/// All points are in client coordinates: relative to the widget container,
/// after scrolling. Handle offsets computed from them live in content space
/// (client plus scroll), inside a layer the host translates by the negative
/// scroll offset.
///
/// Conversions may fail transiently while the widget relayouts; callers treat
/// `None` as "skip this tick", not as an error.
pub trait TextWidget {
    /// Current selection, `None` while the widget is mid-update.
    fn selection(&self) -> Option<TextRange>;

    /// Replace the current selection.
    fn set_selection(&mut self, range: TextRange);

    /// The range spanning the whole document.
    fn full_range(&self) -> TextRange;

    /// Text covered by `range`.
    fn text_in(&self, range: TextRange) -> String;

    /// Text position under a client point, `None` when the point resolves to
    /// no content.
    fn position_at(&self, point: Point) -> Option<TextPosition>;

    /// Client point of a text position.
    fn point_of(&self, position: TextPosition) -> Option<Point>;

    /// Word boundaries around a position.
    fn word_at(&self, position: TextPosition) -> Option<TextRange>;

    /// Current scroll offset.
    fn scroll_offset(&self) -> Vec2;

    /// Scroll the content. Implementations clamp to their own extent.
    fn set_scroll_offset(&mut self, offset: Vec2);

    /// Maximum scrollable offset per axis.
    fn scroll_extent(&self) -> Size;

    /// Container rect in client coordinates.
    fn viewport(&self) -> Rect;

    /// Visible portion of the screen when the platform can report it
    /// (mobile browsers with dynamic toolbars). `None` skips the extra
    /// menu re-clamp.
    fn visual_viewport(&self) -> Option<Rect> {
        None
    }

    /// Fixed side margin (line-number gutter) in pixels.
    fn gutter_width(&self) -> f64 {
        0.0
    }

    /// Current typography configuration.
    fn config(&self) -> WidgetConfig;

    /// Replace `range` with `text`, tagged with its source for undo grouping.
    fn apply_edit(&mut self, range: TextRange, text: &str, source: EditSource);

    /// Undo the last edit.
    fn undo(&mut self);

    /// Redo the last undone edit.
    fn redo(&mut self);

    /// Give the widget keyboard focus.
    fn focus(&mut self);
}
