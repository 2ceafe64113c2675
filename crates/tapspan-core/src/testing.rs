//! Shared test doubles: a scripted text widget and a minimal future driver.

use kurbo::{Point, Rect, Size, Vec2};

use crate::widget::{EditSource, TextPosition, TextRange, TextWidget, WidgetConfig};

pub(crate) const CHAR_WIDTH: f64 = 8.0;
pub(crate) const LINE_HEIGHT: f64 = 16.0;

/// A grid-layout text widget: every character cell is `CHAR_WIDTH` wide and
/// every line `LINE_HEIGHT` tall, so coordinate conversions are exact.
pub(crate) struct FakeWidget {
    pub lines: Vec<String>,
    pub selection: Option<TextRange>,
    pub scroll: Vec2,
    pub scroll_extent: Size,
    pub viewport: Rect,
    pub visual_viewport: Option<Rect>,
    pub gutter: f64,
    pub config: WidgetConfig,
    pub edits: Vec<(TextRange, String, EditSource)>,
    pub undo_count: u32,
    pub redo_count: u32,
    pub focus_count: u32,
}

impl FakeWidget {
    pub fn new(lines: Vec<String>) -> Self {
        let viewport = Rect::new(0.0, 0.0, 200.0, 100.0);
        let content_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as f64
            * CHAR_WIDTH;
        let content_height = lines.len() as f64 * LINE_HEIGHT;
        Self {
            lines,
            selection: None,
            scroll: Vec2::ZERO,
            scroll_extent: Size::new(
                (content_width - viewport.width()).max(0.0),
                (content_height - viewport.height()).max(0.0),
            ),
            viewport,
            visual_viewport: None,
            gutter: 0.0,
            config: WidgetConfig {
                line_height: LINE_HEIGHT,
                char_width: CHAR_WIDTH,
                font_size: 12.0,
            },
            edits: Vec::new(),
            undo_count: 0,
            redo_count: 0,
            focus_count: 0,
        }
    }

    /// `count` lines of 20 columns each.
    pub fn tall(count: usize) -> Self {
        Self::new(
            (1..=count)
                .map(|i| format!("{:<20}", format!("hello world {i}")))
                .collect(),
        )
    }

    fn line(&self, number: u32) -> Option<&String> {
        self.lines.get(number as usize - 1)
    }
}

impl TextWidget for FakeWidget {
    fn selection(&self) -> Option<TextRange> {
        self.selection
    }

    fn set_selection(&mut self, range: TextRange) {
        self.selection = Some(range);
    }

    fn full_range(&self) -> TextRange {
        let last_line = self.lines.len().max(1) as u32;
        let last_column = self.line(last_line).map_or(0, |l| l.chars().count()) as u32 + 1;
        TextRange::new(
            TextPosition::new(1, 1),
            TextPosition::new(last_line, last_column),
        )
    }

    fn text_in(&self, range: TextRange) -> String {
        if range.is_empty() {
            return String::new();
        }
        let (start, end) = (range.start(), range.end());
        if start.line == end.line {
            return self
                .line(start.line)
                .map(|l| {
                    l.chars()
                        .skip(start.column as usize - 1)
                        .take((end.column - start.column) as usize)
                        .collect()
                })
                .unwrap_or_default();
        }
        let mut parts = Vec::new();
        if let Some(first) = self.line(start.line) {
            parts.push(first.chars().skip(start.column as usize - 1).collect());
        }
        for line in start.line + 1..end.line {
            parts.push(self.line(line).cloned().unwrap_or_default());
        }
        if let Some(last) = self.line(end.line) {
            parts.push(last.chars().take(end.column as usize - 1).collect::<String>());
        }
        parts.join("\n")
    }

    fn position_at(&self, point: Point) -> Option<TextPosition> {
        // Hit testing resolves nothing outside the visible container.
        if point.x < self.viewport.x0
            || point.x > self.viewport.x1
            || point.y < self.viewport.y0
            || point.y > self.viewport.y1
        {
            return None;
        }
        let content_x = point.x + self.scroll.x - self.gutter;
        let content_y = point.y + self.scroll.y;
        if content_x < 0.0 || content_y < 0.0 {
            return None;
        }
        let line = (content_y / self.config.line_height).floor() as u32 + 1;
        let column = (content_x / self.config.char_width).floor() as u32 + 1;
        let text = self.line(line)?;
        if column as usize > text.chars().count() + 1 {
            return None;
        }
        Some(TextPosition::new(line, column))
    }

    fn point_of(&self, position: TextPosition) -> Option<Point> {
        Some(Point::new(
            self.gutter + (position.column - 1) as f64 * self.config.char_width - self.scroll.x,
            (position.line - 1) as f64 * self.config.line_height - self.scroll.y,
        ))
    }

    fn word_at(&self, position: TextPosition) -> Option<TextRange> {
        let chars: Vec<char> = self.line(position.line)?.chars().collect();
        let is_word = |c: char| c.is_alphanumeric() || c == '_';
        let caret = (position.column as usize - 1).min(chars.len());

        let mut start = if caret < chars.len() && is_word(chars[caret]) {
            caret
        } else if caret > 0 && is_word(chars[caret - 1]) {
            caret - 1
        } else {
            return None;
        };
        let mut end = start;
        while start > 0 && is_word(chars[start - 1]) {
            start -= 1;
        }
        while end < chars.len() && is_word(chars[end]) {
            end += 1;
        }
        Some(TextRange::new(
            TextPosition::new(position.line, start as u32 + 1),
            TextPosition::new(position.line, end as u32 + 1),
        ))
    }

    fn scroll_offset(&self) -> Vec2 {
        self.scroll
    }

    fn set_scroll_offset(&mut self, offset: Vec2) {
        self.scroll = Vec2::new(
            offset.x.clamp(0.0, self.scroll_extent.width),
            offset.y.clamp(0.0, self.scroll_extent.height),
        );
    }

    fn scroll_extent(&self) -> Size {
        self.scroll_extent
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }

    fn visual_viewport(&self) -> Option<Rect> {
        self.visual_viewport
    }

    fn gutter_width(&self) -> f64 {
        self.gutter
    }

    fn config(&self) -> WidgetConfig {
        self.config
    }

    fn apply_edit(&mut self, range: TextRange, text: &str, source: EditSource) {
        self.edits.push((range, text.to_string(), source));
        let (start, end) = (range.start(), range.end());
        let prefix: String = self
            .line(start.line)
            .map(|l| l.chars().take(start.column as usize - 1).collect())
            .unwrap_or_default();
        let suffix: String = self
            .line(end.line)
            .map(|l| l.chars().skip(end.column as usize - 1).collect())
            .unwrap_or_default();
        let merged = format!("{prefix}{text}{suffix}");
        let replacement: Vec<String> = merged.split('\n').map(str::to_string).collect();
        let span = start.line as usize - 1..(end.line as usize).min(self.lines.len());
        self.lines.splice(span, replacement);
        self.selection = Some(TextRange::caret(start));
    }

    fn undo(&mut self) {
        self.undo_count += 1;
    }

    fn redo(&mut self) {
        self.redo_count += 1;
    }

    fn focus(&mut self) {
        self.focus_count += 1;
    }
}

/// Drive a future to completion on the test thread.
pub(crate) fn block_on<F: std::future::Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}
