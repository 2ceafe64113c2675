//! Controller attachment, event wiring, and tick servicing.

use kurbo::{Point, Rect, Size, Vec2};
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

use crate::clipboard::Clipboard;
use crate::drag::{self, DragSession, DEFAULT_SAMPLER_INTERVAL};
use crate::handles::{HandleEnd, HandleMetrics, HandlePair, TransformSync, DEFAULT_SYNC_TIMEOUT};
use crate::menu::{
    self, MenuDirective, MenuState, ToolAction, ToolError, ToolKind, ToolRegistry, ToolResult,
    ToolSelector,
};
use crate::widget::{EditSource, TextWidget, WidgetConfig, WidgetEvent};

/// Attachment failures. Unrecoverable configuration errors, not retried.
#[derive(Debug, Error)]
pub enum AttachError {
    #[error("widget reports an empty container rect")]
    EmptyContainer,
    #[error("widget reports non-positive typography metrics")]
    InvalidConfig,
}

/// One touch contact in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Platform touch identifier.
    pub id: u64,
    /// Contact position.
    pub position: Point,
}

/// What the touch landed on, as hit-tested by the host's rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchTarget {
    /// A selection handle's touch target.
    Handle(HandleEnd),
    /// The caret indicator inside a handle (word-select tap surface).
    Indicator(HandleEnd),
    /// Anywhere else inside the widget container.
    Container,
    /// The floating menu surface.
    Menu,
}

/// Whether the controller took the touch; consumed touches should have their
/// default browser-style handling suppressed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchResponse {
    pub consumed: bool,
}

impl TouchResponse {
    fn consumed() -> Self {
        Self { consumed: true }
    }

    fn ignored() -> Self {
        Self { consumed: false }
    }
}

/// Configuration bag for [`TouchSelection::attach`].
pub struct TouchSelectionOptions {
    /// Customizes the tool list; `None` keeps the defaults.
    pub tools: Option<ToolSelector>,
    /// Debounce window for handle repositioning.
    pub selection_sync_timeout: Duration,
    /// Interval between drag sampler ticks.
    pub sampler_interval: Duration,
    /// Receives tool failures; `None` logs and swallows them.
    pub tool_error_handler: Option<Box<dyn Fn(&str, &ToolError)>>,
}

impl Default for TouchSelectionOptions {
    fn default() -> Self {
        Self {
            tools: None,
            selection_sync_timeout: DEFAULT_SYNC_TIMEOUT,
            sampler_interval: DEFAULT_SAMPLER_INTERVAL,
            tool_error_handler: None,
        }
    }
}

/// The touch-selection controller for one widget attachment.
///
/// All state is scoped to the attachment; multiple widgets on one surface get
/// independent controllers. The host forwards widget notifications through
/// [`handle_event`](Self::handle_event), touch input through the `touch_*`
/// methods, and drives time by calling [`tick`](Self::tick) each frame.
pub struct TouchSelection {
    clipboard: Box<dyn Clipboard>,
    registry: ToolRegistry,
    handles: HandlePair,
    sync: TransformSync,
    menu: MenuState,
    menu_anchor: HandleEnd,
    config: WidgetConfig,
    metrics: HandleMetrics,
    sampler_interval: Duration,
    drags: [Option<DragSession>; 2],
    menu_touches: Vec<u64>,
    handles_shown: bool,
    layer_offset: Vec2,
    deferred_sync: bool,
    disposed: bool,
    error_handler: Box<dyn Fn(&str, &ToolError)>,
}

fn slot(end: HandleEnd) -> usize {
    match end {
        HandleEnd::Start => 0,
        HandleEnd::End => 1,
    }
}

impl TouchSelection {
    /// Attach to a widget.
    ///
    /// Validates the widget's anchor surface before creating any state;
    /// failures here mean the widget cannot host touch selection at all.
    pub fn attach(
        widget: &dyn TextWidget,
        clipboard: Box<dyn Clipboard>,
        options: TouchSelectionOptions,
    ) -> Result<Self, AttachError> {
        let viewport = widget.viewport();
        if viewport.width() <= 0.0 || viewport.height() <= 0.0 {
            return Err(AttachError::EmptyContainer);
        }
        let config = widget.config();
        if config.line_height <= 0.0 || config.font_size <= 0.0 {
            return Err(AttachError::InvalidConfig);
        }

        let registry = ToolRegistry::build(options.tools);
        let menu = MenuState::new(registry.default_menu_size());
        let error_handler = options.tool_error_handler.unwrap_or_else(|| {
            Box::new(|name, err| log::warn!("selection tool '{name}' failed: {err}"))
        });

        Ok(Self {
            clipboard,
            registry,
            handles: HandlePair::new(),
            sync: TransformSync::new(options.selection_sync_timeout),
            menu,
            menu_anchor: HandleEnd::Start,
            config,
            metrics: HandleMetrics::from_config(&config),
            sampler_interval: options.sampler_interval,
            drags: [None, None],
            menu_touches: Vec::new(),
            handles_shown: false,
            layer_offset: -widget.scroll_offset(),
            deferred_sync: false,
            disposed: false,
            error_handler,
        })
    }

    /// Dispatch one widget notification through the event table.
    pub fn handle_event(&mut self, widget: &mut dyn TextWidget, event: WidgetEvent, now: Instant) {
        if self.disposed {
            return;
        }
        match event {
            WidgetEvent::SelectionChanged => {
                self.menu.close();
                // Deferred one tick so the widget's own scroll-into-view
                // settles before the handles are measured.
                self.deferred_sync = true;
            }
            WidgetEvent::Scrolled => {
                self.layer_offset = -widget.scroll_offset();
            }
            WidgetEvent::ConfigChanged => {
                let config = widget.config();
                if config.line_height != self.config.line_height
                    || config.font_size != self.config.font_size
                {
                    self.metrics = HandleMetrics::from_config(&config);
                }
                self.config = config;
            }
            WidgetEvent::Resized => {
                self.hide_handles();
                self.close_menu();
                if let Some(selection) = widget.selection() {
                    self.sync.request(&mut self.handles, &*widget, selection, now);
                }
            }
            WidgetEvent::Blurred => {
                self.hide_handles();
                self.close_menu();
            }
            WidgetEvent::Disposed => self.dispose(),
        }
    }

    /// Handle a touch-start, hit-tested by the host.
    pub fn touch_start(
        &mut self,
        widget: &mut dyn TextWidget,
        target: TouchTarget,
        touch: TouchPoint,
        now: Instant,
    ) -> TouchResponse {
        if self.disposed {
            return TouchResponse::ignored();
        }
        self.show_handles();

        match target {
            TouchTarget::Handle(end) => {
                if self.drags[slot(end)].is_some() {
                    // A finger already owns this handle; a second contact has
                    // no meaning until the first lifts.
                    log::debug!("drag rejected: {end:?} handle already dragging");
                    return TouchResponse::consumed();
                }
                let origin = widget.selection();
                self.drags[slot(end)] =
                    Some(DragSession::new(end, touch.id, touch.position, origin));
                TouchResponse::consumed()
            }
            TouchTarget::Indicator(end) => {
                let caret = widget.selection().is_some_and(|s| s.is_empty());
                let qualified = self.handles.get_mut(end).register_tap(now);
                if caret
                    && qualified
                    && let Some(selection) = widget.selection()
                    && let Some(word) = widget.word_at(selection.start())
                {
                    widget.set_selection(word);
                }
                TouchResponse::consumed()
            }
            TouchTarget::Menu => {
                // The whole gesture stays consumed so scrolling and native
                // selection do not fight with tool taps.
                self.menu_touches.push(touch.id);
                TouchResponse::consumed()
            }
            TouchTarget::Container => TouchResponse::ignored(),
        }
    }

    /// Handle a touch-move; only refreshes the owning session's coordinates.
    pub fn touch_move(&mut self, touch: TouchPoint) -> TouchResponse {
        if self.disposed {
            return TouchResponse::ignored();
        }
        for session in self.drags.iter_mut().flatten() {
            if session.touch_id() == touch.id {
                session.track(touch.position);
                return TouchResponse::consumed();
            }
        }
        if self.menu_touches.contains(&touch.id) {
            return TouchResponse::consumed();
        }
        TouchResponse::ignored()
    }

    /// Handle a touch-end: close the drag session and, when a selection
    /// remains, open the menu near the nearer handle.
    pub fn touch_end(&mut self, widget: &mut dyn TextWidget, touch: TouchPoint) -> TouchResponse {
        if self.disposed {
            return TouchResponse::ignored();
        }
        if self.release_menu_touch(touch.id) {
            return TouchResponse::consumed();
        }
        if self.take_session(touch.id).is_none() {
            return TouchResponse::ignored();
        }

        if widget.selection().is_some_and(|s| !s.is_empty()) {
            let content_point = touch.position - self.layer_offset;
            let nearer = self.handles.nearer(content_point, &self.metrics);
            self.open_menu_near(widget, nearer);
        }
        TouchResponse::consumed()
    }

    /// Handle a touch-cancel: close the drag session without opening a menu.
    pub fn touch_cancel(&mut self, touch_id: u64) -> TouchResponse {
        if self.disposed {
            return TouchResponse::ignored();
        }
        if self.release_menu_touch(touch_id) {
            return TouchResponse::consumed();
        }
        match self.take_session(touch_id) {
            Some(_) => TouchResponse::consumed(),
            None => TouchResponse::ignored(),
        }
    }

    fn release_menu_touch(&mut self, touch_id: u64) -> bool {
        match self.menu_touches.iter().position(|&id| id == touch_id) {
            Some(index) => {
                self.menu_touches.swap_remove(index);
                true
            }
            None => false,
        }
    }

    fn take_session(&mut self, touch_id: u64) -> Option<DragSession> {
        for session_slot in &mut self.drags {
            if session_slot
                .as_ref()
                .is_some_and(|s| s.touch_id() == touch_id)
            {
                return session_slot.take();
            }
        }
        None
    }

    /// Service timers: the deferred selection sync, the debounce deadline,
    /// and any due drag samplers. Call once per host frame.
    pub fn tick(&mut self, widget: &mut dyn TextWidget, now: Instant) {
        if self.disposed {
            return;
        }
        if self.deferred_sync {
            self.deferred_sync = false;
            if let Some(selection) = widget.selection() {
                self.sync.request(&mut self.handles, &*widget, selection, now);
            }
        }
        self.sync.service(&mut self.handles, &*widget, now);

        let interval = self.sampler_interval;
        for session_slot in &mut self.drags {
            if let Some(session) = session_slot
                && session.due(now, interval)
            {
                drag::sample(session, widget, &self.metrics, now);
            }
        }
    }

    /// Run a tool by name and apply its menu directive.
    ///
    /// Failures are routed to the configured error handler and leave the
    /// menu's open/closed state untouched so the user can retry.
    pub async fn dispatch_tool(&mut self, widget: &mut dyn TextWidget, name: &str) {
        if self.disposed {
            return;
        }
        match self.run_tool(widget, name).await {
            Ok(MenuDirective::Keep) => {}
            Ok(MenuDirective::Close) => self.menu.close(),
            Ok(MenuDirective::Reopen) => self.open_menu_near(widget, self.menu_anchor),
            Err(err) => (self.error_handler)(name, &err),
        }
    }

    async fn run_tool(
        &mut self,
        widget: &mut dyn TextWidget,
        name: &str,
    ) -> ToolResult<MenuDirective> {
        // Resolve against the registry first so its borrow ends before the
        // builtin path needs the clipboard.
        let custom = {
            let tool = self
                .registry
                .get_mut(name)
                .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
            match tool.action_mut() {
                ToolAction::Builtin(kind) => Err(*kind),
                ToolAction::Custom(action) => Ok(action()),
            }
        };
        match custom {
            Ok(Some(completion)) => completion.await,
            Ok(None) => Ok(MenuDirective::Keep),
            Err(kind) => self.run_builtin(widget, kind).await,
        }
    }

    async fn run_builtin(
        &mut self,
        widget: &mut dyn TextWidget,
        kind: ToolKind,
    ) -> ToolResult<MenuDirective> {
        match kind {
            ToolKind::Copy => {
                let selection = widget
                    .selection()
                    .filter(|s| !s.is_empty())
                    .ok_or(ToolError::EmptySelection)?;
                let text = widget.text_in(selection);
                self.clipboard.write_text(&text).await?;
                Ok(MenuDirective::Close)
            }
            ToolKind::Cut => {
                let selection = widget
                    .selection()
                    .filter(|s| !s.is_empty())
                    .ok_or(ToolError::EmptySelection)?;
                let text = widget.text_in(selection);
                self.clipboard.write_text(&text).await?;
                widget.apply_edit(selection, "", EditSource::Cut);
                Ok(MenuDirective::Close)
            }
            ToolKind::Paste => {
                let text = self.clipboard.read_text().await?;
                if text.is_empty() {
                    return Ok(MenuDirective::Keep);
                }
                let Some(selection) = widget.selection() else {
                    return Ok(MenuDirective::Keep);
                };
                widget.apply_edit(selection, &text, EditSource::Paste);
                Ok(MenuDirective::Close)
            }
            ToolKind::Undo => {
                widget.undo();
                Ok(MenuDirective::Reopen)
            }
            ToolKind::Redo => {
                widget.redo();
                Ok(MenuDirective::Reopen)
            }
            ToolKind::SelectAll => {
                widget.focus();
                let full = widget.full_range();
                widget.set_selection(full);
                Ok(MenuDirective::Reopen)
            }
            ToolKind::Close => Ok(MenuDirective::Close),
        }
    }

    /// Show the handle pair. Idempotent.
    pub fn show_handles(&mut self) {
        self.handles_shown = true;
    }

    /// Hide the handle pair. Idempotent.
    pub fn hide_handles(&mut self) {
        self.handles_shown = false;
    }

    /// Open the menu anchored to `end`'s handle.
    pub fn open_menu_near(&mut self, widget: &dyn TextWidget, end: HandleEnd) {
        if self.disposed {
            return;
        }
        self.menu_anchor = end;
        let position = menu::position_near(
            self.handle_client_bounds(end),
            self.menu.size(),
            widget.viewport(),
            widget.visual_viewport(),
            self.metrics.line_height,
        );
        self.menu.open_at(position);
    }

    /// Hide the menu. Idempotent.
    pub fn close_menu(&mut self) {
        self.menu.close();
    }

    fn handle_client_bounds(&self, end: HandleEnd) -> Rect {
        self.handles.get(end).bounds(&self.metrics) + self.layer_offset
    }

    fn dispose(&mut self) {
        log::debug!("touch selection disposed");
        self.drags = [None, None];
        self.menu_touches.clear();
        self.sync.clear();
        self.deferred_sync = false;
        self.menu.close();
        self.handles_shown = false;
        self.registry.clear();
        self.disposed = true;
    }

    /// The handle pair, for rendering.
    pub fn handles(&self) -> &HandlePair {
        &self.handles
    }

    /// Whether handles should currently be drawn.
    pub fn handles_visible(&self) -> bool {
        self.handles_shown && !self.disposed
    }

    /// The menu state, for rendering.
    pub fn menu(&self) -> &MenuState {
        &self.menu
    }

    /// Report the measured menu surface size from the UI layer.
    pub fn set_menu_size(&mut self, size: Size) {
        self.menu.set_size(size);
    }

    /// The tool registry, for rendering.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Current handle sizing metrics.
    pub fn metrics(&self) -> &HandleMetrics {
        &self.metrics
    }

    /// Translation of the handle layer (the negative scroll offset).
    pub fn layer_offset(&self) -> Vec2 {
        self.layer_offset
    }

    /// Whether a drag session is active on `end`.
    pub fn is_dragging(&self, end: HandleEnd) -> bool {
        self.drags[slot(end)].is_some()
    }

    /// Whether the controller reached its terminal state.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
