//! The floating selection menu: tool registry and viewport-aware placement.

use kurbo::{Point, Rect, Size};
use thiserror::Error;

use crate::clipboard::{BoxFuture, ClipboardError};

/// Width and height of one tool button.
pub const MENU_BUTTON_SIZE: f64 = 36.0;
/// Inner padding around the menu's button row.
pub const MENU_PADDING: f64 = 8.0;
/// Vertical gap between a handle and the menu.
pub const MENU_GAP: f64 = 8.0;

/// The built-in tools, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Copy,
    Cut,
    Paste,
    SelectAll,
    Undo,
    Redo,
    Close,
}

impl ToolKind {
    /// All built-in tools in default display order.
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Copy,
        ToolKind::Cut,
        ToolKind::Paste,
        ToolKind::SelectAll,
        ToolKind::Undo,
        ToolKind::Redo,
        ToolKind::Close,
    ];

    /// Stable identifier, also the key custom selectors match on.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Copy => "copy",
            ToolKind::Cut => "cut",
            ToolKind::Paste => "paste",
            ToolKind::SelectAll => "selectAll",
            ToolKind::Undo => "undo",
            ToolKind::Redo => "redo",
            ToolKind::Close => "close",
        }
    }

    fn default_label(self) -> &'static str {
        match self {
            ToolKind::Copy => "Copy",
            ToolKind::Cut => "Cut",
            ToolKind::Paste => "Paste",
            ToolKind::SelectAll => "Select all",
            ToolKind::Undo => "Undo",
            ToolKind::Redo => "Redo",
            ToolKind::Close => "Close",
        }
    }
}

/// Errors from tool actions.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("nothing selected")]
    EmptySelection,
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("{0}")]
    Failed(String),
}

/// Result type for tool actions.
pub type ToolResult<T> = Result<T, ToolError>;

/// What the menu should do once a tool action completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuDirective {
    /// Leave the menu as it is.
    Keep,
    /// Hide the menu.
    Close,
    /// Re-show the menu at its current anchor.
    Reopen,
}

/// Visual content for a tool button.
///
/// The UI layer interprets labels; a producer is evaluated at render time.
pub enum ToolIcon {
    Label(String),
    Producer(Box<dyn Fn() -> String>),
}

impl ToolIcon {
    /// Resolve the icon to its current text content.
    pub fn resolve(&self) -> String {
        match self {
            ToolIcon::Label(label) => label.clone(),
            ToolIcon::Producer(producer) => producer(),
        }
    }
}

/// Action behind a tool button.
///
/// Built-in kinds are dispatched by the controller against the widget and
/// clipboard; custom actions are zero-argument closures that may hand back an
/// asynchronous completion.
pub enum ToolAction {
    Builtin(ToolKind),
    Custom(Box<dyn FnMut() -> Option<BoxFuture<'static, ToolResult<MenuDirective>>>>),
}

/// One entry in the selection menu.
pub struct Tool {
    name: String,
    icon: ToolIcon,
    action: ToolAction,
}

impl Tool {
    /// A built-in tool with its default label.
    pub fn builtin(kind: ToolKind) -> Self {
        Self {
            name: kind.name().to_string(),
            icon: ToolIcon::Label(kind.default_label().to_string()),
            action: ToolAction::Builtin(kind),
        }
    }

    /// A caller-defined tool.
    pub fn custom(
        name: impl Into<String>,
        icon: ToolIcon,
        action: impl FnMut() -> Option<BoxFuture<'static, ToolResult<MenuDirective>>> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            icon,
            action: ToolAction::Custom(Box::new(action)),
        }
    }

    /// Replace the icon, keeping name and action.
    pub fn with_icon(mut self, icon: ToolIcon) -> Self {
        self.icon = icon;
        self
    }

    /// The tool's identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tool's visual content.
    pub fn icon(&self) -> &ToolIcon {
        &self.icon
    }

    pub(crate) fn action_mut(&mut self) -> &mut ToolAction {
        &mut self.action
    }
}

/// The default tool set, in display order.
pub fn default_tools() -> Vec<Tool> {
    ToolKind::ALL.iter().copied().map(Tool::builtin).collect()
}

/// Caller-supplied customization of the tool list, invoked once per attach
/// with the default set. Returning `None` or an empty list keeps the
/// defaults.
pub type ToolSelector = Box<dyn FnOnce(Vec<Tool>) -> Option<Vec<Tool>>>;

/// Ordered tool collection, fixed for the lifetime of one attachment.
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    /// Build the registry from the defaults, optionally filtered/extended by
    /// a selector.
    pub fn build(selector: Option<ToolSelector>) -> Self {
        let tools = match selector {
            Some(select) => match select(default_tools()) {
                Some(tools) if !tools.is_empty() => tools,
                _ => default_tools(),
            },
            None => default_tools(),
        };
        Self { tools }
    }

    /// The tools in display order.
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Number of tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty (only after disposal).
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Tool> {
        self.tools.iter_mut().find(|tool| tool.name == name)
    }

    pub(crate) fn clear(&mut self) {
        self.tools.clear();
    }

    /// Default menu surface size for this tool count.
    pub fn default_menu_size(&self) -> Size {
        Size::new(
            self.tools.len() as f64 * MENU_BUTTON_SIZE + MENU_PADDING * 2.0,
            MENU_BUTTON_SIZE + MENU_PADDING * 2.0,
        )
    }
}

/// Visibility and placement of the floating menu.
#[derive(Debug, Clone, Copy)]
pub struct MenuState {
    visible: bool,
    position: Point,
    size: Size,
}

impl MenuState {
    /// A hidden menu with the given surface size.
    pub fn new(size: Size) -> Self {
        Self {
            visible: false,
            position: Point::ZERO,
            size,
        }
    }

    /// Whether the menu is currently shown.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Top-left corner in client coordinates.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Current surface size used for clamping.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Report the measured surface size from the UI layer.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub(crate) fn open_at(&mut self, position: Point) {
        self.position = position;
        self.visible = true;
    }

    pub(crate) fn close(&mut self) {
        self.visible = false;
    }
}

/// Place the menu near a handle, inside the container and the viewport.
///
/// The candidate is horizontally centered on the handle and sits just above
/// it; when that overflows the container's top it flips to just below the
/// handle plus one line height. Both axes are then clamped to the container
/// and re-clamped against the visual viewport when one is known.
pub fn position_near(
    handle_bounds: Rect,
    menu_size: Size,
    container: Rect,
    visual_viewport: Option<Rect>,
    line_height: f64,
) -> Point {
    let mut x = handle_bounds.center().x - menu_size.width / 2.0;
    let mut y = handle_bounds.y0 - menu_size.height - MENU_GAP;
    if y < container.y0 {
        y = handle_bounds.y1 + line_height;
    }

    let clamp = |value: f64, min: f64, max: f64| value.clamp(min, max.max(min));
    x = clamp(x, container.x0, container.x1 - menu_size.width);
    y = clamp(y, container.y0, container.y1 - menu_size.height);

    if let Some(viewport) = visual_viewport {
        x = clamp(x, viewport.x0, viewport.x1 - menu_size.width);
        y = clamp(y, viewport.y0, viewport.y1 - menu_size.height);
    }

    Point::new(x, y)
}
