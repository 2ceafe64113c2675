//! TapSpan Core Library
//!
//! Touch-friendly text selection for editor widgets: draggable selection
//! handles, a floating action menu, and edge-triggered auto-scroll during
//! handle drags. The host implements [`TextWidget`] for its editor and
//! forwards touch input and widget notifications to a [`TouchSelection`]
//! controller; rendering of the resulting handle/menu state is left to the
//! host (see the `tapspan-ui` crate for an egui implementation).

pub mod clipboard;
pub mod controller;
pub mod drag;
pub mod geometry;
pub mod handles;
pub mod menu;
pub mod widget;

#[cfg(test)]
pub(crate) mod testing;

pub use clipboard::{BoxFuture, Clipboard, ClipboardError, ClipboardResult, MemoryClipboard};
pub use controller::{
    AttachError, TouchPoint, TouchResponse, TouchSelection, TouchSelectionOptions, TouchTarget,
};
pub use drag::{DragSession, DEFAULT_SAMPLER_INTERVAL};
pub use handles::{
    Handle, HandleEnd, HandleMetrics, HandlePair, IndicatorOrientation, TransformSync,
    DEFAULT_SYNC_TIMEOUT, WORD_TAP_WINDOW,
};
pub use menu::{
    MenuDirective, MenuState, Tool, ToolAction, ToolError, ToolIcon, ToolKind, ToolRegistry,
    ToolResult, ToolSelector,
};
pub use widget::{EditSource, TextPosition, TextRange, TextWidget, WidgetConfig, WidgetEvent};

#[cfg(not(target_arch = "wasm32"))]
pub use clipboard::SystemClipboard;
