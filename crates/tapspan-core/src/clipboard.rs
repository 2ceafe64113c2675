//! Clipboard abstraction for the selection menu's copy/cut/paste tools.

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Clipboard errors.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard read failed: {0}")]
    Read(String),
    #[error("clipboard write failed: {0}")]
    Write(String),
}

/// Result type for clipboard operations.
pub type ClipboardResult<T> = Result<T, ClipboardError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for clipboard backends.
///
/// Implementations can talk to the OS clipboard, a browser clipboard bridge,
/// or an in-memory buffer for headless hosts and tests. Operations are
/// asynchronous with an explicit success/failure outcome; the controller
/// never assumes a read or write landed.
pub trait Clipboard {
    /// Read the clipboard's current text content.
    fn read_text(&mut self) -> BoxFuture<'_, ClipboardResult<String>>;

    /// Replace the clipboard content with `text`.
    fn write_text(&mut self, text: &str) -> BoxFuture<'_, ClipboardResult<()>>;
}

/// OS clipboard backend via arboard.
#[cfg(not(target_arch = "wasm32"))]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClipboard {
    /// Open the OS clipboard.
    pub fn new() -> ClipboardResult<Self> {
        let inner =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        Ok(Self { inner })
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clipboard for SystemClipboard {
    fn read_text(&mut self) -> BoxFuture<'_, ClipboardResult<String>> {
        let result = self
            .inner
            .get_text()
            .map_err(|e| ClipboardError::Read(e.to_string()));
        Box::pin(std::future::ready(result))
    }

    fn write_text(&mut self, text: &str) -> BoxFuture<'_, ClipboardResult<()>> {
        let result = self
            .inner
            .set_text(text)
            .map_err(|e| ClipboardError::Write(e.to_string()));
        Box::pin(std::future::ready(result))
    }
}

/// In-memory clipboard for tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: String,
}

impl MemoryClipboard {
    /// Create an empty in-memory clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clipboard pre-filled with `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The current content, bypassing the async interface.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Clipboard for MemoryClipboard {
    fn read_text(&mut self) -> BoxFuture<'_, ClipboardResult<String>> {
        let text = self.text.clone();
        Box::pin(std::future::ready(Ok(text)))
    }

    fn write_text(&mut self, text: &str) -> BoxFuture<'_, ClipboardResult<()>> {
        self.text = text.to_string();
        Box::pin(std::future::ready(Ok(())))
    }
}
