//! System clipboard sink backed by arboard.

use switchboard_core::{ClipboardSink, CoreError};

/// Writes copied cells to the OS clipboard. A fresh handle is opened for
/// every copy so the screen never holds a display connection.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn copy_text(&mut self, text: &str) -> Result<(), CoreError> {
        arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.set_text(text.to_owned()))
            .map_err(|e| CoreError::Clipboard {
                message: e.to_string(),
            })
    }
}
