//! Message boxes.
//!
//! Two flavours exist. Process-modal boxes ([`MessageBox::run`],
//! [`msg_box`], [`msg_box_error`]) block the calling routine until dismissed.
//! Window-modal boxes ([`MessageBox::show_for`], [`Window::msg_box`]) attach
//! to one window, return at once and deliver their result through a
//! [`Signal`].

use tracing::debug;
use trellis_core::{DialogButtons, DialogKind, DialogRequest, DialogResult, Signal, dispatch};

use crate::window::Window;

/// Builder for a message box.
///
/// ```no_run
/// use trellis::{DialogButtons, DialogResult, MessageBox};
///
/// let answer = MessageBox::warning("Discard changes?")
///     .text("Unsaved edits will be lost.")
///     .buttons(DialogButtons::YesNo)
///     .run();
/// if answer == DialogResult::Yes {
///     // ...
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct MessageBox {
    request: DialogRequest,
}

impl MessageBox {
    /// An informational box with an OK button.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_kind(DialogKind::Info, title)
    }

    /// A warning box with an OK button.
    pub fn warning(title: impl Into<String>) -> Self {
        Self::with_kind(DialogKind::Warning, title)
    }

    /// An error box with an OK button.
    pub fn error(title: impl Into<String>) -> Self {
        Self::with_kind(DialogKind::Error, title)
    }

    fn with_kind(kind: DialogKind, title: impl Into<String>) -> Self {
        Self {
            request: DialogRequest {
                kind,
                buttons: DialogButtons::Ok,
                title: title.into(),
                text: String::new(),
            },
        }
    }

    /// Sets the secondary text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.request.text = text.into();
        self
    }

    /// Chooses the buttons offered.
    pub const fn buttons(mut self, buttons: DialogButtons) -> Self {
        self.request.buttons = buttons;
        self
    }

    /// The request handed to the backend.
    pub fn into_request(self) -> DialogRequest {
        self.request
    }

    /// Presents the box process-modally and blocks until it is dismissed.
    ///
    /// # Panics
    ///
    /// Panics off the UI thread.
    pub fn run(self) -> DialogResult {
        dispatch::assert_ui_thread("MessageBox::run");
        debug!(title = %self.request.title, "running process-modal dialog");
        dispatch::with_backend(|backend| backend.run_modal_dialog(&self.request))
    }

    /// Presents the box attached to `window`. See [`Window::message`].
    ///
    /// # Panics
    ///
    /// Panics if the window was not created.
    pub fn show_for(self, window: &Window) -> Signal<DialogResult> {
        window.message(&self.request)
    }
}

/// Shows a process-modal informational box and waits for it to close.
///
/// # Panics
///
/// Panics off the UI thread.
pub fn msg_box(title: impl Into<String>, text: impl Into<String>) -> DialogResult {
    MessageBox::new(title).text(text).run()
}

/// Shows a process-modal error box and waits for it to close.
///
/// # Panics
///
/// Panics off the UI thread.
pub fn msg_box_error(title: impl Into<String>, text: impl Into<String>) -> DialogResult {
    MessageBox::error(title).text(text).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_request() {
        let request = MessageBox::error("Save failed")
            .text("disk full")
            .buttons(DialogButtons::OkCancel)
            .into_request();

        assert_eq!(request.kind, DialogKind::Error);
        assert_eq!(request.buttons, DialogButtons::OkCancel);
        assert_eq!(request.title, "Save failed");
        assert_eq!(request.text, "disk full");
    }

    #[test]
    #[should_panic(expected = "must be called on the UI thread")]
    fn modal_box_requires_runtime() {
        let _ = msg_box("title", "text");
    }
}
