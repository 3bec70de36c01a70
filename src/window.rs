//! Top-level windows.
//!
//! A window owns one root control. Creating the window creates native widgets
//! for the whole tree and freezes its structure; every resize reported by the
//! backend then lays the root out over the full client area. Layout is
//! computed for the whole tree before any rectangle is handed to the backend.

use core::fmt;
use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use tracing::{debug, trace};
use trellis_core::{
    ControlKind, DialogRequest, DialogResult, Notification, NotificationTarget, Property, Rect,
    Signal, Size, WidgetConfig, WidgetHandle, dispatch,
};

use crate::control::Control;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Unbuilt,
    Hidden,
    Shown,
    Destroyed,
}

struct WindowState {
    title: String,
    size: Size,
    client: Size,
    phase: Phase,
    handle: Option<WidgetHandle>,
}

struct WindowInner {
    state: RefCell<WindowState>,
    root: Control,
    closing: RefCell<Signal<()>>,
}

impl WindowInner {
    fn layout(&self) {
        let client = self.state.borrow().client;
        let mut placements = Vec::new();
        self.root.layout(Rect::from_size(client), &mut placements);
        trace!(?client, widgets = placements.len(), "window laid out");
        dispatch::with_backend(|backend| {
            for (handle, rect) in placements {
                backend.apply_rect(handle, rect);
            }
        });
    }
}

impl NotificationTarget for WindowInner {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Resized(client) => {
                self.state.borrow_mut().client = client;
                self.layout();
            }
            Notification::Closing => {
                debug!(title = %self.state.borrow().title, "window closing requested");
                self.closing.borrow().post(());
            }
            other => trace!(notification = ?other, "window ignores notification"),
        }
    }
}

/// A top-level window holding one root control.
///
/// `Window` is a cheap handle; clones refer to the same window. The native
/// window keeps reporting events only while a handle is alive.
#[derive(Clone)]
pub struct Window {
    inner: Rc<WindowInner>,
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Window")
            .field("title", &state.title)
            .field("size", &state.size)
            .field("phase", &state.phase)
            .field("handle", &state.handle)
            .finish_non_exhaustive()
    }
}

impl Window {
    /// Creates an unbuilt window of `width` by `height` pixels owning `root`.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive, or if `root` already
    /// belongs to a container or window.
    #[must_use]
    pub fn new(title: impl Into<String>, width: i32, height: i32, root: impl Into<Control>) -> Self {
        let size = validate_size(width, height);
        let root = root.into();
        root.adopt("a window");
        Self {
            inner: Rc::new(WindowInner {
                state: RefCell::new(WindowState {
                    title: title.into(),
                    size,
                    client: size,
                    phase: Phase::Unbuilt,
                    handle: None,
                }),
                root,
                closing: RefCell::default(),
            }),
        }
    }

    /// The root control.
    #[must_use]
    pub fn root(&self) -> &Control {
        &self.inner.root
    }

    /// The native window, once created.
    #[must_use]
    pub fn handle(&self) -> Option<WidgetHandle> {
        self.inner.state.borrow().handle
    }

    /// The title.
    #[must_use]
    pub fn title(&self) -> String {
        self.inner.state.borrow().title.clone()
    }

    /// The requested size.
    #[must_use]
    pub fn size(&self) -> Size {
        self.inner.state.borrow().size
    }

    /// The client area the tree was last laid out in.
    #[must_use]
    pub fn client_size(&self) -> Size {
        self.inner.state.borrow().client
    }

    /// Returns true once [`create`](Self::create) ran.
    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self.phase(), Phase::Hidden | Phase::Shown)
    }

    /// Returns true while shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.phase() == Phase::Shown
    }

    fn phase(&self) -> Phase {
        self.inner.state.borrow().phase
    }

    fn created_handle(&self, operation: &str) -> WidgetHandle {
        let state = self.inner.state.borrow();
        match (state.phase, state.handle) {
            (Phase::Hidden | Phase::Shown, Some(handle)) => handle,
            (phase, _) => panic!("{operation} requires a created window, but it is {phase:?}"),
        }
    }

    /// Creates the native window and every widget of its tree, freezes the
    /// tree and lays it out. The window stays hidden.
    ///
    /// # Panics
    ///
    /// Panics off the UI thread, or if the window was already created.
    pub fn create(&self) {
        dispatch::assert_ui_thread("Window::create");
        let config = {
            let state = self.inner.state.borrow();
            assert!(
                state.phase == Phase::Unbuilt,
                "Window::create called on a window that is {:?}",
                state.phase
            );
            WidgetConfig::new(None)
                .with(Property::Text(state.title.clone()))
                .with(Property::WindowSize(state.size))
        };

        let handle =
            dispatch::with_backend(|backend| backend.create_widget(ControlKind::Window, &config));
        {
            let mut state = self.inner.state.borrow_mut();
            state.handle = Some(handle);
            state.phase = Phase::Hidden;
        }
        self.inner.root.realize(handle);
        let target: Weak<WindowInner> = Rc::downgrade(&self.inner);
        dispatch::connect(handle, target);
        debug!(%handle, title = %self.title(), "window created");

        self.inner.layout();
    }

    /// Shows the window.
    ///
    /// # Panics
    ///
    /// Panics if the window was not created.
    pub fn show(&self) {
        self.set_visible(true, "Window::show");
    }

    /// Hides the window.
    ///
    /// # Panics
    ///
    /// Panics if the window was not created.
    pub fn hide(&self) {
        self.set_visible(false, "Window::hide");
    }

    fn set_visible(&self, visible: bool, operation: &str) {
        let handle = self.created_handle(operation);
        self.inner.state.borrow_mut().phase = if visible {
            Phase::Shown
        } else {
            Phase::Hidden
        };
        dispatch::with_backend(|backend| backend.set_property(handle, &Property::Visible(visible)));
    }

    /// Creates the window if needed, then shows it.
    ///
    /// # Panics
    ///
    /// Panics off the UI thread or after [`destroy`](Self::destroy).
    pub fn open(&self) {
        if self.phase() == Phase::Unbuilt {
            self.create();
        }
        self.show();
    }

    /// Replaces the title.
    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        let handle = {
            let mut state = self.inner.state.borrow_mut();
            state.title.clone_from(&title);
            state.handle
        };
        if let Some(handle) = handle {
            dispatch::with_backend(|backend| backend.set_property(handle, &Property::Text(title)));
        }
    }

    /// Requests a new size. The tree is laid out again once the backend
    /// reports the resulting client area.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive.
    pub fn set_size(&self, width: i32, height: i32) {
        let size = validate_size(width, height);
        let handle = {
            let mut state = self.inner.state.borrow_mut();
            state.size = size;
            if state.handle.is_none() {
                state.client = size;
            }
            state.handle
        };
        if let Some(handle) = handle {
            dispatch::with_backend(|backend| {
                backend.set_property(handle, &Property::WindowSize(size));
            });
        }
    }

    /// Lays the tree out again over the current client area, for example
    /// after content changes altered preferred sizes.
    ///
    /// # Panics
    ///
    /// Panics if the window was not created.
    pub fn relayout(&self) {
        self.created_handle("Window::relayout");
        self.inner.layout();
    }

    /// The signal receiving close requests. The window stays open; close it
    /// with [`hide`](Self::hide) or [`destroy`](Self::destroy).
    #[must_use]
    pub fn closing(&self) -> Signal<()> {
        self.inner.closing.borrow().clone()
    }

    /// Routes close requests to `signal` instead.
    ///
    /// # Panics
    ///
    /// Panics after the window was created.
    pub fn set_closing_signal(&self, signal: Signal<()>) {
        assert!(
            self.phase() == Phase::Unbuilt,
            "set_closing_signal cannot change a window after it was created"
        );
        self.inner.closing.replace(signal);
    }

    /// Presents a message box attached to this window and returns at once.
    ///
    /// The result is posted to the returned signal exactly once, when the
    /// user dismisses the box. Other windows stay responsive meanwhile.
    ///
    /// # Panics
    ///
    /// Panics if the window was not created.
    #[must_use]
    pub fn message(&self, request: &DialogRequest) -> Signal<DialogResult> {
        let handle = self.created_handle("Window::message");
        let signal = Signal::new();
        let reply = signal.clone();
        debug!(%handle, title = %request.title, "opening window-modal dialog");
        dispatch::with_backend(|backend| {
            backend.open_sheet(handle, request, Box::new(move |result| reply.post(result)));
        });
        signal
    }

    /// Shows an informational message box attached to this window.
    ///
    /// # Panics
    ///
    /// Panics if the window was not created.
    #[must_use]
    pub fn msg_box(&self, title: impl Into<String>, text: impl Into<String>) -> Signal<DialogResult> {
        self.message(&crate::dialog::MessageBox::new(title).text(text).into_request())
    }

    /// Shows an error message box attached to this window.
    ///
    /// # Panics
    ///
    /// Panics if the window was not created.
    #[must_use]
    pub fn msg_box_error(
        &self,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> Signal<DialogResult> {
        self.message(&crate::dialog::MessageBox::error(title).text(text).into_request())
    }

    /// Destroys the native window and every widget in its tree.
    ///
    /// # Panics
    ///
    /// Panics if the window was not created.
    pub fn destroy(&self) {
        let handle = self.created_handle("Window::destroy");
        self.inner.root.unrealize();
        dispatch::disconnect(handle);
        dispatch::with_backend(|backend| backend.destroy_widget(handle));
        let mut state = self.inner.state.borrow_mut();
        state.handle = None;
        state.phase = Phase::Destroyed;
        debug!(%handle, "window destroyed");
    }
}

fn validate_size(width: i32, height: i32) -> Size {
    assert!(
        width > 0 && height > 0,
        "window size {width}x{height} must be positive"
    );
    Size::new(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Label;

    #[test]
    fn unbuilt_window_keeps_configuration() {
        let window = Window::new("Editor", 640, 480, Label::new("hi"));
        window.set_title("Viewer");
        window.set_size(800, 600);

        assert_eq!(window.title(), "Viewer");
        assert_eq!(window.size(), Size::new(800, 600));
        assert_eq!(window.client_size(), Size::new(800, 600));
        assert!(!window.is_created());
        assert!(!window.is_visible());
    }

    #[test]
    #[should_panic(expected = "requires a created window")]
    fn show_before_create_panics() {
        Window::new("w", 10, 10, Label::new("x")).show();
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn zero_width_panics() {
        let _ = Window::new("w", 0, 10, Label::new("x"));
    }

    #[test]
    #[should_panic(expected = "already has a parent")]
    fn root_cannot_be_shared() {
        let label = Label::new("x");
        let _first = Window::new("a", 10, 10, label.clone());
        let _second = Window::new("b", 10, 10, label);
    }

    #[test]
    #[should_panic(expected = "must be called on the UI thread")]
    fn create_requires_runtime() {
        Window::new("w", 10, 10, Label::new("x")).create();
    }
}
