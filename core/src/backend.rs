//! The contract between the core and a native widget adapter.
//!
//! A backend creates native widgets, positions them, forwards native input
//! to the core and runs the native event loop. It knows nothing about layout:
//! the core hands it finished rectangles in backend pixels.
//!
//! Every method is called on the UI thread only, which is why the trait takes
//! `&self` and does not require `Send`. Adapters keep their own state behind
//! interior mutability and must tolerate being re-entered from a notification
//! they delivered (for example `apply_rect` during a `Resized` callback).

use core::fmt;
use std::{sync::Arc, time::Duration};

use crate::{
    dispatch::EventSink,
    error::BackendError,
    layout::{Rect, Size},
};

/// Opaque identifier for a native widget, chosen by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetHandle(u64);

impl WidgetHandle {
    /// Wraps a raw backend identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WidgetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The closed set of control variants the core knows how to lay out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// A push button.
    Button,
    /// Static text.
    Label,
    /// A single-line text entry.
    LineEdit,
    /// A checkbox with a caption.
    Checkbox,
    /// A drop-down list, optionally editable.
    Combobox,
    /// A list with single or multiple selection.
    Listbox,
    /// A determinate progress indicator.
    ProgressBar,
    /// Empty space with no native widget behaviour.
    Spacer,
    /// A linear container.
    Stack,
    /// A two-dimensional container.
    Grid,
    /// A custom-drawn surface.
    Area,
    /// A top-level window.
    Window,
}

impl ControlKind {
    /// Returns true for variants that own children.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Stack | Self::Grid | Self::Window)
    }
}

/// A piece of widget state pushed from the core to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Property {
    /// Caption, label text, entry contents or window title.
    Text(String),
    /// Checkbox state.
    Checked(bool),
    /// Progress value in `0..=100`.
    Progress(u8),
    /// Items of a combobox or listbox.
    Items(Vec<String>),
    /// Selected item indices of a combobox or listbox.
    Selection(Vec<usize>),
    /// Requested outer size of a window.
    WindowSize(Size),
    /// Window visibility.
    Visible(bool),
    /// Drawing size of an area; backends size their scrolling viewport by it.
    AreaSize(Size),
    /// Line edit hides its contents.
    Password(bool),
    /// Combobox accepts free text.
    Editable(bool),
    /// Listbox allows more than one selected item.
    MultiSelect(bool),
    /// Label is aligned on its own rather than next to another control.
    Standalone(bool),
}

/// Initial configuration for a new native widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetConfig {
    /// The native parent, `None` for windows.
    pub parent: Option<WidgetHandle>,
    /// Properties to apply before the widget becomes visible.
    pub properties: Vec<Property>,
}

impl WidgetConfig {
    /// Creates a configuration for a widget under `parent`.
    #[must_use]
    pub const fn new(parent: Option<WidgetHandle>) -> Self {
        Self {
            parent,
            properties: Vec::new(),
        }
    }

    /// Appends a property.
    #[must_use]
    pub fn with(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }
}

/// Icon and tone of a message box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DialogKind {
    /// Informational message.
    #[default]
    Info,
    /// Something may be wrong.
    Warning,
    /// Something went wrong.
    Error,
}

/// Buttons offered by a message box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DialogButtons {
    /// A single OK button.
    #[default]
    Ok,
    /// OK and Cancel.
    OkCancel,
    /// Yes and No.
    YesNo,
}

/// A message box to present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DialogRequest {
    /// Icon and tone.
    pub kind: DialogKind,
    /// Buttons offered.
    pub buttons: DialogButtons,
    /// Title line.
    pub title: String,
    /// Secondary text, may be empty.
    pub text: String,
}

/// How a message box was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogResult {
    /// OK was chosen.
    Ok,
    /// Cancel was chosen.
    Cancel,
    /// Yes was chosen.
    Yes,
    /// No was chosen.
    No,
    /// The dialog was closed without choosing a button.
    Dismissed,
}

/// Wakes a backend blocked in [`Backend::run_loop_once`] from any thread.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Capabilities the core consumes from a native widget adapter.
pub trait Backend: 'static {
    /// Initialises the native toolkit on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns an error when the toolkit is unavailable; the application
    /// routine is then never invoked.
    fn init(&self) -> Result<(), BackendError>;

    /// Returns a waker that interrupts [`run_loop_once`](Self::run_loop_once).
    ///
    /// A wake delivered while the loop is not blocked must make the next call
    /// return promptly.
    fn waker(&self) -> Waker;

    /// Runs one iteration of the native event loop, delivering any pending
    /// native notifications.
    ///
    /// `None` blocks until at least one event or wake arrives; `Some(timeout)`
    /// waits at most that long.
    fn run_loop_once(&self, timeout: Option<Duration>);

    /// Tears down the native event loop after the application routine
    /// returned.
    fn stop_loop(&self);

    /// Creates a native widget for `kind`.
    fn create_widget(&self, kind: ControlKind, config: &WidgetConfig) -> WidgetHandle;

    /// Registers the sink that receives notifications for `handle`.
    fn register_sink(&self, handle: WidgetHandle, sink: EventSink);

    /// Positions a native widget relative to its window's client area.
    fn apply_rect(&self, handle: WidgetHandle, rect: Rect);

    /// Returns the size the native widget would like to have.
    fn preferred_size(&self, handle: WidgetHandle) -> Size;

    /// Pushes a piece of state to a native widget.
    fn set_property(&self, handle: WidgetHandle, property: &Property);

    /// Requests a repaint of `rect` (or everything when `None`) of an area.
    fn invalidate(&self, handle: WidgetHandle, rect: Option<Rect>);

    /// Gives keyboard focus to a widget.
    fn focus(&self, handle: WidgetHandle);

    /// Presents a process-modal message box and blocks until it is
    /// dismissed.
    fn run_modal_dialog(&self, request: &DialogRequest) -> DialogResult;

    /// Presents a message box attached to `window` and returns immediately.
    /// `done` is invoked exactly once, on the UI thread, on dismissal.
    fn open_sheet(
        &self,
        window: WidgetHandle,
        request: &DialogRequest,
        done: Box<dyn FnOnce(DialogResult)>,
    );

    /// Destroys a native widget and its native children.
    fn destroy_widget(&self, handle: WidgetHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_kinds() {
        assert!(ControlKind::Stack.is_container());
        assert!(ControlKind::Grid.is_container());
        assert!(ControlKind::Window.is_container());
        assert!(!ControlKind::Area.is_container());
        assert!(!ControlKind::Button.is_container());
    }

    #[test]
    fn widget_config_builder() {
        let config = WidgetConfig::new(Some(WidgetHandle::new(7)))
            .with(Property::Text("OK".into()))
            .with(Property::Password(true));
        assert_eq!(config.parent, Some(WidgetHandle::new(7)));
        assert_eq!(config.properties.len(), 2);
        assert_eq!(WidgetHandle::new(7).to_string(), "#7");
    }
}
