#![doc = include_str!("../README.md")]
#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod area;
pub mod container;
pub mod control;
pub mod dialog;
pub mod log;
pub mod widget;
pub mod window;

#[cfg(test)]
mod tests;

pub use app::{App, RunOptions, run};
pub use area::{Area, AreaHandle, AreaHandler};
pub use container::{Grid, Stack};
pub use control::Control;
pub use dialog::{MessageBox, msg_box, msg_box_error};
pub use widget::{
    Button, Checkbox, Combobox, Label, LineEdit, Listbox, ProgressBar, Spacer,
};
pub use window::Window;

#[doc(inline)]
pub use trellis_core::{
    Axis, Backend, BackendError, ControlKind, DialogButtons, DialogKind, DialogRequest,
    DialogResult, Error, EventSink, ExtKey, KeyEvent, Modifiers, MouseEvent, Notification,
    NotificationTarget, Point, Property, Rect, Signal, Size, UiProxy, Waker, WidgetConfig,
    WidgetHandle,
};
pub use trellis_core::{backend, dispatch, event};
pub use trellis_layout::{GridLayout, Layout, StackLayout, StructureError};

#[doc(no_inline)]
pub use tracing;

/// Schedules work on the UI thread from any thread, if a runtime is active.
#[must_use]
pub fn proxy() -> Option<UiProxy> {
    dispatch::proxy()
}

pub mod prelude {
    //! Commonly used types in one import.
    //!
    //! ```rust
    //! use trellis::prelude::*;
    //!
    //! let stack = Stack::vertical([Label::new("Name").into(), LineEdit::new().into()]);
    //! assert_eq!(stack.len(), 2);
    //! ```
    pub use crate::{
        App, Area, AreaHandle, AreaHandler, Button, Checkbox, Combobox, Control, DialogButtons,
        DialogKind, DialogResult, Grid, Label, LineEdit, Listbox, MessageBox, ProgressBar, Rect,
        Signal, Size, Spacer, Stack, Window,
    };
}
