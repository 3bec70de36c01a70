//! Platform-independent core of `trellis`.
//!
//! This crate contains everything that does not depend on a concrete native
//! toolkit:
//!
//! - integer [geometry](layout) in backend pixels,
//! - the [`Backend`] contract adapters implement,
//! - the UI-thread [dispatch] runtime and its entry point [`run`],
//! - loss-tolerant single-slot [`Signal`]s,
//! - input [event] snapshots delivered to custom-drawn surfaces.
//!
//! Control trees, windows and layout containers live in the `trellis` crate on
//! top of these pieces.

pub mod backend;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod layout;
pub mod signal;

pub use backend::{
    Backend, ControlKind, DialogButtons, DialogKind, DialogRequest, DialogResult, Property,
    Waker, WidgetConfig, WidgetHandle,
};
pub use dispatch::{EventSink, NotificationTarget, UiProxy, run};
pub use error::{BackendError, Error};
pub use event::{ExtKey, KeyEvent, Modifiers, MouseEvent, Notification};
pub use layout::{Axis, Point, Rect, Size};
pub use signal::Signal;
