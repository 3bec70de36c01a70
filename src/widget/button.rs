//! Push buttons.

use std::cell::RefCell;

use trellis_core::{Notification, Property, Signal};

use crate::control::{Body, Control, control_handle};

pub(crate) struct ButtonState {
    text: RefCell<String>,
    clicked: RefCell<Signal<()>>,
}

impl ButtonState {
    pub(crate) fn initial_properties(&self) -> Vec<Property> {
        vec![Property::Text(self.text.borrow().clone())]
    }

    pub(crate) fn notify(&self, notification: Notification) {
        if matches!(notification, Notification::Clicked) {
            self.clicked.borrow().post(());
        }
    }
}

/// A push button with a caption.
///
/// Each click posts `()` to the button's [`clicked`](Self::clicked) signal.
/// Clicks the application has not read yet collapse into one.
#[derive(Debug, Clone)]
pub struct Button {
    control: Control,
}

control_handle!(Button, Button, ButtonState);

impl Button {
    /// Creates a button with the given caption.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            control: Control::from_body(Body::Button(ButtonState {
                text: RefCell::new(text.into()),
                clicked: RefCell::default(),
            })),
        }
    }

    /// The caption.
    #[must_use]
    pub fn text(&self) -> String {
        self.state().text.borrow().clone()
    }

    /// Replaces the caption.
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.state().text.replace(text.clone());
        self.control.push(&Property::Text(text));
    }

    /// The signal receiving clicks.
    #[must_use]
    pub fn clicked(&self) -> Signal<()> {
        self.state().clicked.borrow().clone()
    }

    /// Routes clicks to `signal` instead.
    ///
    /// # Panics
    ///
    /// Panics after the button's window was created.
    pub fn set_clicked_signal(&self, signal: Signal<()>) {
        self.control.ensure_configurable("set_clicked_signal");
        self.state().clicked.replace(signal);
    }
}
