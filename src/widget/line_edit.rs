//! Single-line text entry.

use std::cell::RefCell;

use trellis_core::{Notification, Property, Signal};

use crate::control::{Body, Control, control_handle};

pub(crate) struct LineEditState {
    text: RefCell<String>,
    password: bool,
    changed: RefCell<Signal<String>>,
}

impl LineEditState {
    pub(crate) fn initial_properties(&self) -> Vec<Property> {
        vec![
            Property::Text(self.text.borrow().clone()),
            Property::Password(self.password),
        ]
    }

    pub(crate) fn notify(&self, notification: Notification) {
        if let Notification::TextChanged(text) = notification {
            self.text.replace(text.clone());
            self.changed.borrow().post(text);
        }
    }
}

/// A single-line text entry.
///
/// Edits made by the user update [`text`](Self::text) and post the new
/// contents to the [`changed`](Self::changed) signal.
#[derive(Debug, Clone)]
pub struct LineEdit {
    control: Control,
}

control_handle!(LineEdit, LineEdit, LineEditState);

impl LineEdit {
    /// Creates an empty entry.
    #[must_use]
    pub fn new() -> Self {
        Self::build(false)
    }

    /// Creates an empty entry that hides what is typed.
    #[must_use]
    pub fn password() -> Self {
        Self::build(true)
    }

    fn build(password: bool) -> Self {
        Self {
            control: Control::from_body(Body::LineEdit(LineEditState {
                text: RefCell::default(),
                password,
                changed: RefCell::default(),
            })),
        }
    }

    /// The current contents.
    #[must_use]
    pub fn text(&self) -> String {
        self.state().text.borrow().clone()
    }

    /// Replaces the contents. Does not post to [`changed`](Self::changed).
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.state().text.replace(text.clone());
        self.control.push(&Property::Text(text));
    }

    /// Returns true for a password entry.
    #[must_use]
    pub fn is_password(&self) -> bool {
        self.state().password
    }

    /// The signal receiving user edits.
    #[must_use]
    pub fn changed(&self) -> Signal<String> {
        self.state().changed.borrow().clone()
    }

    /// Routes user edits to `signal` instead.
    ///
    /// # Panics
    ///
    /// Panics after the entry's window was created.
    pub fn set_changed_signal(&self, signal: Signal<String>) {
        self.control.ensure_configurable("set_changed_signal");
        self.state().changed.replace(signal);
    }
}

impl Default for LineEdit {
    fn default() -> Self {
        Self::new()
    }
}
