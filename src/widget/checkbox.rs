//! Checkboxes.

use std::cell::{Cell, RefCell};

use trellis_core::{Notification, Property, Signal};

use crate::control::{Body, Control, control_handle};

pub(crate) struct CheckboxState {
    text: RefCell<String>,
    checked: Cell<bool>,
    toggled: RefCell<Signal<bool>>,
}

impl CheckboxState {
    pub(crate) fn initial_properties(&self) -> Vec<Property> {
        vec![
            Property::Text(self.text.borrow().clone()),
            Property::Checked(self.checked.get()),
        ]
    }

    pub(crate) fn notify(&self, notification: Notification) {
        if let Notification::Toggled(checked) = notification {
            self.checked.set(checked);
            self.toggled.borrow().post(checked);
        }
    }
}

/// A checkbox with a caption.
///
/// User toggles post the new state to [`toggled`](Self::toggled); changes
/// made through [`set_checked`](Self::set_checked) do not.
#[derive(Debug, Clone)]
pub struct Checkbox {
    control: Control,
}

control_handle!(Checkbox, Checkbox, CheckboxState);

impl Checkbox {
    /// Creates an unchecked checkbox.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            control: Control::from_body(Body::Checkbox(CheckboxState {
                text: RefCell::new(text.into()),
                checked: Cell::new(false),
                toggled: RefCell::default(),
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

    /// Returns true when checked.
    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.state().checked.get()
    }

    /// Checks or unchecks the box.
    pub fn set_checked(&self, checked: bool) {
        self.state().checked.set(checked);
        self.control.push(&Property::Checked(checked));
    }

    /// The signal receiving user toggles.
    #[must_use]
    pub fn toggled(&self) -> Signal<bool> {
        self.state().toggled.borrow().clone()
    }

    /// Routes user toggles to `signal` instead.
    ///
    /// # Panics
    ///
    /// Panics after the checkbox's window was created.
    pub fn set_toggled_signal(&self, signal: Signal<bool>) {
        self.control.ensure_configurable("set_toggled_signal");
        self.state().toggled.replace(signal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_toggle_updates_state_and_posts() {
        let checkbox = Checkbox::new("Remember me");
        let toggled = checkbox.toggled();

        checkbox.state().notify(Notification::Toggled(true));

        assert!(checkbox.is_checked());
        assert_eq!(toggled.try_recv(), Some(true));
    }

    #[test]
    fn programmatic_change_is_silent() {
        let checkbox = Checkbox::new("Remember me");
        checkbox.set_checked(true);
        assert!(checkbox.is_checked());
        assert!(!checkbox.toggled().has_value());
    }
}
