use std::cell::RefCell;

use trellis_core::Property;

use crate::control::{Body, Control, control_handle};

pub(crate) struct LabelState {
    text: RefCell<String>,
    standalone: bool,
}

impl LabelState {
    pub(crate) fn initial_properties(&self) -> Vec<Property> {
        vec![
            Property::Text(self.text.borrow().clone()),
            Property::Standalone(self.standalone),
        ]
    }
}

/// Static text.
#[derive(Debug, Clone)]
pub struct Label {
    control: Control,
}

control_handle!(Label, Label, LabelState);

impl Label {
    /// Creates a label aligned to sit next to another control.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self::build(text.into(), false)
    }

    /// Creates a label aligned on its own.
    #[must_use]
    pub fn standalone(text: impl Into<String>) -> Self {
        Self::build(text.into(), true)
    }

    fn build(text: String, standalone: bool) -> Self {
        Self {
            control: Control::from_body(Body::Label(LabelState {
                text: RefCell::new(text),
                standalone,
            })),
        }
    }

    /// The text.
    #[must_use]
    pub fn text(&self) -> String {
        self.state().text.borrow().clone()
    }

    /// Replaces the text.
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.state().text.replace(text.clone());
        self.control.push(&Property::Text(text));
    }

    /// Returns true for a standalone label.
    #[must_use]
    pub fn is_standalone(&self) -> bool {
        self.state().standalone
    }
}
