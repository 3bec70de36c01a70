use crate::control::{Body, Control};

/// Empty space.
///
/// A spacer prefers zero size, or its [minimum size](Control::set_min_size);
/// mark it stretchy in a [`Stack`](crate::Stack) to push siblings apart.
#[derive(Debug, Clone)]
pub struct Spacer {
    control: Control,
}

impl Spacer {
    /// Creates a spacer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            control: Control::from_body(Body::Spacer),
        }
    }

    /// The untyped handle for this control.
    #[must_use]
    pub const fn control(&self) -> &Control {
        &self.control
    }
}

impl Default for Spacer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Spacer> for Control {
    fn from(value: Spacer) -> Self {
        value.control
    }
}
