use std::cell::Cell;

use trellis_core::Property;

use crate::control::{Body, Control, control_handle};

pub(crate) struct ProgressState {
    value: Cell<u8>,
}

impl ProgressState {
    pub(crate) fn initial_properties(&self) -> Vec<Property> {
        vec![Property::Progress(self.value.get())]
    }
}

/// A determinate progress bar showing a percentage.
#[derive(Debug, Clone)]
pub struct ProgressBar {
    control: Control,
}

control_handle!(ProgressBar, ProgressBar, ProgressState);

impl ProgressBar {
    /// Creates a progress bar at 0%.
    #[must_use]
    pub fn new() -> Self {
        Self {
            control: Control::from_body(Body::ProgressBar(ProgressState {
                value: Cell::new(0),
            })),
        }
    }

    /// The current percentage.
    #[must_use]
    pub fn value(&self) -> u8 {
        self.state().value.get()
    }

    /// Sets the percentage.
    ///
    /// # Panics
    ///
    /// Panics if `percent` is greater than 100.
    pub fn set_value(&self, percent: u8) {
        assert!(
            percent <= 100,
            "progress {percent} is outside the range 0..=100"
        );
        self.state().value.set(percent);
        self.control.push(&Property::Progress(percent));
    }
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_full_range() {
        let bar = ProgressBar::new();
        bar.set_value(100);
        assert_eq!(bar.value(), 100);
    }

    #[test]
    #[should_panic(expected = "outside the range")]
    fn rejects_values_over_100() {
        ProgressBar::new().set_value(101);
    }
}
