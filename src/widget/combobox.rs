//! Drop-down lists.

use std::cell::{Cell, RefCell};

use tracing::warn;
use trellis_core::{Notification, Property, Signal};

use crate::control::{Body, Control, control_handle};

pub(crate) struct ComboboxState {
    items: RefCell<Vec<String>>,
    editable: bool,
    selected: Cell<Option<usize>>,
    text: RefCell<String>,
    changed: RefCell<Signal<Option<usize>>>,
}

impl ComboboxState {
    pub(crate) fn initial_properties(&self) -> Vec<Property> {
        vec![
            Property::Editable(self.editable),
            Property::Items(self.items.borrow().clone()),
            Property::Selection(self.selected.get().into_iter().collect()),
        ]
    }

    pub(crate) fn notify(&self, notification: Notification) {
        match notification {
            Notification::SelectionChanged(indices) => {
                let len = self.items.borrow().len();
                let selected = match indices.first().copied() {
                    Some(index) if index >= len => {
                        warn!(index, len, "backend selected a missing combobox item, ignored");
                        return;
                    }
                    selected => selected,
                };
                self.selected.set(selected);
                if let Some(index) = selected
                    && let Some(item) = self.items.borrow().get(index)
                {
                    self.text.replace(item.clone());
                }
                self.changed.borrow().post(selected);
            }
            Notification::TextChanged(text) if self.editable => {
                self.selected.set(None);
                self.text.replace(text);
                self.changed.borrow().post(None);
            }
            _ => {}
        }
    }
}

/// A drop-down list of strings, optionally accepting free text.
///
/// Item edits are content and stay allowed after the window was created.
#[derive(Debug, Clone)]
pub struct Combobox {
    control: Control,
}

control_handle!(Combobox, Combobox, ComboboxState);

impl Combobox {
    /// Creates a combobox offering `items`.
    #[must_use]
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(items, false)
    }

    /// Creates a combobox that also accepts text typed by the user.
    #[must_use]
    pub fn editable<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(items, true)
    }

    fn build<I, S>(items: I, editable: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            control: Control::from_body(Body::Combobox(ComboboxState {
                items: RefCell::new(items.into_iter().map(Into::into).collect()),
                editable,
                selected: Cell::new(None),
                text: RefCell::default(),
                changed: RefCell::default(),
            })),
        }
    }

    /// Returns true if free text is accepted.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.state().editable
    }

    /// The offered items.
    #[must_use]
    pub fn items(&self) -> Vec<String> {
        self.state().items.borrow().clone()
    }

    /// Number of offered items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state().items.borrow().len()
    }

    /// Returns true if no items are offered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends an item.
    pub fn append(&self, item: impl Into<String>) {
        let len = self.len();
        self.insert_before(len, item);
    }

    /// Inserts an item before `index`; `index == len` appends.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_before(&self, index: usize, item: impl Into<String>) {
        let state = self.state();
        {
            let mut items = state.items.borrow_mut();
            assert!(
                index <= items.len(),
                "insert index {index} is out of range for a combobox of {} items",
                items.len()
            );
            items.insert(index, item.into());
        }
        if let Some(selected) = state.selected.get()
            && selected >= index
        {
            state.selected.set(Some(selected + 1));
        }
        self.sync();
    }

    /// Removes the item at `index`, clearing the selection if it was selected.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn delete(&self, index: usize) {
        let state = self.state();
        {
            let mut items = state.items.borrow_mut();
            assert!(
                index < items.len(),
                "delete index {index} is out of range for a combobox of {} items",
                items.len()
            );
            items.remove(index);
        }
        let selected = match state.selected.get() {
            Some(selected) if selected == index => None,
            Some(selected) if selected > index => Some(selected - 1),
            other => other,
        };
        state.selected.set(selected);
        self.sync();
    }

    /// The selected item index, if any.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.state().selected.get()
    }

    /// Selects an item, or clears the selection with `None`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range.
    pub fn set_selected(&self, index: Option<usize>) {
        if let Some(index) = index {
            assert!(
                index < self.len(),
                "selection {index} is out of range for a combobox of {} items",
                self.len()
            );
        }
        self.state().selected.set(index);
        self.control
            .push(&Property::Selection(index.into_iter().collect()));
    }

    /// The text shown in the combobox: the selected item, or what the user
    /// typed into an editable one.
    #[must_use]
    pub fn text(&self) -> String {
        let state = self.state();
        match state.selected.get() {
            Some(index) => state
                .items
                .borrow()
                .get(index)
                .cloned()
                .unwrap_or_default(),
            None => state.text.borrow().clone(),
        }
    }

    /// The signal receiving user selection changes. Typing into an editable
    /// combobox posts `None`.
    #[must_use]
    pub fn changed(&self) -> Signal<Option<usize>> {
        self.state().changed.borrow().clone()
    }

    /// Routes user selection changes to `signal` instead.
    ///
    /// # Panics
    ///
    /// Panics after the combobox's window was created.
    pub fn set_changed_signal(&self, signal: Signal<Option<usize>>) {
        self.control.ensure_configurable("set_changed_signal");
        self.state().changed.replace(signal);
    }

    fn sync(&self) {
        let state = self.state();
        self.control
            .push(&Property::Items(state.items.borrow().clone()));
        self.control
            .push(&Property::Selection(state.selected.get().into_iter().collect()));
    }
}
