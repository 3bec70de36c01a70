//! Lists with single or multiple selection.

use std::cell::RefCell;

use tracing::warn;
use trellis_core::{Notification, Property, Signal};

use crate::control::{Body, Control, control_handle};

pub(crate) struct ListboxState {
    items: RefCell<Vec<String>>,
    multi: bool,
    selection: RefCell<Vec<usize>>,
    changed: RefCell<Signal<Vec<usize>>>,
}

impl ListboxState {
    pub(crate) fn initial_properties(&self) -> Vec<Property> {
        vec![
            Property::MultiSelect(self.multi),
            Property::Items(self.items.borrow().clone()),
            Property::Selection(self.selection.borrow().clone()),
        ]
    }

    pub(crate) fn notify(&self, notification: Notification) {
        if let Notification::SelectionChanged(mut indices) = notification {
            let len = self.items.borrow().len();
            let before = indices.len();
            indices.retain(|&index| index < len);
            if indices.len() < before {
                warn!(len, dropped = before - indices.len(), "backend selected missing list items");
            }
            indices.sort_unstable();
            indices.dedup();
            if !self.multi {
                indices.truncate(1);
            }
            self.selection.replace(indices.clone());
            self.changed.borrow().post(indices);
        }
    }
}

/// A list of strings the user selects from.
#[derive(Debug, Clone)]
pub struct Listbox {
    control: Control,
}

control_handle!(Listbox, Listbox, ListboxState);

impl Listbox {
    /// Creates a single-selection list.
    #[must_use]
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(items, false)
    }

    /// Creates a list that allows selecting several items.
    #[must_use]
    pub fn multi<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(items, true)
    }

    fn build<I, S>(items: I, multi: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            control: Control::from_body(Body::Listbox(ListboxState {
                items: RefCell::new(items.into_iter().map(Into::into).collect()),
                multi,
                selection: RefCell::default(),
                changed: RefCell::default(),
            })),
        }
    }

    /// Returns true if several items may be selected.
    #[must_use]
    pub fn is_multi(&self) -> bool {
        self.state().multi
    }

    /// The listed items.
    #[must_use]
    pub fn items(&self) -> Vec<String> {
        self.state().items.borrow().clone()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state().items.borrow().len()
    }

    /// Returns true for an empty list.
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
                "insert index {index} is out of range for a listbox of {} items",
                items.len()
            );
            items.insert(index, item.into());
        }
        for selected in state.selection.borrow_mut().iter_mut() {
            if *selected >= index {
                *selected += 1;
            }
        }
        self.sync();
    }

    /// Removes the item at `index` and drops it from the selection.
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
                "delete index {index} is out of range for a listbox of {} items",
                items.len()
            );
            items.remove(index);
        }
        state.selection.borrow_mut().retain_mut(|selected| {
            if *selected == index {
                return false;
            }
            if *selected > index {
                *selected -= 1;
            }
            true
        });
        self.sync();
    }

    /// Selected indices in ascending order.
    #[must_use]
    pub fn selection(&self) -> Vec<usize> {
        self.state().selection.borrow().clone()
    }

    /// Replaces the selection.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of range, or if a single-selection list is
    /// given more than one index.
    pub fn set_selection(&self, indices: &[usize]) {
        let state = self.state();
        let len = self.len();
        assert!(
            state.multi || indices.len() <= 1,
            "a single-selection listbox cannot select {} items",
            indices.len()
        );
        if let Some(&index) = indices.iter().find(|&&index| index >= len) {
            panic!("selection {index} is out of range for a listbox of {len} items");
        }
        let mut selection = indices.to_vec();
        selection.sort_unstable();
        selection.dedup();
        state.selection.replace(selection.clone());
        self.control.push(&Property::Selection(selection));
    }

    /// The signal receiving user selection changes.
    #[must_use]
    pub fn changed(&self) -> Signal<Vec<usize>> {
        self.state().changed.borrow().clone()
    }

    /// Routes user selection changes to `signal` instead.
    ///
    /// # Panics
    ///
    /// Panics after the listbox's window was created.
    pub fn set_changed_signal(&self, signal: Signal<Vec<usize>>) {
        self.control.ensure_configurable("set_changed_signal");
        self.state().changed.replace(signal);
    }

    fn sync(&self) {
        let state = self.state();
        self.control
            .push(&Property::Items(state.items.borrow().clone()));
        self.control
            .push(&Property::Selection(state.selection.borrow().clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_drops_and_shifts_selection() {
        let listbox = Listbox::multi(["a", "b", "c", "d"]);
        listbox.set_selection(&[3, 1, 0]);
        assert_eq!(listbox.selection(), [0, 1, 3]);

        listbox.delete(1);

        assert_eq!(listbox.items(), ["a", "c", "d"]);
        assert_eq!(listbox.selection(), [0, 2]);
    }

    #[test]
    #[should_panic(expected = "single-selection")]
    fn single_selection_rejects_several_items() {
        Listbox::new(["a", "b"]).set_selection(&[0, 1]);
    }

    #[test]
    fn user_selection_is_normalised() {
        let listbox = Listbox::new(["a", "b", "c"]);
        let changed = listbox.changed();

        listbox
            .state()
            .notify(Notification::SelectionChanged(vec![2, 0]));

        assert_eq!(listbox.selection(), [0]);
        assert_eq!(changed.try_recv(), Some(vec![0]));
    }

    #[test]
    fn backend_selection_drops_missing_items() {
        let listbox = Listbox::multi(["a", "b", "c"]);
        let changed = listbox.changed();

        listbox
            .state()
            .notify(Notification::SelectionChanged(vec![7, 2, 3, 0]));

        assert_eq!(listbox.selection(), [0, 2]);
        assert_eq!(changed.try_recv(), Some(vec![0, 2]));
    }
}
