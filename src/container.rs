//! Containers: controls that lay out other controls.
//!
//! A container owns its children from construction on; the child list never
//! changes afterwards. Layout configuration (spacing, stretchy children,
//! filling cells) can be adjusted until the owning window is created.

use std::cell::{Ref, RefCell};

use trellis_layout::{Axis, GridLayout, StackLayout, StructureError};

use crate::control::{Body, Control, control_handle};

pub(crate) struct StackState {
    layout: RefCell<StackLayout>,
    children: Vec<Control>,
}

impl StackState {
    pub(crate) fn layout(&self) -> Ref<'_, StackLayout> {
        self.layout.borrow()
    }

    pub(crate) fn children(&self) -> &[Control] {
        &self.children
    }
}

pub(crate) struct GridState {
    layout: RefCell<GridLayout>,
    children: Vec<Control>,
}

impl GridState {
    pub(crate) fn layout(&self) -> Ref<'_, GridLayout> {
        self.layout.borrow()
    }

    pub(crate) fn children(&self) -> &[Control] {
        &self.children
    }
}

fn adopt_all(children: &[Control], owner: &str) {
    for child in children {
        child.adopt(owner);
    }
}

/// Arranges children in a row or a column.
///
/// See [`StackLayout`] for how space is shared.
///
/// ```
/// use trellis::{Button, Label, Stack};
///
/// let stack = Stack::vertical([Label::new("Name").into(), Button::new("OK").into()]);
/// stack.set_stretchy(0);
/// assert_eq!(stack.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Stack {
    control: Control,
}

control_handle!(Stack, Stack, StackState);

impl Stack {
    /// Creates a stack along `axis` owning `children`.
    ///
    /// # Panics
    ///
    /// Panics if a child already belongs to another container or window.
    #[must_use]
    pub fn new(axis: Axis, children: impl IntoIterator<Item = Control>) -> Self {
        let children: Vec<Control> = children.into_iter().collect();
        adopt_all(&children, "a stack");
        Self {
            control: Control::from_body(Body::Stack(StackState {
                layout: RefCell::new(StackLayout::new(axis)),
                children,
            })),
        }
    }

    /// Creates a left-to-right stack.
    ///
    /// # Panics
    ///
    /// Panics if a child already belongs to another container or window.
    #[must_use]
    pub fn horizontal(children: impl IntoIterator<Item = Control>) -> Self {
        Self::new(Axis::Horizontal, children)
    }

    /// Creates a top-to-bottom stack.
    ///
    /// # Panics
    ///
    /// Panics if a child already belongs to another container or window.
    #[must_use]
    pub fn vertical(children: impl IntoIterator<Item = Control>) -> Self {
        Self::new(Axis::Vertical, children)
    }

    /// The stack's axis.
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.state().layout().axis()
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state().children.len()
    }

    /// Returns true for a stack without children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state().children.is_empty()
    }

    /// Sets the gap between consecutive children.
    ///
    /// # Panics
    ///
    /// Panics after the stack's window was created.
    pub fn set_spacing(&self, spacing: i32) {
        self.control.ensure_configurable("Stack::set_spacing");
        self.state().layout.borrow_mut().set_spacing(spacing);
    }

    /// Makes the child at `index` share the leftover space.
    ///
    /// # Panics
    ///
    /// Panics after the stack's window was created, or if `index` is out of
    /// range.
    pub fn set_stretchy(&self, index: usize) {
        self.control.ensure_configurable("Stack::set_stretchy");
        let state = self.state();
        if let Err(err) = state
            .layout
            .borrow_mut()
            .try_set_stretchy(index, state.children.len())
        {
            panic!("Stack::set_stretchy: {err}");
        }
    }

    /// Returns true if the child at `index` is stretchy.
    #[must_use]
    pub fn is_stretchy(&self, index: usize) -> bool {
        self.state().layout().is_stretchy(index)
    }
}

/// Arranges children in rows and columns.
///
/// Children are given row-major. See [`GridLayout`] for how cells are sized.
#[derive(Debug, Clone)]
pub struct Grid {
    control: Control,
}

control_handle!(Grid, Grid, GridState);

impl Grid {
    /// Creates a grid with `columns` columns owning `children`.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] if `columns` is zero or the children do
    /// not fill whole rows. The children stay detached in that case.
    ///
    /// # Panics
    ///
    /// Panics if a child already belongs to another container or window.
    pub fn try_new(
        columns: usize,
        children: impl IntoIterator<Item = Control>,
    ) -> Result<Self, StructureError> {
        let children: Vec<Control> = children.into_iter().collect();
        let layout = GridLayout::try_new(columns, children.len())?;
        adopt_all(&children, "a grid");
        Ok(Self {
            control: Control::from_body(Body::Grid(GridState {
                layout: RefCell::new(layout),
                children,
            })),
        })
    }

    /// Creates a grid with `columns` columns owning `children`.
    ///
    /// # Panics
    ///
    /// Panics if `columns` is zero, if the children do not fill whole rows,
    /// or if a child already belongs to another container or window.
    #[must_use]
    pub fn new(columns: usize, children: impl IntoIterator<Item = Control>) -> Self {
        match Self::try_new(columns, children) {
            Ok(grid) => grid,
            Err(err) => panic!("Grid::new: {err}"),
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.state().layout().rows()
    }

    /// Number of columns.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.state().layout().columns()
    }

    /// Sets the horizontal and vertical gaps between cells.
    ///
    /// # Panics
    ///
    /// Panics after the grid's window was created.
    pub fn set_spacing(&self, horizontal: i32, vertical: i32) {
        self.control.ensure_configurable("Grid::set_spacing");
        self.state()
            .layout
            .borrow_mut()
            .set_spacing(horizontal, vertical);
    }

    /// Makes the child at (`row`, `column`) fill its whole cell.
    ///
    /// # Panics
    ///
    /// Panics after the grid's window was created, or for a cell outside the
    /// grid.
    pub fn set_filling(&self, row: usize, column: usize) {
        self.control.ensure_configurable("Grid::set_filling");
        if let Err(err) = self.state().layout.borrow_mut().set_filling(row, column) {
            panic!("Grid::set_filling: {err}");
        }
    }

    /// Makes (`row`, `column`) the stretchy cell, replacing any previous one.
    ///
    /// # Panics
    ///
    /// Panics after the grid's window was created, or for a cell outside the
    /// grid.
    pub fn set_stretchy(&self, row: usize, column: usize) {
        self.control.ensure_configurable("Grid::set_stretchy");
        if let Err(err) = self.state().layout.borrow_mut().set_stretchy(row, column) {
            panic!("Grid::set_stretchy: {err}");
        }
    }

    /// The stretchy cell, if any.
    #[must_use]
    pub fn stretchy(&self) -> Option<(usize, usize)> {
        self.state().layout().stretchy()
    }
}

#[cfg(test)]
mod tests {
    use trellis_layout::Size;

    use super::*;
    use crate::{Label, Spacer};

    fn sized(width: i32, height: i32) -> Control {
        let spacer = Spacer::new();
        spacer.control().set_min_size(width, height);
        spacer.into()
    }

    #[test]
    fn stack_preferred_size_follows_children() {
        let stack = Stack::horizontal([sized(10, 5), sized(20, 8)]);
        stack.set_spacing(3);
        assert_eq!(stack.control().preferred_size(), Size::new(33, 8));
    }

    #[test]
    fn nested_containers_measure_recursively() {
        let inner = Stack::vertical([sized(10, 10), sized(10, 10)]);
        let grid = Grid::new(2, [inner.into(), sized(5, 30)]);
        assert_eq!(grid.control().preferred_size(), Size::new(15, 30));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn stack_stretchy_index_is_checked() {
        Stack::vertical([Label::new("a").into()]).set_stretchy(1);
    }

    #[test]
    fn ragged_grid_is_rejected_and_children_stay_free() {
        let label = Label::new("a");
        let result = Grid::try_new(2, [label.clone().into(), sized(1, 1), sized(1, 1)]);
        assert_eq!(
            result.err(),
            Some(StructureError::NotRectangular {
                cells: 3,
                columns: 2
            })
        );

        let _stack = Stack::vertical([label.into()]);
    }

    #[test]
    #[should_panic(expected = "needs at least one column")]
    fn grid_without_columns_panics() {
        let _ = Grid::new(0, []);
    }

    #[test]
    fn grid_cells_can_be_configured() {
        let grid = Grid::new(2, [sized(1, 1), sized(1, 1), sized(1, 1), sized(1, 1)]);
        grid.set_filling(0, 1);
        grid.set_stretchy(1, 1);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.columns(), 2);
        assert_eq!(grid.stretchy(), Some((1, 1)));
    }
}
