//! Layout algorithms for `trellis` containers.
//!
//! The algorithms here are pure: they see nothing but the preferred sizes of a
//! container's children and the rectangle the container was assigned, and they
//! return one rectangle per child. Walking the control tree, querying backends
//! and applying the results is the caller's job.
//!
//! - [`StackLayout`] arranges children along one [`Axis`] and shares leftover
//!   space equally among stretchy children.
//! - [`GridLayout`] arranges children in fixed rows and columns, unifying row
//!   heights and column widths, with at most one stretchy cell.
//!
//! # Example
//!
//! ```rust
//! use trellis_layout::{Axis, Layout, Rect, Size, StackLayout};
//!
//! let mut stack = StackLayout::new(Axis::Vertical);
//! stack.set_stretchy(1);
//!
//! let rects = stack.place(
//!     Rect::from_xywh(0, 0, 100, 80),
//!     &[Size::new(100, 20), Size::new(100, 30)],
//! );
//! assert_eq!(rects[1], Rect::from_xywh(0, 20, 100, 60));
//! ```

pub use trellis_core::layout::*;

pub mod grid;
pub mod stack;

pub use grid::GridLayout;
pub use stack::StackLayout;

use core::fmt::Debug;
use thiserror::Error;

/// A layout algorithm for arranging children inside a container.
pub trait Layout: Debug {
    /// The size the container would like, given its children's preferred
    /// sizes.
    fn preferred_size(&self, children: &[Size]) -> Size;

    /// Places children inside `bounds`, returning one rectangle per child in
    /// the same order.
    fn place(&self, bounds: Rect, children: &[Size]) -> Vec<Rect>;
}

/// An invalid container configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StructureError {
    /// A grid was requested with zero columns.
    #[error("a grid needs at least one column")]
    ZeroColumns,
    /// The number of grid cells is not a multiple of the column count.
    #[error("{cells} controls cannot fill a grid of {columns} columns")]
    NotRectangular {
        /// Number of controls supplied.
        cells: usize,
        /// Requested column count.
        columns: usize,
    },
    /// A grid cell outside the grid was addressed.
    #[error("cell ({row}, {column}) is outside a {rows}x{columns} grid")]
    CellOutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        column: usize,
        /// Rows in the grid.
        rows: usize,
        /// Columns in the grid.
        columns: usize,
    },
    /// A child index past the end of a container was addressed.
    #[error("index {index} is out of range for {len} children")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of children.
        len: usize,
    },
}
