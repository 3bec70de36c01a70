//! A two-dimensional layout that arranges children in rows and columns.

use core::num::NonZeroUsize;

use crate::{Layout, Point, Rect, Size, StructureError};

/// The core layout engine for a `Grid`.
///
/// Cells are stored row-major. Every column is as wide as its widest child and
/// every row as tall as its tallest child. If a stretchy cell is set, its row
/// and column absorb whatever space the other rows and columns leave over;
/// when the others already exceed the bounds that remainder goes negative and
/// is passed on unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    columns: NonZeroUsize,
    rows: usize,
    spacing: Size, // (horizontal, vertical)
    filling: Vec<bool>,
    stretchy: Option<(usize, usize)>,
}

/// Row heights and column widths computed for one placement.
struct Tracks {
    widths: Vec<i32>,
    heights: Vec<i32>,
}

impl GridLayout {
    /// Creates a grid for `cells` children laid out in `columns` columns.
    ///
    /// # Errors
    ///
    /// - [`StructureError::ZeroColumns`] if `columns` is zero.
    /// - [`StructureError::NotRectangular`] if `cells` is not a multiple of
    ///   `columns`.
    pub fn try_new(columns: usize, cells: usize) -> Result<Self, StructureError> {
        let columns = NonZeroUsize::new(columns).ok_or(StructureError::ZeroColumns)?;
        if cells % columns.get() != 0 {
            return Err(StructureError::NotRectangular {
                cells,
                columns: columns.get(),
            });
        }
        Ok(Self {
            columns,
            rows: cells / columns.get(),
            spacing: Size::zero(),
            filling: vec![false; cells],
            stretchy: None,
        })
    }

    /// Sets the horizontal and vertical gaps between cells.
    #[must_use]
    pub const fn with_spacing(mut self, horizontal: i32, vertical: i32) -> Self {
        self.spacing = Size::new(horizontal, vertical);
        self
    }

    /// Replaces the horizontal and vertical gaps between cells.
    pub const fn set_spacing(&mut self, horizontal: i32, vertical: i32) {
        self.spacing = Size::new(horizontal, vertical);
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns.get()
    }

    /// Number of cells.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows * self.columns.get()
    }

    /// Returns true for a grid without cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// The gaps between cells.
    #[must_use]
    pub const fn spacing(&self) -> Size {
        self.spacing
    }

    fn index(&self, row: usize, column: usize) -> Result<usize, StructureError> {
        if row >= self.rows || column >= self.columns() {
            return Err(StructureError::CellOutOfRange {
                row,
                column,
                rows: self.rows,
                columns: self.columns(),
            });
        }
        Ok(row * self.columns() + column)
    }

    /// Makes the child at (`row`, `column`) fill its whole cell.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::CellOutOfRange`] for a cell outside the grid.
    pub fn set_filling(&mut self, row: usize, column: usize) -> Result<(), StructureError> {
        let index = self.index(row, column)?;
        self.filling[index] = true;
        Ok(())
    }

    /// Returns true if the child at (`row`, `column`) fills its cell.
    #[must_use]
    pub fn is_filling(&self, row: usize, column: usize) -> bool {
        self.index(row, column)
            .is_ok_and(|index| self.filling[index])
    }

    /// Makes (`row`, `column`) the stretchy cell, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::CellOutOfRange`] for a cell outside the grid.
    pub fn set_stretchy(&mut self, row: usize, column: usize) -> Result<(), StructureError> {
        self.index(row, column)?;
        self.stretchy = Some((row, column));
        Ok(())
    }

    /// The stretchy cell, if any.
    #[must_use]
    pub const fn stretchy(&self) -> Option<(usize, usize)> {
        self.stretchy
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn gaps(count: usize, gap: i32) -> i32 {
        count.saturating_sub(1) as i32 * gap
    }

    fn measure(&self, children: &[Size]) -> Tracks {
        assert_eq!(
            children.len(),
            self.len(),
            "grid of {}x{} laid out with {} children",
            self.rows,
            self.columns(),
            children.len()
        );

        let mut widths = vec![0; self.columns()];
        let mut heights = vec![0; self.rows];
        for (row, cells) in children.chunks(self.columns()).enumerate() {
            for (column, cell) in cells.iter().enumerate() {
                widths[column] = widths[column].max(cell.width);
                heights[row] = heights[row].max(cell.height);
            }
        }
        Tracks { widths, heights }
    }
}

impl Layout for GridLayout {
    fn preferred_size(&self, children: &[Size]) -> Size {
        if self.is_empty() {
            return Size::zero();
        }
        let tracks = self.measure(children);
        Size::new(
            tracks.widths.iter().sum::<i32>() + Self::gaps(self.columns(), self.spacing.width),
            tracks.heights.iter().sum::<i32>() + Self::gaps(self.rows, self.spacing.height),
        )
    }

    fn place(&self, bounds: Rect, children: &[Size]) -> Vec<Rect> {
        if self.is_empty() {
            return Vec::new();
        }
        let Tracks {
            mut widths,
            mut heights,
        } = self.measure(children);

        if let Some((stretchy_row, stretchy_column)) = self.stretchy {
            let other_widths: i32 = widths
                .iter()
                .enumerate()
                .filter(|(column, _)| *column != stretchy_column)
                .map(|(_, width)| width)
                .sum();
            let other_heights: i32 = heights
                .iter()
                .enumerate()
                .filter(|(row, _)| *row != stretchy_row)
                .map(|(_, height)| height)
                .sum();
            widths[stretchy_column] = bounds.width()
                - other_widths
                - Self::gaps(self.columns(), self.spacing.width);
            heights[stretchy_row] =
                bounds.height() - other_heights - Self::gaps(self.rows, self.spacing.height);
        }

        let mut placements = Vec::with_capacity(children.len());
        let mut cursor_y = bounds.y();

        for (row, row_children) in children.chunks(self.columns()).enumerate() {
            let mut cursor_x = bounds.x();

            for (column, preferred) in row_children.iter().enumerate() {
                let origin = Point::new(cursor_x, cursor_y);
                let fills = self.filling[row * self.columns() + column]
                    || self.stretchy == Some((row, column));

                let size = if fills {
                    Size::new(widths[column], heights[row])
                } else {
                    *preferred
                };
                placements.push(Rect::new(origin, size));

                cursor_x += widths[column] + self.spacing.width;
            }

            cursor_y += heights[row] + self.spacing.height;
        }

        placements
    }
}
