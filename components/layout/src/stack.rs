//! Linear stack layout.

use std::collections::BTreeSet;

use crate::{Axis, Layout, Rect, Size, StructureError};

/// Layout engine behind the `Stack` container.
///
/// Every child spans the full cross-axis extent of the stack. Along the axis,
/// non-stretchy children keep their preferred extent and stretchy children
/// share whatever is left equally. When the fixed children alone exceed the
/// stack they keep their sizes and overflow; nothing is clipped here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackLayout {
    axis: Axis,
    spacing: i32,
    stretchy: BTreeSet<usize>,
}

impl StackLayout {
    /// Creates a stack along `axis` with no spacing and no stretchy children.
    #[must_use]
    pub const fn new(axis: Axis) -> Self {
        Self {
            axis,
            spacing: 0,
            stretchy: BTreeSet::new(),
        }
    }

    /// Sets the gap inserted between consecutive children.
    #[must_use]
    pub const fn with_spacing(mut self, spacing: i32) -> Self {
        self.spacing = spacing;
        self
    }

    /// The stack's axis.
    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// The gap between consecutive children.
    #[must_use]
    pub const fn spacing(&self) -> i32 {
        self.spacing
    }

    /// Replaces the gap between consecutive children.
    pub const fn set_spacing(&mut self, spacing: i32) {
        self.spacing = spacing;
    }

    /// Marks the child at `index` as stretchy.
    pub fn set_stretchy(&mut self, index: usize) {
        self.stretchy.insert(index);
    }

    /// Marks the child at `index` as stretchy, checking it against the number
    /// of children.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::IndexOutOfRange`] if `index >= len`.
    pub fn try_set_stretchy(&mut self, index: usize, len: usize) -> Result<(), StructureError> {
        if index >= len {
            return Err(StructureError::IndexOutOfRange { index, len });
        }
        self.set_stretchy(index);
        Ok(())
    }

    /// Returns true if the child at `index` is stretchy.
    #[must_use]
    pub fn is_stretchy(&self, index: usize) -> bool {
        self.stretchy.contains(&index)
    }

    fn stretchy_count(&self, len: usize) -> usize {
        self.stretchy.range(..len).count()
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn total_spacing(&self, len: usize) -> i32 {
        len.saturating_sub(1) as i32 * self.spacing
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
impl Layout for StackLayout {
    fn preferred_size(&self, children: &[Size]) -> Size {
        if children.is_empty() {
            return Size::zero();
        }

        let mut fixed = 0;
        let mut widest_stretchy = 0;
        let mut cross = 0;
        for (index, child) in children.iter().enumerate() {
            if self.is_stretchy(index) {
                widest_stretchy = widest_stretchy.max(self.axis.main(*child));
            } else {
                fixed += self.axis.main(*child);
            }
            cross = cross.max(self.axis.cross(*child));
        }

        // Every stretchy child ends up the same size, so ask for enough room
        // to give each of them the largest stretchy preference.
        let stretchy = self.stretchy_count(children.len()) as i32 * widest_stretchy;
        let main = fixed + stretchy + self.total_spacing(children.len());

        self.axis.size(main, cross)
    }

    fn place(&self, bounds: Rect, children: &[Size]) -> Vec<Rect> {
        if children.is_empty() {
            return Vec::new();
        }

        let extent = self.axis.main(bounds.size());
        let cross = self.axis.cross(bounds.size());

        let fixed: i32 = children
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.is_stretchy(*index))
            .map(|(_, child)| self.axis.main(*child))
            .sum();

        let stretchy_count = self.stretchy_count(children.len()) as i32;
        let remaining = (extent - fixed - self.total_spacing(children.len())).max(0);
        let (share, mut extra) = if stretchy_count > 0 {
            (remaining / stretchy_count, remaining % stretchy_count)
        } else {
            (0, 0)
        };

        let (mut cursor, cross_origin) = self.axis.coordinates(bounds.origin());
        let mut rects = Vec::with_capacity(children.len());

        for (index, child) in children.iter().enumerate() {
            let main = if self.is_stretchy(index) {
                // Hand leftover pixels to the first stretchy children so the
                // shares add up to `remaining` exactly.
                if extra > 0 {
                    extra -= 1;
                    share + 1
                } else {
                    share
                }
            } else {
                self.axis.main(*child)
            };

            rects.push(Rect::new(
                self.axis.point(cursor, cross_origin),
                self.axis.size(main, cross),
            ));
            cursor += main + self.spacing;
        }

        rects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_stack_without_stretch_leaves_trailing_space() {
        let layout = StackLayout::new(Axis::Vertical);
        let children = [Size::new(100, 20), Size::new(100, 30)];

        let rects = layout.place(Rect::from_xywh(0, 0, 100, 60), &children);

        assert_eq!(rects[0], Rect::from_xywh(0, 0, 100, 20));
        assert_eq!(rects[1], Rect::from_xywh(0, 20, 100, 30));
        assert_eq!(rects[1].max_y(), 50);
    }

    #[test]
    fn test_vertical_stack_stretchy_child_takes_remainder() {
        let mut layout = StackLayout::new(Axis::Vertical);
        layout.set_stretchy(1);
        let children = [Size::new(100, 20), Size::new(100, 30)];

        let rects = layout.place(Rect::from_xywh(0, 0, 100, 80), &children);

        assert_eq!(rects[0], Rect::from_xywh(0, 0, 100, 20));
        assert_eq!(rects[1], Rect::from_xywh(0, 20, 100, 60));
    }

    #[test]
    fn test_horizontal_stack_places_from_origin() {
        let layout = StackLayout::new(Axis::Horizontal);
        let children = [Size::new(10, 5), Size::new(20, 8)];

        let rects = layout.place(Rect::from_xywh(5, 7, 100, 40), &children);

        assert_eq!(rects[0], Rect::from_xywh(5, 7, 10, 40));
        assert_eq!(rects[1], Rect::from_xywh(15, 7, 20, 40));
    }

    #[test]
    fn test_try_set_stretchy_rejects_out_of_range() {
        let mut layout = StackLayout::new(Axis::Horizontal);
        assert_eq!(
            layout.try_set_stretchy(3, 2),
            Err(StructureError::IndexOutOfRange { index: 3, len: 2 })
        );
        assert!(layout.try_set_stretchy(1, 2).is_ok());
        assert!(layout.is_stretchy(1));
    }

    #[test]
    fn test_preferred_size_reserves_largest_stretchy_share() {
        let mut layout = StackLayout::new(Axis::Horizontal);
        layout.set_stretchy(0);
        layout.set_stretchy(2);
        let children = [Size::new(10, 5), Size::new(7, 12), Size::new(30, 3)];

        // fixed 7 + two stretchy children at the widest stretchy width (30)
        assert_eq!(layout.preferred_size(&children), Size::new(67, 12));
    }
}
