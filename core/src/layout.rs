//! Geometry types shared by the layout engine and backend adapters.
//!
//! # Backend Pixels
//!
//! All values are integer **backend pixels**. The core never converts between
//! logical and physical units; each backend adapter decides what one unit means
//! on its platform and applies the rectangles it receives verbatim.
//!
//! Rectangles may extend past their parent (a stack whose fixed children do not
//! fit overflows its bounds) and, for the stretchy cell of an overfull grid, may
//! even carry a negative extent. Clipping is left to the backend.

// ============================================================================
// Axis
// ============================================================================

/// The direction along which a stack arranges its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    /// Children are placed left to right.
    Horizontal,
    /// Children are placed top to bottom.
    #[default]
    Vertical,
}

impl Axis {
    /// Returns the extent of `size` along this axis.
    #[must_use]
    pub const fn main(self, size: Size) -> i32 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Returns the extent of `size` across this axis.
    #[must_use]
    pub const fn cross(self, size: Size) -> i32 {
        match self {
            Self::Horizontal => size.height,
            Self::Vertical => size.width,
        }
    }

    /// Splits `point` into its (main, cross) coordinates.
    #[must_use]
    pub const fn coordinates(self, point: Point) -> (i32, i32) {
        match self {
            Self::Horizontal => (point.x, point.y),
            Self::Vertical => (point.y, point.x),
        }
    }

    /// Builds a size from a main-axis and a cross-axis extent.
    #[must_use]
    pub const fn size(self, main: i32, cross: i32) -> Size {
        match self {
            Self::Horizontal => Size::new(main, cross),
            Self::Vertical => Size::new(cross, main),
        }
    }

    /// Builds a point from a main-axis and a cross-axis offset.
    #[must_use]
    pub const fn point(self, main: i32, cross: i32) -> Point {
        match self {
            Self::Horizontal => Point::new(main, cross),
            Self::Vertical => Point::new(cross, main),
        }
    }
}

// ============================================================================
// Geometry Types
// ============================================================================

/// Axis-aligned rectangle relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    origin: Point,
    size: Size,
}

impl Rect {
    /// Creates a new [`Rect`] with the provided `origin` and `size`.
    #[must_use]
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Creates a rectangle from its four components.
    #[must_use]
    pub const fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(Point::new(x, y), Size::new(width, height))
    }

    /// Creates a rectangle from origin (0, 0) with the given size.
    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self {
            origin: Point::zero(),
            size,
        }
    }

    /// Returns the rectangle's origin (top-left corner).
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Returns the rectangle's size.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Returns the rectangle's x-coordinate (left edge).
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.origin.x
    }

    /// Returns the rectangle's y-coordinate (top edge).
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.origin.y
    }

    /// Returns the rectangle's width.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.size.width
    }

    /// Returns the rectangle's height.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.size.height
    }

    /// Returns the maximum x-coordinate (right edge, exclusive).
    #[must_use]
    pub const fn max_x(&self) -> i32 {
        self.origin.x + self.size.width
    }

    /// Returns the maximum y-coordinate (bottom edge, exclusive).
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.origin.y + self.size.height
    }

    /// Returns true if the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size.width <= 0 || self.size.height <= 0
    }

    /// Returns true if `point` lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x() && point.x < self.max_x() && point.y >= self.y() && point.y < self.max_y()
    }

    /// Returns the overlapping region of two rectangles.
    ///
    /// Disjoint rectangles yield an empty rectangle anchored at the clamped
    /// origin.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let x = self.x().max(other.x());
        let y = self.y().max(other.y());
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());
        Self::from_xywh(x, y, (max_x - x).max(0), (max_y - y).max(0))
    }

    /// Moves the rectangle by the given offset.
    #[must_use]
    pub const fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::from_xywh(self.x() + dx, self.y() + dy, self.width(), self.height())
    }
}

// ============================================================================
// Size
// ============================================================================

/// Two-dimensional size expressed in backend pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Size {
    /// The width in pixels.
    pub width: i32,
    /// The height in pixels.
    pub height: i32,
}

impl Size {
    /// Constructs a [`Size`] with the given `width` and `height`.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Creates a [`Size`] with zero width and height.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            width: 0,
            height: 0,
        }
    }

    /// Returns true if both dimensions are zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.width == 0 && self.height == 0
    }

    /// Returns the component-wise maximum of two sizes.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }
}

// ============================================================================
// Point
// ============================================================================

/// Absolute coordinate relative to a parent's origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// The x-coordinate in pixels.
    pub x: i32,
    /// The y-coordinate in pixels.
    pub y: i32,
}

impl Point {
    /// Constructs a [`Point`] at the given `x` and `y`.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Creates a [`Point`] at the origin (0, 0).
    #[must_use]
    pub const fn zero() -> Self {
        Self { x: 0, y: 0 }
    }
}

// ============================================================================
// Tests
// ============================================================================
