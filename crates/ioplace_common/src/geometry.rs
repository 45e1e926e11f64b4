//! Integer geometry in database units.
//!
//! All placement arithmetic is done on [`Dbu`] integers. A [`Rect`] is
//! closed on both ends: a point on its border is inside it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Database unit: the integer length unit of every physical coordinate.
pub type Dbu = i64;

/// A point in database units.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coordinate {
    /// Horizontal position.
    pub x: Dbu,
    /// Vertical position.
    pub y: Dbu,
}

impl Coordinate {
    /// Creates a coordinate from its components.
    pub const fn new(x: Dbu, y: Dbu) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to `other`.
    pub fn manhattan(self, other: Coordinate) -> Dbu {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "( {} {} )", self.x, self.y)
    }
}

impl From<(Dbu, Dbu)> for Coordinate {
    fn from((x, y): (Dbu, Dbu)) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle given by its lower-left and upper-right corners.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Lower-left corner.
    pub ll: Coordinate,
    /// Upper-right corner.
    pub ur: Coordinate,
}

impl Rect {
    /// Creates a rectangle from two opposite corners, normalizing their order.
    pub fn new(a: Coordinate, b: Coordinate) -> Self {
        Self {
            ll: Coordinate::new(a.x.min(b.x), a.y.min(b.y)),
            ur: Coordinate::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Width along x.
    pub fn width(&self) -> Dbu {
        self.ur.x - self.ll.x
    }

    /// Height along y.
    pub fn height(&self) -> Dbu {
        self.ur.y - self.ll.y
    }

    /// Returns `true` if the rectangle has zero width or zero height.
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Returns `true` if `p` lies inside or on the border.
    pub fn contains(&self, p: Coordinate) -> bool {
        p.x >= self.ll.x && p.x <= self.ur.x && p.y >= self.ll.y && p.y <= self.ur.y
    }

    /// Returns the rectangle translated so its origin sits at `p`.
    pub fn offset(&self, p: Coordinate) -> Rect {
        Rect {
            ll: Coordinate::new(self.ll.x + p.x, self.ll.y + p.y),
            ur: Coordinate::new(self.ur.x + p.x, self.ur.y + p.y),
        }
    }
}
