//! Pin orientation and terminal shape from the final slot position.

use crate::boundary::{CoreBoundary, LayerRules};
use ioplace_common::{Coordinate, Dbu, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction a placed pin faces, pointing into the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// On the bottom edge.
    North,
    /// On the top edge.
    South,
    /// On the left edge.
    East,
    /// On the right edge.
    West,
}

impl Orientation {
    /// Returns `true` for pins on the bottom or top edge.
    pub fn is_vertical(self) -> bool {
        matches!(self, Orientation::North | Orientation::South)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Orientation::North => 'N',
            Orientation::South => 'S',
            Orientation::East => 'E',
            Orientation::West => 'W',
        };
        write!(f, "{c}")
    }
}

/// Derives the orientation of a pin at `pos` from the edge it lies on.
///
/// The x tests run first, so corners resolve as: top-left is `South`,
/// bottom-left is `East`, bottom-right is `North`, top-right is `West`.
/// Returns `None` for a position off the boundary.
pub fn orientation_of(pos: Coordinate, boundary: &CoreBoundary) -> Option<Orientation> {
    let (lower, upper) = (boundary.lower(), boundary.upper());
    if pos.x == lower.x {
        if pos.y == upper.y {
            return Some(Orientation::South);
        }
        return Some(Orientation::East);
    }
    if pos.x == upper.x {
        if pos.y == lower.y {
            return Some(Orientation::North);
        }
        return Some(Orientation::West);
    }
    if pos.y == lower.y {
        return Some(Orientation::North);
    }
    if pos.y == upper.y {
        return Some(Orientation::South);
    }
    None
}

fn div_ceil(a: Dbu, b: Dbu) -> Dbu {
    (a + b - 1) / b
}

/// Terminal shape of a pin on an edge facing `orientation`, relative to the
/// pin position.
///
/// The half width is `ceil(min_width / 2)`. The depth into the core is
/// `ceil(min_area / (2 * half_width))` when the layer has an area rule and
/// `2 * half_width` otherwise. Returns `None` when the layer has no width rule.
pub fn local_pin_shape(orientation: Orientation, rules: &LayerRules) -> Option<Rect> {
    let (min_width, min_area) = if orientation.is_vertical() {
        (rules.min_width.x, rules.min_area.x)
    } else {
        (rules.min_width.y, rules.min_area.y)
    };
    if min_width <= 0 {
        return None;
    }
    let half = div_ceil(min_width, 2);
    let depth = if min_area > 0 {
        div_ceil(min_area, 2 * half)
    } else {
        2 * half
    };
    let (lower, upper) = match orientation {
        Orientation::North => ((-half, 0), (half, depth)),
        Orientation::South => ((-half, -depth), (half, 0)),
        Orientation::East => ((0, -half), (depth, half)),
        Orientation::West => ((-depth, -half), (0, half)),
    };
    Some(Rect::new(
        Coordinate::new(lower.0, lower.1),
        Coordinate::new(upper.0, upper.1),
    ))
}

/// Terminal shape of a pin placed at `pos`, in absolute coordinates.
pub fn pin_shape(pos: Coordinate, orientation: Orientation, rules: &LayerRules) -> Option<Rect> {
    local_pin_shape(orientation, rules).map(|local| local.offset(pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary() -> CoreBoundary {
        CoreBoundary::new(
            Coordinate::new(0, 0),
            Coordinate::new(1000, 1000),
            Coordinate::new(100, 100),
            Coordinate::new(0, 0),
        )
        .unwrap()
    }

    #[test]
    fn edges_map_to_orientations() {
        let b = boundary();
        assert_eq!(orientation_of(Coordinate::new(500, 0), &b), Some(Orientation::North));
        assert_eq!(orientation_of(Coordinate::new(500, 1000), &b), Some(Orientation::South));
        assert_eq!(orientation_of(Coordinate::new(0, 500), &b), Some(Orientation::East));
        assert_eq!(orientation_of(Coordinate::new(1000, 500), &b), Some(Orientation::West));
    }

    #[test]
    fn corner_precedence() {
        let b = boundary();
        assert_eq!(orientation_of(Coordinate::new(0, 1000), &b), Some(Orientation::South));
        assert_eq!(orientation_of(Coordinate::new(0, 0), &b), Some(Orientation::East));
        assert_eq!(orientation_of(Coordinate::new(1000, 0), &b), Some(Orientation::North));
        assert_eq!(orientation_of(Coordinate::new(1000, 1000), &b), Some(Orientation::West));
    }

    #[test]
    fn interior_point_has_no_orientation() {
        assert_eq!(orientation_of(Coordinate::new(500, 500), &boundary()), None);
    }

    #[test]
    fn orientation_is_pure() {
        let b = boundary();
        for pos in [Coordinate::new(300, 0), Coordinate::new(0, 0), Coordinate::new(1000, 700)] {
            assert_eq!(orientation_of(pos, &b), orientation_of(pos, &b));
        }
    }

    #[test]
    fn shape_without_area_rule() {
        let rules = LayerRules {
            min_width: Coordinate::new(15, 20),
            min_area: Coordinate::new(0, 0),
        };
        let shape = pin_shape(Coordinate::new(500, 0), Orientation::North, &rules).unwrap();
        // half width ceil(15 / 2) = 8, depth 16
        assert_eq!(shape.ll, Coordinate::new(492, 0));
        assert_eq!(shape.ur, Coordinate::new(508, 16));
    }

    #[test]
    fn shape_with_area_rule() {
        let rules = LayerRules {
            min_width: Coordinate::new(10, 10),
            min_area: Coordinate::new(0, 101),
        };
        let shape = pin_shape(Coordinate::new(1000, 300), Orientation::West, &rules).unwrap();
        // half width 5, depth ceil(101 / 10) = 11
        assert_eq!(shape.ll, Coordinate::new(989, 295));
        assert_eq!(shape.ur, Coordinate::new(1000, 305));
    }

    #[test]
    fn local_shape_is_relative_to_the_pin() {
        let rules = LayerRules {
            min_width: Coordinate::new(10, 10),
            min_area: Coordinate::new(0, 0),
        };
        let local = local_pin_shape(Orientation::South, &rules).unwrap();
        assert_eq!(local, Rect::new(Coordinate::new(-5, -10), Coordinate::new(5, 0)));
        let placed = pin_shape(Coordinate::new(400, 1000), Orientation::South, &rules);
        assert_eq!(placed, Some(local.offset(Coordinate::new(400, 1000))));
    }

    #[test]
    fn no_width_rule_no_shape() {
        let rules = LayerRules::default();
        assert!(pin_shape(Coordinate::new(0, 0), Orientation::East, &rules).is_none());
    }

    #[test]
    fn display_letters() {
        assert_eq!(format!("{}", Orientation::North), "N");
        assert_eq!(format!("{}", Orientation::West), "W");
    }
}
